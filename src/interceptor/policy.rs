// SPDX-License-Identifier: Apache-2.0

//! Policy Decision Port
//!
//! Abstraction over the external policy engine. The engine owns the rules;
//! this layer only consumes its verdicts.

use super::types::{DbConnectionParams, PolicyDecision};

/// Evaluates a connection descriptor against security policy
pub trait PolicyCheck: Send + Sync {
    fn check(&self, params: &DbConnectionParams) -> PolicyDecision;
}

/// Default policy: every connection is ignored (allowed, unlogged).
///
/// Installed when no engine is configured; a guard built with this policy
/// stays unarmed.
pub struct AllowAllPolicy;

impl PolicyCheck for AllowAllPolicy {
    fn check(&self, _params: &DbConnectionParams) -> PolicyDecision {
        PolicyDecision::ignore()
    }
}

impl<F> PolicyCheck for F
where
    F: Fn(&DbConnectionParams) -> PolicyDecision + Send + Sync,
{
    fn check(&self, params: &DbConnectionParams) -> PolicyDecision {
        self(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsn::DsnInfo;
    use crate::interceptor::types::InterceptCode;

    #[test]
    fn test_allow_all_ignores_everything() {
        let params = DbConnectionParams::new("mysql", DsnInfo::default());
        let decision = AllowAllPolicy.check(&params);
        assert_eq!(decision.code, InterceptCode::Ignore);
        assert!(decision.result.is_none());
    }

    #[test]
    fn test_closure_as_policy() {
        let policy = |params: &DbConnectionParams| {
            if params.driver_name == "mysql" {
                PolicyDecision::block(serde_json::json!({"rule": "no-mysql"}))
            } else {
                PolicyDecision::ignore()
            }
        };
        let params = DbConnectionParams::new("mysql", DsnInfo::default());
        assert_eq!(policy.check(&params).code, InterceptCode::Block);
    }
}
