// SPDX-License-Identifier: Apache-2.0

//! Error Interception Port
//!
//! Two collaborators feed the post-error pipeline: a per-driver error
//! interceptor that decides whether a failure is security-relevant, and the
//! attack engine that resolves a relevant failure into per-signature
//! verdicts.

use std::sync::Arc;

use crate::driver::error::DriverError;

use super::types::{AttackResult, ErrorClass, SqlErrorParams};

/// Classifies a driver error; `None` means "not security-relevant".
///
/// Supplied per driver at registration time. The default never reports a
/// hit, which keeps the error path of unconfigured drivers free of any
/// interception work.
pub type ErrorInterceptor = Arc<dyn Fn(&DriverError) -> Option<ErrorClass> + Send + Sync>;

/// Default interceptor: never reports a hit.
pub fn generic_error_interceptor(_err: &DriverError) -> Option<ErrorClass> {
    None
}

/// Resolves a security-relevant failure into per-signature results
///
/// Each result carries its own [`InterceptCode`](super::types::InterceptCode);
/// the pipeline logs every non-Ignore result and blocks if any result blocks.
pub trait AttackCheck: Send + Sync {
    fn check(&self, params: &SqlErrorParams) -> Vec<AttackResult>;
}

/// Default attack engine: no signatures, no hits.
pub struct NoopAttackCheck;

impl AttackCheck for NoopAttackCheck {
    fn check(&self, _params: &SqlErrorParams) -> Vec<AttackResult> {
        Vec::new()
    }
}

impl<F> AttackCheck for F
where
    F: Fn(&SqlErrorParams) -> Vec<AttackResult> + Send + Sync,
{
    fn check(&self, params: &SqlErrorParams) -> Vec<AttackResult> {
        self(params)
    }
}
