// SPDX-License-Identifier: Apache-2.0

//! Guard core
//!
//! Owns the two decision ports, the two log channels, configuration and
//! instance metadata. Decorators hold a shared reference and route every
//! checkpoint through here; the guard assembles and serializes the log
//! records so the ports stay free of formatting concerns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::GuardConfig;
use crate::dsn::DsnInfo;
use crate::interceptor::attack::{AttackCheck, NoopAttackCheck};
use crate::interceptor::policy::{AllowAllPolicy, PolicyCheck};
use crate::interceptor::types::{
    AttackLogRecord, AttackResult, DbConnectionParams, InstanceInfo, InterceptCode,
    PolicyLogRecord, RequestInfo, SqlErrorParams,
};
use crate::logging::{emit_quietly, Level, LogSink, TracingSink};
use crate::stacktrace;

/// Policy verdict for one connection attempt, with its log payload already
/// rendered (emission is deferred to the caller: immediately on `Block`,
/// success-path-only on `Log`).
#[derive(Debug, Clone)]
pub(crate) struct ConnectionCheck {
    pub code: InterceptCode,
    pub log: Option<String>,
}

/// The protection core shared by all decorators of one registry
pub struct Guard {
    policy: Arc<dyn PolicyCheck>,
    attack: Arc<dyn AttackCheck>,
    policy_sink: Arc<dyn LogSink>,
    attack_sink: Arc<dyn LogSink>,
    config: GuardConfig,
    instance: InstanceInfo,
    armed: AtomicBool,
}

impl Guard {
    pub fn builder() -> GuardBuilder {
        GuardBuilder::default()
    }

    /// A guard with no ports installed. Never arms; every facade call
    /// degrades to passthrough.
    pub fn disarmed() -> Self {
        GuardBuilder::default().build()
    }

    /// Whether the protection subsystem is fully initialized.
    ///
    /// Checked once per facade call, not cached per driver.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }

    /// Arms or disarms interception at runtime (e.g. for maintenance).
    pub fn set_armed(&self, armed: bool) {
        self.armed.store(armed, Ordering::Relaxed);
        info!(armed, "guard interception toggled");
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn instance(&self) -> &InstanceInfo {
        &self.instance
    }

    /// Runs the policy port for a connection attempt and renders the log
    /// payload for any non-Ignore decision.
    pub(crate) fn connection_policy_check(
        &self,
        dsn: &DsnInfo,
        driver_name: &str,
    ) -> ConnectionCheck {
        let params = DbConnectionParams::new(driver_name, dsn.clone());
        let decision = self.policy.check(&params);

        let log = if decision.code != InterceptCode::Ignore {
            let record = PolicyLogRecord {
                event_time: Utc::now(),
                instance_id: self.instance.instance_id.clone(),
                app_id: self.instance.app_id.clone(),
                server: self.instance.server.clone(),
                system: self.instance.system.clone(),
                policy_params: params,
                policy: decision.result,
                stack_trace: stacktrace::capture(self.config.max_stack_depth),
            };
            serde_json::to_string(&record).ok()
        } else {
            None
        };

        debug!(driver = driver_name, code = ?decision.code, "connection policy check");

        ConnectionCheck {
            code: decision.code,
            log,
        }
    }

    pub(crate) fn attack_check(&self, params: &SqlErrorParams) -> Vec<AttackResult> {
        self.attack.check(params)
    }

    pub(crate) fn emit_policy_log(&self, payload: &str) {
        emit_quietly(self.policy_sink.as_ref(), payload.as_bytes(), "policy");
    }

    /// Assembles and emits one attack log record.
    pub(crate) fn emit_attack_log(
        &self,
        params: &SqlErrorParams,
        request: &RequestInfo,
        result: &AttackResult,
    ) {
        let record = AttackLogRecord {
            event_time: Utc::now(),
            event_type: "attack".to_string(),
            attack_type: params.attack_type().to_string(),
            instance_id: self.instance.instance_id.clone(),
            app_id: self.instance.app_id.clone(),
            server: self.instance.server.clone(),
            system: self.instance.system.clone(),
            request: request.clone(),
            attack_params: params.clone(),
            attack: result.clone(),
            stack_trace: stacktrace::capture(self.config.max_stack_depth),
        };

        match serde_json::to_string(&record) {
            Ok(payload) => emit_quietly(self.attack_sink.as_ref(), payload.as_bytes(), "attack"),
            Err(e) => tracing::error!(error = %e, "unable to serialize attack log record"),
        }
    }
}

/// Builder for [`Guard`]
///
/// The guard arms itself only when both decision ports are installed;
/// sinks and configuration always fall back to defaults.
#[derive(Default)]
pub struct GuardBuilder {
    policy: Option<Arc<dyn PolicyCheck>>,
    attack: Option<Arc<dyn AttackCheck>>,
    policy_sink: Option<Arc<dyn LogSink>>,
    attack_sink: Option<Arc<dyn LogSink>>,
    config: Option<GuardConfig>,
}

impl GuardBuilder {
    pub fn policy(mut self, policy: impl PolicyCheck + 'static) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    pub fn attack(mut self, attack: impl AttackCheck + 'static) -> Self {
        self.attack = Some(Arc::new(attack));
        self
    }

    pub fn policy_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.policy_sink = Some(Arc::new(sink));
        self
    }

    pub fn attack_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.attack_sink = Some(Arc::new(sink));
        self
    }

    pub fn config(mut self, config: GuardConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Guard {
        let armed = self.policy.is_some() && self.attack.is_some();
        let config = self.config.unwrap_or_default();
        let instance = InstanceInfo::new(config.app_id.clone(), config.server.clone());

        Guard {
            policy: self.policy.unwrap_or_else(|| Arc::new(AllowAllPolicy)),
            attack: self.attack.unwrap_or_else(|| Arc::new(NoopAttackCheck)),
            policy_sink: self
                .policy_sink
                .unwrap_or_else(|| Arc::new(TracingSink::new(Level::Info))),
            attack_sink: self
                .attack_sink
                .unwrap_or_else(|| Arc::new(TracingSink::new(Level::Warn))),
            config,
            instance,
            armed: AtomicBool::new(armed),
        }
    }
}
