//! Interceptor Types
//!
//! Type definitions shared by the policy and attack interception pipelines:
//! decision codes, check subjects, per-signature results, and the serialized
//! log record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dsn::DsnInfo;

/// Decision produced by the policy and attack engines
///
/// Severity is ordered: `Block > Log > Ignore`. Only `Block` aborts the
/// operation; `Ignore` never logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterceptCode {
    Ignore,
    Log,
    Block,
}

impl Default for InterceptCode {
    fn default() -> Self {
        Self::Ignore
    }
}

/// Outcome of a policy check on a connection descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub code: InterceptCode,
    /// Engine-specific result payload, embedded verbatim in the policy log
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl PolicyDecision {
    pub fn ignore() -> Self {
        Self::default()
    }

    pub fn log(result: serde_json::Value) -> Self {
        Self {
            code: InterceptCode::Log,
            result: Some(result),
        }
    }

    pub fn block(result: serde_json::Value) -> Self {
        Self {
            code: InterceptCode::Block,
            result: Some(result),
        }
    }
}

/// Classification of a driver error reported by the error interceptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorClass {
    pub code: String,
    pub message: String,
}

impl ErrorClass {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// One per-signature result from the attack engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResult {
    pub intercept: InterceptCode,
    /// Detection plugin/signature that produced this result
    pub plugin: String,
    pub message: String,
    /// Detection confidence, 0-100
    pub confidence: u8,
}

impl AttackResult {
    pub fn new(
        intercept: InterceptCode,
        plugin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            intercept,
            plugin: plugin.into(),
            message: message.into(),
            confidence: 100,
        }
    }
}

/// Subject of a connection policy check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConnectionParams {
    pub driver_name: String,
    pub dsn: DsnInfo,
}

impl DbConnectionParams {
    pub fn new(driver_name: impl Into<String>, dsn: DsnInfo) -> Self {
        Self {
            driver_name: driver_name.into(),
            dsn,
        }
    }
}

/// Subject of an attack check after an operation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlErrorParams {
    pub driver_name: String,
    /// The operation parameter the error is attributed to (DSN or statement)
    pub query: String,
    pub error_code: String,
    pub error_message: String,
}

impl SqlErrorParams {
    pub fn new(
        driver_name: impl Into<String>,
        query: impl Into<String>,
        class: ErrorClass,
    ) -> Self {
        Self {
            driver_name: driver_name.into(),
            query: query.into(),
            error_code: class.code,
            error_message: class.message,
        }
    }

    pub fn attack_type(&self) -> &'static str {
        "sql_exception"
    }
}

/// Descriptor of the inbound unit of work an operation is attributed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    pub request_id: String,
    pub method: String,
    pub url: String,
    pub remote_addr: String,
}

impl RequestInfo {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        remote_addr: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method: method.into(),
            url: url.into(),
            remote_addr: remote_addr.into(),
        }
    }
}

/// Host metadata stamped into every log record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub addr: String,
}

/// Platform metadata stamped into every log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// Identity of this protection instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub instance_id: String,
    pub app_id: String,
    pub server: ServerInfo,
    pub system: SystemInfo,
}

impl InstanceInfo {
    pub fn new(app_id: impl Into<String>, server: ServerInfo) -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            app_id: app_id.into(),
            server,
            system: SystemInfo::current(),
        }
    }
}

/// Serialized through the policy-decision log channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyLogRecord {
    pub event_time: DateTime<Utc>,
    pub instance_id: String,
    pub app_id: String,
    pub server: ServerInfo,
    pub system: SystemInfo,
    pub policy_params: DbConnectionParams,
    /// Engine result payload, verbatim
    #[serde(default)]
    pub policy: Option<serde_json::Value>,
    pub stack_trace: String,
}

/// Serialized through the attack log channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackLogRecord {
    pub event_time: DateTime<Utc>,
    pub event_type: String,
    pub attack_type: String,
    pub instance_id: String,
    pub app_id: String,
    pub server: ServerInfo,
    pub system: SystemInfo,
    pub request: RequestInfo,
    pub attack_params: SqlErrorParams,
    pub attack: AttackResult,
    pub stack_trace: String,
}
