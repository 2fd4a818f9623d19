// SPDX-License-Identifier: Apache-2.0

//! Normalized error types for the driver layer
//!
//! Vendor driver failures are mapped to these unified error types by the
//! driver implementations themselves; the interception layer never rewrites
//! a delegated error, it only observes it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all driver operations
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum DriverError {
    /// The distinguished policy-abort signal. Never produced by a wrapped
    /// driver; raised only by the interception layer when the policy engine
    /// vetoes a connection attempt. Outer layers that understand policy
    /// blocking recognize it via [`DriverError::is_blocked`].
    #[error("connection blocked by security policy: {message}")]
    Blocked { message: String },

    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("statement execution failed: {message}")]
    ExecutionError { message: String },

    #[error("driver not found: {name}")]
    DriverNotFound { name: String },

    #[error("feature not supported: {message}")]
    NotSupported { message: String },
}

impl DriverError {
    pub fn blocked(msg: impl Into<String>) -> Self {
        Self::Blocked { message: msg.into() }
    }

    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: msg.into() }
    }

    pub fn execution_error(msg: impl Into<String>) -> Self {
        Self::ExecutionError { message: msg.into() }
    }

    pub fn driver_not_found(name: impl Into<String>) -> Self {
        Self::DriverNotFound { name: name.into() }
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported { message: msg.into() }
    }

    /// True for the policy-abort signal and nothing else.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Result type alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;
