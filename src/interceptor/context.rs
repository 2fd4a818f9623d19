//! Execution context
//!
//! The per-unit-of-work association that correlates a database operation
//! with the inbound request it serves. The caller that owns the unit of work
//! (typically HTTP middleware) builds one before the operation and drops it
//! afterwards; the interception layer only reads it. Context is threaded
//! explicitly through every call on the interception path, so nothing leaks
//! across reused worker threads.

use std::fmt;
use std::sync::Arc;

use super::types::RequestInfo;

/// Capability to abort the enclosing unit of work (e.g. terminate the HTTP
/// response), independent of the database call's own return path.
pub trait Blocker: Send + Sync {
    fn block(&self);
}

/// Request correlation handle for one logical execution
///
/// Holds at most one request descriptor and at most one blocking capability.
/// Cloning is cheap; both fields are shared references.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    request: Option<Arc<RequestInfo>>,
    blocker: Option<Arc<dyn Blocker>>,
}

impl ExecutionContext {
    /// Context with no request attribution: interception still runs policy
    /// checks, but attack logging and blocking are skipped.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn for_request(request: RequestInfo) -> Self {
        Self {
            request: Some(Arc::new(request)),
            blocker: None,
        }
    }

    pub fn with_blocker(mut self, blocker: Arc<dyn Blocker>) -> Self {
        self.blocker = Some(blocker);
        self
    }

    /// True when a request descriptor is attached; the facade treats an
    /// inactive context as "no interception wanted".
    pub fn is_active(&self) -> bool {
        self.request.is_some()
    }

    pub fn request(&self) -> Option<&RequestInfo> {
        self.request.as_deref()
    }

    pub fn blocker(&self) -> Option<&Arc<dyn Blocker>> {
        self.blocker.as_ref()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("request", &self.request)
            .field("blocker", &self.blocker.as_ref().map(|_| "<blocker>"))
            .finish()
    }
}
