//! Log emission
//!
//! Two independent channels leave the interception core: the policy-decision
//! log (info severity) and the attack log (alarm severity). Each channel is a
//! [`LogSink`] accepting one pre-serialized record; delivery, retry and rate
//! limiting are the sink's own business. A sink failure is reported to the
//! diagnostic stream and swallowed — it never alters the decision pipeline's
//! outcome.

pub mod file;
pub mod hook;

pub use file::FileSink;
pub use hook::{HookSink, LogEntry, LogTransport, RemoteHook};

use std::io;

use serde::{Deserialize, Serialize};
use tracing::error;

/// Record severity, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Accepts one pre-serialized log record
pub trait LogSink: Send + Sync {
    fn emit(&self, payload: &[u8]) -> io::Result<()>;
}

impl<S: LogSink + ?Sized> LogSink for std::sync::Arc<S> {
    fn emit(&self, payload: &[u8]) -> io::Result<()> {
        (**self).emit(payload)
    }
}

/// Emits through `sink`, reporting failures to the diagnostic stream.
pub(crate) fn emit_quietly(sink: &dyn LogSink, payload: &[u8], channel: &str) {
    if let Err(e) = sink.emit(payload) {
        error!(channel, error = %e, "log sink write failed");
    }
}

/// Default sink: forwards records to the `tracing` diagnostic stream.
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl LogSink for TracingSink {
    fn emit(&self, payload: &[u8]) -> io::Result<()> {
        let record = String::from_utf8_lossy(payload);
        match self.level {
            Level::Debug => tracing::debug!(target: "dbguard::log", %record),
            Level::Info => tracing::info!(target: "dbguard::log", %record),
            Level::Warn => tracing::warn!(target: "dbguard::log", %record),
            Level::Error => tracing::error!(target: "dbguard::log", %record),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl LogSink for FailingSink {
        fn emit(&self, _payload: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "sink down"))
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error > Level::Warn);
        assert!(Level::Warn > Level::Info);
        assert!(Level::Info > Level::Debug);
    }

    #[test]
    fn test_emit_quietly_swallows_failure() {
        // must not panic or propagate
        emit_quietly(&FailingSink, b"{}", "policy");
    }

    #[test]
    fn test_tracing_sink_accepts_payload() {
        assert!(TracingSink::new(Level::Info).emit(b"{\"k\":1}").is_ok());
    }
}
