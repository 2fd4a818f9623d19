//! Remote Log Hook
//!
//! Adapts a structured log entry onto a rate-limited network writer. The
//! writer is an external collaborator: it accepts a framed byte payload,
//! applies its own token-bucket admission control, and reports success or
//! error. The hook only filters by severity and frames the entry as a
//! one-element JSON array, the wire shape the collection endpoint expects.

use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::{Level, LogSink};

/// Rate-limited remote writer, consumed as an opaque byte sink
pub trait LogTransport: Send + Sync {
    fn write(&self, payload: &[u8]) -> io::Result<usize>;
}

/// One structured entry as shipped to the remote collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// Severity-filtered hook in front of a [`LogTransport`]
pub struct RemoteHook {
    threshold: Level,
    transport: Arc<dyn LogTransport>,
}

impl RemoteHook {
    pub fn new(threshold: Level, transport: Arc<dyn LogTransport>) -> Self {
        Self {
            threshold,
            transport,
        }
    }

    /// Whether an entry at `level` is shipped.
    ///
    /// A `Warn` threshold reports warning-and-above only; any other
    /// threshold reports info-and-above.
    pub fn reports(&self, level: Level) -> bool {
        match self.threshold {
            Level::Warn => level >= Level::Warn,
            _ => level >= Level::Info,
        }
    }

    /// Serializes, frames and ships one entry.
    pub fn fire(&self, entry: &LogEntry) -> io::Result<()> {
        if !self.reports(entry.level) {
            return Ok(());
        }

        let line = serde_json::to_string(entry).map_err(|e| {
            error!(error = %e, "unable to serialize log entry");
            io::Error::new(io::ErrorKind::InvalidData, e)
        })?;

        let mut framed = Vec::with_capacity(line.len() + 3);
        framed.extend_from_slice(b"[\n");
        framed.extend_from_slice(line.as_bytes());
        framed.extend_from_slice(b"]");

        self.transport.write(&framed).map(|_| ())
    }

    /// Adapts this hook into a [`LogSink`] channel at a fixed severity.
    pub fn sink(self: &Arc<Self>, level: Level) -> HookSink {
        HookSink {
            hook: Arc::clone(self),
            level,
        }
    }
}

/// [`LogSink`] adapter: wraps each record in a [`LogEntry`] at a fixed level
pub struct HookSink {
    hook: Arc<RemoteHook>,
    level: Level,
}

impl LogSink for HookSink {
    fn emit(&self, payload: &[u8]) -> io::Result<()> {
        let entry = LogEntry::new(self.level, String::from_utf8_lossy(payload).into_owned());
        self.hook.fire(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingTransport {
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    impl LogTransport for CapturingTransport {
        fn write(&self, payload: &[u8]) -> io::Result<usize> {
            self.payloads.lock().unwrap().push(payload.to_vec());
            Ok(payload.len())
        }
    }

    #[test]
    fn test_frames_as_one_element_array() {
        let transport = Arc::new(CapturingTransport::default());
        let hook = RemoteHook::new(Level::Info, transport.clone());

        hook.fire(&LogEntry::new(Level::Info, "hello")).unwrap();

        let payloads = transport.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        let framed = String::from_utf8(payloads[0].clone()).unwrap();
        assert!(framed.starts_with("[\n"));
        assert!(framed.ends_with(']'));

        // the framed body is a parseable one-element array
        let parsed: Vec<LogEntry> = serde_json::from_str(&framed).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].message, "hello");
    }

    #[test]
    fn test_warn_threshold_filters_info() {
        let transport = Arc::new(CapturingTransport::default());
        let hook = RemoteHook::new(Level::Warn, transport.clone());

        hook.fire(&LogEntry::new(Level::Info, "dropped")).unwrap();
        hook.fire(&LogEntry::new(Level::Warn, "kept")).unwrap();
        hook.fire(&LogEntry::new(Level::Error, "kept too")).unwrap();

        assert_eq!(transport.payloads.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_other_thresholds_report_info_and_above() {
        let transport = Arc::new(CapturingTransport::default());
        let hook = RemoteHook::new(Level::Debug, transport.clone());

        hook.fire(&LogEntry::new(Level::Debug, "dropped")).unwrap();
        hook.fire(&LogEntry::new(Level::Info, "kept")).unwrap();

        assert_eq!(transport.payloads.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_sink_adapter_ships_at_fixed_level() {
        let transport = Arc::new(CapturingTransport::default());
        let hook = Arc::new(RemoteHook::new(Level::Warn, transport.clone()));
        let sink = hook.sink(Level::Warn);

        sink.emit(br#"{"attack":true}"#).unwrap();
        assert_eq!(transport.payloads.lock().unwrap().len(), 1);
    }
}
