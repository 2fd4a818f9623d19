// SPDX-License-Identifier: Apache-2.0

//! File Sink
//!
//! Appends one record per line to a JSONL file. Suitable for local policy or
//! attack logs that an agent tails and ships separately.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::LogSink;

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LogSink for FileSink {
    fn emit(&self, payload: &[u8]) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(payload)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}
