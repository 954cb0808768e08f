// Sinusoid Runner - Command-line host for the sinusoid plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! JSON-lines output standing in for the host's ingestion API.

use async_trait::async_trait;
use sinusoid::{Reading, Sink, SinkError};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;

/// Writes each reading as one JSON line, optionally stopping after a fixed
/// number.
pub struct JsonLinesSink<W> {
    out: Mutex<W>,
    limit: Option<u64>,
    written: AtomicU64,
    done: Notify,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W, limit: Option<u64>) -> Self {
        Self {
            out: Mutex::new(out),
            limit,
            written: AtomicU64::new(0),
            done: Notify::new(),
        }
    }

    /// Write one reading. Readings past the limit are dropped.
    pub fn write_reading(&self, reading: &Reading) -> Result<(), SinkError> {
        if self.is_finished() {
            return Ok(());
        }

        let line = serde_json::to_string(reading).map_err(|e| SinkError::Rejected(e.to_string()))?;
        {
            let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
            writeln!(out, "{}", line).map_err(|e| SinkError::Rejected(e.to_string()))?;
            out.flush().map_err(|e| SinkError::Rejected(e.to_string()))?;
        }

        let written = self.written.fetch_add(1, Ordering::SeqCst) + 1;
        if Some(written) == self.limit {
            self.done.notify_one();
        }
        Ok(())
    }

    /// Readings written so far
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::SeqCst)
    }

    /// Whether the limit has been reached
    pub fn is_finished(&self) -> bool {
        matches!(self.limit, Some(limit) if self.written() >= limit)
    }

    /// Resolves once the limit is reached; never without a limit
    pub async fn finished(&self) {
        if self.limit.is_none() {
            std::future::pending::<()>().await;
        }
        if self.is_finished() {
            return;
        }
        self.done.notified().await;
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send> Sink for JsonLinesSink<W> {
    async fn add_readings(&self, reading: Reading) -> Result<(), SinkError> {
        self.write_reading(&reading)
    }
}
