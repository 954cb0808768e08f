// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sink abstraction module
//!
//! A sink is the host's ingestion entry point. Push mode hands every
//! reading to one; poll mode returns readings to the host instead.

use crate::error::SinkError;
use crate::reading::Reading;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// Trait for ingestion sinks
#[async_trait]
pub trait Sink: Send + Sync {
    /// Take ownership of one reading
    async fn add_readings(&self, reading: Reading) -> Result<(), SinkError>;
}

/// A simple in-memory sink for testing and local collection
#[derive(Debug, Default)]
pub struct MemorySink {
    readings: Mutex<Vec<Reading>>,
    closed: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn readings(&self) -> Vec<Reading> {
        self.readings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.readings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refuse all further readings with [`SinkError::Closed`]
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn add_readings(&self, reading: Reading) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        self.readings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reading);
        Ok(())
    }
}

/// Forwards readings over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Reading>,
}

impl ChannelSink {
    /// Sink plus the receiving end
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Reading>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn add_readings(&self, reading: Reading) -> Result<(), SinkError> {
        self.tx.send(reading).map_err(|_| SinkError::Closed)
    }
}
