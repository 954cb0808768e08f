// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-instance source state.

use crate::error::{Result, SinusoidError};
use crate::reading::Reading;
use crate::waveform::{Cursor, WaveformTable, SINE_TABLE};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Cursor and counters owned by one plugin instance.
///
/// Shared between the lifecycle calls and the emission task through an
/// `Arc`. Survives reconfiguration; only wraparound moves the cursor back
/// to zero.
#[derive(Debug)]
pub struct SourceState {
    table: &'static WaveformTable,
    cursor: AtomicUsize,
    emitted: AtomicU64,
}

impl Default for SourceState {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceState {
    /// State over [`SINE_TABLE`], starting at index 0
    pub fn new() -> Self {
        Self::with_table(&SINE_TABLE)
    }

    /// State over a custom table
    pub fn with_table(table: &'static WaveformTable) -> Self {
        Self {
            table,
            cursor: AtomicUsize::new(0),
            emitted: AtomicU64::new(0),
        }
    }

    /// State positioned at `cursor`
    pub fn starting_at(cursor: Cursor) -> Self {
        let state = Self::new();
        state.cursor.store(cursor.index(), Ordering::SeqCst);
        state
    }

    /// Take the amplitude under the cursor and advance it.
    ///
    /// Returns the index that was read together with its amplitude.
    pub fn next_amplitude(&self) -> (usize, f64) {
        let previous = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |index| {
                Some(Cursor::new(index).next().index())
            })
            .unwrap_or_else(|index| index);
        let (amplitude, _) = self.table.advance(Cursor::new(previous));
        self.emitted.fetch_add(1, Ordering::Relaxed);
        (previous, amplitude)
    }

    /// Advance and wrap the amplitude into a fresh reading for `asset`.
    ///
    /// Construction is all-or-nothing: a non-finite amplitude is a data
    /// retrieval error and no reading is produced.
    pub fn next_reading(&self, asset: &str) -> Result<Reading> {
        let (index, amplitude) = self.next_amplitude();
        if !amplitude.is_finite() {
            return Err(SinusoidError::data_retrieval(
                asset,
                format!("non-finite amplitude {} at index {}", amplitude, index),
            ));
        }
        Ok(Reading::new(asset, amplitude))
    }

    /// Position the next reading will be taken from
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.cursor.load(Ordering::SeqCst))
    }

    /// Readings produced since creation
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Table this state walks
    pub fn table(&self) -> &'static WaveformTable {
        self.table
    }
}
