// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Poll mode: the host asks for one reading at a time.

use crate::error::{Result, SinusoidError};
use crate::handle::{LifecycleState, RunHandle};
use crate::plugin::{PluginInfo, PluginMode, SouthPlugin};
use crate::reading::Reading;
use crate::state::SourceState;
use std::sync::Arc;
use tracing::{error, trace};

/// Poll-mode sinusoid plugin. No background task.
#[derive(Debug, Default)]
pub struct PollSinusoid {
    state: Arc<SourceState>,
}

impl PollSinusoid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugin over existing state
    pub fn with_state(state: Arc<SourceState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<SourceState> {
        &self.state
    }

    /// Produce the next reading.
    ///
    /// Always yields a reading unless construction fails, which is a data
    /// retrieval error.
    pub fn poll(&self, handle: &RunHandle) -> Result<Reading> {
        let current = handle.state();
        if current == LifecycleState::Stopped {
            return Err(SinusoidError::InvalidState {
                expected: LifecycleState::Initialized.as_str(),
                actual: current.as_str(),
            });
        }

        let asset = handle.config().asset_name();
        match self.state.next_reading(asset) {
            Ok(reading) => {
                trace!(asset, key = %reading.key, "polled reading");
                Ok(reading)
            }
            Err(e) => {
                error!(asset, error = %e, "sinusoid exception");
                Err(e)
            }
        }
    }
}

impl SouthPlugin for PollSinusoid {
    fn describe(&self) -> PluginInfo {
        PluginInfo::for_mode(PluginMode::Poll)
    }
}
