// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Push mode: a background task emits readings to a sink at the
//! configured rate until cancelled.

use crate::config::{Configuration, DEFAULT_RATE, RATE_ITEM};
use crate::error::{Result, SinusoidError};
use crate::handle::{LifecycleState, RunHandle};
use crate::plugin::{PluginInfo, PluginMode, SouthPlugin};
use crate::sink::Sink;
use crate::state::SourceState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Configured rate, healing an unusable one.
///
/// A zero, negative, non-numeric or missing `dataPointsPerSec` is logged
/// and reset to 1 in `config`.
pub fn heal_rate(config: &mut Configuration) -> f64 {
    match config.data_points_per_sec() {
        Ok(rate) => rate,
        Err(e) => {
            warn!(item = RATE_ITEM, error = %e, "invalid data rate, resetting to 1");
            config.reset_rate();
            DEFAULT_RATE
        }
    }
}

/// Delay before the next reading, healing an unusable rate first.
pub fn emission_interval(config: &mut Configuration) -> Duration {
    let rate = heal_rate(config);
    Duration::try_from_secs_f64(1.0 / rate).unwrap_or(Duration::MAX)
}

/// A running emission task and its stop signal.
#[derive(Debug)]
pub struct EmissionTask {
    asset: String,
    token: CancellationToken,
    join: JoinHandle<Result<()>>,
}

impl EmissionTask {
    /// Ask the task to stop at its next suspension point
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the task has exited, for any reason
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Asset the task emits for
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Wait for the task to exit.
    ///
    /// A panicked task is reported as a data retrieval error.
    pub async fn join(mut self) -> Result<()> {
        self.finished().await
    }

    /// Cancel-safe wait; must not be polled again once it has resolved.
    pub(crate) async fn finished(&mut self) -> Result<()> {
        match (&mut self.join).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => {
                error!(asset = %self.asset, error = %e, "emission task aborted");
                Err(SinusoidError::data_retrieval(self.asset.as_str(), e))
            }
        }
    }
}

/// One emission loop: state, sink, a private copy of the configuration,
/// and the stop signal.
struct EmissionLoop<S: ?Sized> {
    sink: Arc<S>,
    state: Arc<SourceState>,
    config: Configuration,
    token: CancellationToken,
}

impl<S: Sink + ?Sized> EmissionLoop<S> {
    async fn run(mut self) -> Result<()> {
        let asset = self.config.asset_name().to_string();
        debug!(asset = %asset, "emission loop running");

        loop {
            if self.token.is_cancelled() {
                break;
            }

            let reading = match self.state.next_reading(&asset) {
                Ok(reading) => reading,
                Err(e) => {
                    error!(asset = %asset, error = %e, "sinusoid exception");
                    return Err(e);
                }
            };
            trace!(asset = %asset, key = %reading.key, "emitting reading");

            if let Err(e) = self.sink.add_readings(reading).await {
                error!(asset = %asset, error = %e, "sinusoid exception");
                return Err(SinusoidError::data_retrieval(asset.as_str(), e));
            }

            let delay = emission_interval(&mut self.config);
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        debug!(asset = %asset, "emission loop cancelled");
        Ok(())
    }
}

/// Push-mode sinusoid plugin.
///
/// Each started handle owns one background task; the cursor lives in the
/// instance and is shared by every handle it creates.
pub struct AsyncSinusoid<S: ?Sized> {
    sink: Arc<S>,
    state: Arc<SourceState>,
}

impl<S: Sink + ?Sized + 'static> AsyncSinusoid<S> {
    /// Plugin writing to `sink`, cursor at 0
    pub fn new(sink: Arc<S>) -> Self {
        Self::with_state(sink, Arc::new(SourceState::new()))
    }

    /// Plugin over existing state
    pub fn with_state(sink: Arc<S>, state: Arc<SourceState>) -> Self {
        Self { sink, state }
    }

    /// Cursor and counters of this instance
    pub fn state(&self) -> &Arc<SourceState> {
        &self.state
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Launch the emission task for an initialized handle.
    ///
    /// An unusable rate is healed in the handle's configuration before the
    /// task takes its copy. Must be called from within a tokio runtime.
    pub fn start(&self, handle: &mut RunHandle) -> Result<()> {
        let current = handle.state();
        if current != LifecycleState::Initialized {
            return Err(SinusoidError::InvalidState {
                expected: LifecycleState::Initialized.as_str(),
                actual: current.as_str(),
            });
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SinusoidError::NoRuntime)?;

        heal_rate(handle.config_mut());
        let config = handle.config().clone();
        let asset = config.asset_name().to_string();
        let token = CancellationToken::new();
        let emission = EmissionLoop {
            sink: Arc::clone(&self.sink),
            state: Arc::clone(&self.state),
            config,
            token: token.clone(),
        };
        let join = runtime.spawn(emission.run());

        info!(asset = %asset, cursor = self.state.cursor().index(), "sinusoid plugin started");
        handle.attach(EmissionTask { asset, token, join });
        Ok(())
    }
}

impl<S: Sink + ?Sized + 'static> SouthPlugin for AsyncSinusoid<S> {
    fn describe(&self) -> PluginInfo {
        PluginInfo::for_mode(PluginMode::Async)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ChannelSink, MemorySink};

    #[test]
    fn test_emission_interval() {
        let mut config = Configuration::default_schema().with_value(RATE_ITEM, "10");
        assert_eq!(emission_interval(&mut config), Duration::from_millis(100));
        assert_eq!(config.value(RATE_ITEM), Some("10"));
    }

    #[test]
    fn test_emission_interval_heals_zero_rate() {
        let mut config = Configuration::default_schema().with_value(RATE_ITEM, "0");
        assert_eq!(emission_interval(&mut config), Duration::from_secs(1));
        assert_eq!(config.data_points_per_sec().unwrap(), 1.0);
    }

    #[test]
    fn test_heal_rate_keeps_valid_rate() {
        let mut config = Configuration::default_schema().with_value(RATE_ITEM, "4");
        assert_eq!(heal_rate(&mut config), 4.0);
        assert_eq!(config.value(RATE_ITEM), Some("4"));

        let mut config = Configuration::default_schema().with_value(RATE_ITEM, "fast");
        assert_eq!(heal_rate(&mut config), 1.0);
        assert_eq!(config.value(RATE_ITEM), Some("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_heals_handle_rate() {
        let (sink, _rx) = ChannelSink::new();
        let plugin = AsyncSinusoid::new(Arc::new(sink));
        let config = Configuration::default_schema().with_value(RATE_ITEM, "0");
        let mut handle = plugin.initialize(&config);

        plugin.start(&mut handle).unwrap();
        assert_eq!(handle.config().value(RATE_ITEM), Some("1"));
        assert_eq!(handle.config().data_points_per_sec().unwrap(), 1.0);
        plugin.shutdown(&mut handle);
    }

    #[test]
    fn test_start_without_runtime() {
        let plugin = AsyncSinusoid::new(Arc::new(MemorySink::new()));
        let mut handle = plugin.initialize(&Configuration::default_schema());
        assert_eq!(plugin.start(&mut handle), Err(SinusoidError::NoRuntime));
        assert_eq!(handle.state(), LifecycleState::Initialized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_rejected() {
        let (sink, _rx) = ChannelSink::new();
        let plugin = AsyncSinusoid::new(Arc::new(sink));
        let mut handle = plugin.initialize(&Configuration::default_schema());

        plugin.start(&mut handle).unwrap();
        assert_eq!(handle.state(), LifecycleState::Running);
        assert!(matches!(
            plugin.start(&mut handle),
            Err(SinusoidError::InvalidState { actual: "running", .. })
        ));
        plugin.shutdown(&mut handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_cycle_emits_nothing() {
        let sink = Arc::new(MemorySink::new());
        let plugin = AsyncSinusoid::new(Arc::clone(&sink));
        let mut handle = plugin.initialize(&Configuration::default_schema());

        plugin.start(&mut handle).unwrap();
        let task = handle.stop().unwrap();
        assert!(task.is_cancelled());
        assert_eq!(task.join().await, Ok(()));
        assert!(sink.is_empty());
    }
}
