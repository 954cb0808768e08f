// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Run handle threaded through the lifecycle calls.

use crate::config::{Configuration, DEFAULT_RATE};
#[cfg(feature = "push")]
use crate::error::Result;
#[cfg(feature = "push")]
use crate::push::EmissionTask;
use std::time::Duration;

/// Where a handle is in the plugin lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created by `initialize`, nothing running
    Initialized,
    /// An emission task is attached (push mode)
    Running,
    /// Shut down; no further readings
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Initialized => "initialized",
            LifecycleState::Running => "running",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State returned by `initialize` and passed back on every later call.
///
/// Dropping a handle cancels its emission task.
#[derive(Debug)]
pub struct RunHandle {
    config: Configuration,
    restart: bool,
    stopped: bool,
    #[cfg(feature = "push")]
    task: Option<EmissionTask>,
}

impl RunHandle {
    pub(crate) fn new(config: Configuration) -> Self {
        Self {
            config,
            restart: false,
            stopped: false,
            #[cfg(feature = "push")]
            task: None,
        }
    }

    /// Configuration this handle was built from
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Set by `reconfigure` when the host must restart the plugin
    pub fn restart_required(&self) -> bool {
        self.restart
    }

    pub fn state(&self) -> LifecycleState {
        if self.stopped {
            return LifecycleState::Stopped;
        }
        #[cfg(feature = "push")]
        if self.task.is_some() {
            return LifecycleState::Running;
        }
        LifecycleState::Initialized
    }

    /// Interval between readings implied by the configured rate.
    ///
    /// Poll-mode hosts use this to pace their calls. Unusable rates map to
    /// one second.
    pub fn poll_interval(&self) -> Duration {
        let rate = self.config.data_points_per_sec().unwrap_or(DEFAULT_RATE);
        Duration::try_from_secs_f64(1.0 / rate).unwrap_or(Duration::from_secs(1))
    }

    pub(crate) fn set_restart(&mut self, restart: bool) {
        self.restart = restart;
    }

    #[cfg(feature = "push")]
    pub(crate) fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    pub(crate) fn replace_config(&mut self, config: Configuration) {
        self.config = config;
    }

    /// Cancel any task and mark the handle stopped. Safe to repeat.
    pub(crate) fn release(&mut self) -> bool {
        let was_stopped = self.stopped;
        self.stopped = true;
        #[cfg(feature = "push")]
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        !was_stopped
    }

    #[cfg(feature = "push")]
    pub(crate) fn attach(&mut self, task: EmissionTask) {
        self.task = Some(task);
    }

    /// Cancel the emission task and hand it back for joining.
    ///
    /// The handle is `Stopped` afterwards. Returns `None` if no task was
    /// attached.
    #[cfg(feature = "push")]
    pub fn stop(&mut self) -> Option<EmissionTask> {
        self.stopped = true;
        let task = self.task.take()?;
        task.cancel();
        Some(task)
    }

    /// Wait for the emission task to finish and return its outcome.
    ///
    /// `Ok(())` after cancellation, a data retrieval error if the task
    /// failed. `None` when no task is attached.
    ///
    /// Cancel-safe: if the future is dropped early the task stays attached.
    #[cfg(feature = "push")]
    pub async fn wait(&mut self) -> Option<Result<()>> {
        let outcome = self.task.as_mut()?.finished().await;
        self.task = None;
        Some(outcome)
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        #[cfg(feature = "push")]
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RATE_ITEM;

    #[test]
    fn test_new_handle() {
        let handle = RunHandle::new(Configuration::default_schema());
        assert_eq!(handle.state(), LifecycleState::Initialized);
        assert!(!handle.restart_required());
        assert_eq!(handle.config().asset_name(), "sinusoid");
    }

    #[test]
    fn test_poll_interval() {
        let config = Configuration::default_schema().with_value(RATE_ITEM, "4");
        let handle = RunHandle::new(config);
        assert_eq!(handle.poll_interval(), Duration::from_millis(250));

        let config = Configuration::default_schema().with_value(RATE_ITEM, "0");
        let handle = RunHandle::new(config);
        assert_eq!(handle.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut handle = RunHandle::new(Configuration::default_schema());
        assert!(handle.release());
        assert!(!handle.release());
        assert_eq!(handle.state(), LifecycleState::Stopped);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::Running.to_string(), "running");
    }
}
