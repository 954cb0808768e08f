// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Host plugin contract.
//!
//! Both operating modes share metadata, initialisation, reconfiguration
//! and shutdown; they differ only in how readings leave the plugin
//! (`AsyncSinusoid::start` or `PollSinusoid::poll`).

use crate::config::Configuration;
use crate::handle::{LifecycleState, RunHandle};
use crate::{INTERFACE_VERSION, PLUGIN_VERSION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How readings leave the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginMode {
    /// The plugin pushes readings on its own schedule
    Async,
    /// The host pulls one reading per call
    Poll,
}

/// Plugin category; this crate only provides data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    South,
}

/// Static metadata reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub mode: PluginMode,
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    pub interface: String,
    pub config: Configuration,
}

impl PluginInfo {
    /// Metadata for the given mode
    pub fn for_mode(mode: PluginMode) -> Self {
        let name = match mode {
            PluginMode::Async => "Sinusoid plugin",
            PluginMode::Poll => "Sinusoid Poll plugin",
        };
        Self {
            name: name.to_string(),
            version: PLUGIN_VERSION.to_string(),
            mode,
            plugin_type: PluginType::South,
            interface: INTERFACE_VERSION.to_string(),
            config: Configuration::default_schema(),
        }
    }
}

/// Lifecycle entry points common to every south plugin.
///
/// The host calls these in order and serializes them. When a handle
/// returned by [`reconfigure`](SouthPlugin::reconfigure) reports
/// `restart_required`, restarting is the host's job.
pub trait SouthPlugin {
    /// Static metadata; no side effects
    fn describe(&self) -> PluginInfo;

    /// Build a handle from a copy of `config`. Never fails.
    fn initialize(&self, config: &Configuration) -> RunHandle {
        debug!(asset = config.asset_name(), "sinusoid plugin initialized");
        RunHandle::new(config.clone())
    }

    /// Apply a new configuration.
    ///
    /// A change to `assetName` or `dataPointsPerSec` stops the plugin and
    /// returns a fresh handle flagged for restart. Any other change is
    /// copied into the handle and a running task keeps going.
    fn reconfigure(&self, mut handle: RunHandle, new_config: &Configuration) -> RunHandle {
        info!(old = ?handle.config(), new = ?new_config, "reconfiguring sinusoid plugin");

        let changed = handle.config().diff(new_config);
        if Configuration::requires_restart(&changed) {
            handle.release();
            info!("sinusoid disconnected");
            let mut new_handle = self.initialize(new_config);
            new_handle.set_restart(true);
            info!(
                keys = %changed.join(", "),
                "restarting sinusoid plugin due to change in configuration"
            );
            new_handle
        } else {
            handle.replace_config(new_config.clone());
            handle.set_restart(false);
            handle
        }
    }

    /// Stop any background work. Safe to call more than once.
    fn shutdown(&self, handle: &mut RunHandle) {
        if handle.state() == LifecycleState::Stopped {
            debug!("sinusoid plugin already shut down");
            return;
        }
        handle.release();
        info!("sinusoid disconnected");
        info!("sinusoid plugin shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_info_async() {
        let info = PluginInfo::for_mode(PluginMode::Async);
        assert_eq!(info.name, "Sinusoid plugin");
        assert_eq!(info.version, "1.0");
        assert_eq!(info.interface, "1.0");
        assert_eq!(info.plugin_type, PluginType::South);
        assert_eq!(info.config, Configuration::default_schema());
    }

    #[test]
    fn test_plugin_info_json() {
        let info = PluginInfo::for_mode(PluginMode::Poll);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["mode"], "poll");
        assert_eq!(value["type"], "south");
        assert_eq!(value["config"]["assetName"]["default"], "sinusoid");
    }
}
