// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Sinusoid - Synthetic sine-wave south plugin
//!
//! A data source for telemetry ingestion hosts that emits one point of a
//! fixed 60-point sine table per reading.
//!
//! ## Key Features
//!
//! - **Two modes**: push (a background task feeds a [`Sink`]) or poll (the host pulls)
//! - **Host configuration category**: `assetName` and `dataPointsPerSec`, with display hints
//! - **Live reconfiguration**: key changes flag the handle for a host-driven restart
//! - **Self-healing rate**: an unusable rate falls back to one reading per second
//!
//! ## Quick Start
//!
//! ```rust
//! use sinusoid::{Configuration, PollSinusoid, SouthPlugin};
//!
//! let plugin = PollSinusoid::new();
//! let handle = plugin.initialize(&Configuration::default_schema());
//!
//! let reading = plugin.poll(&handle).unwrap();
//! assert_eq!(reading.asset, "sinusoid");
//! assert_eq!(reading.amplitude(), Some(0.0));
//! ```
//!
//! Push mode needs a tokio runtime:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sinusoid::{AsyncSinusoid, Configuration, MemorySink, SouthPlugin};
//!
//! # async fn run() -> sinusoid::Result<()> {
//! let sink = Arc::new(MemorySink::new());
//! let plugin = AsyncSinusoid::new(Arc::clone(&sink));
//! let mut handle = plugin.initialize(&Configuration::default_schema());
//! plugin.start(&mut handle)?;
//! // ... readings arrive in `sink` once per second ...
//! plugin.shutdown(&mut handle);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`waveform`]: The sine table and cursor arithmetic
//! - [`config`]: Configuration category and default schema
//! - [`reading`]: Readings handed to the host
//! - [`plugin`]: Host plugin contract
//! - [`push`]: Push mode (feature `push`)
//! - [`poll`]: Poll mode

// Modules
pub mod config;
pub mod error;
pub mod handle;
pub mod plugin;
pub mod poll;
#[cfg(feature = "push")]
pub mod push;
pub mod reading;
#[cfg(feature = "push")]
pub mod sink;
pub mod state;
pub mod waveform;

// Re-exports for convenient access
pub use config::{ConfigItem, Configuration, ItemType};
pub use error::{ConfigError, Result, SinkError, SinusoidError};
pub use handle::{LifecycleState, RunHandle};
pub use plugin::{PluginInfo, PluginMode, PluginType, SouthPlugin};
pub use poll::PollSinusoid;
#[cfg(feature = "push")]
pub use push::{AsyncSinusoid, EmissionTask};
pub use reading::Reading;
#[cfg(feature = "push")]
pub use sink::{ChannelSink, MemorySink, Sink};
pub use state::SourceState;
pub use waveform::{Cursor, WaveformTable, SINE_TABLE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plugin version reported to the host
pub const PLUGIN_VERSION: &str = "1.0";

/// Host plugin interface version
pub const INTERFACE_VERSION: &str = "1.0";
