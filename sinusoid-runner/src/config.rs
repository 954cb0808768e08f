// Sinusoid Runner - Command-line host for the sinusoid plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Builds the configuration handed to the plugin.
//!
//! Precedence: default schema, then values from a JSON category file, then
//! command-line flags.

use crate::error::Result;
use sinusoid::config::{ASSET_NAME_ITEM, RATE_ITEM};
use sinusoid::Configuration;
use std::path::Path;
use tracing::debug;

/// Layer file and flag values over the default schema
pub fn build_configuration(
    file: Option<&Path>,
    asset_name: Option<&str>,
    rate: Option<&str>,
) -> Result<Configuration> {
    let mut config = Configuration::default_schema();

    if let Some(path) = file {
        let text = std::fs::read_to_string(path)?;
        let overlay = Configuration::from_json(&text)?;
        debug!(path = %path.display(), items = overlay.len(), "loaded configuration category");
        config.merge(&overlay);
    }

    if let Some(name) = asset_name {
        config.set_value(ASSET_NAME_ITEM, name)?;
    }
    if let Some(rate) = rate {
        config.set_value(RATE_ITEM, rate)?;
    }

    Ok(config)
}
