// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Configuration category for the plugin.
//!
//! The host hands configuration over as a JSON category: a map from item
//! name to an item carrying a description, a type, a default and, once the
//! host has applied user settings, a value. Values travel as strings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the item holding the plugin name
pub const PLUGIN_ITEM: &str = "plugin";

/// Name of the item holding the asset name
pub const ASSET_NAME_ITEM: &str = "assetName";

/// Name of the item holding the emission rate
pub const RATE_ITEM: &str = "dataPointsPerSec";

/// Asset name used when none is configured
pub const DEFAULT_ASSET_NAME: &str = "sinusoid";

/// Rate used when none (or an unusable one) is configured
pub const DEFAULT_RATE: f64 = 1.0;

/// Items whose change requires the host to restart the plugin
pub const RESTART_ITEMS: [&str; 2] = [ASSET_NAME_ITEM, RATE_ITEM];

/// Value type of a configuration item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    String,
    Integer,
    Float,
}

/// One entry of a configuration category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub description: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    pub default: String,

    /// Value applied by the host, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,

    #[serde(
        default,
        rename = "displayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<String>,
}

impl ConfigItem {
    /// Create an item with no value and no display hints
    pub fn new(
        description: impl Into<String>,
        item_type: ItemType,
        default: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            item_type,
            default: default.into(),
            value: None,
            order: None,
            display_name: None,
            readonly: None,
        }
    }

    /// Set the display order hint
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order.to_string());
        self
    }

    /// Set the display name hint
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Mark the item read-only in the host UI
    pub fn read_only(mut self) -> Self {
        self.readonly = Some("true".to_string());
        self
    }

    /// The host value if set, the default otherwise
    pub fn effective(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.default)
    }
}

/// A configuration category, ordered by item name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    items: BTreeMap<String, ConfigItem>,
}

impl Configuration {
    /// Empty category
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema the plugin declares to the host
    pub fn default_schema() -> Self {
        let mut config = Self::new();
        config.insert(
            PLUGIN_ITEM,
            ConfigItem::new("Sinusoid plugin", ItemType::String, "sinusoid").read_only(),
        );
        config.insert(
            ASSET_NAME_ITEM,
            ConfigItem::new("Name of Asset", ItemType::String, DEFAULT_ASSET_NAME)
                .with_order(1)
                .with_display_name("Asset name"),
        );
        config.insert(
            RATE_ITEM,
            ConfigItem::new("Data points per second", ItemType::Integer, "1")
                .with_order(2)
                .with_display_name("Data points per second"),
        );
        config
    }

    /// Parse a category from the host's JSON form
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render the category in the host's JSON form
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Add or replace an item
    pub fn insert(&mut self, name: impl Into<String>, item: ConfigItem) {
        self.items.insert(name.into(), item);
    }

    pub fn get(&self, name: &str) -> Option<&ConfigItem> {
        self.items.get(name)
    }

    /// Effective value of an item
    pub fn value(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(ConfigItem::effective)
    }

    /// Set the value of an existing item
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        let item = self
            .items
            .get_mut(name)
            .ok_or_else(|| ConfigError::MissingItem(name.to_string()))?;
        item.value = Some(value.into());
        Ok(())
    }

    /// Builder form of [`set_value`](Self::set_value).
    ///
    /// Unknown names are added as placeholder string items, with an empty
    /// description and the value as default, so callers can layer values
    /// over a partial category.
    pub fn with_value(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.items.get_mut(name) {
            Some(item) => item.value = Some(value),
            None => {
                let mut item = ConfigItem::new("", ItemType::String, value.clone());
                item.value = Some(value);
                self.items.insert(name.to_string(), item);
            }
        }
        self
    }

    /// Overlay the values of `other` onto this category.
    ///
    /// Items missing here are copied whole.
    pub fn merge(&mut self, other: &Configuration) {
        for (name, item) in &other.items {
            match self.items.get_mut(name) {
                Some(existing) => existing.value = Some(item.effective().to_string()),
                None => {
                    self.items.insert(name.clone(), item.clone());
                }
            }
        }
    }

    /// Configured asset name, falling back to [`DEFAULT_ASSET_NAME`]
    pub fn asset_name(&self) -> &str {
        match self.value(ASSET_NAME_ITEM) {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_ASSET_NAME,
        }
    }

    /// Configured emission rate in readings per second.
    ///
    /// Fails when the item is missing, not a number, or not positive.
    pub fn data_points_per_sec(&self) -> Result<f64, ConfigError> {
        let raw = self
            .value(RATE_ITEM)
            .ok_or_else(|| ConfigError::MissingItem(RATE_ITEM.to_string()))?;
        match raw.trim().parse::<f64>() {
            Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
            _ => Err(ConfigError::InvalidRate(raw.to_string())),
        }
    }

    /// Names of items whose effective value differs, or that exist on one
    /// side only. Sorted.
    pub fn diff(&self, other: &Configuration) -> Vec<String> {
        let mut changed: Vec<String> = self
            .items
            .iter()
            .filter(|(name, item)| other.value(name) != Some(item.effective()))
            .map(|(name, _)| name.clone())
            .collect();
        changed.extend(
            other
                .items
                .keys()
                .filter(|name| !self.items.contains_key(*name))
                .cloned(),
        );
        changed.sort();
        changed
    }

    /// Force the rate back to [`DEFAULT_RATE`], adding the item if absent
    pub fn reset_rate(&mut self) {
        if self.set_value(RATE_ITEM, "1").is_err() {
            let mut item = ConfigItem::new("Data points per second", ItemType::Integer, "1");
            item.value = Some("1".to_string());
            self.insert(RATE_ITEM, item);
        }
    }

    /// Whether any item in `changed` requires a restart
    pub fn requires_restart(changed: &[String]) -> bool {
        changed
            .iter()
            .any(|name| RESTART_ITEMS.contains(&name.as_str()))
    }

    /// Item names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
