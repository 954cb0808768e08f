// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Readings handed to the ingestion sink.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Datapoint name carried by every reading
pub const DATAPOINT: &str = "sinusoid";

/// Timestamp layout: local time, microseconds, numeric offset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

/// One timestamped reading for an asset.
///
/// Built fresh for each emission and owned by the sink once delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub asset: String,
    pub timestamp: String,
    pub key: Uuid,
    pub readings: BTreeMap<String, f64>,
}

impl Reading {
    /// Reading for `amplitude`, stamped now with a fresh random key
    pub fn new(asset: impl Into<String>, amplitude: f64) -> Self {
        Self::at(asset, amplitude, &Local::now())
    }

    /// Reading stamped at a given instant
    pub fn at<Tz>(asset: impl Into<String>, amplitude: f64, time: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut readings = BTreeMap::new();
        readings.insert(DATAPOINT.to_string(), amplitude);
        Self {
            asset: asset.into(),
            timestamp: format_timestamp(time),
            key: Uuid::new_v4(),
            readings,
        }
    }

    /// The sine amplitude carried by this reading
    pub fn amplitude(&self) -> Option<f64> {
        self.readings.get(DATAPOINT).copied()
    }
}

/// Render a timestamp the way the host expects it
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}
