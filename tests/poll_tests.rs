// Sinusoid - Poll mode tests

use approx::assert_abs_diff_eq;
use sinusoid::config::{ASSET_NAME_ITEM, RATE_ITEM};
use sinusoid::waveform::TABLE_LEN;
use sinusoid::{Configuration, LifecycleState, PluginMode, PollSinusoid, SouthPlugin, SINE_TABLE};
use std::time::Duration;

#[test]
fn test_describe_poll_mode() {
    let plugin = PollSinusoid::new();
    let info = plugin.describe();
    assert_eq!(info.mode, PluginMode::Poll);
    assert_eq!(info.config, Configuration::default_schema());
    assert_eq!(info, plugin.describe());
}

#[test]
fn test_sixty_polls_cover_table_then_repeat() {
    let plugin = PollSinusoid::new();
    let handle = plugin.initialize(&Configuration::default_schema());

    let values: Vec<f64> = (0..TABLE_LEN)
        .map(|_| plugin.poll(&handle).unwrap().amplitude().unwrap())
        .collect();
    let table: Vec<f64> = SINE_TABLE.iter().collect();
    assert_eq!(values, table);

    let wrapped = plugin.poll(&handle).unwrap();
    assert_eq!(wrapped.amplitude(), SINE_TABLE.get(0));
}

#[test]
fn test_poll_sequence_from_any_start() {
    let plugin = PollSinusoid::new();
    let handle = plugin.initialize(&Configuration::default_schema());
    for _ in 0..37 {
        plugin.poll(&handle).unwrap();
    }

    let start = plugin.state().cursor().index();
    for i in 0..100 {
        let value = plugin.poll(&handle).unwrap().amplitude().unwrap();
        let expected = SINE_TABLE.get((start + i) % TABLE_LEN).unwrap();
        assert_abs_diff_eq!(value, expected);
    }
}

#[test]
fn test_reconfigure_preserves_cursor() {
    let plugin = PollSinusoid::new();
    let config = Configuration::default_schema();
    let handle = plugin.initialize(&config);
    for _ in 0..7 {
        plugin.poll(&handle).unwrap();
    }

    let handle = plugin.reconfigure(handle, &config.clone());
    assert!(!handle.restart_required());
    assert_eq!(plugin.state().cursor().index(), 7);

    let renamed = config.with_value(ASSET_NAME_ITEM, "renamed");
    let handle = plugin.reconfigure(handle, &renamed);
    assert!(handle.restart_required());
    assert_eq!(handle.state(), LifecycleState::Initialized);

    let reading = plugin.poll(&handle).unwrap();
    assert_eq!(reading.asset, "renamed");
    assert_eq!(reading.amplitude(), SINE_TABLE.get(7));
}

#[test]
fn test_poll_interval_follows_rate() {
    let plugin = PollSinusoid::new();
    let config = Configuration::default_schema().with_value(RATE_ITEM, "2");
    let handle = plugin.initialize(&config);
    assert_eq!(handle.poll_interval(), Duration::from_millis(500));
}

#[test]
fn test_poll_with_host_json_category() {
    let json = r#"{
        "assetName": {"description": "Name of Asset", "type": "string", "default": "sinusoid", "value": "from-host"},
        "dataPointsPerSec": {"description": "Data points per second", "type": "integer", "default": "1"}
    }"#;
    let config = Configuration::from_json(json).unwrap();
    let plugin = PollSinusoid::new();
    let handle = plugin.initialize(&config);

    let reading = plugin.poll(&handle).unwrap();
    assert_eq!(reading.asset, "from-host");
}

#[test]
fn test_shutdown_twice_is_safe() {
    let plugin = PollSinusoid::new();
    let mut handle = plugin.initialize(&Configuration::default_schema());
    plugin.shutdown(&mut handle);
    plugin.shutdown(&mut handle);
    assert_eq!(handle.state(), LifecycleState::Stopped);
    assert!(plugin.poll(&handle).is_err());
}
