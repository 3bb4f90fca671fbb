//! Configuration File Tests.
//!
//! Loads JSON documents from disk, checks that omitted fields keep their
//! defaults, and that out-of-range values are rejected before a run starts.

use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

use tomasim_core::config::Config;
use tomasim_core::{SimError, Simulator};

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write config");
    file
}

#[test]
fn partial_document_keeps_defaults() {
    let file = write_config(r#"{ "pipeline": { "rob_size": 8 }, "memory": { "data_latency": 5 } }"#);
    let config = Config::from_json_file(file.path()).expect("valid config");

    let defaults = Config::default();
    assert_eq!(config.pipeline.rob_size, 8);
    assert_eq!(config.memory.data_latency, 5);
    assert_eq!(config.pipeline.rs_size, defaults.pipeline.rs_size);
    assert_eq!(config.general, defaults.general);
}

#[test]
fn empty_document_is_default() {
    let file = write_config("{}");
    assert_eq!(Config::from_json_file(file.path()).expect("valid"), Config::default());
}

#[test]
fn serialized_default_round_trips_through_a_file() {
    let json = serde_json::to_string_pretty(&Config::default()).expect("serialize");
    let file = write_config(&json);
    assert_eq!(Config::from_json_file(file.path()).expect("valid"), Config::default());
}

#[rstest]
#[case::zero_rob(r#"{ "pipeline": { "rob_size": 0 } }"#)]
#[case::zero_lsb(r#"{ "pipeline": { "lsb_size": 0 } }"#)]
#[case::iq_within_headroom(r#"{ "pipeline": { "iq_size": 3 } }"#)]
#[case::zero_latency(r#"{ "memory": { "data_latency": 0 } }"#)]
#[case::zero_cycle_limit(r#"{ "general": { "max_cycles": 0 } }"#)]
fn out_of_range_values_rejected(#[case] json: &str) {
    let err = Config::from_json_str(json).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json_str("{ pipeline: }").unwrap_err();
    assert!(matches!(err, SimError::Json(_)), "got {err:?}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Config::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SimError::Io(_)), "got {err:?}");
}

#[test]
fn simulator_validates_hand_built_config() {
    let mut config = Config::default();
    config.pipeline.iq_size = 2;
    assert!(matches!(
        Simulator::new(&config),
        Err(SimError::InvalidConfig(_))
    ));
}
