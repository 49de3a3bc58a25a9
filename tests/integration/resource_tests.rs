//! Loading the star mapping, constellation catalog and config from disk.

use std::path::PathBuf;

use starfield::app::ports::ConfigPort;
use starfield::catalog;
use starfield::config::{JsonConfigFile, SystemConfig};
use starfield::error::ConfigError;

/// A file under the system temp dir, removed on drop.
struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("starfield-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        Self(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn mapping_and_catalog_load_from_files() {
    let map = TempFile::new("map.txt", "0 1\n1 2\n2 3\n");
    let cons = TempFile::new("cons.txt", "@A\n1\n2\n@B\n3\n");

    let mapping = catalog::load_mapping_file(&map.0, Some(4)).unwrap();
    let catalog = catalog::load_catalog_file(&cons.0, &mapping, 4).unwrap();

    assert_eq!(catalog.len(), 2);
    let a = catalog.get(0).unwrap();
    let b = catalog.get(1).unwrap();
    assert_eq!(a.name, "A");
    assert_eq!(a.levels, [1.0, 1.0, 0.0, 0.0]);
    assert_eq!(b.name, "B");
    assert_eq!(b.levels, [0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn channel_count_derived_from_mapping_file() {
    let map = TempFile::new("derive.txt", "0 10\n7 11\n");

    let mapping = catalog::load_mapping_file(&map.0, None).unwrap();
    assert_eq!(mapping.channel_count().unwrap(), 8);
}

#[test]
fn mapping_channel_at_limit_is_rejected() {
    let map = TempFile::new("limit.txt", "0 1\n4 2\n");

    let err = catalog::load_mapping_file(&map.0, Some(4)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ChannelOutOfRange {
            channel: 4,
            limit: 4,
            line: 2
        }
    );
}

#[test]
fn mapping_beyond_addressable_chips_is_rejected_without_configured_count() {
    let map = TempFile::new("wide.txt", "0 1\n4095 2\n");
    let config = SystemConfig::default();
    assert_eq!(config.channel_count, None);

    let err = catalog::load_mapping_file(&map.0, Some(config.channel_limit())).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ChannelOutOfRange {
            channel: 4095,
            limit: 1024,
            line: 2
        }
    );
    assert!(err.is_mapping_error());

    // The last addressable channel is still accepted.
    let map = TempFile::new("edge.txt", "0 1\n1023 2\n");
    let mapping = catalog::load_mapping_file(&map.0, Some(config.channel_limit())).unwrap();
    assert_eq!(mapping.channel_count().unwrap(), 1024);
}

#[test]
fn trailing_group_without_final_marker_is_kept() {
    let mapping = catalog::parse_mapping("0 5\n1 6\n", None).unwrap();
    let catalog = catalog::parse_constellations("@Only\n5\n6", &mapping, 2).unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().levels, [1.0, 1.0]);
}

#[test]
fn unknown_star_in_catalog_is_fatal() {
    let map = TempFile::new("unk-map.txt", "0 1\n");
    let cons = TempFile::new("unk-cons.txt", "@A\n1\n99\n");

    let mapping = catalog::load_mapping_file(&map.0, None).unwrap();
    let err = catalog::load_catalog_file(&cons.0, &mapping, 1).unwrap_err();
    assert_eq!(err, ConfigError::UnknownStar { star: 99, line: 3 });
    assert!(err.is_lookup_error());
}

#[test]
fn missing_mapping_file_reports_path() {
    let err = catalog::load_mapping_file("/nonexistent/starfield/map.txt", None).unwrap_err();
    match err {
        ConfigError::Io { path, kind } => {
            assert!(path.ends_with("map.txt"));
            assert_eq!(kind, std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn config_file_overrides_defaults() {
    let file = TempFile::new(
        "config.json",
        r#"{ "i2c_device": "/dev/i2c-1", "chip_base_address": 65, "idle_threshold_secs": 30 }"#,
    );

    let config = JsonConfigFile::new(&file.0).load().unwrap();
    assert_eq!(config.i2c_device, "/dev/i2c-1");
    assert_eq!(config.chip_base_address, 0x41);
    assert_eq!(config.idle_threshold_secs, 30);
    assert_eq!(config.key_fade_ms, SystemConfig::default().key_fade_ms);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let config = JsonConfigFile::new("/nonexistent/starfield.json")
        .load()
        .unwrap();
    assert_eq!(config, SystemConfig::default());
}

#[test]
fn invalid_config_is_rejected() {
    let file = TempFile::new("bad.json", r#"{ "max_block_len": 8 }"#);

    let err = JsonConfigFile::new(&file.0).load().unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed(_)));
}
