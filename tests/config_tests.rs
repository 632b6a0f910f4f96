// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use shutter::Config;
use shutter::config::AppTheme;
use shutter::constants::{output, timing};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(config.gallery_enabled, "Gallery should be enabled by default");
    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(config.flash_duration_ms, timing::FLASH_DURATION_MS);
    assert!(config.front_camera.is_none());
    assert!(config.back_camera.is_none());
}

#[test]
fn test_default_photo_directory() {
    let config = Config::default();
    let dir = config.photo_directory();
    assert!(
        dir.ends_with(output::LIBRARY_DIR_NAME),
        "Library should live in its own folder, got {}",
        dir.display()
    );
}

#[test]
fn test_custom_photo_directory() {
    let config = Config {
        photo_directory: Some("/srv/photos".to_string()),
        ..Config::default()
    };
    assert_eq!(config.photo_directory(), std::path::PathBuf::from("/srv/photos"));
}

#[test]
fn test_theme_indices_match_dropdown_order() {
    for (index, theme) in AppTheme::ALL.iter().enumerate() {
        assert_eq!(theme.index(), index);
    }
}

#[test]
fn test_config_serde_roundtrip() {
    let config = Config {
        gallery_enabled: false,
        back_camera: Some("/dev/video2".to_string()),
        ..Config::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
