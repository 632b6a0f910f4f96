// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{output, timing};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow the system setting
    #[default]
    System,
    Dark,
    Light,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// COSMIC theme for this preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference
    pub app_theme: AppTheme,
    /// Show the "Load images" gallery button
    pub gallery_enabled: bool,
    /// Library directory; `None` means `~/Pictures/shutter`
    pub photo_directory: Option<String>,
    /// Device path or card name forced for the front camera
    pub front_camera: Option<String>,
    /// Device path or card name forced for the back camera
    pub back_camera: Option<String>,
    /// Length of the on-screen flash before the shutter fires
    pub flash_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            gallery_enabled: true,
            photo_directory: None,
            front_camera: None,
            back_camera: None,
            flash_duration_ms: timing::FLASH_DURATION_MS,
        }
    }
}

impl Config {
    /// Directory the media library lives in
    pub fn photo_directory(&self) -> PathBuf {
        match self.photo_directory.as_deref() {
            Some(dir) if !dir.trim().is_empty() => expand_home(dir),
            _ => dirs::picture_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
                .unwrap_or_else(|| PathBuf::from("."))
                .join(output::LIBRARY_DIR_NAME),
        }
    }

    /// Persisted configuration, or the defaults if none can be read
    ///
    /// Used outside the GUI, which loads and watches the entry itself.
    pub fn load() -> Self {
        let Ok(handler) = cosmic_config::Config::new(crate::app::APP_ID, Self::VERSION) else {
            return Self::default();
        };
        match Self::get_entry(&handler) {
            Ok(config) => config,
            Err((errors, config)) => {
                for why in errors.into_iter().filter(cosmic_config::Error::is_err) {
                    tracing::debug!(error = %why, "Config entry error");
                }
                config
            }
        }
    }
}

/// Replace a leading `~/` with the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
