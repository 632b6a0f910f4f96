// SPDX-License-Identifier: GPL-3.0-only

//! Flash LED control through Linux sysfs
//!
//! Flash LEDs show up as `/sys/class/leds/*:flash`. They are driven in torch
//! mode by writing the `brightness` file, which `feedbackd` makes group
//! writable on phones.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LEDS_DIR: &str = "/sys/class/leds";

/// One writable flash LED
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashLed {
    path: PathBuf,
    max_brightness: u32,
    name: String,
}

impl FlashLed {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn write_brightness(&self, value: u32) -> io::Result<()> {
        std::fs::write(
            self.path.join("brightness"),
            value.min(self.max_brightness).to_string(),
        )
    }

    pub fn on(&self) -> io::Result<()> {
        self.write_brightness(self.max_brightness)
    }

    pub fn off(&self) -> io::Result<()> {
        self.write_brightness(0)
    }
}

/// Flash LEDs found on this machine
#[derive(Debug, Clone, Default)]
pub struct FlashLeds {
    leds: Vec<FlashLed>,
    /// Names of LEDs that exist but cannot be written
    locked: Vec<String>,
}

impl FlashLeds {
    pub fn detect() -> Self {
        Self::scan(Path::new(LEDS_DIR))
    }

    /// Scan `dir` for `*:flash` LED directories
    pub fn scan(dir: &Path) -> Self {
        let Ok(entries) = std::fs::read_dir(dir) else {
            debug!(dir = %dir.display(), "No LED class directory, flash unavailable");
            return Self::default();
        };

        let mut found = Self::default();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(":flash") {
                continue;
            }
            let path = entry.path();

            let max_brightness = std::fs::read_to_string(path.join("max_brightness"))
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|v| *v > 0);
            let Some(max_brightness) = max_brightness else {
                warn!(led = name, "Invalid max_brightness, skipping flash LED");
                continue;
            };

            let writable = std::fs::OpenOptions::new()
                .write(true)
                .open(path.join("brightness"))
                .is_ok();
            if !writable {
                warn!(led = name, "Flash LED found but not writable");
                found.locked.push(name);
                continue;
            }

            info!(led = name, max_brightness, "Found flash LED");
            found.leds.push(FlashLed {
                path,
                max_brightness,
                name,
            });
        }

        found.leds.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    pub fn leds(&self) -> &[FlashLed] {
        &self.leds
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    /// Hint for the log when LEDs exist but are out of reach
    pub fn permission_hint(&self) -> Option<String> {
        if self.locked.is_empty() || !self.leds.is_empty() {
            return None;
        }
        let user = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
        Some(format!(
            "Flash LEDs {} are not writable; add {} to the 'feedbackd' group",
            self.locked.join(", "),
            user
        ))
    }

    /// Light every LED until the returned guard is dropped
    pub fn torch(&self) -> Torch<'_> {
        for led in &self.leds {
            if let Err(e) = led.on() {
                warn!(led = led.name(), error = %e, "Failed to turn on flash LED");
            }
        }
        Torch { leds: &self.leds }
    }
}

/// Lit flash LEDs; switched off on drop
pub struct Torch<'a> {
    leds: &'a [FlashLed],
}

impl Drop for Torch<'_> {
    fn drop(&mut self) {
        for led in self.leds {
            if let Err(e) = led.off() {
                warn!(led = led.name(), error = %e, "Failed to turn off flash LED");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_led(dir: &Path, name: &str, max: &str) {
        let led = dir.join(name);
        std::fs::create_dir_all(&led).unwrap();
        std::fs::write(led.join("max_brightness"), max).unwrap();
        std::fs::write(led.join("brightness"), "0").unwrap();
    }

    fn brightness(dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name).join("brightness")).unwrap()
    }

    #[test]
    fn scan_finds_only_flash_leds() {
        let dir = tempfile::tempdir().unwrap();
        fake_led(dir.path(), "white:flash", "255\n");
        fake_led(dir.path(), "input3::capslock", "1");
        fake_led(dir.path(), "yellow:flash", "0");

        let leds = FlashLeds::scan(dir.path());
        let names: Vec<_> = leds.leds().iter().map(FlashLed::name).collect();
        assert_eq!(names, vec!["white:flash"]);
    }

    #[test]
    fn torch_lights_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fake_led(dir.path(), "white:flash", "128");
        let leds = FlashLeds::scan(dir.path());

        {
            let _torch = leds.torch();
            assert_eq!(brightness(dir.path(), "white:flash"), "128");
        }
        assert_eq!(brightness(dir.path(), "white:flash"), "0");
    }

    #[test]
    fn missing_directory_means_no_flash() {
        let leds = FlashLeds::scan(Path::new("/nonexistent/leds"));
        assert!(leds.is_empty());
        assert_eq!(leds.permission_hint(), None);
    }
}
