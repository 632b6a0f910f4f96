// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Gallery grid layout
pub mod gallery {
    /// Fixed number of thumbnail columns
    pub const COLUMNS: usize = 3;
    /// Thumbnail edge length in logical pixels
    pub const THUMBNAIL_SIZE: f32 = 100.0;
    /// File extensions listed as library assets
    pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
}

/// UI dimensions
pub mod ui {
    /// Initial window width, also the basis of the gallery grid spacing
    pub const WINDOW_WIDTH: f32 = 420.0;
    /// Initial window height
    pub const WINDOW_HEIGHT: f32 = 760.0;
    /// Minimum window width
    pub const MIN_WIDTH: f32 = 360.0;
    /// Minimum window height
    pub const MIN_HEIGHT: f32 = 480.0;
    /// Review image height
    pub const REVIEW_IMAGE_HEIGHT: f32 = 450.0;
    /// Review image corner radius
    pub const REVIEW_IMAGE_RADIUS: f32 = 20.0;
    /// Review action icon size
    pub const REVIEW_ICON_SIZE: u16 = 50;
    /// Overlay control icon size (flip, flash)
    pub const OVERLAY_ICON_SIZE: u16 = 24;
    /// Distance of the overlay controls from the preview edges
    pub const OVERLAY_MARGIN: u16 = 20;
    /// Bottom action button height
    pub const ACTION_BUTTON_HEIGHT: f32 = 50.0;
}

/// Capture timing
pub mod timing {
    use super::Duration;

    /// Default duration of the on-screen flash before the shutter fires
    pub const FLASH_DURATION_MS: u64 = 600;
    /// Time allowed for a freshly started pipeline to deliver a usable frame
    pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);
    /// Frames older than this are not reused for a still capture
    pub const FRAME_MAX_AGE: Duration = Duration::from_millis(500);
    /// Frames discarded after a pipeline start while auto exposure settles
    pub const WARMUP: Duration = Duration::from_millis(500);
    /// Time the flash LED is lit before the frame is taken
    pub const FLASH_SETTLE: Duration = Duration::from_millis(300);
    /// Poll interval while waiting for a frame
    pub const FRAME_POLL: Duration = Duration::from_millis(16);
    /// Pipeline state change timeout in milliseconds
    pub const STATE_CHANGE_TIMEOUT_MS: u64 = 2000;
}

/// GStreamer pipeline settings
pub mod pipeline {
    /// Preview frame channel capacity
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
    /// Maximum buffers queued in the appsink
    pub const MAX_BUFFERS: u32 = 2;
    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 120;
}

/// Still image output
pub mod output {
    /// JPEG quality of captured stills
    pub const JPEG_QUALITY: u8 = 92;
    /// Name of the library directory below the user's pictures folder
    pub const LIBRARY_DIR_NAME: &str = "shutter";
    /// Name of the transient capture directory below the user's cache folder
    pub const CAPTURE_CACHE_DIR_NAME: &str = "shutter";
}
