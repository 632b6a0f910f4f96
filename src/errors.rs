// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A platform permission was refused
    Permission(PermissionError),
    /// Photo capture errors
    Capture(CaptureError),
    /// Media library errors (save, list)
    Library(LibraryError),
}

/// Permission refusals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionError {
    /// Camera access was denied; the screen cannot be used
    CameraDenied,
    /// Media library access was denied; saving and browsing are unavailable
    MediaLibraryDenied,
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No camera device found
    NoCamera,
    /// Camera is in use by another application
    DeviceBusy,
    /// GStreamer pipeline could not be built or started
    Pipeline(String),
    /// No frame arrived before the capture deadline
    Timeout,
    /// Frame could not be encoded to a still image
    Encode(String),
    /// Writing the still image failed
    Io(String),
}

/// Media library errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// The library refused access
    AccessDenied,
    /// The image handle does not point at a readable image
    InvalidHandle(String),
    /// Filesystem error inside the library
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Library(e) => write!(f, "Media library error: {}", e),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::CameraDenied => write!(f, "Camera access denied"),
            PermissionError::MediaLibraryDenied => write!(f, "Media library access denied"),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoCamera => write!(f, "No camera found"),
            CaptureError::DeviceBusy => write!(f, "Camera is busy"),
            CaptureError::Pipeline(msg) => write!(f, "Pipeline error: {}", msg),
            CaptureError::Timeout => write!(f, "Timed out waiting for a frame"),
            CaptureError::Encode(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::Io(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::AccessDenied => write!(f, "Access to the media library was denied"),
            LibraryError::InvalidHandle(handle) => write!(f, "Not a saved image: {}", handle),
            LibraryError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for LibraryError {}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        AppError::Library(err)
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ResourceBusy => CaptureError::DeviceBusy,
            _ => CaptureError::Io(err.to_string()),
        }
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Encode(err.to_string())
    }
}

impl From<gstreamer::glib::Error> for CaptureError {
    fn from(err: gstreamer::glib::Error) -> Self {
        CaptureError::Pipeline(err.to_string())
    }
}

impl From<gstreamer::glib::BoolError> for CaptureError {
    fn from(err: gstreamer::glib::BoolError) -> Self {
        CaptureError::Pipeline(err.to_string())
    }
}

impl From<gstreamer::StateChangeError> for CaptureError {
    fn from(err: gstreamer::StateChangeError) -> Self {
        CaptureError::Pipeline(err.to_string())
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => LibraryError::AccessDenied,
            _ => LibraryError::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_specific_variants() {
        let busy = std::io::Error::from(std::io::ErrorKind::ResourceBusy);
        assert_eq!(CaptureError::from(busy), CaptureError::DeviceBusy);

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(LibraryError::from(denied), LibraryError::AccessDenied);
    }

    #[test]
    fn app_error_display_keeps_reason() {
        let err = AppError::from(LibraryError::Io("disk full".to_string()));
        assert_eq!(err.to_string(), "Media library error: disk full");
    }

    #[test]
    fn permission_refusals_convert() {
        let err: AppError = PermissionError::CameraDenied.into();
        assert_eq!(err, AppError::Permission(PermissionError::CameraDenied));
        assert_eq!(err.to_string(), "Permission error: Camera access denied");
    }
}
