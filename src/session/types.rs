// SPDX-License-Identifier: GPL-3.0-only

//! Value types shared by the session and the platform backends

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of a platform permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermissionState {
    /// Request not resolved yet
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

/// The two permissions the application asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Camera,
    MediaLibrary,
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionKind::Camera => write!(f, "camera"),
            PermissionKind::MediaLibrary => write!(f, "media library"),
        }
    }
}

/// Which physical camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// User-facing camera
    Front,
    /// World-facing camera
    #[default]
    Back,
}

impl CameraFacing {
    /// The other camera
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraFacing::Front => write!(f, "front"),
            CameraFacing::Back => write!(f, "back"),
        }
    }
}

/// Whether the capture illuminates the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlashMode {
    #[default]
    Off,
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// Settings handed to the capture service for one still
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub facing: CameraFacing,
    pub flash: FlashMode,
}

/// Opaque URI-like reference to image bytes owned by the platform
///
/// Local files use the `file://` scheme; other schemes are passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Handle for a local file
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local file behind this handle, if it uses the `file://` scheme
    pub fn to_path(&self) -> Option<PathBuf> {
        self.0.strip_prefix("file://").map(PathBuf::from)
    }
}

impl std::fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image already stored in the media library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub uri: ImageHandle,
}

impl Asset {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: ImageHandle::new(uri),
        }
    }
}

/// Blocking user-facing message, shown until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Media library access was refused at startup; photos cannot be saved
    MediaAccessNeededToSave,
    /// Media library access was refused when opening the gallery
    MediaAccessNeededToBrowse,
    /// Photo stored in the media library
    PhotoSaved,
    /// Saving failed, with the underlying reason
    SaveFailed(String),
    /// The camera did not deliver a photo
    CaptureFailed(String),
    /// Listing the media library failed
    GalleryLoadFailed(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::PhotoSaved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_handles_round_trip_to_paths() {
        let handle = ImageHandle::from_path(Path::new("/tmp/shot.jpg"));
        assert_eq!(handle.as_str(), "file:///tmp/shot.jpg");
        assert_eq!(handle.to_path(), Some(PathBuf::from("/tmp/shot.jpg")));
    }

    #[test]
    fn opaque_handles_have_no_path() {
        assert_eq!(ImageHandle::new("img://1").to_path(), None);
    }

    #[test]
    fn asset_serializes_uri_as_plain_string() {
        let json = serde_json::to_string(&Asset::new("a", "u1")).unwrap();
        assert_eq!(json, r#"{"id":"a","uri":"u1"}"#);
    }

    #[test]
    fn only_saved_notice_is_informational() {
        assert!(!Notice::PhotoSaved.is_error());
        assert!(Notice::SaveFailed("x".into()).is_error());
        assert!(Notice::MediaAccessNeededToSave.is_error());
    }
}
