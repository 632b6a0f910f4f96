// SPDX-License-Identifier: GPL-3.0-only

//! Platform services behind the camera session
//!
//! The session never talks to hardware, the permission system or the file
//! system itself. It goes through three services:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            Session / Controller              │
//! └───────┬──────────────┬───────────────┬───────┘
//!         │              │               │
//!         ▼              ▼               ▼
//! ┌──────────────┐ ┌─────────────┐ ┌──────────────┐
//! │ Permission   │ │  Capture    │ │ MediaLibrary │
//! │ (portal/v4l) │ │ (GStreamer) │ │ (~/Pictures) │
//! └──────────────┘ └─────────────┘ └──────────────┘
//! ```
//!
//! - [`permission`]: camera and media library access checks
//! - [`camera`]: device selection, live preview and still capture
//! - [`library`]: directory-backed media library
//! - [`memory`]: in-process implementations for tests and headless runs

pub mod camera;
pub mod library;
pub mod memory;
pub mod permission;

use crate::config::Config;
use crate::errors::{CaptureError, LibraryError};
use crate::session::{Asset, CameraFacing, CaptureSettings, ImageHandle, PermissionKind, PermissionState};
use async_trait::async_trait;
use std::sync::Arc;

pub use camera::types::{Frame, FrameReceiver, FrameSender};

/// Keeps a running preview alive; dropping it stops the feed
pub type PreviewGuard = Box<dyn std::any::Any + Send>;

/// Host permission subsystem
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Ask for access; idempotent once granted
    async fn request(&self, kind: PermissionKind) -> PermissionState;
}

/// Camera hardware
#[async_trait]
pub trait CaptureService: Send + Sync {
    /// Take one still with the given facing and flash
    async fn capture(&self, settings: CaptureSettings) -> Result<ImageHandle, CaptureError>;

    /// Start streaming preview frames of the camera with `facing` into `sender`
    ///
    /// Blocks while the device is opened; async callers run it on the
    /// blocking pool.
    fn start_preview(
        &self,
        facing: CameraFacing,
        sender: FrameSender,
    ) -> Result<PreviewGuard, CaptureError>;
}

/// Device media library
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Store the image behind `image` in the library
    async fn persist(&self, image: &ImageHandle) -> Result<Asset, LibraryError>;

    /// Every asset currently in the library, in library order
    async fn list_assets(&self) -> Result<Vec<Asset>, LibraryError>;
}

/// The three platform services, shareable across tasks
#[derive(Clone)]
pub struct Platform {
    pub permissions: Arc<dyn PermissionService>,
    pub camera: Arc<dyn CaptureService>,
    pub library: Arc<dyn MediaLibrary>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}

impl Platform {
    pub fn new(
        permissions: Arc<dyn PermissionService>,
        camera: Arc<dyn CaptureService>,
        library: Arc<dyn MediaLibrary>,
    ) -> Self {
        Self {
            permissions,
            camera,
            library,
        }
    }

    /// Desktop services configured from `config`
    pub fn desktop(config: &Config) -> Self {
        let library_dir = config.photo_directory();
        Self {
            permissions: Arc::new(permission::DesktopPermissions::new(library_dir.clone())),
            camera: Arc::new(camera::GstCamera::new(config)),
            library: Arc::new(library::DirectoryLibrary::new(library_dir)),
        }
    }
}
