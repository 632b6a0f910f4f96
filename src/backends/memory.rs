// SPDX-License-Identifier: GPL-3.0-only

//! In-process platform services
//!
//! Used by the tests and by `--demo` runs without camera hardware. Each
//! service can be scripted with the answers it should give.

use super::camera::types::Frame;
use super::{CaptureService, FrameSender, MediaLibrary, PermissionService, Platform, PreviewGuard};
use crate::errors::{CaptureError, LibraryError};
use crate::session::{
    Asset, CameraFacing, CaptureSettings, ImageHandle, PermissionKind, PermissionState,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Fixed permission answers
#[derive(Debug)]
pub struct MemoryPermissions {
    camera: Mutex<PermissionState>,
    media: Mutex<PermissionState>,
    requests: Mutex<Vec<PermissionKind>>,
}

impl MemoryPermissions {
    pub fn new(camera: PermissionState, media: PermissionState) -> Self {
        Self {
            camera: Mutex::new(camera),
            media: Mutex::new(media),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::Granted, PermissionState::Granted)
    }

    /// Change the answer for future media library requests
    pub fn set_media(&self, state: PermissionState) {
        *lock(&self.media) = state;
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<PermissionKind> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl PermissionService for MemoryPermissions {
    async fn request(&self, kind: PermissionKind) -> PermissionState {
        lock(&self.requests).push(kind);
        match kind {
            PermissionKind::Camera => *lock(&self.camera),
            PermissionKind::MediaLibrary => *lock(&self.media),
        }
    }
}

/// Camera handing out `img://N` handles
///
/// Queued results are returned first; once the queue is empty every capture
/// succeeds with the next handle.
#[derive(Debug, Default)]
pub struct MemoryCamera {
    next: Mutex<u32>,
    scripted: Mutex<VecDeque<Result<ImageHandle, CaptureError>>>,
    captures: Mutex<Vec<CaptureSettings>>,
}

impl MemoryCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next capture with `result`
    pub fn push_result(&self, result: Result<ImageHandle, CaptureError>) {
        lock(&self.scripted).push_back(result);
    }

    /// Settings of every capture requested so far
    pub fn captures(&self) -> Vec<CaptureSettings> {
        lock(&self.captures).clone()
    }
}

#[async_trait]
impl CaptureService for MemoryCamera {
    async fn capture(&self, settings: CaptureSettings) -> Result<ImageHandle, CaptureError> {
        lock(&self.captures).push(settings);
        if let Some(result) = lock(&self.scripted).pop_front() {
            return result;
        }
        let mut next = lock(&self.next);
        *next += 1;
        Ok(ImageHandle::new(format!("img://{}", *next)))
    }

    fn start_preview(
        &self,
        facing: CameraFacing,
        mut sender: FrameSender,
    ) -> Result<PreviewGuard, CaptureError> {
        let colour = match facing {
            CameraFacing::Front => [40, 90, 160, 255],
            CameraFacing::Back => [60, 60, 60, 255],
        };
        // A single still frame is enough to attach the camera
        let _ = sender.try_send(Frame::solid(64, 48, colour));
        Ok(Box::new(sender))
    }
}

/// Library kept in a vector, newest first
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    assets: Mutex<Vec<Asset>>,
    persisted: Mutex<Vec<ImageHandle>>,
    fail_persist: Mutex<Option<LibraryError>>,
    fail_list: Mutex<Option<LibraryError>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self {
            assets: Mutex::new(assets),
            ..Self::default()
        }
    }

    /// Replace the library contents
    pub fn set_assets(&self, assets: Vec<Asset>) {
        *lock(&self.assets) = assets;
    }

    /// Make every following `persist` fail with `error`
    pub fn fail_persist(&self, error: LibraryError) {
        *lock(&self.fail_persist) = Some(error);
    }

    /// Make every following `list_assets` fail with `error`
    pub fn fail_list(&self, error: LibraryError) {
        *lock(&self.fail_list) = Some(error);
    }

    /// Handles passed to `persist`, successful or not
    pub fn persisted(&self) -> Vec<ImageHandle> {
        lock(&self.persisted).clone()
    }
}

#[async_trait]
impl MediaLibrary for MemoryLibrary {
    async fn persist(&self, image: &ImageHandle) -> Result<Asset, LibraryError> {
        lock(&self.persisted).push(image.clone());
        if let Some(err) = lock(&self.fail_persist).clone() {
            return Err(err);
        }
        let mut assets = lock(&self.assets);
        let asset = Asset {
            id: format!("asset-{}", assets.len() + 1),
            uri: image.clone(),
        };
        assets.insert(0, asset.clone());
        Ok(asset)
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, LibraryError> {
        if let Some(err) = lock(&self.fail_list).clone() {
            return Err(err);
        }
        Ok(lock(&self.assets).clone())
    }
}

/// Handles to the fakes behind a [`Platform`], for scripting and inspection
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    pub permissions: Arc<MemoryPermissions>,
    pub camera: Arc<MemoryCamera>,
    pub library: Arc<MemoryLibrary>,
}

impl MemoryPlatform {
    pub fn new(permissions: MemoryPermissions, library: MemoryLibrary) -> Self {
        Self {
            permissions: Arc::new(permissions),
            camera: Arc::new(MemoryCamera::new()),
            library: Arc::new(library),
        }
    }

    /// Everything granted, empty library
    pub fn granted() -> Self {
        Self::new(MemoryPermissions::granted(), MemoryLibrary::new())
    }

    pub fn platform(&self) -> Platform {
        Platform::new(
            self.permissions.clone(),
            self.camera.clone(),
            self.library.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FlashMode;

    #[tokio::test]
    async fn camera_numbers_its_handles() {
        let camera = MemoryCamera::new();
        let settings = CaptureSettings {
            facing: CameraFacing::Back,
            flash: FlashMode::Off,
        };
        assert_eq!(camera.capture(settings).await.unwrap().as_str(), "img://1");
        assert_eq!(camera.capture(settings).await.unwrap().as_str(), "img://2");
        assert_eq!(camera.captures().len(), 2);
    }

    #[tokio::test]
    async fn scripted_capture_results_come_first() {
        let camera = MemoryCamera::new();
        camera.push_result(Err(CaptureError::Timeout));
        let settings = CaptureSettings {
            facing: CameraFacing::Front,
            flash: FlashMode::On,
        };
        assert_eq!(camera.capture(settings).await, Err(CaptureError::Timeout));
        assert!(camera.capture(settings).await.is_ok());
    }

    #[tokio::test]
    async fn persisted_assets_are_listed_newest_first() {
        let library = MemoryLibrary::new();
        library.persist(&ImageHandle::new("img://1")).await.unwrap();
        library.persist(&ImageHandle::new("img://2")).await.unwrap();

        let listed = library.list_assets().await.unwrap();
        assert_eq!(listed[0].uri.as_str(), "img://2");
        assert_eq!(listed[1].uri.as_str(), "img://1");
    }

    #[tokio::test]
    async fn permissions_record_requests() {
        let permissions = MemoryPermissions::new(PermissionState::Granted, PermissionState::Denied);
        assert_eq!(
            permissions.request(PermissionKind::MediaLibrary).await,
            PermissionState::Denied
        );
        assert_eq!(permissions.requests(), vec![PermissionKind::MediaLibrary]);
    }
}
