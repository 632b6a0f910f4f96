// SPDX-License-Identifier: GPL-3.0-only

//! Async driver for the session
//!
//! Runs each user action against the platform services and applies the
//! result, awaiting platform calls in place. The terminal UI, the command line
//! and the integration tests use it; the GUI drives the same [`Session`] with
//! tasks instead.

use crate::backends::Platform;
use crate::errors::{AppResult, CaptureError, LibraryError, PermissionError};
use crate::session::{
    Asset, Gate, ImageHandle, Notice, PermissionKind, PermissionState, ReviewStage, Session,
};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Controller {
    session: Session,
    platform: Platform,
}

impl Controller {
    pub fn new(platform: Platform, gallery_enabled: bool) -> Self {
        Self {
            session: Session::new(gallery_enabled),
            platform,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Ask for camera and media library access at once and open the gate
    pub async fn start(&mut self) -> Gate {
        let permissions = &self.platform.permissions;
        let (camera, media) = futures::join!(
            permissions.request(PermissionKind::Camera),
            permissions.request(PermissionKind::MediaLibrary),
        );
        self.session.camera_permission_resolved(camera);
        self.session.media_permission_resolved(media);
        self.session.gate()
    }

    /// First preview frame arrived
    pub fn attach_camera(&mut self) {
        self.session.attach_camera();
    }

    pub fn flip(&mut self) {
        self.session.flip();
    }

    pub fn toggle_flash(&mut self) {
        self.session.toggle_flash();
    }

    /// Take a picture
    ///
    /// Returns the camera's answer, or `None` when the camera was not asked
    /// because no capture is possible right now.
    pub async fn take_picture(&mut self) -> Option<Result<ImageHandle, CaptureError>> {
        let settings = self.session.begin_capture()?;
        let result = self.platform.camera.capture(settings).await;
        self.session.capture_completed(result.clone());
        Some(result)
    }

    pub fn discard(&mut self) {
        self.session.discard();
    }

    /// Open the save confirmation
    pub fn save(&mut self) -> bool {
        self.session.request_save()
    }

    pub fn cancel_save(&mut self) {
        self.session.cancel_save();
    }

    /// Confirm the save and persist the image under review
    ///
    /// Returns the media library's answer, or `None` when no confirmation
    /// was showing.
    pub async fn confirm_save(&mut self) -> Option<Result<Asset, LibraryError>> {
        let confirming = self
            .session
            .review()
            .is_some_and(|review| review.stage() == ReviewStage::Confirming);
        let Some(image) = self.session.confirm_save() else {
            // Refused up front without media library access
            return confirming.then_some(Err(LibraryError::AccessDenied));
        };
        let result = self.platform.library.persist(&image).await;
        self.session.save_completed(result.clone());
        Some(result)
    }

    /// Take a picture and save it straight away, accepting the review
    pub async fn take_and_save(&mut self) -> AppResult<Asset> {
        if self.session.gate() != Gate::Open {
            return Err(PermissionError::CameraDenied.into());
        }
        if self.session.media_permission() == PermissionState::Denied {
            return Err(PermissionError::MediaLibraryDenied.into());
        }

        let image = self
            .take_picture()
            .await
            .ok_or(CaptureError::NoCamera)??;
        debug!(%image, "Accepting review");

        self.save();
        let asset = self
            .confirm_save()
            .await
            .ok_or_else(|| LibraryError::InvalidHandle(image.to_string()))??;
        info!(id = %asset.id, uri = %asset.uri, "Photo taken and saved");
        Ok(asset)
    }

    /// Toggle the gallery, refreshing the asset list first
    pub async fn load_images(&mut self) {
        if !self.session.begin_gallery_load() {
            debug!("Gallery load not started");
            return;
        }
        let state = self
            .platform
            .permissions
            .request(PermissionKind::MediaLibrary)
            .await;
        if !self.session.gallery_permission_resolved(state) {
            return;
        }
        let result = self.platform.library.list_assets().await;
        self.session.gallery_loaded(result);
    }

    pub fn select_asset(&mut self, index: usize) -> bool {
        self.session.select_asset(index)
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.session.dismiss_notice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::MemoryPlatform;

    #[tokio::test]
    async fn start_requests_both_permissions() {
        let fakes = MemoryPlatform::granted();
        let mut controller = Controller::new(fakes.platform(), true);

        assert_eq!(controller.start().await, Gate::Open);
        let requests = fakes.permissions.requests();
        assert!(requests.contains(&PermissionKind::Camera));
        assert!(requests.contains(&PermissionKind::MediaLibrary));
    }

    #[tokio::test]
    async fn take_picture_before_attach_is_ignored() {
        let fakes = MemoryPlatform::granted();
        let mut controller = Controller::new(fakes.platform(), true);
        controller.start().await;

        assert!(controller.take_picture().await.is_none());
        assert!(fakes.camera.captures().is_empty());
    }

    #[tokio::test]
    async fn confirm_without_confirmation_reports_nothing() {
        let fakes = MemoryPlatform::granted();
        let mut controller = Controller::new(fakes.platform(), true);
        controller.start().await;
        controller.attach_camera();
        controller.take_picture().await;

        assert_eq!(controller.confirm_save().await, None);
        assert!(fakes.library.persisted().is_empty());
    }
}
