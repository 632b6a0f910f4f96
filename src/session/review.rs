// SPDX-License-Identifier: GPL-3.0-only

//! Review modal: discard or save the image under review

use super::{Asset, ImageHandle, Notice, PermissionState, Review, Session};
use crate::errors::LibraryError;
use tracing::{error, info, warn};

/// Where the open review stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    /// Image shown with discard/save actions
    Viewing,
    /// Save confirmation (Cancel / OK) shown
    Confirming,
    /// Persist call running
    Saving,
}

impl Session {
    /// True exactly while an image is held for review
    pub fn review_visible(&self) -> bool {
        self.review.is_some()
    }

    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    pub fn active_image(&self) -> Option<&ImageHandle> {
        self.review.as_ref().map(Review::image)
    }

    /// Close the review without saving
    pub fn discard(&mut self) {
        if let Some(review) = self.review.take() {
            info!(image = %review.image, "Review discarded");
        }
    }

    /// Ask the user to confirm saving
    ///
    /// Returns false when no review is open or a save is already underway.
    pub fn request_save(&mut self) -> bool {
        match self.review.as_mut() {
            Some(review) if review.stage == ReviewStage::Viewing => {
                review.stage = ReviewStage::Confirming;
                true
            }
            _ => false,
        }
    }

    /// Confirmation answered with Cancel: back to viewing, nothing else changes
    pub fn cancel_save(&mut self) {
        if let Some(review) = self.review.as_mut()
            && review.stage == ReviewStage::Confirming
        {
            review.stage = ReviewStage::Viewing;
        }
    }

    /// Confirmation answered with OK
    ///
    /// Returns the image to persist. Without media library access the save
    /// fails right away, which queues the error notice and ends the review.
    pub fn confirm_save(&mut self) -> Option<ImageHandle> {
        let review = self.review.as_mut()?;
        if review.stage != ReviewStage::Confirming {
            return None;
        }

        if self.media_permission == PermissionState::Denied {
            warn!("Save attempted without media library access");
            self.save_completed(Err(LibraryError::AccessDenied));
            return None;
        }

        review.stage = ReviewStage::Saving;
        Some(review.image.clone())
    }

    /// Apply the media library's answer to a save
    ///
    /// Either way the review ends; a failed save is not retried.
    pub fn save_completed(&mut self, result: Result<Asset, LibraryError>) {
        match result {
            Ok(asset) => {
                info!(id = %asset.id, uri = %asset.uri, "Photo saved");
                self.push_notice(Notice::PhotoSaved);
            }
            Err(err) => {
                error!(error = %err, "Failed to save photo");
                self.push_notice(Notice::SaveFailed(err.to_string()));
            }
        }
        self.review = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewing() -> Session {
        let mut session = Session::default();
        session.camera_permission_resolved(PermissionState::Granted);
        session.media_permission_resolved(PermissionState::Granted);
        session.attach_camera();
        session.begin_capture();
        session.capture_completed(Ok(ImageHandle::new("img://1")));
        session
    }

    #[test]
    fn discard_clears_review() {
        let mut session = reviewing();
        session.discard();
        assert!(!session.review_visible());
        assert_eq!(session.active_image(), None);
        assert_eq!(session.notice(), None);
    }

    #[test]
    fn discard_during_confirmation_clears_review() {
        let mut session = reviewing();
        session.request_save();
        session.discard();
        assert!(!session.review_visible());
    }

    #[test]
    fn cancel_keeps_review_open() {
        let mut session = reviewing();
        assert!(session.request_save());
        assert_eq!(session.review().unwrap().stage(), ReviewStage::Confirming);

        session.cancel_save();
        assert!(session.review_visible());
        assert_eq!(session.review().unwrap().stage(), ReviewStage::Viewing);
        assert_eq!(session.active_image().unwrap().as_str(), "img://1");
    }

    #[test]
    fn confirm_requires_confirmation_first() {
        let mut session = reviewing();
        assert_eq!(session.confirm_save(), None);
        assert!(session.review_visible());
    }

    #[test]
    fn save_success_ends_review_with_notice() {
        let mut session = reviewing();
        session.request_save();
        let image = session.confirm_save().unwrap();
        assert_eq!(session.review().unwrap().stage(), ReviewStage::Saving);

        session.save_completed(Ok(Asset::new("IMG_1.jpg", image.as_str())));
        assert!(!session.review_visible());
        assert_eq!(session.notice(), Some(&Notice::PhotoSaved));
    }

    #[test]
    fn save_failure_still_ends_review() {
        let mut session = reviewing();
        session.request_save();
        session.confirm_save();
        session.save_completed(Err(LibraryError::Io("disk full".to_string())));

        assert!(!session.review_visible());
        assert_eq!(
            session.notice(),
            Some(&Notice::SaveFailed("disk full".to_string()))
        );
    }

    #[test]
    fn save_without_media_access_fails_softly() {
        let mut session = Session::default();
        session.camera_permission_resolved(PermissionState::Granted);
        session.media_permission_resolved(PermissionState::Denied);
        session.dismiss_notice();
        session.attach_camera();
        session.begin_capture();
        session.capture_completed(Ok(ImageHandle::new("img://1")));

        session.request_save();
        assert_eq!(session.confirm_save(), None);
        assert!(!session.review_visible());
        assert!(matches!(session.notice(), Some(Notice::SaveFailed(_))));
    }

    #[test]
    fn second_request_while_saving_is_ignored() {
        let mut session = reviewing();
        session.request_save();
        session.confirm_save();
        assert!(!session.request_save());
        assert_eq!(session.review().unwrap().stage(), ReviewStage::Saving);
    }
}
