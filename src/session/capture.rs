// SPDX-License-Identifier: GPL-3.0-only

//! Capture session: facing, flash and taking a picture

use super::{CameraFacing, CaptureSettings, FlashMode, Gate, ImageHandle, Notice, Review, Session};
use crate::errors::CaptureError;
use tracing::{debug, error, info, warn};

impl Session {
    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    /// Switch between the front and back camera
    pub fn flip(&mut self) {
        self.facing = self.facing.flipped();
        info!(facing = %self.facing, "Camera flipped");
    }

    /// Switch the flash on or off
    pub fn toggle_flash(&mut self) {
        self.flash = self.flash.toggled();
        info!(flash = ?self.flash, "Flash toggled");
    }

    /// Mark the camera reference as attached (first preview frame rendered)
    pub fn attach_camera(&mut self) {
        if !self.camera_attached {
            debug!("Camera attached");
            self.camera_attached = true;
        }
    }

    pub fn is_camera_attached(&self) -> bool {
        self.camera_attached
    }

    /// A capture is waiting on the platform
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Whether `take picture` would do anything right now
    pub fn can_capture(&self) -> bool {
        self.gate() == Gate::Open && self.camera_attached && !self.capturing && self.review.is_none()
    }

    /// Start taking a picture
    ///
    /// Returns the settings to hand to the capture service, or `None` when
    /// the camera is not attached yet, a capture is already running or a
    /// review is open. In that case nothing changes.
    pub fn begin_capture(&mut self) -> Option<CaptureSettings> {
        if !self.can_capture() {
            debug!(
                attached = self.camera_attached,
                capturing = self.capturing,
                reviewing = self.review.is_some(),
                "Capture ignored"
            );
            return None;
        }
        self.capturing = true;
        Some(CaptureSettings {
            facing: self.facing,
            flash: self.flash,
        })
    }

    /// Apply the capture service's answer
    ///
    /// A photo opens the review. A failure queues an error notice and leaves
    /// the capture session idle.
    pub fn capture_completed(&mut self, result: Result<ImageHandle, CaptureError>) {
        self.capturing = false;
        match result {
            Ok(image) => {
                info!(image = %image, facing = %self.facing, flash = ?self.flash, "Picture taken");
                if self.review.is_some() {
                    warn!(image = %image, "Review already open, dropping captured picture");
                    return;
                }
                self.review = Some(Review::new(image));
            }
            Err(err) => {
                error!(error = %err, "Picture capture failed");
                self.push_notice(Notice::CaptureFailed(err.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PermissionState;

    fn ready_session() -> Session {
        let mut session = Session::default();
        session.camera_permission_resolved(PermissionState::Granted);
        session.media_permission_resolved(PermissionState::Granted);
        session.attach_camera();
        session
    }

    #[test]
    fn flip_parity() {
        let mut session = Session::default();
        for n in 1..=6 {
            session.flip();
            let expected = if n % 2 == 0 {
                CameraFacing::Back
            } else {
                CameraFacing::Front
            };
            assert_eq!(session.facing(), expected, "after {} flips", n);
        }
    }

    #[test]
    fn flash_parity() {
        let mut session = Session::default();
        assert_eq!(session.flash(), FlashMode::Off);
        for n in 1..=5 {
            session.toggle_flash();
            assert_eq!(session.flash().is_on(), n % 2 == 1, "after {} toggles", n);
        }
    }

    #[test]
    fn capture_needs_attached_camera() {
        let mut session = Session::default();
        session.camera_permission_resolved(PermissionState::Granted);
        assert_eq!(session.begin_capture(), None);
        assert!(!session.is_capturing());

        session.attach_camera();
        assert!(session.begin_capture().is_some());
    }

    #[test]
    fn capture_is_blocked_behind_denied_gate() {
        let mut session = Session::default();
        session.camera_permission_resolved(PermissionState::Denied);
        session.attach_camera();
        assert_eq!(session.begin_capture(), None);
    }

    #[test]
    fn capture_uses_current_settings() {
        let mut session = ready_session();
        session.flip();
        session.toggle_flash();

        let settings = session.begin_capture().unwrap();
        assert_eq!(settings.facing, CameraFacing::Front);
        assert_eq!(settings.flash, FlashMode::On);
    }

    #[test]
    fn second_capture_waits_for_the_first() {
        let mut session = ready_session();
        assert!(session.begin_capture().is_some());
        assert_eq!(session.begin_capture(), None);
    }

    #[test]
    fn successful_capture_opens_review() {
        let mut session = ready_session();
        session.begin_capture();
        session.capture_completed(Ok(ImageHandle::new("img://1")));

        assert!(session.review_visible());
        assert_eq!(session.active_image().map(ImageHandle::as_str), Some("img://1"));
        assert!(!session.is_capturing());
    }

    #[test]
    fn failed_capture_leaves_session_idle() {
        let mut session = ready_session();
        session.begin_capture();
        session.capture_completed(Err(CaptureError::DeviceBusy));

        assert!(!session.review_visible());
        assert!(!session.is_capturing());
        assert_eq!(
            session.notice(),
            Some(&Notice::CaptureFailed("Camera is busy".to_string()))
        );
        assert!(session.can_capture());
    }

    #[test]
    fn capture_is_blocked_while_reviewing() {
        let mut session = ready_session();
        session.begin_capture();
        session.capture_completed(Ok(ImageHandle::new("img://1")));
        assert_eq!(session.begin_capture(), None);
    }
}
