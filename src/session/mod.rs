// SPDX-License-Identifier: GPL-3.0-only

//! Capture, review and gallery state machine
//!
//! [`Session`] owns every piece of screen state (permissions, facing, flash,
//! the image under review, the gallery) and only changes it through its
//! transition methods. Platform calls are not made here: each asynchronous
//! operation is split into a `begin_*` step that hands back what the platform
//! needs and a `*_completed` step that applies the platform's answer. The GUI
//! runs the platform call as a task in between, the [`Controller`] awaits it
//! directly.
//!
//! This module has no UI framework dependencies.
//!
//! [`Controller`]: crate::controller::Controller

mod capture;
mod gallery;
mod permission;
mod review;
pub mod types;

pub use gallery::GridLayout;
pub use permission::Gate;
pub use review::ReviewStage;
pub use types::*;

use std::collections::VecDeque;

/// The image currently held for save or discard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    image: ImageHandle,
    stage: ReviewStage,
}

impl Review {
    fn new(image: ImageHandle) -> Self {
        Self {
            image,
            stage: ReviewStage::Viewing,
        }
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn stage(&self) -> ReviewStage {
        self.stage
    }
}

/// Media library browser state
#[derive(Debug, Clone, Default)]
struct Gallery {
    assets: Vec<Asset>,
    visible: bool,
    loading: bool,
}

/// Screen state of the camera application
#[derive(Debug, Clone)]
pub struct Session {
    camera_permission: PermissionState,
    media_permission: PermissionState,
    media_notice_shown: bool,
    facing: CameraFacing,
    flash: FlashMode,
    camera_attached: bool,
    capturing: bool,
    /// `Some` exactly while the review modal is open
    review: Option<Review>,
    /// `None` when the gallery capability is disabled
    gallery: Option<Gallery>,
    notices: VecDeque<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Session {
    /// Create a session; `gallery_enabled` adds the media library browser
    pub fn new(gallery_enabled: bool) -> Self {
        Self {
            camera_permission: PermissionState::Unknown,
            media_permission: PermissionState::Unknown,
            media_notice_shown: false,
            facing: CameraFacing::default(),
            flash: FlashMode::default(),
            camera_attached: false,
            capturing: false,
            review: None,
            gallery: gallery_enabled.then(Gallery::default),
            notices: VecDeque::new(),
        }
    }

    /// Notice at the front of the queue, shown until dismissed
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    /// All pending notices, oldest first
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Dismiss the notice currently shown
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    fn push_notice(&mut self, notice: Notice) {
        tracing::debug!(?notice, "Notice queued");
        self.notices.push_back(notice);
    }
}
