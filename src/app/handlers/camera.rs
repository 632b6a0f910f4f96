// SPDX-License-Identifier: GPL-3.0-only

//! Camera handlers
//!
//! Handles preview frames, camera flipping and the flash toggle.

use crate::app::state::{AppModel, Message};
use crate::backends::Frame;
use crate::errors::CaptureError;
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, warn};

impl AppModel {
    pub(crate) fn handle_preview_frame(&mut self, frame: Arc<Frame>) -> Task<cosmic::Action<Message>> {
        if !self.session.is_camera_attached() {
            debug!(width = frame.width, height = frame.height, "First preview frame");
        }
        self.session.attach_camera();
        self.preview_error = None;
        self.preview = Some(cosmic::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        Task::none()
    }

    pub(crate) fn handle_preview_failed(
        &mut self,
        error: CaptureError,
    ) -> Task<cosmic::Action<Message>> {
        warn!(error = %error, "No camera preview");
        self.preview = None;
        self.preview_error = Some(error.to_string());
        Task::none()
    }

    /// Flip to the other camera; the preview subscription restarts on its own
    pub(crate) fn handle_flip_camera(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.flip();
        self.preview = None;
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.toggle_flash();
        Task::none()
    }
}
