// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! With the flash on, the screen turns white first and the shot is taken
//! once the flash delay has passed.

use crate::app::state::{AppModel, Message};
use crate::errors::CaptureError;
use crate::session::{CaptureSettings, ImageHandle};
use cosmic::Task;
use tracing::{debug, info};

impl AppModel {
    /// Create a delayed task that sends a message after the specified milliseconds
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(settings) = self.session.begin_capture() else {
            return Task::none();
        };

        if settings.flash.is_on() {
            debug!(duration_ms = self.config.flash_duration_ms, "Screen flash");
            self.flash_active = true;
            self.pending_capture = Some(settings);
            return Self::delay_task(self.config.flash_duration_ms, Message::FlashComplete);
        }

        self.run_capture(settings)
    }

    pub(crate) fn handle_flash_complete(&mut self) -> Task<cosmic::Action<Message>> {
        self.flash_active = false;
        match self.pending_capture.take() {
            Some(settings) => self.run_capture(settings),
            None => Task::none(),
        }
    }

    fn run_capture(&self, settings: CaptureSettings) -> Task<cosmic::Action<Message>> {
        info!(facing = %settings.facing, flash = ?settings.flash, "Capturing photo");
        let camera = self.platform.camera.clone();
        Task::perform(
            async move { camera.capture(settings).await },
            |result| cosmic::Action::App(Message::CaptureCompleted(result)),
        )
    }

    pub(crate) fn handle_capture_completed(
        &mut self,
        result: Result<ImageHandle, CaptureError>,
    ) -> Task<cosmic::Action<Message>> {
        self.session.capture_completed(result);
        Task::none()
    }
}
