// SPDX-License-Identifier: GPL-3.0-only

//! Startup permission handlers

use crate::app::state::{AppModel, Message};
use crate::session::PermissionState;
use cosmic::Task;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_camera_permission(
        &mut self,
        state: PermissionState,
    ) -> Task<cosmic::Action<Message>> {
        self.session.camera_permission_resolved(state);
        info!(gate = ?self.session.gate(), "Camera permission applied");
        Task::none()
    }

    pub(crate) fn handle_media_permission(
        &mut self,
        state: PermissionState,
    ) -> Task<cosmic::Action<Message>> {
        self.session.media_permission_resolved(state);
        Task::none()
    }
}
