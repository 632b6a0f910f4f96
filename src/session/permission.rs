// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate

use super::{Notice, PermissionState, Session};
use tracing::{info, warn};

/// What the screen may show, derived from the camera permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Camera permission not resolved: render nothing
    Pending,
    /// Camera permission refused: static message, no interaction
    Denied,
    /// Camera usable
    Open,
}

impl Session {
    pub fn gate(&self) -> Gate {
        match self.camera_permission {
            PermissionState::Unknown => Gate::Pending,
            PermissionState::Denied => Gate::Denied,
            PermissionState::Granted => Gate::Open,
        }
    }

    pub fn camera_permission(&self) -> PermissionState {
        self.camera_permission
    }

    pub fn media_permission(&self) -> PermissionState {
        self.media_permission
    }

    /// Apply the startup camera permission answer
    ///
    /// Only the first resolution counts; there is no re-request flow.
    pub fn camera_permission_resolved(&mut self, state: PermissionState) {
        if self.camera_permission != PermissionState::Unknown {
            warn!(?state, "Camera permission already resolved, ignoring");
            return;
        }
        info!(?state, "Camera permission resolved");
        self.camera_permission = state;
    }

    /// Apply a media library permission answer
    ///
    /// A refusal queues a notice the first time only. Preview and capture
    /// stay available either way.
    pub fn media_permission_resolved(&mut self, state: PermissionState) {
        info!(?state, "Media library permission resolved");
        self.media_permission = state;
        if state == PermissionState::Denied && !self.media_notice_shown {
            self.media_notice_shown = true;
            self.push_notice(Notice::MediaAccessNeededToSave);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_follows_camera_permission() {
        let mut session = Session::default();
        assert_eq!(session.gate(), Gate::Pending);

        session.camera_permission_resolved(PermissionState::Denied);
        assert_eq!(session.gate(), Gate::Denied);

        // No retry path once denied
        session.camera_permission_resolved(PermissionState::Granted);
        assert_eq!(session.gate(), Gate::Denied);
    }

    #[test]
    fn media_denial_does_not_close_the_gate() {
        let mut session = Session::default();
        session.media_permission_resolved(PermissionState::Denied);
        session.camera_permission_resolved(PermissionState::Granted);

        assert_eq!(session.gate(), Gate::Open);
        assert_eq!(session.notice(), Some(&Notice::MediaAccessNeededToSave));
    }

    #[test]
    fn media_denial_notice_is_shown_once() {
        let mut session = Session::default();
        session.media_permission_resolved(PermissionState::Denied);
        session.media_permission_resolved(PermissionState::Denied);

        assert_eq!(session.notices().count(), 1);
    }
}
