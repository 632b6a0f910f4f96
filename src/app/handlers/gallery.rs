// SPDX-License-Identifier: GPL-3.0-only

//! Gallery handlers
//!
//! Each press of the gallery button asks for media library access again,
//! then lists the library and toggles the grid.

use crate::app::state::{AppModel, Message};
use crate::errors::LibraryError;
use crate::session::{Asset, PermissionKind, PermissionState};
use cosmic::Task;

impl AppModel {
    pub(crate) fn handle_load_images(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.session.begin_gallery_load() {
            return Task::none();
        }
        let permissions = self.platform.permissions.clone();
        Task::perform(
            async move { permissions.request(PermissionKind::MediaLibrary).await },
            |state| cosmic::Action::App(Message::GalleryPermission(state)),
        )
    }

    pub(crate) fn handle_gallery_permission(
        &mut self,
        state: PermissionState,
    ) -> Task<cosmic::Action<Message>> {
        if !self.session.gallery_permission_resolved(state) {
            return Task::none();
        }
        let library = self.platform.library.clone();
        Task::perform(
            async move { library.list_assets().await },
            |result| cosmic::Action::App(Message::GalleryLoaded(result)),
        )
    }

    pub(crate) fn handle_gallery_loaded(
        &mut self,
        result: Result<Vec<Asset>, LibraryError>,
    ) -> Task<cosmic::Action<Message>> {
        self.session.gallery_loaded(result);
        Task::none()
    }

    pub(crate) fn handle_select_asset(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        self.session.select_asset(index);
        Task::none()
    }
}
