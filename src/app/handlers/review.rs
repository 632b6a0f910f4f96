// SPDX-License-Identifier: GPL-3.0-only

//! Review modal handlers

use crate::app::state::{AppModel, Message};
use crate::errors::LibraryError;
use crate::session::Asset;
use cosmic::Task;

impl AppModel {
    pub(crate) fn handle_discard_photo(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.discard();
        Task::none()
    }

    pub(crate) fn handle_save_photo(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.request_save();
        Task::none()
    }

    pub(crate) fn handle_cancel_save(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.cancel_save();
        Task::none()
    }

    pub(crate) fn handle_confirm_save(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(image) = self.session.confirm_save() else {
            return Task::none();
        };
        let library = self.platform.library.clone();
        Task::perform(
            async move { library.persist(&image).await },
            |result| cosmic::Action::App(Message::SaveCompleted(result)),
        )
    }

    pub(crate) fn handle_save_completed(
        &mut self,
        result: Result<Asset, LibraryError>,
    ) -> Task<cosmic::Action<Message>> {
        self.session.save_completed(result);
        Task::none()
    }
}
