// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles navigation, settings, notices and the window size.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::{AppTheme, Config};
use crate::session::GridLayout;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{debug, error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let theme_changed = config.app_theme != self.config.app_theme;
        self.session.set_gallery_enabled(config.gallery_enabled);
        self.config = config;
        if theme_changed {
            return cosmic::command::set_theme(self.config.app_theme.theme());
        }
        Task::none()
    }

    fn write_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(app_theme) = AppTheme::ALL.get(index).copied() else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.write_config("app_theme");
        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_gallery_enabled(
        &mut self,
        enabled: bool,
    ) -> Task<cosmic::Action<Message>> {
        info!(enabled, "Gallery setting changed");
        self.config.gallery_enabled = enabled;
        self.session.set_gallery_enabled(enabled);
        self.write_config("gallery_enabled");
        Task::none()
    }

    pub(crate) fn handle_open_photo_folder(&self) -> Task<cosmic::Action<Message>> {
        let photo_dir = self.config.photo_directory();
        if let Err(e) = std::fs::create_dir_all(&photo_dir) {
            error!(error = %e, path = %photo_dir.display(), "Failed to create photo directory");
        }
        if let Err(e) = open::that(&photo_dir) {
            error!(error = %e, path = %photo_dir.display(), "Failed to open photo directory");
        }
        Task::none()
    }

    pub(crate) fn handle_window_resized(&mut self, width: f32) -> Task<cosmic::Action<Message>> {
        let grid = GridLayout::settle(&mut self.grid, width);
        debug!(width, margin = grid.margin, "Gallery grid settled");
        Task::none()
    }

    pub(crate) fn handle_dismiss_notice(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.dismiss_notice();
        Task::none()
    }
}
