// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handlers live in the
//! `handlers` submodules:
//!
//! - `handlers::permission`: startup permission answers
//! - `handlers::camera`: preview frames, flip, flash toggle
//! - `handlers::capture`: screen flash and taking the picture
//! - `handlers::review`: discard, save and confirmation
//! - `handlers::gallery`: gallery loading and selection
//! - `handlers::system`: navigation, settings, notices

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Permissions =====
            Message::CameraPermission(state) => self.handle_camera_permission(state),
            Message::MediaPermission(state) => self.handle_media_permission(state),

            // ===== Camera =====
            Message::PreviewFrame(frame) => self.handle_preview_frame(frame),
            Message::PreviewFailed(error) => self.handle_preview_failed(error),
            Message::FlipCamera => self.handle_flip_camera(),
            Message::ToggleFlash => self.handle_toggle_flash(),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::FlashComplete => self.handle_flash_complete(),
            Message::CaptureCompleted(result) => self.handle_capture_completed(result),

            // ===== Review =====
            Message::DiscardPhoto => self.handle_discard_photo(),
            Message::SavePhoto => self.handle_save_photo(),
            Message::CancelSave => self.handle_cancel_save(),
            Message::ConfirmSave => self.handle_confirm_save(),
            Message::SaveCompleted(result) => self.handle_save_completed(result),

            // ===== Gallery =====
            Message::LoadImages => self.handle_load_images(),
            Message::GalleryPermission(state) => self.handle_gallery_permission(state),
            Message::GalleryLoaded(result) => self.handle_gallery_loaded(result),
            Message::SelectAsset(index) => self.handle_select_asset(index),

            // ===== Settings & System =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetGalleryEnabled(enabled) => self.handle_set_gallery_enabled(enabled),
            Message::OpenPhotoFolder => self.handle_open_photo_folder(),
            Message::DismissNotice => self.handle_dismiss_notice(),
            Message::WindowResized(width) => self.handle_window_resized(width),
        }
    }
}
