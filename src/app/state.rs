// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::{Frame, Platform};
use crate::config::Config;
use crate::errors::{CaptureError, LibraryError};
use crate::session::{Asset, CaptureSettings, GridLayout, ImageHandle, PermissionState, Session};
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::Arc;

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// The application model stores app-specific state used to describe its
/// interface and drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// About page
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Handler for writing configuration changes
    pub config_handler: Option<cosmic_config::Config>,
    /// Permission, camera and media library services
    pub platform: Platform,
    /// Capture, review and gallery state
    pub session: Session,
    /// Thumbnail grid geometry, fixed by the first window size
    pub grid: Option<GridLayout>,
    /// Latest preview frame
    pub preview: Option<cosmic::widget::image::Handle>,
    /// Last preview error, shown in place of the feed
    pub preview_error: Option<String>,
    /// White screen flash is showing
    pub flash_active: bool,
    /// Capture waiting for the screen flash to finish
    pub pending_capture: Option<CaptureSettings>,
    /// Theme dropdown labels, in `AppTheme::ALL` order
    pub theme_options: Vec<String>,
}

/// Messages emitted by the application and its widgets.
///
/// Messages are organized into logical groups:
/// - **UI Navigation**: context pages, external URLs
/// - **Permissions**: startup permission answers
/// - **Camera**: preview frames, flip and flash
/// - **Capture**: taking a picture
/// - **Review**: discard, save and the save confirmation
/// - **Gallery**: loading the library and picking a photo
/// - **Settings & System**: configuration and notices
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Permissions =====
    CameraPermission(PermissionState),
    MediaPermission(PermissionState),

    // ===== Camera =====
    /// New preview frame from the camera
    PreviewFrame(Arc<Frame>),
    /// Preview could not be started
    PreviewFailed(CaptureError),
    /// Switch between front and back camera
    FlipCamera,
    /// Toggle flash for photo capture
    ToggleFlash,

    // ===== Capture =====
    /// Take a picture
    Capture,
    /// Screen flash finished, now capture the photo
    FlashComplete,
    /// Camera answered the capture
    CaptureCompleted(Result<ImageHandle, CaptureError>),

    // ===== Review =====
    DiscardPhoto,
    /// Ask for save confirmation
    SavePhoto,
    /// Save confirmation answered with Cancel
    CancelSave,
    /// Save confirmation answered with OK
    ConfirmSave,
    /// Media library answered the save
    SaveCompleted(Result<Asset, LibraryError>),

    // ===== Gallery =====
    /// "Load images" / "Close" pressed
    LoadImages,
    GalleryPermission(PermissionState),
    GalleryLoaded(Result<Vec<Asset>, LibraryError>),
    SelectAsset(usize),

    // ===== Settings & System =====
    /// Configuration updated
    UpdateConfig(Config),
    SetAppTheme(usize),
    SetGalleryEnabled(bool),
    OpenPhotoFolder,
    DismissNotice,
    /// Window width reported by the compositor
    WindowResized(f32),
}
