// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for Shutter
//!
//! # Architecture
//!
//! - `state`: application state types (AppModel, Message, ContextPage)
//! - `handlers`: message handlers grouped by screen area
//! - `update`: message dispatcher
//! - `view`: main view, overlays and dialogs
//! - `settings`: settings drawer
//!
//! Screen state lives in [`Session`](crate::session::Session). Handlers call
//! its `begin_*` methods, run the platform call as a task and feed the result
//! back through a `*_completed` message.

mod handlers;
mod settings;
mod state;
mod update;
mod view;

use crate::backends::Platform;
use crate::config::Config;
use crate::constants::pipeline;
use crate::errors::CaptureError;
use crate::fl;
use crate::session::{Gate, PermissionKind, Session};
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Unique identifier in RDNN (reverse domain name notation) format
pub const APP_ID: &str = "io.github.shutter_camera.Shutter";

const REPOSITORY: &str = "https://github.com/shutter-camera/shutter";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.shutter_camera.Shutter.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Platform services; `None` selects the desktop services from the config.
    type Flags = Option<Platform>;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Load the configuration and ask for camera and media library access.
    fn init(core: cosmic::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = match cosmic_config::Config::new(APP_ID, Config::VERSION) {
            Ok(handler) => {
                let config = match Config::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                error!(%err, "Failed to create config handler");
                (None, Config::default())
            }
        };

        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let platform = flags.unwrap_or_else(|| Platform::desktop(&config));
        info!(?platform, library = %config.photo_directory().display(), "Starting");

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            session: Session::new(config.gallery_enabled),
            grid: None,
            config,
            config_handler,
            platform,
            preview: None,
            preview_error: None,
            flash_active: false,
            pending_capture: None,
            theme_options: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
        };

        // Both permissions are requested at once; neither waits for the other
        let permissions = app.platform.permissions.clone();
        let camera_task = Task::perform(
            async move { permissions.request(PermissionKind::Camera).await },
            |state| cosmic::Action::App(Message::CameraPermission(state)),
        );
        let permissions = app.platform.permissions.clone();
        let media_task = Task::perform(
            async move { permissions.request(PermissionKind::MediaLibrary).await },
            |state| cosmic::Action::App(Message::MediaPermission(state)),
        );

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        (app, Task::batch([camera_task, media_task, theme_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Save confirmation or the notice at the front of the queue.
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        self.view_dialog()
    }

    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Config changes, the first window size, and the camera preview once
    /// the gate is open.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let mut subscriptions = vec![
            self.core()
                .watch_config::<Config>(APP_ID)
                .map(|update| Message::UpdateConfig(update.config)),
        ];

        if self.grid.is_none() {
            subscriptions.push(
                cosmic::iced::window::resize_events()
                    .map(|(_id, size)| Message::WindowResized(size.width)),
            );
        }

        if self.session.gate() != Gate::Open {
            return Subscription::batch(subscriptions);
        }

        let facing = self.session.facing();
        let camera = self.platform.camera.clone();
        let preview_sub = Subscription::run_with_id(
            ("preview", facing),
            cosmic::iced::stream::channel(pipeline::FRAME_CHANNEL_CAPACITY, move |mut output| async move {
                info!(%facing, "Preview subscription started");
                loop {
                    let (sender, mut receiver) =
                        futures::channel::mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);

                    let starter = camera.clone();
                    let started =
                        tokio::task::spawn_blocking(move || starter.start_preview(facing, sender))
                            .await
                            .unwrap_or_else(|e| {
                                Err(CaptureError::Pipeline(format!("Preview task failed: {}", e)))
                            });
                    let guard = match started {
                        Ok(guard) => guard,
                        Err(e) => {
                            warn!(error = %e, %facing, "Preview failed to start");
                            if output.send(Message::PreviewFailed(e)).await.is_err() {
                                break;
                            }
                            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                            continue;
                        }
                    };

                    while let Some(frame) = receiver.next().await {
                        // Dropping frames is fine for a live preview
                        if let Err(e) = output.try_send(Message::PreviewFrame(Arc::new(frame)))
                            && e.is_disconnected()
                        {
                            info!("Preview subscription cancelled");
                            return;
                        }
                    }

                    // Feed ended; the camera is gone or idle
                    drop(guard);
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }),
        );

        subscriptions.push(preview_sub);
        Subscription::batch(subscriptions)
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
