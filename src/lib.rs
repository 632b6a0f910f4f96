// SPDX-License-Identifier: GPL-3.0-only

//! Shutter - a photo camera for the COSMIC desktop environment
//!
//! One screen: a live preview with front/back and flash toggles, a capture
//! button, a review of the photo just taken with discard and save (behind a
//! Cancel/OK confirmation), and an optional three-column gallery of the
//! photo library.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: screen state machine (permissions, capture, review, gallery)
//! - [`backends`]: permission, camera and media library services
//! - [`controller`]: async driver running session actions against the services
//! - [`app`]: COSMIC application and UI
//! - [`terminal`]: half-block terminal UI over the controller
//! - [`config`]: user configuration handling
//! - [`flash`]: hardware flash LEDs
//!
//! # Example
//!
//! ```ignore
//! use shutter::backends::memory::MemoryPlatform;
//! use shutter::controller::Controller;
//!
//! let fakes = MemoryPlatform::granted();
//! let mut controller = Controller::new(fakes.platform(), true);
//! controller.start().await;
//! controller.attach_camera();
//! controller.take_picture().await.unwrap().unwrap();
//! assert!(controller.session().review_visible());
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod session;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use backends::Platform;
pub use config::Config;
pub use controller::Controller;
pub use errors::{AppError, AppResult};
pub use session::Session;
