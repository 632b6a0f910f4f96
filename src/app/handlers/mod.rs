// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by the part of the screen they drive.

pub mod camera;
pub mod capture;
pub mod gallery;
pub mod permission;
pub mod review;
pub mod system;
