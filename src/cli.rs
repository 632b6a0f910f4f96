// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a photo straight into the library
//! - Listing the photo library

use shutter::backends::Platform;
use shutter::backends::camera::devices;
use shutter::backends::memory::MemoryPlatform;
use shutter::config::Config;
use shutter::controller::Controller;
use shutter::session::CameraFacing;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = devices::enumerate();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let config = Config::load();
    let front = devices::select(&cameras, CameraFacing::Front, config.front_camera.as_deref());
    let back = devices::select(&cameras, CameraFacing::Back, config.back_camera.as_deref());

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        let mut roles = Vec::new();
        if front.is_some_and(|d| d.path == camera.path) {
            roles.push("front");
        }
        if back.is_some_and(|d| d.path == camera.path) {
            roles.push("back");
        }
        println!("  [{}] {}", index, camera);
        if !roles.is_empty() {
            println!("      Used as: {}", roles.join(", "));
        }
    }

    Ok(())
}

fn platform(demo: bool, config: &Config) -> Result<Platform, Box<dyn std::error::Error>> {
    if demo {
        return Ok(MemoryPlatform::granted().platform());
    }
    gstreamer::init()?;
    Ok(Platform::desktop(config))
}

/// Take a photo and save it to the library without a review step
pub fn take_photo(front: bool, flash: bool, demo: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let runtime = tokio::runtime::Runtime::new()?;
    let mut controller = Controller::new(platform(demo, &config)?, config.gallery_enabled);
    runtime.block_on(controller.start());

    if front {
        controller.flip();
    }
    if flash {
        controller.toggle_flash();
    }
    // The still pipeline warms the camera up itself
    controller.attach_camera();

    println!("Capturing...");
    let asset = runtime.block_on(controller.take_and_save())?;
    println!("Photo saved: {}", asset.uri);
    Ok(())
}

/// List the photo library, newest first
pub fn list_gallery(json: bool, demo: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let runtime = tokio::runtime::Runtime::new()?;
    let platform = if demo {
        MemoryPlatform::granted().platform()
    } else {
        Platform::desktop(&config)
    };
    let assets = runtime.block_on(platform.library.list_assets())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
        return Ok(());
    }

    if assets.is_empty() {
        println!("No photos in {}.", config.photo_directory().display());
        return Ok(());
    }
    for asset in &assets {
        println!("{}", asset.uri);
    }
    Ok(())
}
