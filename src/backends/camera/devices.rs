// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 device discovery and front/back selection

use super::types::CameraDevice;
use crate::session::CameraFacing;
use std::path::Path;
use tracing::{debug, info};
use v4l::capability::Flags;
use v4l::prelude::*;

/// Card name fragments that mark a user-facing camera
const FRONT_HINTS: &[&str] = &["front", "user", "selfie"];
/// Card name fragments that mark a world-facing camera
const BACK_HINTS: &[&str] = &["back", "rear", "world"];

/// Guess the facing from the card name reported by the driver
pub fn location_from_name(name: &str) -> Option<CameraFacing> {
    let lower = name.to_lowercase();
    if FRONT_HINTS.iter().any(|hint| lower.contains(hint)) {
        Some(CameraFacing::Front)
    } else if BACK_HINTS.iter().any(|hint| lower.contains(hint)) {
        Some(CameraFacing::Back)
    } else {
        None
    }
}

/// List V4L2 nodes that can capture video
///
/// Drivers often expose a metadata node next to the capture node under the
/// same card name; only the first node per card is kept.
pub fn enumerate() -> Vec<CameraDevice> {
    let mut nodes = v4l::context::enum_devices();
    nodes.sort_by_key(|node| node.index());

    let mut devices: Vec<CameraDevice> = Vec::new();
    for node in nodes {
        let path = node.path().to_path_buf();
        let Some(name) = capture_card(&path) else {
            continue;
        };
        if devices.iter().any(|d| d.name == name) {
            debug!(path = %path.display(), name, "Skipping secondary node");
            continue;
        }

        let location = location_from_name(&name);
        info!(path = %path.display(), name, ?location, "Found camera");
        devices.push(CameraDevice {
            name,
            path,
            location,
        });
    }
    devices
}

/// Card name of `path` if it is a video capture node
fn capture_card(path: &Path) -> Option<String> {
    let device = match Device::with_path(path) {
        Ok(device) => device,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot open video node");
            return None;
        }
    };
    let caps = device.query_caps().ok()?;
    caps.capabilities
        .contains(Flags::VIDEO_CAPTURE)
        .then_some(caps.card)
}

/// Pick the device to use for `facing`
///
/// Order of preference: the configured device (matched by path or card
/// name), a device whose name says which way it faces, then position in the
/// list among devices without such a hint (back first, front second).
pub fn select<'a>(
    devices: &'a [CameraDevice],
    facing: CameraFacing,
    configured: Option<&str>,
) -> Option<&'a CameraDevice> {
    if let Some(wanted) = configured {
        let found = devices
            .iter()
            .find(|d| d.path.as_os_str() == wanted || d.name == wanted);
        match found {
            Some(device) => return Some(device),
            None => debug!(wanted, %facing, "Configured camera not present"),
        }
    }

    if let Some(device) = devices.iter().find(|d| d.location == Some(facing)) {
        return Some(device);
    }

    let unlabelled: Vec<&CameraDevice> = devices.iter().filter(|d| d.location.is_none()).collect();
    let index = match facing {
        CameraFacing::Back => 0,
        CameraFacing::Front => 1,
    };
    unlabelled
        .get(index)
        .or_else(|| unlabelled.first())
        .copied()
        .or_else(|| devices.first())
}
