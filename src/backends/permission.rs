// SPDX-License-Identifier: GPL-3.0-only

//! Desktop permission checks
//!
//! Inside a Flatpak sandbox camera access is requested from the XDG desktop
//! portal, which may ask the user. Outside a sandbox the device nodes decide:
//! access is granted when a capture device can be opened. Media library access
//! is granted when the photo directory exists (or can be created) and accepts
//! new files.

use super::PermissionService;
use super::camera::devices;
use crate::session::{PermissionKind, PermissionState};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Whether the process runs inside a Flatpak sandbox
pub fn is_sandboxed() -> bool {
    Path::new("/.flatpak-info").exists()
}

/// Permissions answered by the portal or the local file system
#[derive(Debug, Clone)]
pub struct DesktopPermissions {
    library_dir: PathBuf,
    sandboxed: bool,
}

impl DesktopPermissions {
    pub fn new(library_dir: PathBuf) -> Self {
        Self {
            library_dir,
            sandboxed: is_sandboxed(),
        }
    }

    async fn camera(&self) -> PermissionState {
        if self.sandboxed {
            return match portal_access_camera().await {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "Camera portal request failed");
                    PermissionState::Denied
                }
            };
        }

        let found = tokio::task::spawn_blocking(devices::enumerate)
            .await
            .map(|devices| !devices.is_empty())
            .unwrap_or(false);
        if found {
            PermissionState::Granted
        } else {
            info!("No accessible video capture device");
            PermissionState::Denied
        }
    }

    async fn media_library(&self) -> PermissionState {
        let dir = self.library_dir.clone();
        let writable = tokio::task::spawn_blocking(move || check_writable(&dir))
            .await
            .unwrap_or(false);
        if writable {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }
}

/// Create `dir` if needed and check that files can be written to it
pub fn check_writable(dir: &Path) -> bool {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "Cannot create photo directory");
        return false;
    }
    let marker = dir.join(format!(".shutter-write-check-{}", std::process::id()));
    match std::fs::write(&marker, b"") {
        Ok(()) => {
            let _ = std::fs::remove_file(&marker);
            true
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Photo directory is not writable");
            false
        }
    }
}

/// Object path the portal will use for a request made with `token`
fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{PORTAL_PATH}/request/{sender}/{token}")
}

/// Ask the camera portal for access and wait for the user's answer
async fn portal_access_camera() -> zbus::Result<PermissionState> {
    let connection = zbus::Connection::session().await?;
    let portal = zbus::Proxy::new(&connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE)
        .await?;

    let present: bool = portal.get_property("IsCameraPresent").await?;
    if !present {
        info!("Portal reports no camera");
        return Ok(PermissionState::Denied);
    }

    let token = format!("shutter_{}", uuid::Uuid::new_v4().simple());
    let unique_name = connection
        .unique_name()
        .map(|name| name.as_str().to_string())
        .unwrap_or_default();
    let path = request_path(&unique_name, &token);

    // Subscribe before calling so the response cannot be missed
    let request =
        zbus::Proxy::new(&connection, PORTAL_DESTINATION, path.as_str(), REQUEST_INTERFACE).await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));
    let handle: OwnedObjectPath = portal.call("AccessCamera", &(options,)).await?;
    debug!(handle = %handle, "Camera access requested");

    let Some(message) = responses.next().await else {
        return Ok(PermissionState::Denied);
    };
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;
    info!(code, "Camera portal answered");
    Ok(if code == 0 {
        PermissionState::Granted
    } else {
        PermissionState::Denied
    })
}

#[async_trait]
impl PermissionService for DesktopPermissions {
    async fn request(&self, kind: PermissionKind) -> PermissionState {
        let state = match kind {
            PermissionKind::Camera => self.camera().await,
            PermissionKind::MediaLibrary => self.media_library().await,
        };
        info!(%kind, ?state, sandboxed = self.sandboxed, "Permission resolved");
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_follows_sender_name() {
        assert_eq!(
            request_path(":1.42", "shutter_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/shutter_abc"
        );
    }

    #[test]
    fn writable_directory_is_created() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Pictures").join("shutter");
        assert!(check_writable(&dir));
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn directory_under_a_file_is_refused() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(!check_writable(&file.join("shutter")));
    }

    #[tokio::test]
    async fn media_permission_follows_directory() {
        let root = tempfile::tempdir().unwrap();
        let permissions = DesktopPermissions {
            library_dir: root.path().join("photos"),
            sandboxed: false,
        };
        assert_eq!(
            permissions.request(PermissionKind::MediaLibrary).await,
            PermissionState::Granted
        );
    }
}
