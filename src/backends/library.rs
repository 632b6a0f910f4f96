// SPDX-License-Identifier: GPL-3.0-only

//! Media library stored as a plain directory of image files

use super::MediaLibrary;
use crate::constants::gallery::IMAGE_EXTENSIONS;
use crate::errors::LibraryError;
use crate::session::{Asset, ImageHandle};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Photos saved as `IMG_<timestamp>_<n>.<ext>` in one directory
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    dir: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn asset_for(path: &Path) -> Option<Asset> {
    let id = path.file_name()?.to_str()?.to_string();
    Some(Asset {
        id,
        uri: ImageHandle::from_path(path),
    })
}

/// First free `IMG_<stamp>_<n>.<ext>` name in `dir`
fn next_file_name(dir: &Path, stamp: &str, ext: &str) -> PathBuf {
    (1u32..)
        .map(|n| dir.join(format!("IMG_{stamp}_{n}.{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(format!("IMG_{stamp}.{ext}")))
}

/// Whether `path` already lives in the library directory
fn is_in_library(dir: &Path, path: &Path) -> bool {
    match (dir.canonicalize(), path.canonicalize()) {
        (Ok(dir), Ok(path)) => path.parent() == Some(dir.as_path()),
        _ => false,
    }
}

fn persist_blocking(dir: &Path, source: &Path) -> Result<Asset, LibraryError> {
    if !source.is_file() {
        return Err(LibraryError::InvalidHandle(source.display().to_string()));
    }
    // A photo picked from the gallery is already stored
    if is_in_library(dir, source) {
        debug!(path = %source.display(), "Photo already in library");
        return asset_for(source)
            .ok_or_else(|| LibraryError::InvalidHandle(source.display().to_string()));
    }
    std::fs::create_dir_all(dir)?;

    let ext = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "jpg".to_string());
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let target = next_file_name(dir, &stamp, &ext);

    std::fs::copy(source, &target)?;
    info!(from = %source.display(), to = %target.display(), "Photo stored in library");
    asset_for(&target).ok_or_else(|| LibraryError::Io("Unnamed library file".to_string()))
}

fn list_blocking(dir: &Path) -> Result<Vec<Asset>, LibraryError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Library directory missing, nothing to list");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut files: Vec<(SystemTime, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .map(|path| {
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    // Newest first; names break ties so saves within one second stay ordered
    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    Ok(files.iter().filter_map(|(_, path)| asset_for(path)).collect())
}

#[async_trait]
impl MediaLibrary for DirectoryLibrary {
    async fn persist(&self, image: &ImageHandle) -> Result<Asset, LibraryError> {
        let source = image
            .to_path()
            .ok_or_else(|| LibraryError::InvalidHandle(image.to_string()))?;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || persist_blocking(&dir, &source))
            .await
            .map_err(|e| LibraryError::Io(e.to_string()))?
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, LibraryError> {
        let dir = self.dir.clone();
        let assets = tokio::task::spawn_blocking(move || list_blocking(&dir))
            .await
            .map_err(|e| LibraryError::Io(e.to_string()))??;
        debug!(count = assets.len(), dir = %self.dir.display(), "Listed library");
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_ignore_case() {
        assert!(is_image(Path::new("a.JPG")));
        assert!(is_image(Path::new("b.png")));
        assert!(!is_image(Path::new("c.txt")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn file_names_count_up() {
        let dir = tempfile::tempdir().unwrap();
        let first = next_file_name(dir.path(), "20260101_120000", "jpg");
        assert!(first.ends_with("IMG_20260101_120000_1.jpg"));

        std::fs::write(&first, b"x").unwrap();
        let second = next_file_name(dir.path(), "20260101_120000", "jpg");
        assert!(second.ends_with("IMG_20260101_120000_2.jpg"));
    }

    #[test]
    fn missing_directory_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(list_blocking(&dir.path().join("nope")).unwrap(), vec![]);
    }

    #[tokio::test]
    async fn opaque_handles_cannot_be_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let library = DirectoryLibrary::new(dir.path().to_path_buf());
        let err = library
            .persist(&ImageHandle::new("img://1"))
            .await
            .unwrap_err();
        assert_eq!(err, LibraryError::InvalidHandle("img://1".to_string()));
    }
}
