// SPDX-License-Identifier: GPL-3.0-only

//! Gallery loader: browse the media library and route a photo into review

use super::{Asset, Gallery, Notice, PermissionState, Review, Session};
use crate::constants::gallery::{COLUMNS, THUMBNAIL_SIZE};
use crate::errors::LibraryError;
use tracing::{debug, error, info};

/// Fixed three-column thumbnail grid
///
/// The margin around each cell is computed once from the window width so
/// that three thumbnails plus their margins fill the width exactly. It is not
/// recomputed when the window changes size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell: f32,
    pub margin: f32,
}

impl GridLayout {
    pub fn from_width(width: f32) -> Self {
        let used = COLUMNS as f32 * THUMBNAIL_SIZE;
        let margin = ((width - used) / (2 * COLUMNS) as f32).max(0.0);
        Self {
            columns: COLUMNS,
            cell: THUMBNAIL_SIZE,
            margin,
        }
    }

    /// Grid for the first window width seen; later widths leave it as is
    pub fn settle(slot: &mut Option<Self>, width: f32) -> Self {
        *slot.get_or_insert_with(|| Self::from_width(width))
    }

    /// Index ranges of the assets on each grid row
    pub fn rows(&self, len: usize) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        (0..len)
            .step_by(self.columns)
            .map(move |start| start..(start + self.columns).min(len))
    }
}

impl Session {
    /// Whether the gallery capability is part of this session
    pub fn gallery_enabled(&self) -> bool {
        self.gallery.is_some()
    }

    /// Add or remove the gallery capability; removing it drops the list
    pub fn set_gallery_enabled(&mut self, enabled: bool) {
        match (enabled, self.gallery.is_some()) {
            (true, false) => self.gallery = Some(Gallery::default()),
            (false, true) => self.gallery = None,
            _ => {}
        }
    }

    pub fn gallery_visible(&self) -> bool {
        self.gallery.as_ref().is_some_and(|g| g.visible)
    }

    pub fn gallery_loading(&self) -> bool {
        self.gallery.as_ref().is_some_and(|g| g.loading)
    }

    /// Assets from the last successful load, in library order
    pub fn assets(&self) -> &[Asset] {
        self.gallery.as_ref().map_or(&[], |g| g.assets.as_slice())
    }

    /// The capture button is hidden while the grid is on screen
    pub fn capture_button_visible(&self) -> bool {
        !self.gallery_visible()
    }

    /// Start a gallery load; the caller then re-requests media permission
    ///
    /// Returns false when the gallery is disabled or a load is running.
    pub fn begin_gallery_load(&mut self) -> bool {
        match self.gallery.as_mut() {
            Some(gallery) if !gallery.loading => {
                gallery.loading = true;
                true
            }
            _ => false,
        }
    }

    /// Apply the re-requested media permission
    ///
    /// Returns true when the asset list should be fetched. A refusal queues a
    /// notice and leaves the list and visibility as they were.
    pub fn gallery_permission_resolved(&mut self, state: PermissionState) -> bool {
        self.media_permission = state;
        if state.is_granted() {
            return self.gallery_loading();
        }

        info!(?state, "Gallery load aborted, no media library access");
        if let Some(gallery) = self.gallery.as_mut() {
            gallery.loading = false;
        }
        self.push_notice(Notice::MediaAccessNeededToBrowse);
        false
    }

    /// Apply the fetched asset list
    ///
    /// The list is replaced wholesale and the grid visibility flips.
    pub fn gallery_loaded(&mut self, result: Result<Vec<Asset>, LibraryError>) {
        let Some(gallery) = self.gallery.as_mut() else {
            return;
        };
        gallery.loading = false;

        match result {
            Ok(assets) => {
                info!(count = assets.len(), "Gallery loaded");
                gallery.assets = assets;
                gallery.visible = !gallery.visible;
            }
            Err(err) => {
                error!(error = %err, "Failed to list media library");
                self.push_notice(Notice::GalleryLoadFailed(err.to_string()));
            }
        }
    }

    /// Open the asset at `index` in the review modal and close the grid
    pub fn select_asset(&mut self, index: usize) -> bool {
        if self.review.is_some() {
            debug!(index, "Review already open, ignoring gallery selection");
            return false;
        }
        let Some(gallery) = self.gallery.as_mut() else {
            return false;
        };
        let Some(asset) = gallery.assets.get(index) else {
            debug!(index, "No asset at index");
            return false;
        };

        info!(id = %asset.id, "Gallery asset selected");
        self.review = Some(Review::new(asset.uri.clone()));
        gallery.visible = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Vec<Asset> {
        vec![Asset::new("a", "u1"), Asset::new("b", "u2")]
    }

    fn loaded() -> Session {
        let mut session = Session::default();
        session.camera_permission_resolved(PermissionState::Granted);
        assert!(session.begin_gallery_load());
        assert!(session.gallery_permission_resolved(PermissionState::Granted));
        session.gallery_loaded(Ok(assets()));
        session
    }

    #[test]
    fn grid_fills_the_width() {
        let grid = GridLayout::from_width(420.0);
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.margin, 20.0);
        let total = grid.columns as f32 * (grid.cell + 2.0 * grid.margin);
        assert_eq!(total, 420.0);
    }

    #[test]
    fn grid_keeps_first_window_width() {
        let mut slot = None;
        let first = GridLayout::settle(&mut slot, 480.0);
        assert_eq!(first.margin, 30.0);
        let total = first.columns as f32 * (first.cell + 2.0 * first.margin);
        assert_eq!(total, 480.0);

        let later = GridLayout::settle(&mut slot, 900.0);
        assert_eq!(later, first);
        assert_eq!(slot, Some(first));
    }

    #[test]
    fn grid_margin_never_negative() {
        assert_eq!(GridLayout::from_width(200.0).margin, 0.0);
    }

    #[test]
    fn grid_rows_chunk_by_three() {
        let grid = GridLayout::from_width(420.0);
        let rows: Vec<_> = grid.rows(7).collect();
        assert_eq!(rows, vec![0..3, 3..6, 6..7]);
    }

    #[test]
    fn load_replaces_list_and_shows_grid() {
        let session = loaded();
        assert_eq!(session.assets(), assets().as_slice());
        assert!(session.gallery_visible());
        assert!(!session.capture_button_visible());
    }

    #[test]
    fn second_load_hides_grid_with_fresh_list() {
        let mut session = loaded();
        session.begin_gallery_load();
        session.gallery_permission_resolved(PermissionState::Granted);
        session.gallery_loaded(Ok(vec![Asset::new("c", "u3")]));

        assert!(!session.gallery_visible());
        assert_eq!(session.assets(), &[Asset::new("c", "u3")]);
    }

    #[test]
    fn denied_load_changes_nothing() {
        let mut session = loaded();
        session.begin_gallery_load();
        assert!(!session.gallery_permission_resolved(PermissionState::Denied));

        assert!(session.gallery_visible());
        assert_eq!(session.assets(), assets().as_slice());
        assert_eq!(session.notice(), Some(&Notice::MediaAccessNeededToBrowse));
        assert!(!session.gallery_loading());
    }

    #[test]
    fn failed_listing_keeps_previous_state() {
        let mut session = loaded();
        session.begin_gallery_load();
        session.gallery_permission_resolved(PermissionState::Granted);
        session.gallery_loaded(Err(LibraryError::Io("gone".to_string())));

        assert!(session.gallery_visible());
        assert_eq!(session.assets().len(), 2);
        assert_eq!(
            session.notice(),
            Some(&Notice::GalleryLoadFailed("gone".to_string()))
        );
    }

    #[test]
    fn selecting_asset_opens_review_and_closes_grid() {
        let mut session = loaded();
        assert!(session.select_asset(1));

        assert!(session.review_visible());
        assert_eq!(session.active_image().unwrap().as_str(), "u2");
        assert!(!session.gallery_visible());
    }

    #[test]
    fn selecting_out_of_range_does_nothing() {
        let mut session = loaded();
        assert!(!session.select_asset(5));
        assert!(!session.review_visible());
        assert!(session.gallery_visible());
    }

    #[test]
    fn disabled_gallery_never_loads() {
        let mut session = Session::new(false);
        assert!(!session.gallery_enabled());
        assert!(!session.begin_gallery_load());
        assert!(session.assets().is_empty());
        assert!(session.capture_button_visible());
    }

    #[test]
    fn disabling_gallery_hides_grid() {
        let mut session = loaded();
        session.set_gallery_enabled(false);
        assert!(!session.gallery_visible());
        assert!(session.capture_button_visible());

        session.set_gallery_enabled(true);
        assert!(session.assets().is_empty());
    }
}
