// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use shutter::constants::{gallery, timing, ui};
use shutter::session::GridLayout;

#[test]
fn test_grid_fills_initial_window_width() {
    let grid = GridLayout::from_width(ui::WINDOW_WIDTH);
    let used = gallery::COLUMNS as f32 * (grid.cell + 2.0 * grid.margin);
    assert!((used - ui::WINDOW_WIDTH).abs() < 0.01);
}

#[test]
fn test_grid_margin_never_negative() {
    let grid = GridLayout::from_width(100.0);
    assert_eq!(grid.margin, 0.0);
}

#[test]
fn test_grid_rows_chunk_by_three() {
    let grid = GridLayout::from_width(ui::WINDOW_WIDTH);
    let rows: Vec<_> = grid.rows(7).collect();
    assert_eq!(rows, vec![0..3, 3..6, 6..7]);
}

#[test]
fn test_minimum_window_fits_grid() {
    assert!(ui::MIN_WIDTH >= gallery::COLUMNS as f32 * gallery::THUMBNAIL_SIZE);
    assert!(ui::MIN_WIDTH <= ui::WINDOW_WIDTH);
    assert!(ui::MIN_HEIGHT <= ui::WINDOW_HEIGHT);
}

#[test]
fn test_capture_timing_is_consistent() {
    assert!(timing::WARMUP < timing::CAPTURE_TIMEOUT);
    assert!(timing::FLASH_SETTLE < timing::CAPTURE_TIMEOUT);
    assert!(timing::FRAME_POLL < timing::FRAME_MAX_AGE);
}
