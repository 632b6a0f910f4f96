// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use crate::session::CameraFacing;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// One RGBA preview frame
#[derive(Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA rows (`width * 4` bytes per row)
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl Frame {
    /// Solid-colour frame, used where no camera is available
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data: Arc::from(data),
            captured_at: Instant::now(),
        }
    }

    /// RGBA pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 255];
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(offset..offset + 4) {
            Some(px) => [px[0], px[1], px[2], px[3]],
            None => [0, 0, 0, 255],
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Receiver side of a preview feed
pub type FrameReceiver = futures::channel::mpsc::Receiver<Frame>;

/// Sender side of a preview feed
pub type FrameSender = futures::channel::mpsc::Sender<Frame>;

/// A V4L2 video capture node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Card name reported by the driver
    pub name: String,
    /// Device node, e.g. `/dev/video0`
    pub path: PathBuf,
    /// Facing derived from the card name, if it says so
    pub location: Option<CameraFacing>,
}

impl std::fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_frame_has_uniform_pixels() {
        let frame = Frame::solid(4, 2, [10, 20, 30, 255]);
        assert_eq!(frame.data.len(), 32);
        assert_eq!(frame.pixel(3, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn out_of_bounds_pixel_is_black() {
        let frame = Frame::solid(2, 2, [255, 255, 255, 255]);
        assert_eq!(frame.pixel(5, 5), [0, 0, 0, 255]);
        assert_eq!(frame.pixel(2, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn pixel_offset_on_huge_frame_does_not_wrap() {
        // Dimensions whose byte offset exceeds u32
        let frame = Frame {
            width: 70_000,
            height: 70_000,
            data: Arc::from(vec![0u8; 16]),
            captured_at: Instant::now(),
        };
        assert_eq!(frame.pixel(69_999, 69_999), [0, 0, 0, 255]);
    }
}
