// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! ```text
//! v4l2src ─▶ videoconvert ─▶ RGBA ─▶ appsink ─┬─▶ preview channel
//!                                             └─▶ latest frame ─▶ still (JPEG)
//! ```
//!
//! A still is the next frame of the camera for the requested facing. While the
//! preview of that camera runs its frames are reused; otherwise a short-lived
//! pipeline is started for the shot.

pub mod devices;
pub mod pipeline;
pub mod types;

use super::{CaptureService, PreviewGuard};
use crate::config::Config;
use crate::constants::{output, timing};
use crate::errors::CaptureError;
use crate::flash::FlashLeds;
use crate::session::{CameraFacing, CaptureSettings, ImageHandle};
use async_trait::async_trait;
use pipeline::{FramePipeline, LatestFrame};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use types::{CameraDevice, Frame, FrameSender};

/// Camera backed by V4L2 devices through GStreamer
pub struct GstCamera {
    front_camera: Option<String>,
    back_camera: Option<String>,
    latest: LatestFrame,
    flash: FlashLeds,
    output_dir: PathBuf,
}

impl GstCamera {
    pub fn new(config: &Config) -> Self {
        let flash = FlashLeds::detect();
        if let Some(hint) = flash.permission_hint() {
            warn!("{}", hint);
        }
        let output_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(output::CAPTURE_CACHE_DIR_NAME);

        Self {
            front_camera: config.front_camera.clone(),
            back_camera: config.back_camera.clone(),
            latest: Arc::new(Mutex::new(None)),
            flash,
            output_dir,
        }
    }

    fn configured(&self, facing: CameraFacing) -> Option<&str> {
        match facing {
            CameraFacing::Front => self.front_camera.as_deref(),
            CameraFacing::Back => self.back_camera.as_deref(),
        }
    }

    /// Device currently serving `facing`, looked up off the async executor
    async fn device_for(&self, facing: CameraFacing) -> Result<CameraDevice, CaptureError> {
        let configured = self.configured(facing).map(str::to_owned);
        blocking(move || find_device(facing, configured.as_deref())).await?
    }

    /// Latest frame of `device` taken no earlier than `not_before`
    fn frame_since(&self, device: &Path, not_before: Instant) -> Option<Frame> {
        let slot = self.latest.lock().ok()?;
        slot.as_ref()
            .filter(|(node, frame)| node == device && frame.captured_at >= not_before)
            .map(|(_, frame)| frame.clone())
    }

    /// Whether `device` is streaming right now
    fn is_streaming(&self, device: &Path) -> bool {
        let now = Instant::now();
        let cutoff = now.checked_sub(timing::FRAME_MAX_AGE).unwrap_or(now);
        self.frame_since(device, cutoff).is_some()
    }

    async fn grab_frame(&self, device: &CameraDevice, flash: bool) -> Result<Frame, CaptureError> {
        let streaming = self.is_streaming(&device.path);
        let _oneshot = if streaming {
            debug!(device = %device, "Reusing preview frames for still");
            None
        } else {
            debug!(device = %device, "Starting pipeline for still");
            let device = device.clone();
            let latest = self.latest.clone();
            Some(blocking(move || FramePipeline::start(&device, None, latest)).await??)
        };

        let mut settle = if streaming { Duration::ZERO } else { timing::WARMUP };
        let _torch = if flash && !self.flash.is_empty() {
            settle = settle.max(timing::FLASH_SETTLE);
            Some(self.flash.torch())
        } else {
            None
        };

        let not_before = Instant::now() + settle;
        let deadline = not_before + timing::CAPTURE_TIMEOUT;
        loop {
            if let Some(frame) = self.frame_since(&device.path, not_before) {
                return Ok(frame);
            }
            if Instant::now() >= deadline {
                return Err(CaptureError::Timeout);
            }
            tokio::time::sleep(timing::FRAME_POLL).await;
        }
    }
}

/// Enumerate V4L2 nodes and pick the one for `facing`; blocks on device IO
fn find_device(
    facing: CameraFacing,
    configured: Option<&str>,
) -> Result<CameraDevice, CaptureError> {
    let devices = devices::enumerate();
    devices::select(&devices, facing, configured)
        .cloned()
        .ok_or(CaptureError::NoCamera)
}

/// Run blocking camera or filesystem work on the blocking pool
async fn blocking<T, F>(work: F) -> Result<T, CaptureError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CaptureError::Pipeline(format!("Camera task failed: {}", e)))
}

/// Encode an RGBA frame as JPEG at `path`
pub fn encode_jpeg(frame: &Frame, path: &Path) -> Result<(), CaptureError> {
    let rgb: Vec<u8> = frame
        .data
        .chunks_exact(4)
        .flat_map(|px| &px[0..3])
        .copied()
        .collect();
    let image = image::RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| CaptureError::Encode("Frame size does not match its data".to_string()))?;

    let mut buf = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, output::JPEG_QUALITY);
    encoder.encode_image(&image)?;
    std::fs::write(path, buf)?;
    Ok(())
}

#[async_trait]
impl CaptureService for GstCamera {
    async fn capture(&self, settings: CaptureSettings) -> Result<ImageHandle, CaptureError> {
        let started = Instant::now();
        let device = self.device_for(settings.facing).await?;
        let frame = self.grab_frame(&device, settings.flash.is_on()).await?;

        let output_dir = self.output_dir.clone();
        let path = output_dir.join(format!("capture_{}.jpg", uuid::Uuid::new_v4()));

        let (width, height) = (frame.width, frame.height);
        let target = path.clone();
        blocking(move || -> Result<(), CaptureError> {
            std::fs::create_dir_all(&output_dir)?;
            encode_jpeg(&frame, &target)
        })
        .await??;

        info!(
            device = %device,
            facing = %settings.facing,
            flash = settings.flash.is_on(),
            flash_leds = self.flash.leds().len(),
            width,
            height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            path = %path.display(),
            "Still captured"
        );
        Ok(ImageHandle::from_path(&path))
    }

    fn start_preview(
        &self,
        facing: CameraFacing,
        sender: FrameSender,
    ) -> Result<PreviewGuard, CaptureError> {
        let device = find_device(facing, self.configured(facing))?;
        info!(device = %device, %facing, "Starting preview");
        let running = FramePipeline::start(&device, Some(sender), self.latest.clone())?;
        Ok(Box::new(running))
    }
}
