// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer pipeline producing RGBA frames from a V4L2 camera

use super::types::{CameraDevice, Frame, FrameSender};
use crate::constants::{pipeline, timing};
use crate::errors::CaptureError;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Most recent frame of whichever camera is streaming, tagged with its node
pub type LatestFrame = Arc<Mutex<Option<(PathBuf, Frame)>>>;

/// Build the launch description for `device`
pub fn launch_description(device: &CameraDevice) -> String {
    format!(
        "v4l2src device={} ! videoconvert ! video/x-raw,format=RGBA ! appsink name=sink",
        device.path.display()
    )
}

/// Copy the visible part of each row, dropping stride padding
fn pack_rows(data: &[u8], width: u32, height: u32, stride: i32) -> Vec<u8> {
    let row_len = width as usize * 4;
    // Bottom-up layouts report a negative stride; rows are never shorter than the pixels
    let stride = (stride.unsigned_abs() as usize).max(row_len);
    if row_len == 0 {
        return Vec::new();
    }
    if stride == row_len {
        return data.iter().take(row_len * height as usize).copied().collect();
    }
    let mut packed = Vec::with_capacity(row_len * height as usize);
    for row in data.chunks(stride).take(height as usize) {
        packed.extend_from_slice(&row[..row_len.min(row.len())]);
    }
    packed
}

/// A running camera pipeline
///
/// Every frame is stored as the latest frame and, when a preview sender is
/// attached, pushed to it without blocking. Dropping the pipeline stops it
/// and releases the device.
pub struct FramePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    device: PathBuf,
}

impl FramePipeline {
    pub fn start(
        device: &CameraDevice,
        sender: Option<FrameSender>,
        latest: LatestFrame,
    ) -> Result<Self, CaptureError> {
        gstreamer::init()?;

        let description = launch_description(device);
        info!(device = %device, description, "Creating camera pipeline");

        let pipeline = gstreamer::parse::launch(&description)?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| CaptureError::Pipeline("Not a pipeline".to_string()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CaptureError::Pipeline("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| CaptureError::Pipeline("Failed to cast appsink".to_string()))?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let node = device.path.clone();
        let counter = AtomicU64::new(0);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let info = VideoInfo::from_caps(caps).map_err(|e| {
                        error!(error = ?e, "Failed to get video info");
                        gstreamer::FlowError::Error
                    })?;
                    let map = buffer.map_readable().map_err(|_| gstreamer::FlowError::Error)?;

                    let stride = info.stride()[0];
                    let data = pack_rows(map.as_slice(), info.width(), info.height(), stride);
                    let frame = Frame {
                        width: info.width(),
                        height: info.height(),
                        data: Arc::from(data),
                        captured_at: Instant::now(),
                    };

                    if frame_num % pipeline::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            "Frame received"
                        );
                    }

                    if let Some(sender) = sender.as_ref() {
                        let mut sender = sender.clone();
                        if let Err(e) = sender.try_send(frame.clone())
                            && e.is_disconnected()
                        {
                            debug!("Preview receiver gone");
                        }
                    }
                    if let Ok(mut slot) = latest.lock() {
                        *slot = Some((node.clone(), frame));
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        let running = Self {
            pipeline,
            appsink,
            device: device.path.clone(),
        };
        running.play()?;
        Ok(running)
    }

    /// Set the pipeline playing and surface the first bus error, if any
    fn play(&self) -> Result<(), CaptureError> {
        self.pipeline.set_state(gstreamer::State::Playing)?;

        let (result, state, pending) = self.pipeline.state(gstreamer::ClockTime::from_mseconds(
            timing::STATE_CHANGE_TIMEOUT_MS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");

        if let Some(bus) = self.pipeline.bus()
            && let Some(msg) = bus.pop_filtered(&[gstreamer::MessageType::Error])
            && let gstreamer::MessageView::Error(err) = msg.view()
        {
            let error = err.error();
            warn!(device = %self.device.display(), error = %error, "Pipeline failed to start");
            if error.matches(gstreamer::ResourceError::Busy) {
                return Err(CaptureError::DeviceBusy);
            }
            return Err(CaptureError::Pipeline(error.to_string()));
        }

        if result.is_err() {
            return Err(CaptureError::Pipeline(format!(
                "{} did not start",
                self.device.display()
            )));
        }
        Ok(())
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        debug!(device = %self.device.display(), "Stopping camera pipeline");
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
    }
}
