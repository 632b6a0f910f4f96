// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based camera
//!
//! Renders the preview and the image under review to the terminal using
//! Unicode half-block characters for improved vertical resolution. The same
//! [`Controller`] as the command line drives the session, so permissions,
//! review, confirmation and the gallery behave as in the window.

use crate::backends::memory::{MemoryLibrary, MemoryPermissions, MemoryPlatform};
use crate::backends::{Frame, FrameReceiver, Platform, PreviewGuard};
use crate::config::Config;
use crate::controller::Controller;
use crate::fl;
use crate::i18n::notice_text;
use crate::session::{Asset, Gate, ImageHandle, ReviewStage};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Largest still decoded for review; the terminal cannot show more
const REVIEW_DECODE_SIZE: u32 = 320;

/// Run the terminal camera
///
/// `demo` swaps the desktop services for in-memory ones so the screen can be
/// tried without a camera.
pub fn run(demo: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let platform = if demo {
        demo_platform()
    } else {
        gstreamer::init()?;
        Platform::desktop(&config)
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let mut controller = Controller::new(platform, config.gallery_enabled);
    let gate = runtime.block_on(controller.start());
    info!(?gate, "Permissions resolved");

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &runtime, &mut controller);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn demo_platform() -> Platform {
    let library = MemoryLibrary::with_assets(vec![
        Asset::new("demo-2", "img://demo-2"),
        Asset::new("demo-1", "img://demo-1"),
    ]);
    MemoryPlatform::new(MemoryPermissions::granted(), library).platform()
}

/// Running preview feed; dropping it stops the camera
struct Preview {
    _guard: PreviewGuard,
    receiver: FrameReceiver,
}

impl Preview {
    fn start(controller: &Controller) -> Result<Self, Box<dyn std::error::Error>> {
        let facing = controller.session().facing();
        let (sender, receiver) =
            futures::channel::mpsc::channel(crate::constants::pipeline::FRAME_CHANNEL_CAPACITY);
        let guard = controller.platform().camera.start_preview(facing, sender)?;
        info!(%facing, "Preview started");
        Ok(Self {
            _guard: guard,
            receiver,
        })
    }

    fn try_get_frame(&mut self) -> Option<Frame> {
        // Non-blocking receive
        self.receiver.try_recv().ok()
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &tokio::runtime::Runtime,
    controller: &mut Controller,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut preview = match controller.session().gate() {
        Gate::Open => Some(Preview::start(controller)?),
        Gate::Pending | Gate::Denied => None,
    };
    let mut frame_widget = FrameWidget::new();
    let mut review = ReviewStill::default();

    loop {
        // Drain all available frames to get the latest
        if let Some(feed) = preview.as_mut() {
            while let Some(frame) = feed.try_get_frame() {
                controller.attach_camera();
                frame_widget.update_frame(frame);
            }
        }
        review.sync(controller.session().active_image());

        let status_message = status_line(controller);

        // Draw
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let main_area = Rect {
                height: area.height.saturating_sub(1),
                ..area
            };
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let session = controller.session();
            if session.gate() == Gate::Denied {
                f.render_widget(
                    CenteredText {
                        lines: &[fl!("camera-access-denied"), fl!("camera-access-denied-hint")],
                    },
                    main_area,
                );
            } else if session.review_visible() {
                f.render_widget(&review.widget, main_area);
            } else if session.gallery_visible() {
                let (camera_area, list_area) = split_vertical(main_area);
                f.render_widget(&frame_widget, camera_area);
                f.render_widget(
                    GalleryList {
                        assets: session.assets(),
                    },
                    list_area,
                );
            } else {
                f.render_widget(&frame_widget, main_area);
            }

            f.render_widget(
                StatusBar {
                    message: &status_message,
                },
                status_area,
            );
        })?;

        // Handle input with timeout for frame updates
        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        // Ctrl+C to quit
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }

        // A notice takes every key until it is dismissed
        if controller.session().notice().is_some() {
            match key.code {
                KeyCode::Char('q') => break,
                _ => {
                    controller.dismiss_notice();
                }
            }
            continue;
        }

        let stage = controller.session().review().map(|r| r.stage());
        match (stage, key.code) {
            (_, KeyCode::Char('q')) => break,

            (Some(ReviewStage::Confirming), KeyCode::Char('y') | KeyCode::Enter) => {
                runtime.block_on(controller.confirm_save());
            }
            (Some(ReviewStage::Confirming), KeyCode::Char('n') | KeyCode::Esc) => {
                controller.cancel_save();
            }
            (Some(ReviewStage::Viewing), KeyCode::Char('s')) => {
                controller.save();
            }
            (Some(ReviewStage::Viewing), KeyCode::Char('d') | KeyCode::Esc) => {
                controller.discard();
            }
            (Some(_), _) => {}

            (None, KeyCode::Char(' ')) => {
                runtime.block_on(controller.take_picture());
            }
            (None, KeyCode::Char('f')) => {
                controller.flip();
                if controller.session().gate() == Gate::Open {
                    // Drop old pipeline first
                    drop(preview.take());
                    frame_widget = FrameWidget::new();
                    match Preview::start(controller) {
                        Ok(feed) => preview = Some(feed),
                        Err(e) => warn!(error = %e, "Failed to switch camera"),
                    }
                }
            }
            (None, KeyCode::Char('l')) => controller.toggle_flash(),
            (None, KeyCode::Char('g')) => runtime.block_on(controller.load_images()),
            (None, KeyCode::Char(digit @ '1'..='9')) if controller.session().gallery_visible() => {
                let index = digit as usize - '1' as usize;
                controller.select_asset(index);
            }
            _ => {}
        }
    }

    Ok(())
}

fn status_line(controller: &Controller) -> String {
    let session = controller.session();
    if let Some(notice) = session.notice() {
        let (title, body) = notice_text(notice);
        return format!("{title}: {body}  [{}]", fl!("dismiss"));
    }
    match session.review().map(|r| r.stage()) {
        Some(ReviewStage::Confirming) => {
            format!("{} {}", fl!("save-photo-question"), fl!("terminal-confirm-help"))
        }
        Some(ReviewStage::Saving) => fl!("saving-photo"),
        Some(ReviewStage::Viewing) => fl!("terminal-review-help"),
        None => {
            let flash = if session.flash().is_on() {
                fl!("flash-on")
            } else {
                fl!("flash-off")
            };
            let mut msg = format!("{} | {} | {}", session.facing(), flash, fl!("terminal-help"));
            if session.gallery_visible() {
                msg.push_str(" | ");
                msg.push_str(&fl!("terminal-gallery-help"));
            }
            msg
        }
    }
}

fn split_vertical(area: Rect) -> (Rect, Rect) {
    let top = area.height / 2;
    (
        Rect { height: top, ..area },
        Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        },
    )
}

/// Decoded copy of the image under review, reloaded when the handle changes
#[derive(Default)]
struct ReviewStill {
    handle: Option<ImageHandle>,
    widget: FrameWidget,
}

impl ReviewStill {
    fn sync(&mut self, active: Option<&ImageHandle>) {
        if self.handle.as_ref() == active {
            return;
        }
        self.handle = active.cloned();
        self.widget = FrameWidget::new();
        if let Some(frame) = active.and_then(load_still) {
            self.widget.update_frame(frame);
        }
    }
}

fn load_still(handle: &ImageHandle) -> Option<Frame> {
    let path = handle.to_path()?;
    let image = match image::open(&path) {
        Ok(image) => image,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to decode still for review");
            return None;
        }
    };
    let rgba = image
        .thumbnail(REVIEW_DECODE_SIZE, REVIEW_DECODE_SIZE)
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Some(Frame {
        width,
        height,
        data: Arc::from(rgba.into_raw()),
        captured_at: std::time::Instant::now(),
    })
}

/// Widget that renders a frame using half-block characters
#[derive(Default)]
struct FrameWidget {
    frame: Option<Frame>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: Frame) {
        self.frame = Some(frame);
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame.as_ref().filter(|f| f.width > 0 && f.height > 0) else {
            CenteredText {
                lines: &[fl!("waiting-for-camera")],
            }
            .render(area, buf);
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                let src_x = ((tx as f64 * x_scale) as u32).min(frame.width - 1);
                let src_y_top = ((ty as f64 * 2.0 * y_scale) as u32).min(frame.height - 1);
                let src_y_bottom =
                    (((ty as f64 * 2.0 + 1.0) * y_scale) as u32).min(frame.height - 1);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(rgb(frame.pixel(src_x, src_y_top)));
                    cell.set_bg(rgb(frame.pixel(src_x, src_y_bottom)));
                }
            }
        }
    }
}

fn rgb([r, g, b, _]: [u8; 4]) -> Color {
    Color::Rgb(r, g, b)
}

/// Lines centred in the area
struct CenteredText<'a> {
    lines: &'a [String],
}

impl Widget for CenteredText<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.lines.len() as u16;
        let top = area.y + area.height.saturating_sub(count) / 2;
        for (i, line) in self.lines.iter().enumerate() {
            let y = top + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let width = line.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_stringn(
                x,
                y,
                line,
                area.width as usize,
                ratatui::style::Style::default(),
            );
        }
    }
}

/// Numbered asset list standing in for the thumbnail grid
struct GalleryList<'a> {
    assets: &'a [Asset],
}

impl Widget for GalleryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.assets.is_empty() {
            CenteredText {
                lines: &[fl!("gallery-empty")],
            }
            .render(area, buf);
            return;
        }
        for (i, asset) in self.assets.iter().take(area.height as usize).enumerate() {
            let label = if i < 9 {
                format!("{}  {}", i + 1, asset.uri)
            } else {
                format!("   {}", asset.uri)
            };
            buf.set_stringn(
                area.x,
                area.y + i as u16,
                label,
                area.width as usize,
                ratatui::style::Style::default(),
            );
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_widget_fills_area_with_half_blocks() {
        let mut widget = FrameWidget::new();
        widget.update_frame(Frame::solid(8, 8, [255, 0, 0, 255]));

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn status_bar_truncates_to_width() {
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            message: "a long message",
        }
        .render(area, &mut buf);
        assert_eq!(buf[(4, 0)].symbol(), "n");
    }

    #[test]
    fn gallery_list_numbers_first_nine() {
        let assets: Vec<Asset> = (0..10)
            .map(|i| Asset::new(format!("a{i}"), format!("img://{i}")))
            .collect();
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        GalleryList { assets: &assets }.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "1");
        assert_eq!(buf[(0, 9)].symbol(), " ");
    }

    #[test]
    fn split_vertical_covers_area() {
        let (top, bottom) = split_vertical(Rect::new(0, 0, 10, 7));
        assert_eq!(top.height + bottom.height, 7);
        assert_eq!(bottom.y, top.height);
    }

    #[test]
    fn review_still_reloads_on_new_handle() {
        let mut still = ReviewStill::default();
        let handle = ImageHandle::new("img://1");
        still.sync(Some(&handle));
        assert_eq!(still.handle, Some(handle));
        // Non-file handles have nothing to decode
        assert!(still.widget.frame.is_none());
        still.sync(None);
        assert!(still.handle.is_none());
    }
}
