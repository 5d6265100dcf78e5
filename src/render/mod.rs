// src/render/mod.rs

//! Display renderer.
//!
//! Lays a [`PresentationRecord`] out on a fixed-size monochrome canvas in one
//! top-to-bottom pass:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ FBI MOST WANTED                              │
//! │ Total Wanted: N                              │
//! │ NAME (wrapped)                   ┌────────┐  │
//! │ date / location                  │ photo  │  │
//! │ details (≤ 6 lines)              │        │  │
//! │ REWARD / reward text             └────────┘  │
//! │                                    [QR]      │
//! │▓▓ Last Update: ... ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Rendering never fails from the caller's point of view: a layout error is
//! logged and replaced by an error canvas of the same size.

mod canvas;
pub mod photo;
pub mod qr;
pub mod text;

pub use canvas::{Canvas, Ink, TextRun};
pub use text::{Face, wrap_text};

use crate::error::{AppError, Result};
use crate::models::{DisplayConfig, DisplayMeta, PresentationRecord};
use crate::services::ImageSource;
use crate::utils::text::format_utc;

use self::text::sizes;

pub const HEADER_TITLE: &str = "FBI MOST WANTED";
pub const ERROR_TITLE: &str = "FBI Most Wanted - Error";
pub const PLACEHOLDER_LINES: [&str; 2] = ["Image", "Not Available"];
pub const READ_MORE: &str = "Want to read more? Scan the QR code below...";
pub const QR_CAPTION: &str = "Scan for details";
pub const MAX_DETAIL_LINES: usize = 6;

/// Pixel geometry of the display regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub margin: i32,
    pub photo_x: i32,
    pub photo_y: i32,
    pub photo_width: u32,
    pub photo_height: u32,
    pub placeholder_y: i32,
    pub placeholder_height: u32,
    pub qr_x: i32,
    pub qr_y: i32,
    pub qr_size: u32,
    pub status_y: i32,
    pub status_height: u32,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let margin = 20;
        let photo_width = 200;
        let qr_size = 100;
        let status_height = 30;
        Self {
            width,
            height,
            margin,
            photo_x: width as i32 - photo_width as i32 - margin,
            photo_y: 80,
            photo_width,
            photo_height: 240,
            placeholder_y: 90,
            placeholder_height: 200,
            qr_x: width as i32 - qr_size as i32 - margin,
            qr_y: height as i32 - qr_size as i32 - 70,
            qr_size,
            status_y: height as i32 - status_height as i32 - 10,
            status_height,
        }
    }

    /// Width of the left text column.
    pub fn text_width(&self) -> i32 {
        self.photo_x - 2 * self.margin
    }

    /// Lowest y a text line may start at without running into the status bar.
    fn text_floor(&self) -> i32 {
        self.status_y - 4
    }
}

/// Renders records onto a canvas and encodes it as a bitmap.
pub struct Renderer {
    layout: Layout,
    face: Face,
    images: Box<dyn ImageSource>,
}

impl Renderer {
    pub fn new(config: &DisplayConfig, images: Box<dyn ImageSource>) -> Result<Self> {
        Ok(Self {
            layout: Layout::new(config.width, config.height),
            face: Face::load(config.font_path.as_deref())?,
            images,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Render to BMP bytes. Always returns a bitmap of the configured size.
    pub fn render(&self, record: &PresentationRecord, meta: &DisplayMeta) -> Vec<u8> {
        self.render_canvas(record, meta).to_bmp()
    }

    /// Render to a canvas, substituting the error canvas on failure.
    pub fn render_canvas(&self, record: &PresentationRecord, meta: &DisplayMeta) -> Canvas {
        match self.compose(record, meta) {
            Ok(canvas) => canvas,
            Err(e) => {
                log::error!("Error generating display: {}", e);
                self.error_canvas(&e.to_string())
            }
        }
    }

    /// Stand-alone PNG of the QR code for `url`, independent of the canvas size.
    pub fn qr_png(&self, url: &str) -> Result<Vec<u8>> {
        qr::qr_png(url)
    }

    /// A canvas that only shows `message`.
    pub fn error_canvas(&self, message: &str) -> Canvas {
        let mut canvas = Canvas::new(self.layout.width, self.layout.height);
        canvas.draw_text(&self.face, sizes::TITLE, 20, 20, ERROR_TITLE, Ink::Black);

        let max_width = self.layout.width as f32 - 40.0;
        let mut y = 60;
        for line in self.wrap(message, sizes::BODY, max_width) {
            canvas.draw_text(&self.face, sizes::BODY, 20, y, &line, Ink::Black);
            y += 25;
        }
        canvas
    }

    fn compose(&self, record: &PresentationRecord, meta: &DisplayMeta) -> Result<Canvas> {
        let layout = &self.layout;
        if layout.text_width() <= 0 || layout.status_y <= layout.photo_y {
            return Err(AppError::render(format!(
                "display {}x{} is too small for the layout",
                layout.width, layout.height
            )));
        }

        let mut canvas = Canvas::new(layout.width, layout.height);
        self.draw_header(&mut canvas, meta);
        self.draw_text_column(&mut canvas, record);
        self.draw_photo(&mut canvas, record);
        if let Some(url) = &record.detail_url {
            self.draw_qr(&mut canvas, url);
        }
        self.draw_status_bar(&mut canvas, meta);
        Ok(canvas)
    }

    fn draw_header(&self, canvas: &mut Canvas, meta: &DisplayMeta) {
        let x = self.layout.margin;
        canvas.draw_text(&self.face, sizes::TITLE, x, 15, HEADER_TITLE, Ink::Black);
        canvas.draw_text(
            &self.face,
            sizes::SUBTITLE,
            x,
            50,
            &format!("Total Wanted: {}", meta.total),
            Ink::Black,
        );
    }

    fn draw_text_column(&self, canvas: &mut Canvas, record: &PresentationRecord) {
        let x = self.layout.margin;
        let max_width = self.layout.text_width() as f32;
        let mut y = self.layout.photo_y;

        for line in self.wrap(&record.title, sizes::NAME, max_width) {
            y = self.line(canvas, sizes::NAME, x, y, &line, 30);
        }

        y += 5;
        let split = record.date_and_location();
        if let Some((date, location)) = split {
            y = self.line(canvas, sizes::DATE, x, y, date, 20);
            y = self.line(canvas, sizes::DATE, x, y, location, 25);
        }

        // The reward block is laid out last but its room is reserved first.
        let reward_lines = if record.reward_text.is_empty() {
            Vec::new()
        } else {
            self.wrap(&record.reward_text, sizes::BODY, max_width)
        };
        let reward_height = match reward_lines.len() {
            0 => 0,
            n => 15 + 25 + 22 * (n as i32 - 1) + sizes::BODY.ceil() as i32,
        };

        let details = if !record.details.is_empty() {
            record.details.as_str()
        } else if split.is_none() {
            record.description.as_str()
        } else {
            ""
        };
        if !details.is_empty() {
            y += 15;
            let lines = self.wrap(details, sizes::BODY, max_width);
            let room = (self.layout.text_floor() - reward_height - y).max(0) / 22;
            let (shown, hint) = detail_budget(lines.len(), room as usize);
            for line in &lines[..shown] {
                y = self.line(canvas, sizes::BODY, x, y, line, 22);
            }
            if hint {
                y = self.line(canvas, sizes::BODY, x, y, READ_MORE, 22);
            }
        }

        if !reward_lines.is_empty() {
            y += 15;
            y = self.line(canvas, sizes::HEADING, x, y, "REWARD", 25);
            for line in &reward_lines {
                y = self.line(canvas, sizes::BODY, x, y, line, 22);
            }
        }
    }

    /// Draw one text line unless it would run into the status bar; returns the next y.
    fn line(&self, canvas: &mut Canvas, px: f32, x: i32, y: i32, text: &str, advance: i32) -> i32 {
        if y + px.ceil() as i32 > self.layout.text_floor() {
            log::warn!("Dropping line below the text area: {}", text);
        } else {
            canvas.draw_text(&self.face, px, x, y, text, Ink::Black);
        }
        y + advance
    }

    fn draw_photo(&self, canvas: &mut Canvas, record: &PresentationRecord) {
        let layout = &self.layout;
        let photo = record
            .image_url
            .as_deref()
            .and_then(|url| self.images.fetch(url));

        let Some(photo) = photo else {
            self.draw_placeholder(canvas);
            return;
        };

        let prepared = photo::prepare(&photo, layout.photo_width, layout.photo_height);
        // Right-align images narrower than the box.
        let x = layout.photo_x + (layout.photo_width - prepared.width()) as i32;
        canvas.paste(&prepared, x, layout.photo_y);
    }

    fn draw_placeholder(&self, canvas: &mut Canvas) {
        let layout = &self.layout;
        let (x, y) = (layout.photo_x, layout.placeholder_y);
        let (w, h) = (layout.photo_width, layout.placeholder_height);

        canvas.fill_rect(x, y, w, h, Ink::White);
        canvas.outline_rect(x, y, w, h, 2, Ink::Black);

        let mut line_y = y + h as i32 / 2 - 20;
        for line in PLACEHOLDER_LINES {
            let line_width = self.face.measure(sizes::BODY, line);
            let line_x = x + ((w as f32 - line_width) / 2.0) as i32;
            canvas.draw_text(&self.face, sizes::BODY, line_x, line_y, line, Ink::Black);
            line_y += 22;
        }
    }

    fn draw_qr(&self, canvas: &mut Canvas, url: &str) {
        let layout = &self.layout;
        let code = match qr::qr_image(url, layout.qr_size) {
            Ok(code) => code,
            Err(e) => {
                log::warn!("Skipping QR code: {}", e);
                return;
            }
        };
        canvas.paste(&code, layout.qr_x, layout.qr_y);

        let caption_width = self.face.measure(sizes::SMALL, QR_CAPTION);
        let text_x = layout.qr_x + ((layout.qr_size as f32 - caption_width) / 2.0) as i32;
        let text_y = layout.qr_y + code.height() as i32 + 5;
        let padding = 4;
        canvas.fill_rect(
            text_x - padding,
            text_y - padding,
            caption_width.ceil() as u32 + 2 * padding as u32,
            sizes::SMALL as u32 + 2 * padding as u32,
            Ink::Black,
        );
        canvas.draw_text(&self.face, sizes::SMALL, text_x, text_y, QR_CAPTION, Ink::White);
    }

    fn draw_status_bar(&self, canvas: &mut Canvas, meta: &DisplayMeta) {
        let layout = &self.layout;
        canvas.fill_rect(0, layout.status_y, layout.width, layout.status_height, Ink::Black);
        canvas.draw_text(
            &self.face,
            sizes::SMALL,
            10,
            layout.status_y + 5,
            &format!("Last Update: {}", format_utc(&meta.timestamp)),
            Ink::White,
        );
    }

    fn wrap(&self, text: &str, px: f32, max_width: f32) -> Vec<String> {
        wrap_text(text, max_width, |s| self.face.measure(px, s))
    }
}

/// Detail lines to draw out of `total`, given `room` lines of space, and
/// whether the read-more hint follows them. The hint takes one line of room.
fn detail_budget(total: usize, room: usize) -> (usize, bool) {
    let cap = room.min(MAX_DETAIL_LINES + 1);
    if total <= cap.min(MAX_DETAIL_LINES) {
        (total, false)
    } else {
        (cap.saturating_sub(1).min(MAX_DETAIL_LINES), cap > 0)
    }
}
