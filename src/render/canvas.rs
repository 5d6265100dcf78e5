// src/render/canvas.rs

//! Monochrome pixel buffer and its 1-bit BMP encoding.

use image::{GrayImage, Luma};
use rusttype::{Scale, point};

use super::text::Face;

/// Ink colour of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Black,
    White,
}

impl Ink {
    fn luma(self) -> Luma<u8> {
        match self {
            Ink::Black => Luma([0]),
            Ink::White => Luma([255]),
        }
    }
}

/// A piece of text drawn on the canvas, kept for logs and inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Fixed-size canvas whose pixels are always pure black or white.
pub struct Canvas {
    pixels: GrayImage,
    runs: Vec<TextRun>,
}

impl Canvas {
    /// BMP file header plus BITMAPINFOHEADER plus a two-entry palette.
    const BMP_HEADER_LEN: u32 = 14 + 40 + 8;

    /// A white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::from_pixel(width, height, Ink::White.luma()),
            runs: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether the pixel at (x, y) is black; out-of-bounds reads as white.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.pixels.get_pixel(x, y)[0] < 128
    }

    /// Text drawn so far, in drawing order.
    pub fn text_runs(&self) -> &[TextRun] {
        &self.runs
    }

    fn put(&mut self, x: i32, y: i32, ink: Ink) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.pixels.put_pixel(x as u32, y as u32, ink.luma());
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, ink: Ink) {
        for py in y..y + height as i32 {
            for px in x..x + width as i32 {
                self.put(px, py, ink);
            }
        }
    }

    /// Draw a rectangle outline `thickness` pixels wide.
    pub fn outline_rect(&mut self, x: i32, y: i32, width: u32, height: u32, thickness: u32, ink: Ink) {
        let t = thickness.min(width).min(height);
        self.fill_rect(x, y, width, t, ink);
        self.fill_rect(x, y + height as i32 - t as i32, width, t, ink);
        self.fill_rect(x, y, t, height, ink);
        self.fill_rect(x + width as i32 - t as i32, y, t, height, ink);
    }

    /// Copy a grayscale image in, thresholding at mid-gray.
    pub fn paste(&mut self, image: &GrayImage, x: i32, y: i32) {
        for (ix, iy, pixel) in image.enumerate_pixels() {
            let ink = if pixel[0] < 128 { Ink::Black } else { Ink::White };
            self.put(x + ix as i32, y + iy as i32, ink);
        }
    }

    /// Draw `text` with its line box's top-left corner at (x, y).
    pub fn draw_text(&mut self, face: &Face, px: f32, x: i32, y: i32, text: &str, ink: Ink) {
        let scale = Scale::uniform(px);
        let baseline = point(x as f32, y as f32 + face.ascent(px));

        for glyph in face.font().layout(text, scale, baseline) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                if coverage >= 0.5 {
                    self.put(bb.min.x + gx as i32, bb.min.y + gy as i32, ink);
                }
            });
        }

        self.runs.push(TextRun {
            x,
            y,
            text: text.to_string(),
        });
    }

    /// Encode as an uncompressed, bottom-up, 1 bit-per-pixel BMP.
    ///
    /// Palette index 0 is black and 1 is white; each row is padded to 4 bytes.
    pub fn to_bmp(&self) -> Vec<u8> {
        let (width, height) = (self.width(), self.height());
        let row_len = width.div_ceil(32) * 4;
        let image_len = row_len * height;
        let file_len = Self::BMP_HEADER_LEN + image_len;

        let mut out = Vec::with_capacity(file_len as usize);

        // BITMAPFILEHEADER
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&file_len.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&Self::BMP_HEADER_LEN.to_le_bytes());

        // BITMAPINFOHEADER
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&(width as i32).to_le_bytes());
        out.extend_from_slice(&(height as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&image_len.to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());

        // Palette (B, G, R, reserved)
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&[255, 255, 255, 0]);

        for y in (0..height).rev() {
            let mut row = vec![0u8; row_len as usize];
            for x in 0..width {
                if !self.is_black(x, y) {
                    row[(x / 8) as usize] |= 0x80 >> (x % 8);
                }
            }
            out.extend_from_slice(&row);
        }
        out
    }
}
