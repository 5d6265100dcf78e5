// src/render/photo.rs

//! Photo preparation: grayscale, aspect-preserving fit, 1-bit dithering.

use image::imageops::{self, BiLevel, FilterType};
use image::{DynamicImage, GrayImage};

/// Largest size with the source aspect ratio that fits the box.
///
/// Width is filled first; if that makes the image too tall, height is
/// filled instead.
pub fn fit_within(width: u32, height: u32, box_width: u32, box_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (box_width.max(1), box_height.max(1));
    }
    let aspect = height as f64 / width as f64;
    let target_height = (box_width as f64 * aspect) as u32;
    if target_height <= box_height {
        (box_width.max(1), target_height.max(1))
    } else {
        let target_width = (box_height as f64 / aspect) as u32;
        (target_width.max(1), box_height.max(1))
    }
}

/// Grayscale, resize into the box and Floyd–Steinberg dither to pure black/white.
pub fn prepare(photo: &DynamicImage, box_width: u32, box_height: u32) -> GrayImage {
    let gray = photo.to_luma8();
    let (width, height) = fit_within(gray.width(), gray.height(), box_width, box_height);
    let mut resized = imageops::resize(&gray, width, height, FilterType::Lanczos3);
    imageops::dither(&mut resized, &BiLevel);
    resized
}
