// src/render/qr.rs

//! QR code rasterization.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, imageops};
use qrcode::{EcLevel, QrCode};

use crate::error::{AppError, Result};

/// Quiet-zone width in modules for the on-canvas code.
const CANVAS_BORDER: u32 = 2;

/// Raster `data` as a `size`×`size` QR code, centered in that box.
///
/// Modules are scaled by a whole number of pixels so the code stays sharp.
/// Fails when the code needs more than one pixel per module plus its quiet
/// zone to fit in `size`.
pub fn qr_image(data: &str, size: u32) -> Result<GrayImage> {
    let code = encode(data)?;
    let modules = code.width() as u32 + 2 * CANVAS_BORDER;
    if modules > size {
        return Err(AppError::render(format!(
            "QR code needs {modules} px but the box is {size} px"
        )));
    }
    let scale = size / modules;
    let code_image = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(scale, scale)
        .build();

    let mut image = GrayImage::from_pixel(size, size, Luma([255]));
    let offset = i64::from((size - code_image.width()) / 2);
    imageops::overlay(&mut image, &code_image, offset, offset);
    Ok(image)
}

/// Stand-alone PNG of the code (10 px modules, 4-module quiet zone).
pub fn qr_png(data: &str) -> Result<Vec<u8>> {
    const MODULE_PX: u32 = 10;

    let image = encode(data)?
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(MODULE_PX, MODULE_PX)
        .build();

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

fn encode(data: &str) -> Result<QrCode> {
    QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::render(format!("QR encoding failed: {e}")))
}
