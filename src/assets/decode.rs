//! Image file I/O: decode into normalized float buffers, quantize back to 8-bit on save.

use std::path::Path;

use anyhow::Context as _;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::foundation::{
    core::{Channels, ImageBuffer, Mask},
    error::KlinterResult,
};

/// Decode an image file into a normalized buffer (RGBA if the file carries alpha).
pub fn load_image(path: impl AsRef<Path>) -> KlinterResult<ImageBuffer> {
    let path = path.as_ref();
    let dyn_img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    image_from_dynamic(&dyn_img)
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a normalized buffer.
pub fn decode_image(bytes: &[u8]) -> KlinterResult<ImageBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    image_from_dynamic(&dyn_img)
}

pub fn image_from_dynamic(img: &DynamicImage) -> KlinterResult<ImageBuffer> {
    let (width, height) = (img.width(), img.height());
    if img.color().has_alpha() {
        ImageBuffer::from_raw(width, height, Channels::Rgba, img.to_rgba32f().into_raw())
    } else {
        ImageBuffer::from_raw(width, height, Channels::Rgb, img.to_rgb32f().into_raw())
    }
}

/// Quantize to 8 bits per channel.
pub fn image_to_dynamic(img: &ImageBuffer) -> KlinterResult<DynamicImage> {
    let bytes: Vec<u8> = img.as_slice().iter().copied().map(quantize).collect();
    let (w, h) = (img.width(), img.height());
    let out = match img.channels() {
        Channels::Rgb => RgbImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgb8),
        Channels::Rgba => RgbaImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgba8),
    };
    Ok(out.context("image buffer length does not match its dimensions")?)
}

pub fn mask_to_gray(mask: &Mask) -> KlinterResult<GrayImage> {
    let bytes: Vec<u8> = mask.as_slice().iter().copied().map(quantize).collect();
    Ok(GrayImage::from_raw(mask.width(), mask.height(), bytes)
        .context("mask length does not match its dimensions")?)
}

/// Write `img` to `path`; the format follows the file extension.
pub fn save_image(img: &ImageBuffer, path: impl AsRef<Path>) -> KlinterResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    image_to_dynamic(img)?
        .save(path)
        .with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

/// Write `mask` as an 8-bit grayscale image.
pub fn save_mask(mask: &Mask, path: impl AsRef<Path>) -> KlinterResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    mask_to_gray(mask)?
        .save(path)
        .with_context(|| format!("write mask '{}'", path.display()))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> KlinterResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
