//! Outpaint padding: center a source image on a larger mid-gray canvas and build a mask
//! that marks the original region with a feathered border.
//!
//! Mask polarity is `1.0` = original content, `0.0` = synthetic padding. The border uses a
//! quadratic falloff `(d / feather)^2`, where `d` is the distance in pixels to the nearest
//! edge of the original region. Corners use the minimum of the two edge distances, so
//! falloffs never add up.

use crate::{
    foundation::{
        core::{Dimensions, ImageBuffer, Mask, ZoomFactor},
        error::{KlinterError, KlinterResult},
    },
    render::resample::{Resample, resize_image, resize_mask, scale_len},
};

/// Placeholder value written into every channel of the padding area.
pub const PAD_FILL: f32 = 0.5;

/// Result of [`pad`].
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedImage {
    /// Enlarged canvas with the source copied at (`offset_y`, `offset_x`).
    pub canvas: ImageBuffer,
    /// Opacity mask, same width/height as `canvas`.
    pub mask: Mask,
    pub offset_x: u32,
    pub offset_y: u32,
    /// Size of the source image.
    pub source: Dimensions,
    /// Feather width actually applied after clamping.
    pub feather: u32,
}

/// All four outputs of an outpaint padding pass.
#[derive(Clone, Debug, PartialEq)]
pub struct OutpaintOutputs {
    pub padded: PaddedImage,
    /// Padded canvas resampled down to the source size.
    pub zoomed_out_image: ImageBuffer,
    /// Padded mask resampled down to the source size.
    pub zoomed_out_mask: Mask,
}

/// Quadratic feather law: `1.0` at or beyond `feather`, `(d / feather)^2` inside the band.
///
/// A zero feather disables the band entirely.
pub fn feather_opacity(distance: u32, feather: u32) -> f32 {
    if feather == 0 || distance >= feather {
        return 1.0;
    }
    let r = distance as f32 / feather as f32;
    r * r
}

/// Largest feather that keeps opposite bands from overlapping: `floor(min(h, w) / 2) - 1`.
pub fn clamp_feather(feather: u32, source: Dimensions) -> u32 {
    let limit = (source.width.min(source.height) / 2).saturating_sub(1);
    feather.min(limit)
}

/// Pad `image` onto a canvas `zoom` times larger and compute its feathered mask.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn pad(image: &ImageBuffer, zoom: ZoomFactor, feather: u32) -> KlinterResult<PaddedImage> {
    if image.is_empty() {
        return Err(KlinterError::invalid_parameter(format!(
            "cannot pad an empty image ({})",
            image.dimensions()
        )));
    }

    let source = image.dimensions();
    let (w, h) = (source.width, source.height);
    let new_w = scale_len(w, zoom.get())?;
    let new_h = scale_len(h, zoom.get())?;
    if new_w < w || new_h < h {
        return Err(KlinterError::invalid_parameter(format!(
            "zoom {zoom} shrinks {source} to {new_w}x{new_h}"
        )));
    }
    let offset_x = (new_w - w) / 2;
    let offset_y = (new_h - h) / 2;
    let feather = clamp_feather(feather, source);

    tracing::debug!(new_w, new_h, offset_x, offset_y, feather, "padding geometry");

    let mut canvas = ImageBuffer::filled(new_w, new_h, image.channels(), PAD_FILL)?;
    let c = image.channels().count();
    let (x0, x1) = (offset_x as usize * c, (offset_x + w) as usize * c);
    for y in 0..h as usize {
        canvas.row_mut(y + offset_y as usize)[x0..x1].copy_from_slice(image.row(y));
    }

    let mut mask = Mask::filled(new_w, new_h, 0.0)?;
    let opacity = mask.as_mut_slice();
    for i in 0..h {
        let dy = i.min(h - 1 - i);
        let row = (i + offset_y) as usize * new_w as usize;
        for j in 0..w {
            let d = dy.min(j).min(w - 1 - j);
            opacity[row + (j + offset_x) as usize] = feather_opacity(d, feather);
        }
    }

    Ok(PaddedImage {
        canvas,
        mask,
        offset_x,
        offset_y,
        source,
        feather,
    })
}

/// [`pad`] for callers holding an unchecked zoom value.
pub fn pad_raw(image: &ImageBuffer, zoom: f64, feather: u32) -> KlinterResult<PaddedImage> {
    pad(image, ZoomFactor::new(zoom)?, feather)
}

/// Pad every image of a batch, stopping at the first failure.
pub fn pad_batch(
    images: &[ImageBuffer],
    zoom: ZoomFactor,
    feather: u32,
) -> KlinterResult<Vec<PaddedImage>> {
    images.iter().map(|img| pad(img, zoom, feather)).collect()
}

/// Resample a padded canvas and mask back to `original_h x original_w` with bicubic
/// interpolation ("zoomed out" output).
pub fn shrink_to_original(
    canvas: &ImageBuffer,
    mask: &Mask,
    original_h: u32,
    original_w: u32,
) -> KlinterResult<(ImageBuffer, Mask)> {
    shrink_to_original_with(canvas, mask, original_h, original_w, Resample::Bicubic)
}

/// [`shrink_to_original`] with an explicit kernel.
pub fn shrink_to_original_with(
    canvas: &ImageBuffer,
    mask: &Mask,
    original_h: u32,
    original_w: u32,
    filter: Resample,
) -> KlinterResult<(ImageBuffer, Mask)> {
    if canvas.dimensions() != mask.dimensions() {
        return Err(KlinterError::invalid_parameter(format!(
            "canvas {} and mask {} differ in size",
            canvas.dimensions(),
            mask.dimensions()
        )));
    }
    let image = resize_image(canvas, original_w, original_h, filter)?;
    let mask = resize_mask(mask, original_w, original_h, filter)?;
    Ok((image, mask))
}

/// Pad, then also produce the zoomed-out image and mask at the source size.
pub fn outpaint(
    image: &ImageBuffer,
    zoom: ZoomFactor,
    feather: u32,
    filter: Resample,
) -> KlinterResult<OutpaintOutputs> {
    let padded = pad(image, zoom, feather)?;
    let (zoomed_out_image, zoomed_out_mask) = shrink_to_original_with(
        &padded.canvas,
        &padded.mask,
        image.height(),
        image.width(),
        filter,
    )?;
    Ok(OutpaintOutputs {
        padded,
        zoomed_out_image,
        zoomed_out_mask,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/padding.rs"]
mod tests;
