//! Resampling primitives backed by `image::imageops::resize`.
//!
//! Buffers are handed to the resizer as `f32` pixels so no quantization happens between
//! passes. Results are clamped back into `[0, 1]` because cubic kernels overshoot.

use std::{fmt, str::FromStr};

use image::{ImageBuffer as RasterBuffer, Luma, Pixel, Rgb, Rgba, imageops};

use crate::foundation::{
    core::{Channels, Dimensions, ImageBuffer, Mask, sample_count},
    error::{KlinterError, KlinterResult},
};

/// Interpolation kernel used when resizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resample {
    Nearest,
    Bilinear,
    /// Catmull-Rom cubic.
    #[default]
    Bicubic,
    Lanczos3,
}

impl Resample {
    pub const ALL: [Resample; 4] = [
        Resample::Nearest,
        Resample::Bilinear,
        Resample::Bicubic,
        Resample::Lanczos3,
    ];

    pub fn filter_type(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Bilinear => imageops::FilterType::Triangle,
            Self::Bicubic => imageops::FilterType::CatmullRom,
            Self::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos3 => "lanczos",
        }
    }
}

impl FromStr for Resample {
    type Err = KlinterError;

    fn from_str(s: &str) -> KlinterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "nearest-exact" => Ok(Self::Nearest),
            "bilinear" | "triangle" => Ok(Self::Bilinear),
            "bicubic" | "cubic" | "catmull-rom" => Ok(Self::Bicubic),
            "lanczos" | "lanczos3" => Ok(Self::Lanczos3),
            "area" => Err(KlinterError::invalid_parameter(
                "area resampling is not supported; use bilinear or bicubic",
            )),
            other => Err(KlinterError::invalid_parameter(format!(
                "unknown resample method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Resample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `round(width * factor) x round(height * factor)`.
///
/// Fails when either side is not finite or does not fit a `u32`.
pub fn scale_dims(dims: Dimensions, factor: f64) -> KlinterResult<Dimensions> {
    Ok(Dimensions::new(
        scale_len(dims.width, factor)?,
        scale_len(dims.height, factor)?,
    ))
}

pub(crate) fn scale_len(len: u32, factor: f64) -> KlinterResult<u32> {
    let scaled = (f64::from(len) * factor).round();
    if !scaled.is_finite() || scaled < 0.0 || scaled > f64::from(u32::MAX) {
        return Err(KlinterError::invalid_parameter(format!(
            "scaling {len}px by {factor} leaves the pixel range"
        )));
    }
    Ok(scaled as u32)
}

/// Resize `img` to `width x height` with `filter`.
pub fn resize_image(
    img: &ImageBuffer,
    width: u32,
    height: u32,
    filter: Resample,
) -> KlinterResult<ImageBuffer> {
    check_resize(img.dimensions(), width, height, img.channels().count())?;
    let src = img.as_slice().to_vec();
    let (w, h) = (img.width(), img.height());
    let mut out = match img.channels() {
        Channels::Rgb => resize_raw::<Rgb<f32>>(w, h, src, width, height, filter)?,
        Channels::Rgba => resize_raw::<Rgba<f32>>(w, h, src, width, height, filter)?,
    };
    clamp_unit(&mut out);
    ImageBuffer::from_raw(width, height, img.channels(), out)
}

/// Resize `mask` to `width x height` with `filter`, clamped into `[0, 1]`.
pub fn resize_mask(mask: &Mask, width: u32, height: u32, filter: Resample) -> KlinterResult<Mask> {
    check_resize(mask.dimensions(), width, height, 1)?;
    let mut out = resize_raw::<Luma<f32>>(
        mask.width(),
        mask.height(),
        mask.as_slice().to_vec(),
        width,
        height,
        filter,
    )?;
    clamp_unit(&mut out);
    Mask::from_raw(width, height, out)
}

/// Cut a centered `width x height` window out of `img`.
///
/// When the size difference is odd the extra pixel is left on the right/bottom.
pub fn center_crop(img: &ImageBuffer, width: u32, height: u32) -> KlinterResult<ImageBuffer> {
    if width == 0 || height == 0 {
        return Err(KlinterError::invalid_parameter("crop size must be non-zero"));
    }
    if width > img.width() || height > img.height() {
        return Err(KlinterError::invalid_parameter(format!(
            "crop {width}x{height} exceeds source {}",
            img.dimensions()
        )));
    }

    let x0 = ((img.width() - width) / 2) as usize;
    let y0 = ((img.height() - height) / 2) as usize;
    let c = img.channels().count();
    let row_len = width as usize * c;

    let mut out = Vec::with_capacity(row_len * height as usize);
    for y in y0..y0 + height as usize {
        let row = img.row(y);
        out.extend_from_slice(&row[x0 * c..x0 * c + row_len]);
    }
    ImageBuffer::from_raw(width, height, img.channels(), out)
}

fn check_resize(src: Dimensions, width: u32, height: u32, channels: usize) -> KlinterResult<()> {
    if src.is_empty() {
        return Err(KlinterError::invalid_parameter(
            "cannot resize an empty buffer",
        ));
    }
    if width == 0 || height == 0 {
        return Err(KlinterError::invalid_parameter(format!(
            "resize target must be non-zero, got {width}x{height}"
        )));
    }
    sample_count(width, height, channels)?;
    Ok(())
}

fn resize_raw<P>(
    width: u32,
    height: u32,
    data: Vec<f32>,
    new_width: u32,
    new_height: u32,
    filter: Resample,
) -> KlinterResult<Vec<f32>>
where
    P: Pixel<Subpixel = f32> + 'static,
{
    let src = RasterBuffer::<P, Vec<f32>>::from_raw(width, height, data).ok_or_else(|| {
        KlinterError::invalid_parameter("buffer length does not match its dimensions")
    })?;
    Ok(imageops::resize(&src, new_width, new_height, filter.filter_type()).into_raw())
}

fn clamp_unit(samples: &mut [f32]) {
    for v in samples {
        *v = v.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resample.rs"]
mod tests;
