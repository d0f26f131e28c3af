use std::{fmt, str::FromStr};

use crate::foundation::error::{KlinterError, KlinterResult};

/// Width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Build a dimension pair.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Channel layout of an [`ImageBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channels {
    /// Three interleaved channels.
    Rgb,
    /// Four interleaved channels, straight alpha last.
    Rgba,
}

impl Channels {
    /// Number of interleaved values per pixel.
    pub fn count(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Map an interleaved channel count back to a layout.
    pub fn from_count(count: usize) -> KlinterResult<Self> {
        match count {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            other => Err(KlinterError::invalid_parameter(format!(
                "unsupported channel count {other} (expected 3 or 4)"
            ))),
        }
    }
}

/// Normalized float image, row-major `height x width x channels`, values in `[0, 1]`.
///
/// Buffers are immutable once built: every transform in this crate allocates a new one.
/// Zero-sized buffers can be represented so that callers may marshal whatever they were
/// handed; the engines reject them.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<f32>,
}

impl ImageBuffer {
    /// Wrap an interleaved HWC buffer.
    ///
    /// Fails when `data.len()` does not equal `width * height * channels`.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: Channels,
        data: Vec<f32>,
    ) -> KlinterResult<Self> {
        let expected = sample_count(width, height, channels.count())?;
        if data.len() != expected {
            return Err(KlinterError::invalid_parameter(format!(
                "image buffer holds {} samples, expected {expected} for {width}x{height}x{}",
                data.len(),
                channels.count()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// A buffer with every sample set to `value`.
    ///
    /// Fails instead of aborting when the buffer cannot be allocated.
    pub fn filled(width: u32, height: u32, channels: Channels, value: f32) -> KlinterResult<Self> {
        let len = sample_count(width, height, channels.count())?;
        Ok(Self {
            width,
            height,
            channels,
            data: filled_samples(len, value)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels.count(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Same width, height and channel layout.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// Interleaved samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    /// Sample at row `y`, column `x`, channel `c`. Panics when out of bounds.
    pub fn get(&self, y: usize, x: usize, c: usize) -> f32 {
        self.data[self.index(y, x) + c]
    }

    /// All channels of the pixel at row `y`, column `x`. Panics when out of bounds.
    pub fn pixel(&self, y: usize, x: usize) -> &[f32] {
        let start = self.index(y, x);
        &self.data[start..start + self.channels.count()]
    }

    /// Interleaved samples of row `y`.
    pub fn row(&self, y: usize) -> &[f32] {
        let stride = self.width as usize * self.channels.count();
        &self.data[y * stride..(y + 1) * stride]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let stride = self.width as usize * self.channels.count();
        &mut self.data[y * stride..(y + 1) * stride]
    }

    fn index(&self, y: usize, x: usize) -> usize {
        (y * self.width as usize + x) * self.channels.count()
    }
}

/// Per-pixel opacity, row-major `height x width`, values in `[0, 1]`.
///
/// `1.0` marks original content, `0.0` marks synthetic padding.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Mask {
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> KlinterResult<Self> {
        let expected = sample_count(width, height, 1)?;
        if data.len() != expected {
            return Err(KlinterError::invalid_parameter(format!(
                "mask holds {} samples, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, value: f32) -> KlinterResult<Self> {
        let len = sample_count(width, height, 1)?;
        Ok(Self {
            width,
            height,
            data: filled_samples(len, value)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    /// Opacity at row `y`, column `x`. Panics when out of bounds.
    pub fn get(&self, y: usize, x: usize) -> f32 {
        self.data[y * self.width as usize + x]
    }

    /// Opposite polarity (`1.0` marks padding), for consumers that expect an inpaint mask.
    pub fn inverted(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| 1.0 - v).collect(),
        }
    }
}

/// Ratio of padded/zoomed linear size to source size. Always finite and `> 1.0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ZoomFactor(f64);

impl ZoomFactor {
    pub fn new(value: f64) -> KlinterResult<Self> {
        if !value.is_finite() || value <= 1.0 {
            return Err(KlinterError::invalid_parameter(format!(
                "zoom factor must be finite and > 1.0, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// `1.5x`.
impl Default for ZoomFactor {
    fn default() -> Self {
        Self(1.5)
    }
}

impl TryFrom<f64> for ZoomFactor {
    type Error = KlinterError;

    fn try_from(value: f64) -> KlinterResult<Self> {
        Self::new(value)
    }
}

impl From<ZoomFactor> for f64 {
    fn from(z: ZoomFactor) -> Self {
        z.0
    }
}

/// Accepts plain numbers and preset labels such as `1.25x` or `2.0X`.
impl FromStr for ZoomFactor {
    type Err = KlinterError;

    fn from_str(s: &str) -> KlinterResult<Self> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_suffix('x')
            .or_else(|| trimmed.strip_suffix('X'))
            .unwrap_or(trimmed)
            .trim();
        let value: f64 = number.parse().map_err(|_| {
            KlinterError::invalid_parameter(format!("cannot parse zoom factor '{s}'"))
        })?;
        Self::new(value)
    }
}

impl fmt::Display for ZoomFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

pub(crate) fn sample_count(width: u32, height: u32, channels: usize) -> KlinterResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| {
            KlinterError::invalid_parameter(format!(
                "image buffer size overflow for {width}x{height}x{channels}"
            ))
        })
}

fn filled_samples(len: usize, value: f32) -> KlinterResult<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        KlinterError::invalid_parameter(format!("cannot allocate {len} samples: {e}"))
    })?;
    data.resize(len, value);
    Ok(data)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
