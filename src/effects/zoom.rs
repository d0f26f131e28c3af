//! Zoom-transition composer: turns an ordered image sequence into frames that read as one
//! continuous zoom.
//!
//! Frame `i` of `total` is placed on the sequence by an eased position
//! `p = ease(i / (total - 1)) * (n - 1)`. The integer part selects the source image and the
//! fractional part drives the magnification `zoom^(1 + frac)`. The selected image is
//! upscaled by that factor and center-cropped back to its own size.
//!
//! Direction: the forward sequence starts at `images[0]` magnified by `zoom^1` and the
//! magnification grows along the sequence. [`PlaybackMode`] reorders that base sequence.

use std::{fmt, str::FromStr};

use rayon::prelude::*;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Dimensions, ImageBuffer, ZoomFactor},
        error::{KlinterError, KlinterResult},
    },
    render::resample::{Resample, center_crop, resize_image, scale_dims},
};

/// How the base frame sequence is reordered before it is returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Base sequence as computed.
    #[default]
    ZoomOut,
    /// Base sequence reversed.
    ZoomIn,
    /// Base sequence followed by its reverse.
    ZoomOutIn,
    /// Reversed sequence followed by the base sequence.
    ZoomInOut,
}

impl PlaybackMode {
    pub const ALL: [PlaybackMode; 4] = [
        PlaybackMode::ZoomOut,
        PlaybackMode::ZoomIn,
        PlaybackMode::ZoomOutIn,
        PlaybackMode::ZoomInOut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomOut => "zoom-out",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOutIn => "zoom-out-in",
            Self::ZoomInOut => "zoom-in-out",
        }
    }

    /// Output length for a base sequence of `base_len` frames.
    pub fn output_len(self, base_len: usize) -> usize {
        match self {
            Self::ZoomOut | Self::ZoomIn => base_len,
            Self::ZoomOutIn | Self::ZoomInOut => base_len * 2,
        }
    }
}

impl FromStr for PlaybackMode {
    type Err = KlinterError;

    fn from_str(s: &str) -> KlinterResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| KlinterError::invalid_parameter(format!("unknown playback mode '{s}'")))
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final frame size. With `keep_aspect` the frame is fit inside `width x height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
    pub keep_aspect: bool,
}

impl OutputSize {
    /// Resolve the concrete frame size for frames of size `source`.
    pub fn fit(self, source: Dimensions) -> KlinterResult<Dimensions> {
        if self.width == 0 || self.height == 0 || source.is_empty() {
            return Err(KlinterError::invalid_parameter(format!(
                "output size {}x{} for source {source} must be non-zero",
                self.width, self.height
            )));
        }
        if !self.keep_aspect {
            return Ok(Dimensions::new(self.width, self.height));
        }

        let source_ratio = f64::from(source.width) / f64::from(source.height);
        let box_ratio = f64::from(self.width) / f64::from(self.height);
        let fitted = if box_ratio > source_ratio {
            Dimensions::new(
                (f64::from(self.height) * source_ratio) as u32,
                self.height,
            )
        } else {
            Dimensions::new(self.width, (f64::from(self.width) / source_ratio) as u32)
        };
        if fitted.is_empty() {
            return Err(KlinterError::invalid_parameter(format!(
                "output size {}x{} collapses to {fitted} at source aspect {source}",
                self.width, self.height
            )));
        }
        Ok(fitted)
    }
}

/// Threading controls for frame synthesis.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComposeThreading {
    /// Render frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Full set of knobs for [`compose_with`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    pub zoom: ZoomFactor,
    pub frames_per_transition: u32,
    pub mode: PlaybackMode,
    pub ease: Ease,
    /// Kernel for the per-frame magnification.
    pub resample: Resample,
    /// Optional final bilinear resize of every frame.
    pub output_size: Option<OutputSize>,
    pub threading: ComposeThreading,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            zoom: ZoomFactor::default(),
            frames_per_transition: 24,
            mode: PlaybackMode::ZoomOut,
            ease: Ease::InOutSine,
            resample: Resample::Bicubic,
            output_size: None,
            threading: ComposeThreading::default(),
        }
    }
}

/// Source image and magnification for one frame of the base sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
    pub source_index: usize,
    pub local_zoom: f64,
}

/// Timing plan of the base sequence: one [`FrameSample`] per frame.
pub fn frame_plan(
    num_images: usize,
    zoom: ZoomFactor,
    frames_per_transition: u32,
    ease: Ease,
) -> KlinterResult<Vec<FrameSample>> {
    if num_images < 2 {
        return Err(KlinterError::invalid_parameter(format!(
            "zoom transitions need at least two images, got {num_images}"
        )));
    }
    if frames_per_transition == 0 {
        return Err(KlinterError::invalid_parameter(
            "frames per transition must be >= 1",
        ));
    }

    let last_image = num_images - 1;
    let total = frames_per_transition as usize * last_image;
    let plan = (0..total)
        .map(|i| {
            let x = if total == 1 {
                0.0
            } else {
                i as f64 / (total - 1) as f64
            };
            let p = ease.apply(x) * last_image as f64;
            let idx = (p.floor().max(0.0) as usize).min(last_image - 1);
            let frac = p - idx as f64;
            FrameSample {
                source_index: idx,
                local_zoom: zoom.get().powf(1.0 + frac),
            }
        })
        .collect();
    Ok(plan)
}

/// Reorder a base sequence according to `mode`.
pub fn apply_mode<T: Clone>(frames: Vec<T>, mode: PlaybackMode) -> Vec<T> {
    match mode {
        PlaybackMode::ZoomOut => frames,
        PlaybackMode::ZoomIn => frames.into_iter().rev().collect(),
        PlaybackMode::ZoomOutIn => {
            let mut out = Vec::with_capacity(frames.len() * 2);
            out.extend(frames.iter().cloned());
            out.extend(frames.into_iter().rev());
            out
        }
        PlaybackMode::ZoomInOut => {
            let mut out = Vec::with_capacity(frames.len() * 2);
            out.extend(frames.iter().rev().cloned());
            out.extend(frames);
            out
        }
    }
}

/// Compose a zoom transition with bicubic resampling and the in-out sine curve.
pub fn compose(
    images: &[ImageBuffer],
    zoom: ZoomFactor,
    frames_per_transition: u32,
    mode: PlaybackMode,
) -> KlinterResult<Vec<ImageBuffer>> {
    compose_with(
        images,
        &ComposeOptions {
            zoom,
            frames_per_transition,
            mode,
            ..ComposeOptions::default()
        },
    )
}

/// Compose a zoom transition with explicit options.
#[tracing::instrument(skip(images), fields(images = images.len()))]
pub fn compose_with(
    images: &[ImageBuffer],
    opts: &ComposeOptions,
) -> KlinterResult<Vec<ImageBuffer>> {
    validate_sequence(images)?;
    let plan = frame_plan(
        images.len(),
        opts.zoom,
        opts.frames_per_transition,
        opts.ease,
    )?;
    let output = opts
        .output_size
        .map(|size| size.fit(images[0].dimensions()))
        .transpose()?;

    tracing::debug!(
        base_frames = plan.len(),
        total_frames = opts.mode.output_len(plan.len()),
        mode = %opts.mode,
        "composing zoom transition"
    );

    let render = |sample: &FrameSample| -> KlinterResult<ImageBuffer> {
        let frame = render_frame(images, *sample, opts.resample)?;
        match output {
            Some(dims) if dims != frame.dimensions() => {
                resize_image(&frame, dims.width, dims.height, Resample::Bilinear)
            }
            _ => Ok(frame),
        }
    };

    let frames = if opts.threading.parallel {
        let pool = build_thread_pool(opts.threading.threads)?;
        pool.install(|| plan.par_iter().map(render).collect::<KlinterResult<Vec<_>>>())?
    } else {
        plan.iter().map(render).collect::<KlinterResult<Vec<_>>>()?
    };

    Ok(apply_mode(frames, opts.mode))
}

/// Magnify `images[sample.source_index]` by `sample.local_zoom` and crop back to size.
pub fn render_frame(
    images: &[ImageBuffer],
    sample: FrameSample,
    filter: Resample,
) -> KlinterResult<ImageBuffer> {
    let src = images.get(sample.source_index).ok_or_else(|| {
        KlinterError::invalid_parameter(format!(
            "frame references image {} of {}",
            sample.source_index,
            images.len()
        ))
    })?;
    let dims = src.dimensions();
    let scaled = scale_dims(dims, sample.local_zoom)?;
    if scaled.width < dims.width || scaled.height < dims.height {
        return Err(KlinterError::invalid_parameter(format!(
            "local zoom {} would shrink {dims}",
            sample.local_zoom
        )));
    }
    let enlarged = resize_image(src, scaled.width, scaled.height, filter)?;
    center_crop(&enlarged, dims.width, dims.height)
}

fn validate_sequence(images: &[ImageBuffer]) -> KlinterResult<()> {
    let Some(first) = images.first() else {
        return Err(KlinterError::invalid_parameter(
            "zoom transitions need at least two images, got 0",
        ));
    };
    if first.is_empty() {
        return Err(KlinterError::invalid_parameter(format!(
            "cannot compose empty images ({})",
            first.dimensions()
        )));
    }
    if let Some((i, img)) = images
        .iter()
        .enumerate()
        .find(|(_, img)| !img.same_shape(first))
    {
        return Err(KlinterError::invalid_parameter(format!(
            "image {i} has shape {:?}, expected {:?}",
            img.shape(),
            first.shape()
        )));
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> KlinterResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(KlinterError::invalid_parameter(
            "compose threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| KlinterError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/zoom.rs"]
mod tests;
