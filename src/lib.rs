//! klinter turns still images into outpainting inputs and zoom-transition frame sequences.
//!
//! Two stateless engines make up the core:
//!
//! 1. **Padding** ([`pad`]): center an image on a larger mid-gray canvas and build a mask
//!    (`1.0` = original content) with a quadratic feather along the seam. [`outpaint`] also
//!    returns the canvas and mask resampled back to the source size.
//! 2. **Zoom transitions** ([`compose`], [`compose_with`]): map every output frame onto the
//!    image sequence with an ease-in-out curve, magnify the selected image and crop it back
//!    to size, then reorder the frames per [`PlaybackMode`].
//!
//! Both operate on [`ImageBuffer`] (row-major `H x W x C` floats in `[0, 1]`) and [`Mask`]
//! values, allocate their own outputs and never touch global state, so they can be called
//! from any number of threads. File I/O lives in the helpers re-exported from `assets` and
//! is never used by the engines.
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod effects;
mod foundation;
mod render;
mod sizing;

pub use animation::ease::Ease;
pub use assets::decode::{
    decode_image, image_from_dynamic, image_to_dynamic, load_image, mask_to_gray, save_image,
    save_mask,
};
pub use effects::padding::{
    OutpaintOutputs, PAD_FILL, PaddedImage, clamp_feather, feather_opacity, outpaint, pad,
    pad_batch, pad_raw, shrink_to_original, shrink_to_original_with,
};
pub use effects::zoom::{
    ComposeOptions, ComposeThreading, FrameSample, OutputSize, PlaybackMode, apply_mode, compose,
    compose_with, frame_plan, render_frame,
};
pub use foundation::core::{Channels, Dimensions, ImageBuffer, Mask, ZoomFactor};
pub use foundation::error::{KlinterError, KlinterResult};
pub use render::resample::{Resample, center_crop, resize_image, resize_mask, scale_dims};
pub use sizing::presets::{
    ASPECT_RATIOS, AspectRatio, BASE_SIZES, FluxSizeTable, Orientation, SizeClass, SizeEntry,
    SizeSelection, SizeTable, aspect_dimensions, find_aspect,
};
