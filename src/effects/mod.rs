//! The two image-geometry engines: outpaint padding and zoom transitions.

pub(crate) mod padding;
pub(crate) mod zoom;
