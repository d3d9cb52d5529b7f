//! Luminance to colour mapping and its application to images.

pub mod mapper;
pub mod recolor;

pub use mapper::{GradientMapper, UNMAPPED, segment_contains};
pub use recolor::{ImageRecolorer, LuminancePlane, recolor_image};
