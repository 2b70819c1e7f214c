//! Raster drawing
//!
//! - [`geometry`]: signed distance functions and anti-aliasing helpers
//! - [`surface`]: the RGBA pixmap every card is painted on

pub mod geometry;
pub mod surface;

pub use geometry::{aa_alpha_from_distance, circle_sdf, distance_to_segment, rounded_rect_sdf, smoothstep};
pub use surface::{Shape, Surface};
