//! Pixel math behind the shader services: blending, blur, hue rotation and radial blur.

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod gradient;
pub(crate) mod hue;
pub(crate) mod radial;

pub use blur::{BlurAxis, blur_pass, blur_rgba8};
pub use composite::{Rgba8, blt_shader, copy_modulated, over_straight};
pub use gradient::{fill_gradient, gradient_step};
pub use hue::hue_rotate;
pub use radial::radial_blur_rgba8;
