//! Decode and encode collaborators backed by the `image` crate.

pub(crate) mod decode;
pub(crate) mod encode;

pub use decode::{Decoded, decode_image};
pub use encode::{ImageFormat, encode_image};
