//! The bitmap toolkit: images, drawing contexts and the data providers behind images.
//!
//! This is the layer the rest of the crate builds conveniences on top of. It reads and writes
//! 8-bit-per-component RGB, gray and alpha-only pixels in any of the toolkit's alpha layouts.

mod bitmap_info;
mod color_space;
mod context;
mod data_provider;
mod error;
mod image;
mod pixel;

pub use bitmap_info::{AlphaInfo, BitmapInfo, ByteOrder};
pub use color_space::ColorSpace;
pub use context::{BitmapContext, ContextDescriptor};
pub use data_provider::{DataProvider, ReleaseDataCallback};
pub use error::Error;
pub use image::{Image, ImageDescriptor, RenderingIntent};
