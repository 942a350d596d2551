#![no_std]
#![deny(clippy::all)]

//! Conveniences over bitmap images and drawing contexts.
//!
//! The `native` module is the bitmap toolkit: reference-counted `Image`s backed by a
//! `DataProvider`, and mutable `BitmapContext`s that images can be drawn into. On top of it, this
//! crate provides:
//!
//! * `image_from_raw_parts()` to wrap a raw pixel buffer in an `Image`, with a closure called
//!   exactly once when the image lets go of the buffer.
//! * `context_with_logical_size()`, `context_from_image()` and `context_matching_image()` to
//!   allocate contexts.
//! * The `BitmapGeometry` trait, giving sizes derived from a bitmap's width, height and bit depths.
//! * `SizedImage`, an image with a size in logical units.

extern crate alloc;

mod adapter;
mod geometry;
pub mod native;
mod sized_image;

pub use adapter::*;
pub use geometry::BitmapGeometry;
pub use native::{BitmapContext, BitmapInfo, ColorSpace, Image};
pub use sized_image::SizedImage;
