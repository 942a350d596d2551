//! Constructors that build images and contexts out of each other, and out of raw buffers.
//!
//! All of these report failure as None. The reason is logged at `debug` level through `tracing`.

mod context;
mod image;
mod release;

pub use context::{
  context_from_image, context_matching_image, context_matching_image_with,
  context_with_logical_size, default_bitmap_info, BufferFn, ImageExt,
};
pub use image::image_from_raw_parts;
pub use release::ReleaseFn;
