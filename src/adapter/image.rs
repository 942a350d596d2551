use crate::geometry::BitmapGeometry;
use crate::native::{BitmapContext, DataProvider, Image, ImageDescriptor, RenderingIntent};

use super::release::{self, ReleaseFn};

/// Makes an `Image` over a raw pixel buffer, laid out as described by a `BitmapContext`.
///
/// The `context` is evaluated first, and only supplies the layout: its width, height, bit
/// depths, color space and bitmap info. The row stride of the image is the context's
/// `BitmapGeometry::bytes_per_row()`, and the image reads `BitmapGeometry::bytes()` bytes from the
/// pointer returned by `data`.
///
/// When the image (and every clone of it) has been dropped, `release` is called exactly once with
/// the buffer pointer. If the buffer is rejected before a data provider takes it, `release` is
/// dropped without being called. If the provider was built but the image was not, `release` runs
/// before this function returns.
///
/// Returns None if the context has no color space, if `data` returns null, or if the toolkit
/// rejects the layout.
///
/// # Safety
///
/// The buffer returned by `data` must be valid for reads of `bytes()` bytes of the context, and
/// must not be written to or freed until `release` is called (or until this function returns
/// None). The buffer must remain valid after `context` is dropped, so it must not be storage the
/// context allocated itself.
pub unsafe fn image_from_raw_parts(
  data: impl FnOnce() -> *mut u8,
  context: impl FnOnce() -> BitmapContext,
  release: Option<ReleaseFn>,
) -> Option<Image> {
  let ctx = context();
  let Some(color_space) = ctx.color_space() else {
    tracing::debug!("no image for a context without a color space");
    return None;
  };
  let size = ctx.bytes();
  let data = data();

  let info = release::into_info(release);
  let provider = match DataProvider::new(info, data, size, Some(release::release_trampoline)) {
    Ok(provider) => provider,
    Err(e) => {
      // The provider never took the closure, so reclaim it.
      drop(release::take_release(info));
      tracing::debug!("no data provider for the image: {}", e);
      return None;
    }
  };

  let descriptor = ImageDescriptor {
    width: ctx.width(),
    height: ctx.height(),
    bits_per_component: ctx.bits_per_component(),
    bits_per_pixel: ctx.bits_per_pixel(),
    bytes_per_row: ctx.bytes_per_row(),
    color_space: Some(color_space),
    bitmap_info: ctx.bitmap_info(),
    should_interpolate: true,
    intent: RenderingIntent::Default,
  };
  match Image::new(descriptor, provider) {
    Ok(image) => Some(image),
    Err(e) => {
      tracing::debug!("no image for the raw buffer: {}", e);
      None
    }
  }
}
