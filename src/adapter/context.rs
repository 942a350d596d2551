use alloc::boxed::Box;

use euclid::default::{Rect, Size2D};

use crate::geometry::BitmapGeometry;
use crate::native::{
  AlphaInfo, BitmapContext, BitmapInfo, ByteOrder, ColorSpace, ContextDescriptor, Image,
};

/// Supplies the buffer for a context built by `context_matching_image_with()`.
pub type BufferFn<'a> = Box<dyn FnOnce(&Image) -> *mut u8 + 'a>;

/// Allocates a device RGB context for a size in logical units, backed by `scale` pixels per unit.
///
/// The pixel dimensions are `size * scale`, truncated. An opaque context has no alpha channel
/// (`NoneSkipFirst`), otherwise alpha is premultiplied (`PremultipliedFirst`). Either way the
/// pixels are 32-bit little endian, which puts them in BGRA order in memory. The toolkit allocates
/// the zeroed buffer and picks its stride.
///
/// Returns None if the pixel dimensions are not at least 1x1.
pub fn context_with_logical_size(
  size: Size2D<f64>,
  is_opaque: bool,
  scale: f64,
) -> Option<BitmapContext> {
  let alpha = if is_opaque {
    AlphaInfo::NoneSkipFirst
  } else {
    AlphaInfo::PremultipliedFirst
  };
  let descriptor = ContextDescriptor {
    // Float to int casts truncate toward zero, and saturate at 0 for negative values and NaN.
    width: (size.width * scale) as usize,
    height: (size.height * scale) as usize,
    bits_per_component: 8,
    bytes_per_row: 0,
    color_space: Some(ColorSpace::DeviceRgb),
    bitmap_info: BitmapInfo::new(alpha, ByteOrder::Little32),
  };
  match BitmapContext::new(descriptor) {
    Ok(ctx) => Some(ctx),
    Err(e) => {
      tracing::debug!("no context for logical size {:?} at scale {}: {}", size, scale, e);
      None
    }
  }
}

/// Allocates a context with the same layout as `image`, and draws the image into it at its
/// natural size.
///
/// Returns None if the image has no color space, or if its layout can't back a context with
/// premultiplied alpha.
pub fn context_from_image(image: &Image) -> Option<BitmapContext> {
  let mut ctx = context_matching_image(image)?;
  ctx.draw_image(image, Rect::from_size(image.size().to_f64()));
  Some(ctx)
}

/// The bitmap info used for contexts matching an image, unless another is chosen: premultiplied
/// alpha stored before the color channels.
pub fn default_bitmap_info(_image: &Image) -> BitmapInfo {
  AlphaInfo::PremultipliedFirst.into()
}

/// Allocates an empty context matching the layout of `image`, with `default_bitmap_info()`.
///
/// See `context_matching_image_with()`.
pub fn context_matching_image(image: &Image) -> Option<BitmapContext> {
  // SAFETY: No buffer is supplied, so the toolkit allocates one.
  unsafe { context_matching_image_with(image, None, default_bitmap_info) }
}

/// Allocates an empty context matching the layout of `image`.
///
/// The context has the image's width, height, bits per component and color space, and a row
/// stride of `BitmapGeometry::bytes_per_row()` of the image. Its bitmap info is chosen by
/// `bitmap_info`.
///
/// If `buffer` is given, it is called to supply the context's memory, which is then zeroed. The
/// context never frees that memory. Otherwise the toolkit allocates it.
///
/// Returns None if the image has no color space, or if the toolkit rejects the layout, such as when
/// the chosen bitmap info needs more bytes per pixel than the image has.
///
/// # Safety
///
/// The pointer returned by `buffer` must be valid for writes of `BitmapGeometry::bytes()` of the
/// image, and must stay valid, and not be accessed through any other pointer, for as long as the
/// returned context lives.
pub unsafe fn context_matching_image_with(
  image: &Image,
  buffer: Option<BufferFn<'_>>,
  bitmap_info: impl FnOnce(&Image) -> BitmapInfo,
) -> Option<BitmapContext> {
  let Some(color_space) = image.color_space() else {
    tracing::debug!("no context for an image without a color space");
    return None;
  };
  let descriptor = ContextDescriptor {
    width: image.width(),
    height: image.height(),
    bits_per_component: image.bits_per_component(),
    bytes_per_row: image.bytes_per_row(),
    color_space: Some(color_space),
    bitmap_info: bitmap_info(image),
  };
  let result = match buffer {
    Some(buffer) => {
      let data = buffer(image);
      if !data.is_null() {
        core::ptr::write_bytes(data, 0, image.bytes());
      }
      BitmapContext::with_external_buffer(data, descriptor)
    }
    None => BitmapContext::new(descriptor),
  };
  match result {
    Ok(ctx) => Some(ctx),
    Err(e) => {
      tracing::debug!("no context matching the image: {}", e);
      None
    }
  }
}

/// Conveniences on `Image`.
pub trait ImageExt {
  /// A new context holding a copy of the image's pixels, as made by `context_from_image()`.
  fn to_context(&self) -> Option<BitmapContext>;
}

impl ImageExt for Image {
  fn to_context(&self) -> Option<BitmapContext> {
    context_from_image(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec;

  fn source(alpha: AlphaInfo, width: usize, height: usize) -> BitmapContext {
    BitmapContext::new(ContextDescriptor {
      width,
      height,
      bits_per_component: 8,
      bytes_per_row: 0,
      color_space: Some(ColorSpace::DeviceRgb),
      bitmap_info: alpha.into(),
    })
    .unwrap()
  }

  #[test]
  fn logical_size_is_scaled_and_truncated() {
    let ctx = context_with_logical_size(Size2D::new(10.5, 3.3), true, 2.0).unwrap();
    assert_eq!((ctx.width(), ctx.height()), (21, 6));
    let ctx = context_with_logical_size(Size2D::new(10.5, 3.3), true, 3.0).unwrap();
    assert_eq!((ctx.width(), ctx.height()), (31, 9));
  }

  #[test]
  fn logical_size_layouts() {
    let opaque = context_with_logical_size(Size2D::new(4.0, 2.0), true, 1.0).unwrap();
    assert_eq!(
      opaque.bitmap_info(),
      BitmapInfo::new(AlphaInfo::NoneSkipFirst, ByteOrder::Little32)
    );
    assert_eq!(opaque.bits_per_component(), 8);
    assert_eq!(opaque.bits_per_pixel(), 32);
    assert_eq!(opaque.color_space(), Some(ColorSpace::DeviceRgb));
    assert_eq!(opaque.row_stride(), 16);
    assert!(opaque.data().iter().all(|b| *b == 0));

    let clear = context_with_logical_size(Size2D::new(4.0, 2.0), false, 1.0).unwrap();
    assert_eq!(
      clear.bitmap_info(),
      BitmapInfo::new(AlphaInfo::PremultipliedFirst, ByteOrder::Little32)
    );
  }

  #[test]
  fn logical_size_rejections() {
    assert!(context_with_logical_size(Size2D::new(0.0, 10.0), true, 2.0).is_none());
    assert!(context_with_logical_size(Size2D::new(-3.0, 10.0), false, 2.0).is_none());
    assert!(context_with_logical_size(Size2D::new(0.4, 10.0), false, 2.0).is_none());
    assert!(context_with_logical_size(Size2D::new(3.0, 10.0), false, f64::NAN).is_none());
  }

  #[test]
  fn from_image_copies_pixels() {
    let mut src = source(AlphaInfo::PremultipliedFirst, 3, 2);
    for (i, b) in src.data_mut().iter_mut().enumerate() {
      *b = if i % 4 == 0 { 255 } else { (i * 10) as u8 };
    }
    let image = src.make_image().unwrap();

    let ctx = context_from_image(&image).unwrap();
    assert_eq!(ctx.size(), image.size());
    assert_eq!(ctx.data(), src.data());

    let again = image.to_context().unwrap();
    assert_eq!(again.data(), src.data());
  }

  #[test]
  fn from_image_converts_to_premultiplied_first() {
    let mut src = context_with_logical_size(Size2D::new(1.0, 1.0), true, 1.0).unwrap();
    src.data_mut().copy_from_slice(&[30, 20, 10, 0]);
    let image = src.make_image().unwrap();

    let ctx = context_from_image(&image).unwrap();
    assert_eq!(ctx.bitmap_info(), BitmapInfo::from(AlphaInfo::PremultipliedFirst));
    assert_eq!(ctx.data(), &[255, 10, 20, 30]);
  }

  #[test]
  fn matching_needs_a_color_space() {
    let mask = BitmapContext::new(ContextDescriptor {
      width: 2,
      height: 2,
      bits_per_component: 8,
      bytes_per_row: 0,
      color_space: None,
      bitmap_info: AlphaInfo::Only.into(),
    })
    .unwrap()
    .make_image()
    .unwrap();
    assert!(context_matching_image(&mask).is_none());
    assert!(context_from_image(&mask).is_none());
  }

  #[test]
  fn matching_uses_derived_stride() {
    // Three bytes per pixel can't hold a premultiplied pixel, which needs four.
    let rgb = source(AlphaInfo::None, 2, 2).make_image().unwrap();
    assert!(context_matching_image(&rgb).is_none());

    let ctx = unsafe { context_matching_image_with(&rgb, None, |image| image.bitmap_info()) }
      .unwrap();
    assert_eq!(ctx.row_stride(), 6);
    assert_eq!(ctx.bitmap_info(), BitmapInfo::from(AlphaInfo::None));
  }

  #[test]
  fn matching_with_supplied_buffer() {
    let mut src = source(AlphaInfo::PremultipliedLast, 2, 1);
    src.data_mut().copy_from_slice(&[1, 2, 3, 255, 4, 5, 6, 255]);
    let image = src.make_image().unwrap();

    let mut buffer = vec![0xaau8; 8];
    let ptr = buffer.as_mut_ptr();
    {
      let mut ctx = unsafe {
        context_matching_image_with(
          &image,
          Some(Box::new(move |image: &Image| {
            assert_eq!(image.width(), 2);
            ptr
          })),
          default_bitmap_info,
        )
      }
      .unwrap();
      assert!(ctx.data().iter().all(|b| *b == 0));
      ctx.draw_image(&image, Rect::from_size(Size2D::new(2.0, 1.0)));
    }
    assert_eq!(buffer, [255, 1, 2, 3, 255, 4, 5, 6]);
  }
}
