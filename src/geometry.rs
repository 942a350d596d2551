use euclid::default::Size2D;

use crate::native::{BitmapContext, Image};

/// Geometry derived from the primitive fields of a bitmap.
///
/// Implementors only report their dimensions and bit depths; the byte sizes are always computed
/// from those, never taken from the row stride the toolkit reports. `bytes_per_row()` is the
/// tightly packed row size, so it will be smaller than the toolkit's stride for bitmaps with
/// padded rows.
pub trait BitmapGeometry {
  /// The number of pixel columns.
  fn width(&self) -> usize;
  /// The number of pixel rows.
  fn height(&self) -> usize;
  fn bits_per_component(&self) -> usize;
  fn bits_per_pixel(&self) -> usize;

  /// The pixel dimensions as a size.
  fn size(&self) -> Size2D<usize> {
    Size2D::new(self.width(), self.height())
  }

  /// The number of components in a pixel, which is the number of bytes in a pixel for 8-bit
  /// components.
  ///
  /// A zero component depth is treated as 1 rather than dividing by zero.
  fn bytes_per_pixel(&self) -> usize {
    self.bits_per_pixel() / self.bits_per_component().max(1)
  }

  /// `bytes_per_pixel() * width()`.
  fn bytes_per_row(&self) -> usize {
    self.bytes_per_pixel().saturating_mul(self.width())
  }

  /// The total byte size of the bitmap, `bytes_per_row() * height()`.
  fn bytes(&self) -> usize {
    self.bytes_per_row().saturating_mul(self.height())
  }
}

impl BitmapGeometry for Image {
  fn width(&self) -> usize {
    Image::width(self)
  }
  fn height(&self) -> usize {
    Image::height(self)
  }
  fn bits_per_component(&self) -> usize {
    Image::bits_per_component(self)
  }
  fn bits_per_pixel(&self) -> usize {
    Image::bits_per_pixel(self)
  }
}

impl BitmapGeometry for BitmapContext {
  fn width(&self) -> usize {
    BitmapContext::width(self)
  }
  fn height(&self) -> usize {
    BitmapContext::height(self)
  }
  fn bits_per_component(&self) -> usize {
    BitmapContext::bits_per_component(self)
  }
  fn bits_per_pixel(&self) -> usize {
    BitmapContext::bits_per_pixel(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::native::{AlphaInfo, ColorSpace, ContextDescriptor};

  struct Fields {
    width: usize,
    height: usize,
    bits_per_component: usize,
    bits_per_pixel: usize,
  }
  impl BitmapGeometry for Fields {
    fn width(&self) -> usize {
      self.width
    }
    fn height(&self) -> usize {
      self.height
    }
    fn bits_per_component(&self) -> usize {
      self.bits_per_component
    }
    fn bits_per_pixel(&self) -> usize {
      self.bits_per_pixel
    }
  }

  #[test]
  fn derived_from_fields() {
    let f = Fields {
      width: 7,
      height: 3,
      bits_per_component: 8,
      bits_per_pixel: 32,
    };
    assert_eq!(f.size(), Size2D::new(7, 3));
    assert_eq!(f.bytes_per_pixel(), 4);
    assert_eq!(f.bytes_per_row(), 28);
    assert_eq!(f.bytes(), 84);
  }

  #[test]
  fn zero_component_depth() {
    let f = Fields {
      width: 2,
      height: 2,
      bits_per_component: 0,
      bits_per_pixel: 24,
    };
    assert_eq!(f.bytes_per_pixel(), 24);
    assert_eq!(f.bytes_per_row(), 48);
    assert_eq!(f.bytes(), 96);
  }

  #[test]
  fn integer_division() {
    let f = Fields {
      width: 1,
      height: 1,
      bits_per_component: 5,
      bits_per_pixel: 16,
    };
    assert_eq!(f.bytes_per_pixel(), 3);
  }

  #[test]
  fn ignores_padded_stride() {
    let ctx = BitmapContext::new(ContextDescriptor {
      width: 3,
      height: 2,
      bits_per_component: 8,
      bytes_per_row: 16,
      color_space: Some(ColorSpace::DeviceRgb),
      bitmap_info: AlphaInfo::PremultipliedFirst.into(),
    })
    .unwrap();
    assert_eq!(ctx.row_stride(), 16);
    assert_eq!(BitmapGeometry::bytes_per_row(&ctx), 12);
    assert_eq!(BitmapGeometry::bytes(&ctx), 24);

    let image = ctx.make_image().unwrap();
    assert_eq!(image.row_stride(), 16);
    assert_eq!(BitmapGeometry::bytes_per_row(&image), 12);
    assert_eq!(BitmapGeometry::size(&image), Size2D::new(3, 2));
  }
}
