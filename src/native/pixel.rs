use super::bitmap_info::{AlphaInfo, BitmapInfo, ByteOrder};
use super::color_space::ColorSpace;
use super::error::Error;

/// The only component depth the toolkit reads and writes.
pub(crate) const BITS_PER_COMPONENT: usize = 8;

/// A color with 8-bit channels, premultiplied by its alpha.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) struct Premultiplied {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl Premultiplied {
  /// Composites `self` over `dst` with the source-over operator.
  pub fn over(self, dst: Premultiplied) -> Premultiplied {
    let inv = 255 - self.a as u16;
    let blend = |s: u8, d: u8| -> u8 {
      let v = s as u16 + (d as u16 * inv + 127) / 255;
      v.min(255) as u8
    };
    Premultiplied {
      r: blend(self.r, dst.r),
      g: blend(self.g, dst.g),
      b: blend(self.b, dst.b),
      a: blend(self.a, dst.a),
    }
  }
}

fn premultiply(c: u8, a: u8) -> u8 {
  ((c as u16 * a as u16 + 127) / 255) as u8
}

fn unpremultiply(c: u8, a: u8) -> u8 {
  if a == 0 {
    0
  } else {
    ((c as u16 * 255 + a as u16 / 2) / a as u16).min(255) as u8
  }
}

/// The resolved layout of a single pixel, from a color space, component depth and `BitmapInfo`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct PixelLayout {
  /// Number of color channels: 0 for alpha-only pixels, 1 for gray, 3 for RGB.
  color_components: usize,
  alpha: AlphaInfo,
  /// Whether the pixel's bytes are stored in reverse order (32-bit little endian).
  reversed: bool,
}
impl PixelLayout {
  pub fn resolve(
    color_space: Option<ColorSpace>,
    bits_per_component: usize,
    info: BitmapInfo,
  ) -> Result<Self, Error> {
    if bits_per_component != BITS_PER_COMPONENT {
      return Err(Error::UnsupportedFormat("only 8 bits per component are supported"));
    }
    let alpha = info.alpha_info().ok_or(Error::UnsupportedFormat("unknown alpha info"))?;
    let byte_order = info.byte_order().ok_or(Error::UnsupportedFormat("unknown byte order"))?;
    let known = BitmapInfo::ALPHA_INFO_MASK.bits() | BitmapInfo::BYTE_ORDER_MASK.bits();
    if info.bits() & !known != 0 {
      return Err(Error::UnsupportedFormat("unknown bitmap info flags"));
    }

    let color_components = match (alpha, color_space) {
      (AlphaInfo::Only, None) => 0,
      (AlphaInfo::Only, Some(_)) => {
        return Err(Error::UnsupportedFormat("alpha-only bitmaps have no color space"))
      }
      (_, None) => return Err(Error::MissingColorSpace),
      (_, Some(space)) => space.components(),
    };

    let mut layout = PixelLayout {
      color_components,
      alpha,
      reversed: false,
    };
    layout.reversed = match byte_order {
      ByteOrder::Default | ByteOrder::Big32 => false,
      ByteOrder::Little32 if layout.bytes_per_pixel() == 4 => true,
      ByteOrder::Little32 => {
        return Err(Error::UnsupportedFormat("32-bit little endian needs 4 byte pixels"))
      }
      ByteOrder::Little16 | ByteOrder::Big16 => {
        return Err(Error::UnsupportedFormat("16-bit byte orders need 16 bit pixels"))
      }
    };
    Ok(layout)
  }

  pub fn bytes_per_pixel(&self) -> usize {
    // Every layout but `None` has one channel besides color, for alpha or padding.
    let extra = if self.alpha == AlphaInfo::None { 0 } else { 1 };
    self.color_components + extra
  }

  pub fn bits_per_pixel(&self) -> usize {
    self.bytes_per_pixel() * BITS_PER_COMPONENT
  }

  /// The index of the first color channel, and of the alpha channel if there is one, within a
  /// pixel in logical (big endian) order.
  fn offsets(&self) -> (usize, Option<usize>) {
    match self.alpha {
      AlphaInfo::Only => (0, Some(0)),
      AlphaInfo::None => (0, None),
      AlphaInfo::NoneSkipFirst => (1, None),
      AlphaInfo::NoneSkipLast => (0, None),
      AlphaInfo::PremultipliedFirst | AlphaInfo::First => (1, Some(0)),
      AlphaInfo::PremultipliedLast | AlphaInfo::Last => (0, Some(self.color_components)),
    }
  }

  fn load(&self, bytes: &[u8]) -> [u8; 4] {
    let n = self.bytes_per_pixel();
    let mut out = [0; 4];
    out[..n].copy_from_slice(&bytes[..n]);
    if self.reversed {
      out[..n].reverse();
    }
    out
  }

  fn store(&self, mut px: [u8; 4], bytes: &mut [u8]) {
    let n = self.bytes_per_pixel();
    if self.reversed {
      px[..n].reverse();
    }
    bytes[..n].copy_from_slice(&px[..n]);
  }

  /// Reads the pixel at the start of `bytes` as a premultiplied color.
  pub fn read(&self, bytes: &[u8]) -> Premultiplied {
    let px = self.load(bytes);
    let (color, alpha) = self.offsets();
    let a = match alpha {
      Some(i) if self.alpha.has_alpha() => px[i],
      _ => 255,
    };
    let (r, g, b) = match self.color_components {
      0 => return Premultiplied { r: 0, g: 0, b: 0, a },
      1 => (px[color], px[color], px[color]),
      _ => (px[color], px[color + 1], px[color + 2]),
    };
    if self.alpha.has_alpha() && !self.alpha.is_premultiplied() {
      Premultiplied {
        r: premultiply(r, a),
        g: premultiply(g, a),
        b: premultiply(b, a),
        a,
      }
    } else {
      Premultiplied { r, g, b, a }
    }
  }

  /// Writes `c` into the pixel at the start of `bytes`, converting it to this layout.
  pub fn write(&self, c: Premultiplied, bytes: &mut [u8]) {
    let (color, alpha) = self.offsets();
    // Padding channels are written fully set.
    let mut px = [0xff; 4];
    if let Some(i) = alpha {
      px[i] = c.a;
    }
    if self.color_components > 0 {
      let (r, g, b) = if self.alpha.has_alpha() && !self.alpha.is_premultiplied() {
        (unpremultiply(c.r, c.a), unpremultiply(c.g, c.a), unpremultiply(c.b, c.a))
      } else {
        (c.r, c.g, c.b)
      };
      if self.color_components == 1 {
        px[color] = ((r as u32 * 77 + g as u32 * 150 + b as u32 * 29) >> 8) as u8;
      } else {
        px[color] = r;
        px[color + 1] = g;
        px[color + 2] = b;
      }
    }
    self.store(px, bytes)
  }
}
