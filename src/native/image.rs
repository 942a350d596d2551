use alloc::sync::Arc;

use super::bitmap_info::BitmapInfo;
use super::color_space::ColorSpace;
use super::data_provider::DataProvider;
use super::error::Error;
use super::pixel::{PixelLayout, Premultiplied};

/// How colors outside the destination gamut are mapped when an image is drawn.
///
/// The toolkit has no color management, so this is carried as metadata only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum RenderingIntent {
  #[default]
  Default,
  AbsoluteColorimetric,
  RelativeColorimetric,
  Perceptual,
  Saturation,
}

/// Everything needed to interpret the bytes of a `DataProvider` as an `Image`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
  pub width: usize,
  pub height: usize,
  pub bits_per_component: usize,
  pub bits_per_pixel: usize,
  /// The number of bytes from the start of one row to the start of the next.
  pub bytes_per_row: usize,
  pub color_space: Option<ColorSpace>,
  pub bitmap_info: BitmapInfo,
  pub should_interpolate: bool,
  pub intent: RenderingIntent,
}

#[derive(Debug)]
struct ImageInner {
  descriptor: ImageDescriptor,
  layout: PixelLayout,
  provider: Arc<DataProvider>,
}

/// An immutable bitmap image.
///
/// Cloning an `Image` is cheap and shares the pixel data. The `DataProvider` behind the image is
/// released when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Image {
  inner: Arc<ImageInner>,
}

static_assertions::assert_impl_all!(Image: Send, Sync);

impl Image {
  /// Constructs an image which reads its pixels from `provider`, as described by `descriptor`.
  ///
  /// Returns an error if the descriptor does not describe a pixel format the toolkit supports, or
  /// if the provider does not hold enough bytes for every row of the image.
  pub fn new(descriptor: ImageDescriptor, provider: Arc<DataProvider>) -> Result<Image, Error> {
    let ImageDescriptor {
      width,
      height,
      bits_per_component,
      bits_per_pixel,
      bytes_per_row,
      color_space,
      bitmap_info,
      ..
    } = descriptor;
    if width == 0 || height == 0 {
      return Err(Error::InvalidDimensions { width, height });
    }
    let layout = PixelLayout::resolve(color_space, bits_per_component, bitmap_info)?;
    if bits_per_pixel != layout.bits_per_pixel() {
      return Err(Error::UnsupportedFormat(
        "bits per pixel does not match the color space and bitmap info",
      ));
    }
    let row = width.checked_mul(layout.bytes_per_pixel()).ok_or(Error::SizeOverflow)?;
    if bytes_per_row < row {
      return Err(Error::RowStrideTooSmall {
        stride: bytes_per_row,
        minimum: row,
      });
    }
    // The last row doesn't need to be padded out to the full stride.
    let required = bytes_per_row
      .checked_mul(height - 1)
      .and_then(|n| n.checked_add(row))
      .ok_or(Error::SizeOverflow)?;
    if provider.len() < required {
      return Err(Error::BufferTooSmall {
        available: provider.len(),
        required,
      });
    }
    Ok(Image {
      inner: Arc::new(ImageInner {
        descriptor,
        layout,
        provider,
      }),
    })
  }

  /// The number of pixel columns in the image.
  pub fn width(&self) -> usize {
    self.inner.descriptor.width
  }
  /// The number of pixel rows in the image.
  pub fn height(&self) -> usize {
    self.inner.descriptor.height
  }
  pub fn bits_per_component(&self) -> usize {
    self.inner.descriptor.bits_per_component
  }
  pub fn bits_per_pixel(&self) -> usize {
    self.inner.descriptor.bits_per_pixel
  }
  /// The row stride the image was constructed with, which may include padding past the end of
  /// each row of pixels.
  pub fn row_stride(&self) -> usize {
    self.inner.descriptor.bytes_per_row
  }
  /// The color space of the image, or None for alpha-only images.
  pub fn color_space(&self) -> Option<ColorSpace> {
    self.inner.descriptor.color_space
  }
  pub fn bitmap_info(&self) -> BitmapInfo {
    self.inner.descriptor.bitmap_info
  }
  pub fn should_interpolate(&self) -> bool {
    self.inner.descriptor.should_interpolate
  }
  pub fn rendering_intent(&self) -> RenderingIntent {
    self.inner.descriptor.intent
  }
  /// The provider supplying the image's bytes.
  pub fn data_provider(&self) -> &Arc<DataProvider> {
    &self.inner.provider
  }

  /// Reads the pixel at column `x` of row `y`, counting rows from the top of the image.
  pub(crate) fn pixel(&self, x: usize, y: usize) -> Premultiplied {
    let layout = &self.inner.layout;
    let offset = y * self.row_stride() + x * layout.bytes_per_pixel();
    layout.read(&self.inner.provider.bytes()[offset..])
  }
}
