use alloc::boxed::Box;
use alloc::vec;
use core::ptr::NonNull;

use euclid::default::Rect;

use super::bitmap_info::BitmapInfo;
use super::color_space::ColorSpace;
use super::data_provider::DataProvider;
use super::error::Error;
use super::image::{Image, ImageDescriptor, RenderingIntent};
use super::pixel::PixelLayout;

/// Everything needed to allocate a `BitmapContext`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContextDescriptor {
  pub width: usize,
  pub height: usize,
  pub bits_per_component: usize,
  /// The number of bytes from the start of one row to the start of the next. If 0, the toolkit
  /// picks the tightly packed stride for the pixel format.
  pub bytes_per_row: usize,
  pub color_space: Option<ColorSpace>,
  pub bitmap_info: BitmapInfo,
}

enum Storage {
  /// Zero-initialized memory allocated by the toolkit, freed with the context.
  Owned(Box<[u8]>),
  /// Memory supplied by the caller, which the context never frees.
  External { data: NonNull<u8>, len: usize },
}

/// A mutable bitmap that images can be drawn into.
///
/// The context uses a bottom-left origin for drawing: a rect at `y = 0` touches the last row of
/// the buffer. Rows are stored in memory from the top row down.
pub struct BitmapContext {
  descriptor: ContextDescriptor,
  layout: PixelLayout,
  storage: Storage,
}

static_assertions::assert_not_impl_any!(BitmapContext: Send, Sync);

impl BitmapContext {
  /// Allocates a context with zeroed pixels, as described by `descriptor`.
  pub fn new(descriptor: ContextDescriptor) -> Result<BitmapContext, Error> {
    let (descriptor, layout, len) = Self::validate(descriptor)?;
    Ok(BitmapContext {
      descriptor,
      layout,
      storage: Storage::Owned(vec![0; len].into_boxed_slice()),
    })
  }

  /// Constructs a context that draws into the caller's buffer at `data`.
  ///
  /// The context never frees `data`.
  ///
  /// # Safety
  ///
  /// `data` must point to initialized memory valid for reads and writes of `bytes_per_row *
  /// height` bytes (after a zero `bytes_per_row` is resolved), for as long as the context lives,
  /// and that memory must not be accessed through any other pointer while the context lives.
  pub unsafe fn with_external_buffer(
    data: *mut u8,
    descriptor: ContextDescriptor,
  ) -> Result<BitmapContext, Error> {
    let data = NonNull::new(data).ok_or(Error::NullData)?;
    let (descriptor, layout, len) = Self::validate(descriptor)?;
    Ok(BitmapContext {
      descriptor,
      layout,
      storage: Storage::External { data, len },
    })
  }

  /// Checks the descriptor, resolving a zero stride, and returns it along with the pixel layout
  /// and the number of bytes the context's buffer holds.
  fn validate(
    mut descriptor: ContextDescriptor,
  ) -> Result<(ContextDescriptor, PixelLayout, usize), Error> {
    let ContextDescriptor { width, height, .. } = descriptor;
    if width == 0 || height == 0 {
      tracing::debug!("rejecting {}x{} bitmap context", width, height);
      return Err(Error::InvalidDimensions { width, height });
    }
    let layout = PixelLayout::resolve(
      descriptor.color_space,
      descriptor.bits_per_component,
      descriptor.bitmap_info,
    )?;
    let row = width.checked_mul(layout.bytes_per_pixel()).ok_or(Error::SizeOverflow)?;
    if descriptor.bytes_per_row == 0 {
      descriptor.bytes_per_row = row;
    } else if descriptor.bytes_per_row < row {
      return Err(Error::RowStrideTooSmall {
        stride: descriptor.bytes_per_row,
        minimum: row,
      });
    }
    let len = descriptor.bytes_per_row.checked_mul(height).ok_or(Error::SizeOverflow)?;
    Ok((descriptor, layout, len))
  }

  /// The number of pixel columns in the context.
  pub fn width(&self) -> usize {
    self.descriptor.width
  }
  /// The number of pixel rows in the context.
  pub fn height(&self) -> usize {
    self.descriptor.height
  }
  pub fn bits_per_component(&self) -> usize {
    self.descriptor.bits_per_component
  }
  pub fn bits_per_pixel(&self) -> usize {
    self.layout.bits_per_pixel()
  }
  /// The row stride of the context's buffer, as chosen by the toolkit when a zero stride was
  /// requested.
  pub fn row_stride(&self) -> usize {
    self.descriptor.bytes_per_row
  }
  /// The color space of the context, or None for alpha-only contexts.
  pub fn color_space(&self) -> Option<ColorSpace> {
    self.descriptor.color_space
  }
  pub fn bitmap_info(&self) -> BitmapInfo {
    self.descriptor.bitmap_info
  }

  /// Gives read access to the context's buffer, `row_stride() * height()` bytes long.
  pub fn data(&self) -> &[u8] {
    match &self.storage {
      Storage::Owned(bytes) => &bytes[..],
      Storage::External { data, len } => unsafe {
        core::slice::from_raw_parts(data.as_ptr(), *len)
      },
    }
  }
  /// Gives read-write access to the context's buffer, `row_stride() * height()` bytes long.
  pub fn data_mut(&mut self) -> &mut [u8] {
    match &mut self.storage {
      Storage::Owned(bytes) => &mut bytes[..],
      Storage::External { data, len } => unsafe {
        core::slice::from_raw_parts_mut(data.as_ptr(), *len)
      },
    }
  }
  /// A pointer to the start of the context's buffer.
  pub fn as_mut_ptr(&mut self) -> *mut u8 {
    self.data_mut().as_mut_ptr()
  }

  /// Draws `image` into `rect`, scaling it to fill the rect.
  ///
  /// The image is composited over the existing contents with the source-over operator, sampling
  /// the nearest image pixel for each context pixel whose center lies in `rect`. Parts of the
  /// rect outside the context are clipped.
  pub fn draw_image(&mut self, image: &Image, rect: Rect<f64>) {
    let finite = [rect.origin.x, rect.origin.y, rect.size.width, rect.size.height]
      .iter()
      .all(|v| v.is_finite());
    if !finite || rect.is_empty() {
      return;
    }
    let (width, height) = (self.width(), self.height());
    // Flip the rect into top-down row space.
    let left = rect.origin.x;
    let top = height as f64 - (rect.origin.y + rect.size.height);
    let right = left + rect.size.width;
    let bottom = top + rect.size.height;

    let x_range = clip(left, right, width);
    let y_range = clip(top, bottom, height);
    let stride = self.row_stride();
    let bpp = self.layout.bytes_per_pixel();
    let layout = self.layout;
    let pixels = self.data_mut();

    for y in y_range {
      let cy = y as f64 + 0.5;
      if cy < top || cy >= bottom {
        continue;
      }
      let v = sample_index(cy - top, rect.size.height, image.height());
      for x in x_range.clone() {
        let cx = x as f64 + 0.5;
        if cx < left || cx >= right {
          continue;
        }
        let u = sample_index(cx - left, rect.size.width, image.width());
        let offset = y * stride + x * bpp;
        let dst = layout.read(&pixels[offset..]);
        layout.write(image.pixel(u, v).over(dst), &mut pixels[offset..]);
      }
    }
  }

  /// Makes an `Image` from a copy of the context's current pixels.
  pub fn make_image(&self) -> Result<Image, Error> {
    let descriptor = ImageDescriptor {
      width: self.width(),
      height: self.height(),
      bits_per_component: self.bits_per_component(),
      bits_per_pixel: self.bits_per_pixel(),
      bytes_per_row: self.row_stride(),
      color_space: self.color_space(),
      bitmap_info: self.bitmap_info(),
      should_interpolate: true,
      intent: RenderingIntent::Default,
    };
    Image::new(descriptor, DataProvider::from_vec(self.data().to_vec()))
  }
}

/// The range of pixel indices in `0..limit` that may have their centers between `start` and `end`.
fn clip(start: f64, end: f64, limit: usize) -> core::ops::Range<usize> {
  // Float to int casts saturate, so negative values become 0.
  let lo = (start as usize).min(limit);
  let hi = (end as usize).saturating_add(1).min(limit);
  lo..hi
}

/// Maps a distance into a rect of `extent` onto the index of the nearest of `count` samples.
fn sample_index(distance: f64, extent: f64, count: usize) -> usize {
  ((distance / extent * count as f64) as usize).min(count - 1)
}

impl core::fmt::Debug for BitmapContext {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("BitmapContext")
      .field("descriptor", &self.descriptor)
      .field("external", &matches!(self.storage, Storage::External { .. }))
      .finish()
  }
}
