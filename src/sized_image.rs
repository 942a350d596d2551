use euclid::default::Size2D;

use crate::geometry::BitmapGeometry;
use crate::native::Image;

/// An `Image` with a size in logical units, for drawing at a size other than one logical unit per
/// pixel.
///
/// The `SizedImage` can be cloned, which shares the underlying `Image`.
#[derive(Debug, Clone)]
pub struct SizedImage {
  image: Image,
  size: Size2D<f64>,
}
impl SizedImage {
  /// Wraps `image`, with a logical size equal to its pixel size.
  pub fn new(image: Image) -> Self {
    Self::with_size(image, Size2D::zero())
  }

  /// Wraps `image` with a logical `size`.
  ///
  /// A zero size means the logical size is the image's pixel size.
  pub fn with_size(image: Image, size: Size2D<f64>) -> Self {
    let size = if size == Size2D::zero() {
      image.size().to_f64()
    } else {
      size
    };
    SizedImage { image, size }
  }

  /// The logical width.
  pub fn width(&self) -> f64 {
    self.size.width
  }
  /// The logical height.
  pub fn height(&self) -> f64 {
    self.size.height
  }
  /// The logical size.
  pub fn size(&self) -> Size2D<f64> {
    self.size
  }
  /// The image being wrapped.
  pub fn image(&self) -> &Image {
    &self.image
  }
}

impl From<Image> for SizedImage {
  fn from(image: Image) -> Self {
    SizedImage::new(image)
  }
}
