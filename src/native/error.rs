/// The Error type for everything the bitmap toolkit can reject.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// A bitmap must be at least one pixel wide and one pixel tall.
  #[error("bitmap dimensions must be non-zero, got {width}x{height}")]
  InvalidDimensions { width: usize, height: usize },
  /// The combination of color space, component depth and bitmap info is not one the toolkit can
  /// read or write.
  #[error("unsupported pixel format: {0}")]
  UnsupportedFormat(&'static str),
  /// A row stride was given which can not hold a full row of pixels.
  #[error("row stride of {stride} bytes is smaller than the {minimum} bytes a row needs")]
  RowStrideTooSmall { stride: usize, minimum: usize },
  /// The pixel format has color channels but no color space was given to interpret them.
  #[error("pixel format requires a color space")]
  MissingColorSpace,
  /// A null data pointer was given where pixel memory was required.
  #[error("data pointer is null")]
  NullData,
  /// A data provider was asked to provide zero bytes.
  #[error("data provider is empty")]
  EmptyData,
  /// The data provider does not hold enough bytes for the image described.
  #[error("data provider holds {available} bytes but {required} are required")]
  BufferTooSmall { available: usize, required: usize },
  /// Computing the byte size of the bitmap overflowed.
  #[error("bitmap byte size overflows usize")]
  SizeOverflow,
}
