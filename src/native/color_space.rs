/// The color space used to interpret the color channels of a bitmap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColorSpace {
  /// Device-dependent RGB, with red, green and blue channels in that order.
  DeviceRgb,
  /// Device-dependent grayscale, with a single luminance channel.
  DeviceGray,
}
impl ColorSpace {
  /// The number of color channels in the color space, not counting alpha.
  pub fn components(&self) -> usize {
    match self {
      ColorSpace::DeviceRgb => 3,
      ColorSpace::DeviceGray => 1,
    }
  }
}
