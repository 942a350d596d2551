bitflags::bitflags! {
  /// Describes the layout of a bitmap's pixels: where the alpha channel lives (if anywhere), and
  /// the byte order of each pixel.
  ///
  /// The low bits hold an `AlphaInfo` value and the `BYTE_ORDER_MASK` bits hold a `ByteOrder`
  /// value. Neither is a set of independent flags, so use `alpha_info()` and `byte_order()` to
  /// read them back rather than `contains()`.
  #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
  pub struct BitmapInfo: u32 {
    const ALPHA_INFO_MASK = 0x1f;
    const BYTE_ORDER_MASK = 0x7000;

    const BYTE_ORDER_16_LITTLE = ByteOrder::Little16 as u32;
    const BYTE_ORDER_32_LITTLE = ByteOrder::Little32 as u32;
    const BYTE_ORDER_16_BIG = ByteOrder::Big16 as u32;
    const BYTE_ORDER_32_BIG = ByteOrder::Big32 as u32;
  }
}

impl BitmapInfo {
  /// Combines an alpha layout and a byte order into a `BitmapInfo`.
  pub const fn new(alpha: AlphaInfo, byte_order: ByteOrder) -> Self {
    BitmapInfo::from_bits_retain(alpha as u32 | byte_order as u32)
  }

  /// The alpha layout, or None if the bits hold a value the toolkit doesn't know.
  pub fn alpha_info(&self) -> Option<AlphaInfo> {
    AlphaInfo::from_bits(self.bits() & Self::ALPHA_INFO_MASK.bits())
  }

  /// The byte order, or None if the bits hold a value the toolkit doesn't know.
  pub fn byte_order(&self) -> Option<ByteOrder> {
    ByteOrder::from_bits(self.bits() & Self::BYTE_ORDER_MASK.bits())
  }
}

impl From<AlphaInfo> for BitmapInfo {
  fn from(alpha: AlphaInfo) -> Self {
    BitmapInfo::new(alpha, ByteOrder::Default)
  }
}

/// Where the alpha channel of a pixel is stored, and how color channels relate to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AlphaInfo {
  /// No alpha channel.
  None = 0,
  /// Alpha is the last channel and color channels are premultiplied by it.
  PremultipliedLast = 1,
  /// Alpha is the first channel and color channels are premultiplied by it.
  PremultipliedFirst = 2,
  /// Alpha is the last channel, with straight (non-premultiplied) color.
  Last = 3,
  /// Alpha is the first channel, with straight (non-premultiplied) color.
  First = 4,
  /// There is no alpha, but the last channel is unused padding.
  NoneSkipLast = 5,
  /// There is no alpha, but the first channel is unused padding.
  NoneSkipFirst = 6,
  /// The pixel is a single alpha channel with no color.
  Only = 7,
}
impl AlphaInfo {
  fn from_bits(bits: u32) -> Option<Self> {
    Some(match bits {
      0 => AlphaInfo::None,
      1 => AlphaInfo::PremultipliedLast,
      2 => AlphaInfo::PremultipliedFirst,
      3 => AlphaInfo::Last,
      4 => AlphaInfo::First,
      5 => AlphaInfo::NoneSkipLast,
      6 => AlphaInfo::NoneSkipFirst,
      7 => AlphaInfo::Only,
      _ => return None,
    })
  }

  /// Whether the pixel carries an alpha value.
  pub fn has_alpha(&self) -> bool {
    matches!(
      self,
      AlphaInfo::PremultipliedLast
        | AlphaInfo::PremultipliedFirst
        | AlphaInfo::Last
        | AlphaInfo::First
        | AlphaInfo::Only
    )
  }

  /// Whether color channels are stored premultiplied by alpha.
  pub fn is_premultiplied(&self) -> bool {
    matches!(self, AlphaInfo::PremultipliedLast | AlphaInfo::PremultipliedFirst)
  }
}

/// The order in which the bytes of a pixel are laid out in memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ByteOrder {
  /// The toolkit default, which is big endian.
  Default = 0,
  Little16 = 0x1000,
  Little32 = 0x2000,
  Big16 = 0x3000,
  Big32 = 0x4000,
}
impl ByteOrder {
  fn from_bits(bits: u32) -> Option<Self> {
    Some(match bits {
      0 => ByteOrder::Default,
      0x1000 => ByteOrder::Little16,
      0x2000 => ByteOrder::Little32,
      0x3000 => ByteOrder::Big16,
      0x4000 => ByteOrder::Big32,
      _ => return None,
    })
  }
}
