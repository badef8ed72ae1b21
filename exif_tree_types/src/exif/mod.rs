pub mod ifd;
pub mod primitives;
pub mod tags;

/// Each blob of Exif will start with a byte order marker - its endianness.
///
/// It's either `II` (Intel, for little-endian) or `MM` (Motorola, for
/// big-endian).
///
/// Every multi-byte number in the blob, including those inside most
/// `Undefined` payloads, follows this order.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}

/// Generates `<ty>_to_bytes` and `<ty>_from_bytes` on [`Endianness`].
macro_rules! endian_conversions {
    ($( $to:ident, $from:ident => $ty:ty ; )+) => {
        impl Endianness {
            $(
                #[doc = concat!("Writes a `", stringify!($ty), "` in this byte order.")]
                pub const fn $to(self, value: $ty) -> [u8; size_of::<$ty>()] {
                    match self {
                        Endianness::Little => value.to_le_bytes(),
                        Endianness::Big => value.to_be_bytes(),
                    }
                }

                #[doc = concat!("Reads a `", stringify!($ty), "` in this byte order.")]
                pub const fn $from(self, bytes: [u8; size_of::<$ty>()]) -> $ty {
                    match self {
                        Endianness::Little => <$ty>::from_le_bytes(bytes),
                        Endianness::Big => <$ty>::from_be_bytes(bytes),
                    }
                }
            )+
        }
    };
}

endian_conversions! {
    u16_to_bytes, u16_from_bytes => u16;
    u32_to_bytes, u32_from_bytes => u32;
    i32_to_bytes, i32_from_bytes => i32;
    f32_to_bytes, f32_from_bytes => f32;
    f64_to_bytes, f64_from_bytes => f64;
}

impl Endianness {
    /// The two-byte marker that starts a TIFF header.
    ///
    /// ```
    /// use exif_tree_types::exif::Endianness;
    ///
    /// assert_eq!(Endianness::Big.marker(), *b"MM");
    /// assert_eq!(Endianness::Big.u16_to_bytes(0x2a), [0x00, 0x2a]);
    /// ```
    pub const fn marker(self) -> [u8; 2] {
        match self {
            Endianness::Little => *b"II",
            Endianness::Big => *b"MM",
        }
    }
}
