/// An enumeration of the primitive types an IFD entry may hold.
///
/// The discriminants are the type IDs written on the wire, except for
/// [`PrimitiveTy::AsciiNoNul`], which never appears in a file.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    Undefined = 7,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,

    /// Mirrors `Ascii`, but has no trailing NUL.
    ///
    /// Some vendors store text this way (often inside `Undefined` fields), so
    /// we use it internally to read them without complaint.
    AsciiNoNul = 0xF0,
}

impl PrimitiveTy {
    /// Every type that may be stored in a file.
    pub const WIRE_TYPES: &'static [PrimitiveTy] = &[
        PrimitiveTy::Byte,
        PrimitiveTy::Ascii,
        PrimitiveTy::Short,
        PrimitiveTy::Long,
        PrimitiveTy::Rational,
        PrimitiveTy::Undefined,
        PrimitiveTy::SLong,
        PrimitiveTy::SRational,
        PrimitiveTy::Float,
        PrimitiveTy::Double,
    ];

    /// Grabs the primitive type's size in bytes.
    ///
    /// `Undefined` has no intrinsic size, so it returns `None`.
    ///
    /// ```
    /// use exif_tree_types::exif::primitives::PrimitiveTy;
    ///
    /// assert_eq!(PrimitiveTy::SLong.size_bytes(), Some(4_u8));
    /// assert_eq!(PrimitiveTy::Undefined.size_bytes(), None);
    /// ```
    pub const fn size_bytes(&self) -> Option<u8> {
        match self {
            PrimitiveTy::Byte | PrimitiveTy::Ascii | PrimitiveTy::AsciiNoNul => Some(1_u8),
            PrimitiveTy::Short => Some(2_u8),
            PrimitiveTy::Long | PrimitiveTy::SLong | PrimitiveTy::Float => Some(4_u8),
            PrimitiveTy::Rational | PrimitiveTy::SRational | PrimitiveTy::Double => Some(8_u8),
            PrimitiveTy::Undefined => None,
        }
    }

    /// The number of bytes one counted unit takes up on the wire.
    ///
    /// This is [`PrimitiveTy::size_bytes`], except that `Undefined` payloads
    /// are counted as runs of bytes.
    ///
    /// ```
    /// use exif_tree_types::exif::primitives::PrimitiveTy;
    ///
    /// assert_eq!(PrimitiveTy::Undefined.unit_size(), 1_u32);
    /// assert_eq!(PrimitiveTy::Rational.unit_size(), 8_u32);
    /// ```
    pub const fn unit_size(&self) -> u32 {
        match self.size_bytes() {
            Some(size) => size as u32,
            None => 1_u32,
        }
    }

    /// The name used when printing this type.
    pub const fn name(&self) -> &'static str {
        match self {
            PrimitiveTy::Byte => "BYTE",
            PrimitiveTy::Ascii => "ASCII",
            PrimitiveTy::Short => "SHORT",
            PrimitiveTy::Long => "LONG",
            PrimitiveTy::Rational => "RATIONAL",
            PrimitiveTy::Undefined => "UNDEFINED",
            PrimitiveTy::SLong => "SLONG",
            PrimitiveTy::SRational => "SRATIONAL",
            PrimitiveTy::Float => "FLOAT",
            PrimitiveTy::Double => "DOUBLE",
            PrimitiveTy::AsciiNoNul => "_ASCII_NO_NUL",
        }
    }

    /// The type ID as written in an IFD entry.
    pub const fn id(&self) -> u16 {
        *self as u16
    }
}

impl core::fmt::Display for PrimitiveTy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for PrimitiveTy {
    type Error = ();

    /// Only accepts types that may appear in a file.
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            7 => Ok(Self::Undefined),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),

            _ => Err(()),
        }
    }
}

/// How many primitives a tag is expected to carry.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveCount {
    /// Exactly this many.
    Known(u32),

    /// Any count, including zero.
    Any,

    /// Depends on other tags (e.g. strip offsets vs. rows per strip).
    SpecialHandling,
}

impl PrimitiveCount {
    /// Checks whether `count` is acceptable.
    ///
    /// ```
    /// use exif_tree_types::exif::primitives::PrimitiveCount;
    ///
    /// assert!(PrimitiveCount::Known(3).accepts(3));
    /// assert!(!PrimitiveCount::Known(3).accepts(4));
    /// assert!(PrimitiveCount::Any.accepts(4));
    /// ```
    pub const fn accepts(&self, count: u32) -> bool {
        match self {
            PrimitiveCount::Known(n) => *n == count,
            PrimitiveCount::Any | PrimitiveCount::SpecialHandling => true,
        }
    }
}

/// A fraction that can't be negative.
///
/// Both the numerator (top number) and denominator (bottom number) are always
/// positive numbers. Nothing reduces or divides them while parsing.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl core::fmt::Display for Rational {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A signed fraction.
///
/// Both the numerator (top number) and denominator (bottom number) can be
/// negative.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SRational {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl core::fmt::Display for SRational {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
