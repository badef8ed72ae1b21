//! Errors for every stage: parsing, value decoding, lookups, building, and
//! encoding.

use exif_tree_types::exif::{Endianness, ifd::IfdGroup, primitives::PrimitiveTy};

use crate::undefined::UndefinedKind;

/// A result where failure means there's no usable Exif at all.
pub type ExifFatalResult<T> = Result<T, ExifFatalError>;

/// A result for one field's value. These failures only affect that field.
pub type ExifFieldResult<T> = Result<T, ExifFieldError>;

/// A result for finding things in a tree (or in the tag tables).
pub type LookupResult<T> = Result<T, LookupError>;

/// A result from the builder or the encoder.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Parsing failed completely, and you aren't getting any Exif data at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExifFatalError {
    /// The input was too short to provide a byte order marker.
    NoByteOrderMarker { len: usize },

    /// The byte order marker was weird - it's not one of the two expected
    /// values (in ASCII, should be either `II` or `MM`).
    WeirdByteOrderMarker { found: [u8; 2] },

    /// Didn't find the TIFF magic number.
    NoTiffMagicNumber,

    /// The magic number indexes had a weird value. It's not TIFF's.
    MagicNumberWasntTiff { found: u16 },

    /// No offset to the first IFD was found.
    NoFirstIfdOffset,

    /// The first IFD's table couldn't be read from the blob.
    FirstIfdUnreachable { offset: u32, len: usize },

    /// Searched the whole input, but didn't find a TIFF header.
    NoExif,

    /// `max_block` must be `-1` (no limit) or non-negative.
    InvalidMaxBlock { got: isize },

    /// Reading from a `Read` source failed.
    Io { kind: std::io::ErrorKind },
}

impl winnow::error::ParserError<&[u8]> for ExifFatalError {
    type Inner = Self;

    fn from_input(_input: &&[u8]) -> Self {
        // every header parser maps its own errors, so the only generic
        // failure left is running out of input
        ExifFatalError::NoTiffMagicNumber
    }

    fn into_inner(self) -> winnow::Result<Self::Inner, Self> {
        Ok(self)
    }
}

impl core::fmt::Display for ExifFatalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoByteOrderMarker { len } => {
                write!(f, "No byte order marker was found. len: `{len}`")
            }
            Self::WeirdByteOrderMarker { found } => match core::str::from_utf8(found.as_slice()) {
                Ok(found_utf8_bom) => {
                    write!(f, "Got a weird byte-order marker: `{found_utf8_bom}`")
                }
                Err(_) => write!(f, "Got a weird byte-order marker - wasn't ASCII: {found:?}"),
            },
            Self::NoTiffMagicNumber => {
                f.write_str("No TIFF magic number found - the slice was likely cut short.")
            }
            Self::MagicNumberWasntTiff { found } => {
                write!(f, "Magic number was not TIFF! got: `{found}`")
            }
            Self::NoFirstIfdOffset => f.write_str("No offset to the first IFD was found."),
            Self::FirstIfdUnreachable { offset, len } => write!(
                f,
                "The first IFD is out of bounds. offset: `{offset}`, blob len: `{len}`"
            ),
            Self::NoExif => f.write_str("No Exif data was found in the input."),
            Self::InvalidMaxBlock { got } => write!(
                f,
                "`max_block` must be -1 or greater. got: `{got}`"
            ),
            Self::Io { kind } => write!(f, "Failed to read Exif data. kind: `{kind}`"),
        }
    }
}

impl core::error::Error for ExifFatalError {}

/// Something went wrong with one field's value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExifFieldError {
    /// There weren't enough bytes for the number of units we were asked for.
    InsufficientBytes {
        ty: PrimitiveTy,
        needed: usize,
        got: usize,
    },

    /// The entry's type ID isn't one we know.
    UnknownType { got: u16 },

    /// The value's offset (plus its size) is past the end of the blob.
    OffsetOutOfBounds { offset: u32, size: u32, len: usize },

    /// `unit_count * unit_size` doesn't fit in a `u32`.
    UnitCountOverflow { ty: PrimitiveTy, unit_count: u32 },

    /// An `Undefined` codec couldn't make sense of the payload.
    UnparseableValue { tag_id: u16, reason: String },

    /// No decoder is registered for this `Undefined` tag.
    UnhandledUndefined { ifd_path: String, tag_id: u16 },

    /// Only `Undefined` values may be given an effective type.
    NotUndefined { ty: PrimitiveTy },

    /// Tried to format an `Undefined` value without an effective type.
    EffectiveTypeNotSet,

    /// `Undefined` payloads go through their codec, not the primitive ones.
    UndefinedNeedsCodec,

    /// A string couldn't be turned into a value of the requested type.
    ParseFail { ty: PrimitiveTy, input: String },

    /// GPS coordinates need one orientation character and three rationals.
    BadGpsCoordinate { ref_len: usize, rationals: usize },
}

impl core::fmt::Display for ExifFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InsufficientBytes { ty, needed, got } => write!(
                f,
                "Not enough bytes to parse `{ty}` units. needed: `{needed}`, got: `{got}`"
            ),
            Self::UnknownType { got } => write!(f, "Encountered an unknown type! got: `{got}`"),
            Self::OffsetOutOfBounds { offset, size, len } => write!(
                f,
                "Value is out of bounds. offset: `{offset}`, size: `{size}`, blob len: `{len}`"
            ),
            Self::UnitCountOverflow { ty, unit_count } => write!(
                f,
                "Value size overflowed. ty: `{ty}`, unit count: `{unit_count}`"
            ),
            Self::UnparseableValue { tag_id, reason } => write!(
                f,
                "Couldn't parse value of tag (0x{tag_id:04x}). reason: {reason}"
            ),
            Self::UnhandledUndefined { ifd_path, tag_id } => write!(
                f,
                "No decoder for undefined-type tag (0x{tag_id:04x}) in [{ifd_path}]."
            ),
            Self::NotUndefined { ty } => write!(
                f,
                "Only undefined values can have an effective type. ty: `{ty}`"
            ),
            Self::EffectiveTypeNotSet => {
                f.write_str("An undefined value needs an effective type before it's formatted.")
            }
            Self::UndefinedNeedsCodec => {
                f.write_str("Undefined values must be read or written through their codec.")
            }
            Self::ParseFail { ty, input } => {
                write!(f, "Couldn't parse `{input}` as `{ty}`.")
            }
            Self::BadGpsCoordinate { ref_len, rationals } => write!(
                f,
                "GPS coordinates need one reference character and three rationals. \
                got: `{ref_len}` characters, `{rationals}` rationals"
            ),
        }
    }
}

impl core::error::Error for ExifFieldError {}

/// Couldn't find what was asked for.
///
/// [`LookupError::UnknownTag`] and [`LookupError::UnknownTagName`] mean the
/// tag tables don't know the tag at all, while [`LookupError::TagNotFound`]
/// means the tag is known but missing from the IFD.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LookupError {
    UnknownTag { group: IfdGroup, tag_id: u16 },
    UnknownTagName { group: IfdGroup, name: String },
    TagNotFound { ifd_path: String, tag_id: u16 },
    NoThumbnail,
    ChildIfdNotFound { ifd_path: String, child_path: String },
    IfdNotFound { path: String },
    NoGpsTags,
    GpsVersionUnsupported { got: Vec<u8> },
    WrongIfd { expected: IfdGroup, got: String },

    /// A value we needed couldn't be read.
    Field(ExifFieldError),
}

impl From<ExifFieldError> for LookupError {
    fn from(value: ExifFieldError) -> Self {
        LookupError::Field(value)
    }
}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownTag { group, tag_id } => {
                write!(f, "Tag (0x{tag_id:04x}) isn't known in [{group}].")
            }
            Self::UnknownTagName { group, name } => {
                write!(f, "Tag `{name}` isn't known in [{group}].")
            }
            Self::TagNotFound { ifd_path, tag_id } => {
                write!(f, "Tag (0x{tag_id:04x}) wasn't found in IFD [{ifd_path}].")
            }
            Self::NoThumbnail => f.write_str("No thumbnail is present."),
            Self::ChildIfdNotFound {
                ifd_path,
                child_path,
            } => write!(f, "IFD [{ifd_path}] has no child IFD [{child_path}]."),
            Self::IfdNotFound { path } => write!(f, "No IFD was found at [{path}]."),
            Self::NoGpsTags => f.write_str("The GPS IFD lacks the required position tags."),
            Self::GpsVersionUnsupported { got } => {
                write!(f, "GPS version isn't supported. got: `{got:?}`")
            }
            Self::WrongIfd { expected, got } => {
                write!(f, "Expected IFD [{expected}], but this is [{got}].")
            }
            Self::Field(e) => write!(f, "Failed to read value. err: {e}"),
        }
    }
}

impl core::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

/// Building or encoding an IFD tree failed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EncodeError {
    /// `write_four_bytes` got a slice of the wrong length.
    NotFourBytes { got: usize },

    /// The payload isn't a whole number of units.
    ValueSizeMismatch { ty: PrimitiveTy, len: usize },

    /// The tag tables say this tag can't hold this type.
    TypeNotSupported { tag_name: &'static str, ty: PrimitiveTy },

    /// A value couldn't be encoded.
    ValueEncode(ExifFieldError),

    /// No encoder is registered for this kind of `Undefined` value.
    NoEncoder { kind: UndefinedKind },

    /// An offset no longer fits in a `u32`.
    OffsetOverflow,

    /// The child's group doesn't hang off of this parent.
    NotChildIfd { parent: IfdGroup, child: IfdGroup },

    /// A child must use its parent's byte order.
    EndiannessMismatch { parent: Endianness, child: Endianness },

    /// The parent already has a child of this group.
    DuplicateChildIfd { ifd_path: String, child: IfdGroup },

    /// IFDs must have at least one entry.
    EmptyIfd { ifd_path: String },

    /// Thumbnails only belong in a root IFD.
    ThumbnailNotAllowed { ifd_path: String },

    /// The thumbnail given was empty.
    EmptyThumbnail,

    /// Finding a tag (or tag name) failed.
    Lookup(LookupError),
}

impl From<LookupError> for EncodeError {
    fn from(value: LookupError) -> Self {
        EncodeError::Lookup(value)
    }
}

impl From<ExifFieldError> for EncodeError {
    fn from(value: ExifFieldError) -> Self {
        EncodeError::ValueEncode(value)
    }
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFourBytes { got } => write!(f, "value is not four-bytes: ({got})"),
            Self::ValueSizeMismatch { ty, len } => write!(
                f,
                "Payload isn't a whole number of `{ty}` units. len: `{len}`"
            ),
            Self::TypeNotSupported { tag_name, ty } => {
                write!(f, "Tag `{tag_name}` doesn't support type `{ty}`.")
            }
            Self::ValueEncode(e) => write!(f, "Couldn't encode value. err: {e}"),
            Self::NoEncoder { kind } => {
                write!(f, "No encoder is registered for undefined values of kind `{kind:?}`.")
            }
            Self::OffsetOverflow => f.write_str("An offset overflowed while encoding."),
            Self::NotChildIfd { parent, child } => {
                write!(f, "IFD [{child}] can't be a child of [{parent}].")
            }
            Self::EndiannessMismatch { parent, child } => write!(
                f,
                "Child byte order `{child:?}` doesn't match parent byte order `{parent:?}`."
            ),
            Self::DuplicateChildIfd { ifd_path, child } => {
                write!(f, "IFD [{ifd_path}] already has a [{child}] child.")
            }
            Self::EmptyIfd { ifd_path } => write!(f, "IFD [{ifd_path}] has no tags."),
            Self::ThumbnailNotAllowed { ifd_path } => {
                write!(f, "Thumbnails only go in a root IFD, not [{ifd_path}].")
            }
            Self::EmptyThumbnail => f.write_str("The thumbnail was empty."),
            Self::Lookup(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::ValueEncode(e) => Some(e),
            Self::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

/// Registering a codec failed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegistryError {
    DuplicateEncoder { kind: UndefinedKind },
    DuplicateDecoder { group: IfdGroup, tag_id: u16 },
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateEncoder { kind } => {
                write!(f, "An encoder for `{kind:?}` is already registered.")
            }
            Self::DuplicateDecoder { group, tag_id } => write!(
                f,
                "A decoder for tag (0x{tag_id:04x}) in [{group}] is already registered."
            ),
        }
    }
}

impl core::error::Error for RegistryError {}

/// A scan stopped early, either because the Exif was broken or because the
/// visitor asked it to.
#[derive(Clone, Debug, PartialEq)]
pub enum VisitError<E> {
    Exif(ExifFatalError),
    Visitor(E),
}

impl<E> From<ExifFatalError> for VisitError<E> {
    fn from(value: ExifFatalError) -> Self {
        VisitError::Exif(value)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for VisitError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Exif(e) => write!(f, "{e}"),
            Self::Visitor(e) => write!(f, "Visitor stopped the scan. err: {e}"),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for VisitError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Exif(e) => Some(e),
            Self::Visitor(e) => Some(e),
        }
    }
}
