//! The TIFF header at the start of every Exif blob.
//!
//! It's eight bytes long:
//!
//! ```text
//! "II" or "MM" | 0x002A | offset of the first IFD (u32)
//! ```

use winnow::{
    Parser as _, Stateful,
    binary::{u16, u32},
    error::EmptyError,
    token::take,
};

use exif_tree_types::exif::Endianness;

use crate::{
    codec::winnow_endianness,
    error::{ExifFatalError, ExifFatalResult},
};

/// The TIFF magic number.
pub const TIFF_MAGIC: u16 = 0x002A;

/// The size of a TIFF header.
pub const HEADER_LEN: u32 = 8;

/// A parsed TIFF header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExifHeader {
    pub endianness: Endianness,

    /// Where IFD 0 starts, counted from the first byte of the header.
    pub first_ifd_offset: u32,
}

impl core::fmt::Display for ExifHeader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "ExifHeader<BYTE-ORDER=[{:?}] FIRST-IFD-OFFSET=(0x{:02x})>",
            self.endianness, self.first_ifd_offset
        )
    }
}

/// Parses the header at the start of `data`.
pub fn parse_exif_header(data: &[u8]) -> ExifFatalResult<ExifHeader> {
    let input = &mut &data[..];

    let endianness: Endianness = parse_blob_endianness.parse_next(input)?;

    // from here on out, everything depends on the endianness
    let stateful_input = &mut Stream {
        input: *input,
        state: endianness,
    };

    parse_tiff_magic_number(stateful_input)?;
    let first_ifd_offset = parse_first_ifd_offset(stateful_input)?;

    let header = ExifHeader {
        endianness,
        first_ifd_offset,
    };
    log::trace!("Parsed header: {header}");
    Ok(header)
}

/// Makes the eight header bytes.
///
/// ```
/// use exif_tree::header::build_exif_header;
/// use exif_tree_types::exif::Endianness;
///
/// assert_eq!(
///     build_exif_header(Endianness::Big, 8),
///     [b'M', b'M', 0x00, 0x2a, 0x00, 0x00, 0x00, 0x08]
/// );
/// ```
pub fn build_exif_header(endianness: Endianness, first_ifd_offset: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    header.extend_from_slice(&endianness.marker());
    header.extend_from_slice(&endianness.u16_to_bytes(TIFF_MAGIC));
    header.extend_from_slice(&endianness.u32_to_bytes(first_ifd_offset));
    header
}

/// Finds the first TIFF header in `data` and returns everything from there
/// onwards.
///
/// A candidate only counts if the whole header parses.
pub fn search_and_extract_exif(data: &[u8]) -> ExifFatalResult<&[u8]> {
    const SIGNATURES: [[u8; 4]; 2] = [*b"II*\0", *b"MM\0*"];

    let found = data
        .windows(4)
        .enumerate()
        .filter(|(_, window)| SIGNATURES.iter().any(|s| s.as_slice() == *window))
        .find(|(i, _)| parse_exif_header(&data[*i..]).is_ok());

    match found {
        Some((i, _)) => {
            log::debug!("Found Exif header at offset `{i}`.");
            Ok(&data[i..])
        }
        None => {
            log::debug!("No Exif header in `{}` bytes.", data.len());
            Err(ExifFatalError::NoExif)
        }
    }
}

/// Finds the endianness of the Exif blob.
fn parse_blob_endianness(input: &mut &[u8]) -> ExifFatalResult<Endianness> {
    let input_len = input.len();

    let two_ascii_bytes: &[u8] = take(2_usize)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find endianness marker!");
            ExifFatalError::NoByteOrderMarker { len: input_len }
        })?;

    match two_ascii_bytes {
        b"II" => Ok(Endianness::Little).inspect(|f| log::trace!("It's LE: {f:?}")),
        b"MM" => Ok(Endianness::Big).inspect(|f| log::trace!("It's BE: {f:?}")),

        // found a weird bom!
        [a, b] => {
            let e = ExifFatalError::WeirdByteOrderMarker { found: [*a, *b] };
            log::error!("Couldn't parse out Exif! err: {e}");
            Err(e)
        }
        _ => unreachable!("winnow took exactly two bytes"),
    }
}

/// A stream of the blob wrapped with our endianness.
type Stream<'s> = Stateful<&'s [u8], Endianness>;

/// Ensures we're working with the correct kind of file.
fn parse_tiff_magic_number(input: &mut Stream) -> ExifFatalResult<()> {
    let endianness = winnow_endianness(input.state);

    let magic_number: u16 = u16(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find TIFF magic number!");
            ExifFatalError::NoTiffMagicNumber
        })?;

    if magic_number != TIFF_MAGIC {
        log::error!("Magic number wasn't for TIFF. got: `{magic_number}`");
        return Err(ExifFatalError::MagicNumberWasntTiff {
            found: magic_number,
        });
    }

    Ok(())
}

/// Grabs the offset of IFD 0.
fn parse_first_ifd_offset(input: &mut Stream) -> ExifFatalResult<u32> {
    let endianness = winnow_endianness(input.state);

    u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find the first IFD's offset!");
            ExifFatalError::NoFirstIfdOffset
        })
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::Endianness;

    use super::*;
    use crate::util::logger;

    #[test]
    fn parses_both_orders() {
        logger();
        assert_eq!(
            parse_exif_header(&[b'I', b'I', 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00]),
            Ok(ExifHeader {
                endianness: Endianness::Little,
                first_ifd_offset: 8
            })
        );
        assert_eq!(
            parse_exif_header(&build_exif_header(Endianness::Big, 0x1234)),
            Ok(ExifHeader {
                endianness: Endianness::Big,
                first_ifd_offset: 0x1234
            })
        );
    }

    #[test]
    fn rejects_bad_headers() {
        logger();
        assert_eq!(
            parse_exif_header(b"I"),
            Err(ExifFatalError::NoByteOrderMarker { len: 1 })
        );
        assert_eq!(
            parse_exif_header(b"XX\0*\0\0\0\x08"),
            Err(ExifFatalError::WeirdByteOrderMarker { found: *b"XX" })
        );
        assert_eq!(
            parse_exif_header(b"MM\0\x2b\0\0\0\x08"),
            Err(ExifFatalError::MagicNumberWasntTiff { found: 0x2b })
        );
        assert_eq!(
            parse_exif_header(b"MM\0*\0\0"),
            Err(ExifFatalError::NoFirstIfdOffset)
        );
        assert_eq!(
            parse_exif_header(b"MM\0"),
            Err(ExifFatalError::NoTiffMagicNumber)
        );
    }

    #[test]
    fn search_skips_junk() {
        logger();
        let mut data = b"junk II+\0 more junk".to_vec();
        let start = data.len();
        data.extend(build_exif_header(Endianness::Little, 8));

        let found = search_and_extract_exif(&data).unwrap();
        assert_eq!(found.len(), data.len() - start);
        assert_eq!(&found[..2], b"II");

        // a signature without the rest of a header doesn't count
        assert_eq!(
            search_and_extract_exif(b"nothing to see MM\0*\0"),
            Err(ExifFatalError::NoExif)
        );
    }
}
