//! Print Image Matching (0xC4A5).
//!
//! ```text
//! "PrintIM\0" | version (4 ascii) | 2 unused | entry count (u16)
//! then per entry: tag (u16) | value (u32)
//! ```

use exif_tree_types::exif::Endianness;
use winnow::{
    Parser as _,
    binary::{u16, u32},
    combinator::repeat,
    error::EmptyError,
    token::{literal, take},
};

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, payload,
    unparseable, wrong_kind,
};
use crate::{
    codec::winnow_endianness,
    context::ValueContext,
    error::{EncodeError, EncodeResult, ExifFieldResult},
};

const MAGIC: &[u8; 8] = b"PrintIM\0";
const HEADER_LEN: usize = 16;
const ENTRY_LEN: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PrintIm {
    pub version: String,
    pub chunks: Vec<(u16, u32)>,

    /// The bytes this was read from. Writing them back keeps anything the
    /// parsed fields miss.
    pub raw: Option<Vec<u8>>,
}

impl core::fmt::Display for PrintIm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Version: {}", self.version)
    }
}

/// Reads and writes [`UndefinedValue::PrintIm`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintImCodec;

impl UndefinedEncoder for PrintImCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::PrintIm(pim) = value else {
            return Err(wrong_kind(UndefinedKind::PrintIm, value));
        };

        if let Some(raw) = &pim.raw {
            let count = count_of(raw)?;
            return Ok((raw.clone(), count));
        }

        let mut version = [0_u8; 4];
        for (slot, b) in version.iter_mut().zip(pim.version.bytes()) {
            *slot = b;
        }

        let mut bytes = Vec::with_capacity(HEADER_LEN + ENTRY_LEN * pim.chunks.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&version);
        bytes.extend_from_slice(&[0, 0]);
        let entry_count =
            u16::try_from(pim.chunks.len()).map_err(|_| EncodeError::OffsetOverflow)?;
        bytes.extend_from_slice(&endianness.u16_to_bytes(entry_count));

        for (tag, value) in &pim.chunks {
            bytes.extend_from_slice(&endianness.u16_to_bytes(*tag));
            bytes.extend_from_slice(&endianness.u32_to_bytes(*value));
        }

        let count = count_of(&bytes)?;
        Ok((bytes, count))
    }
}

impl UndefinedDecoder for PrintImCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        let bytes = payload(ctx)?;
        let e = winnow_endianness(ctx.endianness());
        let input = &mut bytes.as_slice();

        let (_, version, _, entry_count): (_, &[u8], _, u16) =
            (literal(MAGIC.as_slice()), take(4_usize), take(2_usize), u16(e))
                .parse_next(input)
                .map_err(|_: EmptyError| {
                    unparseable(
                        ctx,
                        format!(
                            "PrintIM header needs the magic and ({HEADER_LEN}) bytes. got ({})",
                            bytes.len()
                        ),
                    )
                })?;
        let version = String::from_utf8_lossy(version).into_owned();

        let remaining = input.len();
        let chunks: Vec<(u16, u32)> = repeat(entry_count as usize, (u16(e), u32(e)))
            .parse_next(input)
            .map_err(|_: EmptyError| {
                unparseable(
                    ctx,
                    format!(
                        "PrintIM says it has ({entry_count}) entries, but that needs ({}) bytes. got ({remaining})",
                        ENTRY_LEN * entry_count as usize
                    ),
                )
            })?;

        Ok(UndefinedValue::PrintIm(PrintIm {
            version,
            chunks,
            raw: Some(bytes),
        }))
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{Endianness, ifd::IfdGroup};

    use super::{PrintIm, PrintImCodec};
    use crate::{
        undefined::{
            UndefinedDecoder as _, UndefinedEncoder as _, UndefinedValue,
            test_util::{far_context, far_context_in},
        },
        util::logger,
    };

    fn sample() -> PrintIm {
        PrintIm {
            version: "1234".into(),
            chunks: vec![(0x0001, 0x12345678), (0x4212, 0x90ABCDEF)],
            raw: None,
        }
    }

    #[test]
    fn encode() {
        logger();
        let (bytes, count) = PrintImCodec
            .encode(&UndefinedValue::PrintIm(sample()), Endianness::Big)
            .unwrap();

        let expected = [
            b'P', b'r', b'i', b'n', b't', b'I', b'M', 0x00, // magic
            b'1', b'2', b'3', b'4', // version
            0x00, 0x00, // unused
            0x00, 0x02, // entry count
            0x00, 0x01, 0x12, 0x34, 0x56, 0x78, // first
            0x42, 0x12, 0x90, 0xab, 0xcd, 0xef, // second
        ];
        assert_eq!(bytes, expected);
        assert_eq!(count, 28);
    }

    #[test]
    fn decode_keeps_raw() {
        logger();
        let (bytes, _) = PrintImCodec
            .encode(&UndefinedValue::PrintIm(sample()), Endianness::Big)
            .unwrap();
        let ctx = far_context(IfdGroup::Root, 0xC4A5, &bytes);

        let UndefinedValue::PrintIm(pim) = PrintImCodec.decode(&ctx).unwrap() else {
            panic!("wrong kind");
        };
        assert_eq!(pim.to_string(), "Version: 1234");
        assert_eq!(pim.chunks, sample().chunks);
        assert_eq!(pim.raw.as_deref(), Some(bytes.as_slice()));
    }

    #[test]
    fn rejects_bad_blobs() {
        logger();
        let short = far_context(IfdGroup::Root, 0xC4A5, b"PrintIM\0");
        assert!(PrintImCodec.decode(&short).is_err());

        let mut lying = b"PrintIM\x000300\0\0\0\x09".to_vec();
        lying.extend_from_slice(&[0; 6]);
        let lying = far_context(IfdGroup::Root, 0xC4A5, &lying);
        assert!(PrintImCodec.decode(&lying).is_err());
    }

    #[test]
    fn decode_little_endian() {
        logger();
        let (bytes, _) = PrintImCodec
            .encode(&UndefinedValue::PrintIm(sample()), Endianness::Little)
            .unwrap();
        assert_eq!(&bytes[14..16], [0x02, 0x00]);

        let ctx = far_context_in(IfdGroup::Root, 0xC4A5, &bytes, Endianness::Little);
        let UndefinedValue::PrintIm(pim) = PrintImCodec.decode(&ctx).unwrap() else {
            panic!("wrong kind");
        };
        assert_eq!(pim.version, "1234");
        assert_eq!(pim.chunks, sample().chunks);
    }

    #[test]
    fn rejects_wrong_magic() {
        logger();
        let mut bytes = b"PrintIX\x000300\0\0\0\0".to_vec();
        bytes.extend_from_slice(&[0; 4]);
        let ctx = far_context(IfdGroup::Root, 0xC4A5, &bytes);
        assert!(PrintImCodec.decode(&ctx).is_err());
    }
}
