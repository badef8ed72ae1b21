//! Optoelectric conversion function (0x8828).
//!
//! ```text
//! columns (u16) | rows (u16) | column names (NUL-terminated) | srationals...
//! ```

use exif_tree_types::exif::{Endianness, primitives::SRational};
use winnow::{
    Parser as _,
    binary::u16,
    combinator::terminated,
    error::EmptyError,
    token::{any, take_until},
};

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, payload,
    unparseable, wrong_kind,
};
use crate::{
    codec::{self, winnow_endianness},
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Oecf {
    pub columns: u16,
    pub rows: u16,
    pub column_names: Vec<String>,
    pub values: Vec<SRational>,
}

impl core::fmt::Display for Oecf {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Tag8828Oecf<COLUMNS=({}) ROWS=({})>",
            self.columns, self.rows
        )
    }
}

/// Reads and writes [`UndefinedValue::Oecf`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OecfCodec;

impl UndefinedEncoder for OecfCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::Oecf(oecf) = value else {
            return Err(wrong_kind(UndefinedKind::Oecf, value));
        };

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&endianness.u16_to_bytes(oecf.columns));
        bytes.extend_from_slice(&endianness.u16_to_bytes(oecf.rows));

        for name in &oecf.column_names {
            bytes.extend_from_slice(name.as_bytes());
            bytes.push(0);
        }

        for value in &oecf.values {
            bytes.extend_from_slice(&endianness.i32_to_bytes(value.numerator));
            bytes.extend_from_slice(&endianness.i32_to_bytes(value.denominator));
        }

        let count = count_of(&bytes)?;
        Ok((bytes, count))
    }
}

impl UndefinedDecoder for OecfCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        let bytes = payload(ctx)?;
        let endianness = ctx.endianness();
        let e = winnow_endianness(endianness);
        let input = &mut bytes.as_slice();

        let (columns, rows) = (u16(e), u16(e))
            .parse_next(input)
            .map_err(|_: EmptyError| unparseable(ctx, "too short for the OECF dimensions"))?;

        // column names are NUL-terminated and can't be empty
        let mut column_names = Vec::with_capacity(columns as usize);
        for column in 0..columns {
            let name: &[u8] = terminated(take_until(0.., 0_u8), any)
                .parse_next(input)
                .map_err(|_: EmptyError| {
                    unparseable(ctx, format!("OECF column ({column}) has no end"))
                })?;
            if name.is_empty() {
                return Err(unparseable(ctx, format!("OECF column ({column}) has zero length")));
            }

            column_names.push(String::from_utf8_lossy(name).into_owned());
        }

        let rest = *input;
        if rest.len() % 8 != 0 {
            return Err(unparseable(
                ctx,
                format!("OECF signed-rationals not aligned: ({}) % (8) > 0", rest.len()),
            ));
        }

        let values = codec::parse_srationals(rest, (rest.len() / 8) as u32, endianness)?;

        Ok(UndefinedValue::Oecf(Oecf {
            columns,
            rows,
            column_names,
            values,
        }))
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{Endianness, ifd::IfdGroup, primitives::SRational};

    use super::{Oecf, OecfCodec};
    use crate::{
        undefined::{
            UndefinedDecoder as _, UndefinedEncoder as _, UndefinedValue,
            test_util::{far_context, far_context_in},
        },
        util::logger,
    };

    fn sample() -> UndefinedValue {
        UndefinedValue::Oecf(Oecf {
            columns: 2,
            rows: 22,
            column_names: vec!["aa".into(), "bb".into()],
            values: vec![SRational::new(11, 22)],
        })
    }

    #[test]
    fn encode() {
        logger();
        let (bytes, count) = OecfCodec.encode(&sample(), Endianness::Big).unwrap();

        let expected = [
            0x00, 0x02, // columns
            0x00, 0x16, // rows
            b'a', b'a', 0x00, b'b', b'b', 0x00, // names
            0x00, 0x00, 0x00, 0x0b, 0x00, 0x00, 0x00, 0x16, // 11/22
        ];
        assert_eq!(bytes, expected);
        assert_eq!(count, 18);
    }

    #[test]
    fn decode() {
        logger();
        let (bytes, _) = OecfCodec.encode(&sample(), Endianness::Big).unwrap();
        let ctx = far_context(IfdGroup::Exif, 0x8828, &bytes);

        let value = OecfCodec.decode(&ctx).unwrap();
        assert_eq!(value, sample());
        assert_eq!(value.to_string(), "Tag8828Oecf<COLUMNS=(2) ROWS=(22)>");
    }

    #[test]
    fn empty_column_name() {
        logger();
        let bytes = [0x00, 0x01, 0x00, 0x01, 0x00];
        let ctx = far_context(IfdGroup::Exif, 0x8828, &bytes);
        assert!(OecfCodec.decode(&ctx).is_err());
    }

    #[test]
    fn decode_little_endian() {
        logger();
        let (bytes, count) = OecfCodec.encode(&sample(), Endianness::Little).unwrap();
        assert_eq!(count, 18);
        assert_eq!(&bytes[..4], [0x02, 0x00, 0x16, 0x00]);

        let ctx = far_context_in(IfdGroup::Exif, 0x8828, &bytes, Endianness::Little);
        assert_eq!(OecfCodec.decode(&ctx).unwrap(), sample());
    }

    #[test]
    fn bad_layouts() {
        logger();
        let cases: [&[u8]; 3] = [
            // no room for the dimensions
            &[0x00, 0x01, 0x00],
            // column name never ends
            &[0x00, 0x01, 0x00, 0x01, b'a', b'b'],
            // rationals cut short
            &[0x00, 0x01, 0x00, 0x01, b'a', 0x00, 0x00, 0x00, 0x00, 0x01],
        ];

        for bytes in cases {
            let ctx = far_context(IfdGroup::Exif, 0x8828, bytes);
            assert!(OecfCodec.decode(&ctx).is_err(), "{bytes:?}");
        }
    }
}
