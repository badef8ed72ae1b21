//! Color filter array pattern (0xA302).
//!
//! ```text
//! horizontal repeat (u16) | vertical repeat (u16) | h * v bytes
//! ```

use exif_tree_types::exif::Endianness;
use winnow::{Parser as _, binary::u16, error::EmptyError, token::take};

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, payload,
    unparseable, wrong_kind,
};
use crate::{
    codec::winnow_endianness,
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CfaPattern {
    pub horizontal_repeat: u16,
    pub vertical_repeat: u16,
    pub values: Vec<u8>,
}

impl core::fmt::Display for CfaPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "TagA302CfaPattern<HORZ-REPEAT=({}) VERT-REPEAT=({}) CFA-VALUE=({})>",
            self.horizontal_repeat,
            self.vertical_repeat,
            self.values.len()
        )
    }
}

/// Reads and writes [`UndefinedValue::CfaPattern`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CfaPatternCodec;

impl UndefinedEncoder for CfaPatternCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::CfaPattern(cfa) = value else {
            return Err(wrong_kind(UndefinedKind::CfaPattern, value));
        };

        let mut bytes = Vec::with_capacity(4 + cfa.values.len());
        bytes.extend_from_slice(&endianness.u16_to_bytes(cfa.horizontal_repeat));
        bytes.extend_from_slice(&endianness.u16_to_bytes(cfa.vertical_repeat));
        bytes.extend_from_slice(&cfa.values);

        let count = count_of(&bytes)?;
        Ok((bytes, count))
    }
}

impl UndefinedDecoder for CfaPatternCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        let bytes = payload(ctx)?;
        let e = winnow_endianness(ctx.endianness());
        let input = &mut bytes.as_slice();

        let (horizontal_repeat, vertical_repeat) = (u16(e), u16(e))
            .parse_next(input)
            .map_err(|_: EmptyError| unparseable(ctx, "too short for the CFA dimensions"))?;

        // some writers cut the pattern short. keep what's there
        let expected = horizontal_repeat as usize * vertical_repeat as usize;
        if input.len() < expected {
            log::warn!(
                "CFA pattern is short. expected: `{expected}` bytes, got: `{}`",
                input.len()
            );
        }
        let values: &[u8] = take(expected.min(input.len()))
            .parse_next(input)
            .map_err(|_: EmptyError| unparseable(ctx, "CFA pattern values are unreadable"))?;
        let values = values.to_vec();

        Ok(UndefinedValue::CfaPattern(CfaPattern {
            horizontal_repeat,
            vertical_repeat,
            values,
        }))
    }
}
