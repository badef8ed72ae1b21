//! Text stored without a NUL, like version strings (`0230`) and the GPS
//! processing method.

use exif_tree_types::exif::{Endianness, primitives::PrimitiveTy};

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, wrong_kind,
};
use crate::{
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

/// Reads and writes [`UndefinedValue::Text`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TextCodec;

impl UndefinedEncoder for TextCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        _endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::Text(s) = value else {
            return Err(wrong_kind(UndefinedKind::Text, value));
        };

        let bytes = s.as_bytes().to_vec();
        let count = count_of(&bytes)?;
        Ok((bytes, count))
    }
}

impl UndefinedDecoder for TextCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        let mut ctx = ctx.clone();
        if ctx.ty() == PrimitiveTy::Undefined {
            ctx.set_undefined_type(PrimitiveTy::AsciiNoNul)?;
        }

        ctx.read_ascii_no_nul().map(UndefinedValue::Text)
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{Endianness, ifd::IfdGroup};

    use super::TextCodec;
    use crate::{
        undefined::{
            UndefinedDecoder as _, UndefinedEncoder as _, UndefinedValue, test_util::far_context,
        },
        util::logger,
    };

    #[test]
    fn gps_area_information() {
        logger();
        let encoded = b"some area, far away";
        let ctx = far_context(IfdGroup::Gps, 0x001C, encoded);

        let value = TextCodec.decode(&ctx).unwrap();
        assert_eq!(value, UndefinedValue::Text("some area, far away".into()));

        let (bytes, count) = TextCodec.encode(&value, Endianness::Little).unwrap();
        assert_eq!(bytes, encoded);
        assert_eq!(count, 19);
    }

    #[test]
    fn flashpix_version() {
        logger();
        let ctx = far_context(IfdGroup::Exif, 0xA000, b"0100");
        assert_eq!(TextCodec.decode(&ctx).unwrap().to_string(), "0100");
    }
}
