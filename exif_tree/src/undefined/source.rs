//! `FileSource` (0xA300) and `SceneType` (0xA301).
//!
//! Both are a single `u32`, always read in the file's byte order.

use exif_tree_types::exif::{Endianness, primitives::PrimitiveTy};

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, unparseable, wrong_kind,
};
use crate::{
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

fn read_word(ctx: &ValueContext<'_>) -> ExifFieldResult<u32> {
    let mut ctx = ctx.clone();
    if ctx.ty() == PrimitiveTy::Undefined {
        ctx.set_undefined_type(PrimitiveTy::Long)?;
    }

    ctx.read_longs()?
        .first()
        .copied()
        .ok_or_else(|| unparseable(&ctx, "no value"))
}

/// Reads and writes [`UndefinedValue::FileSource`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSourceCodec;

impl UndefinedEncoder for FileSourceCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::FileSource(word) = value else {
            return Err(wrong_kind(UndefinedKind::FileSource, value));
        };

        Ok((endianness.u32_to_bytes(*word).to_vec(), 1))
    }
}

impl UndefinedDecoder for FileSourceCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        read_word(ctx).map(UndefinedValue::FileSource)
    }
}

/// Reads and writes [`UndefinedValue::SceneType`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneTypeCodec;

impl UndefinedEncoder for SceneTypeCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::SceneType(word) = value else {
            return Err(wrong_kind(UndefinedKind::SceneType, value));
        };

        Ok((endianness.u32_to_bytes(*word).to_vec(), 1))
    }
}

impl UndefinedDecoder for SceneTypeCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        read_word(ctx).map(UndefinedValue::SceneType)
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{
        Endianness,
        ifd::{IfdGroup, IfdIdentity},
        primitives::PrimitiveTy,
    };

    use super::{FileSourceCodec, SceneTypeCodec};
    use crate::{
        context::ValueContext,
        undefined::{UndefinedDecoder as _, UndefinedEncoder as _, UndefinedValue},
        util::logger,
    };

    #[test]
    fn file_source_is_one_embedded_long() {
        logger();
        let (bytes, count) = FileSourceCodec
            .encode(&UndefinedValue::FileSource(0x1234), Endianness::Big)
            .unwrap();
        assert_eq!(bytes, [0x00, 0x00, 0x12, 0x34]);
        assert_eq!(count, 1);

        // a count of one, but four bytes in the entry
        let ctx = ValueContext::new(
            IfdIdentity::standard(IfdGroup::Exif),
            0xA300,
            1,
            0,
            [0x00, 0x00, 0x12, 0x34],
            &[],
            PrimitiveTy::Undefined,
            Endianness::Big,
        );
        let value = FileSourceCodec.decode(&ctx).unwrap();
        assert_eq!(value, UndefinedValue::FileSource(0x1234));
        assert_eq!(value.to_string(), "0x00001234");
    }

    #[test]
    fn scene_type_follows_byte_order() {
        logger();
        let ctx = ValueContext::new(
            IfdIdentity::standard(IfdGroup::Exif),
            0xA301,
            1,
            0,
            [0x01, 0x00, 0x00, 0x00],
            &[],
            PrimitiveTy::Undefined,
            Endianness::Little,
        );
        assert_eq!(
            SceneTypeCodec.decode(&ctx).unwrap(),
            UndefinedValue::SceneType(1)
        );
    }
}
