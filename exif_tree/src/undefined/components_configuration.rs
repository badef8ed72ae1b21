//! `ComponentsConfiguration` (0x9101): which channel each of the four
//! components holds.

use exif_tree_types::exif::Endianness;

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, payload,
    unparseable, wrong_kind,
};
use crate::{
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

/// The layouts with a name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentsConfigurationId {
    Other,
    Rgb,
    YCbCr,
}

impl ComponentsConfigurationId {
    pub const RGB: [u8; 4] = [4, 5, 6, 0];
    pub const YCBCR: [u8; 4] = [1, 2, 3, 0];

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        match bytes {
            Self::RGB => Self::Rgb,
            Self::YCBCR => Self::YCbCr,
            _ => Self::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentsConfigurationId::Other => "OTHER",
            ComponentsConfigurationId::Rgb => "RGB",
            ComponentsConfigurationId::YCbCr => "YCBCR",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentsConfiguration {
    pub id: ComponentsConfigurationId,
    pub bytes: [u8; 4],
}

impl ComponentsConfiguration {
    pub fn new(bytes: [u8; 4]) -> Self {
        Self {
            id: ComponentsConfigurationId::from_bytes(bytes),
            bytes,
        }
    }
}

impl core::fmt::Display for ComponentsConfiguration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d] = self.bytes;
        write!(
            f,
            "Exif9101ComponentsConfiguration<ID=[{}] BYTES=[{a} {b} {c} {d}]>",
            self.id.name()
        )
    }
}

/// Reads and writes [`UndefinedValue::ComponentsConfiguration`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ComponentsConfigurationCodec;

impl UndefinedEncoder for ComponentsConfigurationCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        _endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::ComponentsConfiguration(config) = value else {
            return Err(wrong_kind(UndefinedKind::ComponentsConfiguration, value));
        };

        let bytes = config.bytes.to_vec();
        let count = count_of(&bytes)?;
        Ok((bytes, count))
    }
}

impl UndefinedDecoder for ComponentsConfigurationCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        let bytes = payload(ctx)?;

        let Some(&[a, b, c, d]) = bytes.first_chunk::<4>() else {
            return Err(unparseable(
                ctx,
                format!("components configuration needs (4) bytes, got ({})", bytes.len()),
            ));
        };

        Ok(UndefinedValue::ComponentsConfiguration(
            ComponentsConfiguration::new([a, b, c, d]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{Endianness, ifd::IfdGroup};

    use super::{ComponentsConfiguration, ComponentsConfigurationCodec, ComponentsConfigurationId};
    use crate::{
        undefined::{
            UndefinedDecoder as _, UndefinedEncoder as _, UndefinedValue, test_util::far_context,
        },
        util::logger,
    };

    #[test]
    fn names_known_layouts() {
        logger();
        let ctx = far_context(IfdGroup::Exif, 0x9101, &[4, 5, 6, 0]);
        let UndefinedValue::ComponentsConfiguration(config) =
            ComponentsConfigurationCodec.decode(&ctx).unwrap()
        else {
            panic!("wrong kind");
        };
        assert_eq!(config.id, ComponentsConfigurationId::Rgb);

        assert_eq!(
            ComponentsConfiguration::new([1, 2, 3, 0]).id,
            ComponentsConfigurationId::YCbCr
        );
    }

    #[test]
    fn display_and_encode() {
        logger();
        let value = UndefinedValue::ComponentsConfiguration(ComponentsConfiguration {
            id: ComponentsConfigurationId::Rgb,
            bytes: [0x11, 0x22, 0x33, 0x44],
        });
        assert_eq!(
            value.to_string(),
            "Exif9101ComponentsConfiguration<ID=[RGB] BYTES=[17 34 51 68]>"
        );

        let (bytes, count) = ComponentsConfigurationCodec
            .encode(&value, Endianness::Little)
            .unwrap();
        assert_eq!(bytes, [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(count, 4);
    }

    #[test]
    fn too_short() {
        logger();
        let ctx = far_context(IfdGroup::Exif, 0x9101, &[1, 2]);
        assert!(ComponentsConfigurationCodec.decode(&ctx).is_err());
    }
}
