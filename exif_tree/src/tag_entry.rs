//! One entry in a parsed IFD.

use exif_tree_types::exif::{
    Endianness,
    ifd::{IfdGroup, IfdIdentity},
    primitives::PrimitiveTy,
    tags::KnownTag,
};

use crate::{
    context::ValueContext,
    error::{ExifFieldError, ExifFieldResult},
    undefined::{self, UNKNOWN_PLACEHOLDER},
    value::Value,
};

/// A 12-byte entry from an IFD table.
///
/// The value isn't read until you ask for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfdTagEntry<'a> {
    pub(crate) ifd: IfdIdentity,
    pub(crate) tag_id: u16,
    pub(crate) position: usize,
    pub(crate) ty: PrimitiveTy,
    pub(crate) unit_count: u32,
    pub(crate) value_offset: u32,
    pub(crate) raw_value_offset: [u8; 4],
    pub(crate) addressable: &'a [u8],
    pub(crate) endianness: Endianness,
    pub(crate) child_ifd: Option<IfdGroup>,
    pub(crate) known: Option<KnownTag>,
}

impl<'a> IfdTagEntry<'a> {
    /// The IFD this entry was found in.
    pub fn ifd(&self) -> &IfdIdentity {
        &self.ifd
    }

    pub fn tag_id(&self) -> u16 {
        self.tag_id
    }

    /// Where this entry sat in its IFD's table.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn ty(&self) -> PrimitiveTy {
        self.ty
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    pub fn value_offset(&self) -> u32 {
        self.value_offset
    }

    pub fn raw_value_offset(&self) -> [u8; 4] {
        self.raw_value_offset
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The tag's definition, if it's one we know.
    pub fn known_tag(&self) -> Option<KnownTag> {
        self.known
    }

    pub fn tag_name(&self) -> Option<&'static str> {
        self.known.map(|t| t.tag_name())
    }

    /// The group of the IFD this entry points at, if it's a pointer tag.
    pub fn child_ifd_group(&self) -> Option<IfdGroup> {
        self.child_ifd
    }

    /// The unindexed path of the IFD this entry points at, like `IFD/Exif`.
    pub fn child_ifd_path(&self) -> Option<&'static str> {
        self.child_ifd.map(|g| g.path())
    }

    pub fn value_context(&self) -> ValueContext<'a> {
        ValueContext::new(
            self.ifd.clone(),
            self.tag_id,
            self.unit_count,
            self.value_offset,
            self.raw_value_offset,
            self.addressable,
            self.ty,
            self.endianness,
        )
    }

    pub fn is_embedded(&self) -> ExifFieldResult<bool> {
        self.value_context().is_embedded()
    }

    /// The value's encoded bytes, exactly as stored.
    pub fn raw_bytes(&self) -> ExifFieldResult<Vec<u8>> {
        self.value_context().read_raw_encoded().map(|b| b.to_vec())
    }

    /// Reads the value. `Undefined` values go through their codec.
    pub fn value(&self) -> ExifFieldResult<Value> {
        let ctx = self.value_context();

        if self.ty == PrimitiveTy::Undefined {
            return undefined::decode(&ctx).map(Value::Undefined);
        }

        ctx.typed_read()
    }

    /// Renders the value. `Undefined` values without a working codec show as
    /// [`UNKNOWN_PLACEHOLDER`].
    pub fn format(&self) -> ExifFieldResult<String> {
        if self.ty == PrimitiveTy::Undefined {
            return self.format_undefined();
        }

        self.value_context().format()
    }

    /// Renders the first unit of the value.
    pub fn format_first(&self) -> ExifFieldResult<String> {
        if self.ty == PrimitiveTy::Undefined {
            return self.format_undefined();
        }

        self.value_context().format_first()
    }

    fn format_undefined(&self) -> ExifFieldResult<String> {
        match undefined::decode(&self.value_context()) {
            Ok(v) => Ok(v.to_string()),
            Err(ExifFieldError::UnparseableValue { .. } | ExifFieldError::UnhandledUndefined { .. }) => {
                Ok(UNKNOWN_PLACEHOLDER.to_string())
            }
            Err(e) => Err(e),
        }
    }
}

impl core::fmt::Display for IfdTagEntry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "IfdTagEntry<TAG-IFD-PATH=[{}] TAG-ID=(0x{:04x}) TAG-TYPE=[{}] UNIT-COUNT=({})>",
            self.ifd, self.tag_id, self.ty, self.unit_count
        )
    }
}
