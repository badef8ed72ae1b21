//! Everything needed to read one entry's value.

use exif_tree_types::exif::{
    Endianness,
    ifd::IfdIdentity,
    primitives::{PrimitiveTy, Rational, SRational},
};

use crate::{
    codec,
    error::{ExifFieldError, ExifFieldResult},
    value::Value,
};

/// Where an entry's value lives, and how to read it.
///
/// Small values are embedded in the entry's four value bytes. Others sit in
/// the addressable data, at the offset those four bytes hold.
///
/// `Undefined` entries can be told what type they "really" are with
/// [`ValueContext::set_undefined_type`]. From then on, every size and read
/// uses that type instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueContext<'a> {
    ifd: IfdIdentity,
    tag_id: u16,
    unit_count: u32,
    value_offset: u32,
    raw_value_offset: [u8; 4],
    addressable: &'a [u8],
    ty: PrimitiveTy,
    endianness: Endianness,
    effective_ty: Option<PrimitiveTy>,
}

impl<'a> ValueContext<'a> {
    #[expect(clippy::too_many_arguments, reason = "each field is needed to read a value")]
    pub fn new(
        ifd: IfdIdentity,
        tag_id: u16,
        unit_count: u32,
        value_offset: u32,
        raw_value_offset: [u8; 4],
        addressable: &'a [u8],
        ty: PrimitiveTy,
        endianness: Endianness,
    ) -> Self {
        Self {
            ifd,
            tag_id,
            unit_count,
            value_offset,
            raw_value_offset,
            addressable,
            ty,
            endianness,
            effective_ty: None,
        }
    }

    pub fn ifd(&self) -> &IfdIdentity {
        &self.ifd
    }

    pub fn tag_id(&self) -> u16 {
        self.tag_id
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

    pub fn addressable(&self) -> &'a [u8] {
        self.addressable
    }

    pub fn ty(&self) -> PrimitiveTy {
        self.ty
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Says what an `Undefined` value should be read as.
    pub fn set_undefined_type(&mut self, ty: PrimitiveTy) -> ExifFieldResult<()> {
        if self.ty != PrimitiveTy::Undefined {
            log::error!(
                "Tried to give tag (0x{:04x}) of type `{}` an effective type.",
                self.tag_id,
                self.ty
            );
            return Err(ExifFieldError::NotUndefined { ty: self.ty });
        }

        self.effective_ty = Some(ty);
        Ok(())
    }

    /// The type used for reads: the effective type, if one was set.
    pub fn effective_ty(&self) -> PrimitiveTy {
        match (self.ty, self.effective_ty) {
            (PrimitiveTy::Undefined, Some(effective)) => effective,
            (ty, _) => ty,
        }
    }

    pub fn size_in_bytes(&self) -> ExifFieldResult<u32> {
        codec::byte_len(self.effective_ty(), self.unit_count)
    }

    /// Whether the value fits in the entry itself.
    pub fn is_embedded(&self) -> ExifFieldResult<bool> {
        Ok(self.size_in_bytes()? <= 4)
    }

    /// The offset of the value in the addressable data, or `None` when it's
    /// embedded.
    pub fn far_offset(&self) -> ExifFieldResult<Option<u32>> {
        Ok((!self.is_embedded()?).then_some(self.value_offset))
    }

    /// Grabs the value's bytes, wherever they are.
    pub fn read_raw_encoded(&self) -> ExifFieldResult<&[u8]> {
        let size = self.size_in_bytes()?;

        if size <= 4 {
            return Ok(&self.raw_value_offset[..size as usize]);
        }

        let start = self.value_offset as usize;
        start
            .checked_add(size as usize)
            .and_then(|end| self.addressable.get(start..end))
            .ok_or(ExifFieldError::OffsetOutOfBounds {
                offset: self.value_offset,
                size,
                len: self.addressable.len(),
            })
            .inspect_err(|e| {
                log::warn!(
                    "Value for tag (0x{:04x}) in [{}] is unreachable. err: {e}",
                    self.tag_id,
                    self.ifd
                )
            })
    }

    /// Reads the value as whatever type it has.
    ///
    /// `Undefined` values need an effective type first. To decode them with
    /// their codec instead, use [`crate::undefined::decode`].
    pub fn typed_read(&self) -> ExifFieldResult<Value> {
        let ty = self.effective_ty();
        if ty == PrimitiveTy::Undefined {
            return Err(ExifFieldError::EffectiveTypeNotSet);
        }

        codec::parse_value(ty, self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_bytes(&self) -> ExifFieldResult<Vec<u8>> {
        codec::parse_bytes(self.read_raw_encoded()?, self.unit_count)
    }

    pub fn read_ascii(&self) -> ExifFieldResult<String> {
        codec::parse_ascii(self.read_raw_encoded()?, self.unit_count)
    }

    pub fn read_ascii_no_nul(&self) -> ExifFieldResult<String> {
        codec::parse_ascii_no_nul(self.read_raw_encoded()?, self.unit_count)
    }

    pub fn read_shorts(&self) -> ExifFieldResult<Vec<u16>> {
        codec::parse_shorts(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_longs(&self) -> ExifFieldResult<Vec<u32>> {
        codec::parse_longs(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_rationals(&self) -> ExifFieldResult<Vec<Rational>> {
        codec::parse_rationals(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_slongs(&self) -> ExifFieldResult<Vec<i32>> {
        codec::parse_slongs(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_srationals(&self) -> ExifFieldResult<Vec<SRational>> {
        codec::parse_srationals(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_floats(&self) -> ExifFieldResult<Vec<f32>> {
        codec::parse_floats(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    pub fn read_doubles(&self) -> ExifFieldResult<Vec<f64>> {
        codec::parse_doubles(self.read_raw_encoded()?, self.unit_count, self.endianness)
    }

    /// Renders the value. See [`Value::format`].
    pub fn format(&self) -> ExifFieldResult<String> {
        self.typed_read().map(|v| v.format())
    }

    /// Renders the first unit of the value. See [`Value::format_first`].
    pub fn format_first(&self) -> ExifFieldResult<String> {
        self.typed_read().map(|v| v.format_first())
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{
        Endianness,
        ifd::{IfdGroup, IfdIdentity},
        primitives::{PrimitiveTy, Rational},
    };

    use super::ValueContext;
    use crate::{error::ExifFieldError, util::logger, value::Value};

    fn ctx(
        ty: PrimitiveTy,
        unit_count: u32,
        raw: [u8; 4],
        addressable: &[u8],
    ) -> ValueContext<'_> {
        ValueContext::new(
            IfdIdentity::standard(IfdGroup::Exif),
            0x1234,
            unit_count,
            u32::from_be_bytes(raw),
            raw,
            addressable,
            ty,
            Endianness::Big,
        )
    }

    #[test]
    fn embedded_grid() {
        logger();
        let cases = [
            (PrimitiveTy::Byte, 4, true),
            (PrimitiveTy::Byte, 5, false),
            (PrimitiveTy::Ascii, 4, true),
            (PrimitiveTy::Short, 2, true),
            (PrimitiveTy::Short, 3, false),
            (PrimitiveTy::Long, 1, true),
            (PrimitiveTy::Long, 2, false),
            (PrimitiveTy::Rational, 1, false),
            (PrimitiveTy::Undefined, 4, true),
            (PrimitiveTy::Undefined, 5, false),
        ];

        for (ty, count, embedded) in cases {
            assert_eq!(
                ctx(ty, count, [0; 4], &[]).is_embedded(),
                Ok(embedded),
                "{ty} x {count}"
            );
        }
    }

    #[test]
    fn reads_embedded_and_far() {
        logger();
        let embedded = ctx(PrimitiveTy::Short, 2, [0x11, 0x22, 0x33, 0x44], &[]);
        assert_eq!(embedded.read_shorts(), Ok(vec![0x1122, 0x3344]));
        assert_eq!(embedded.far_offset(), Ok(None));

        let mut data = vec![0_u8; 8];
        data.extend_from_slice(&[0, 0, 0, 4, 0, 0, 0, 1]);
        let far = ctx(PrimitiveTy::Rational, 1, [0, 0, 0, 8], &data);
        assert_eq!(far.far_offset(), Ok(Some(8)));
        assert_eq!(
            far.typed_read(),
            Ok(Value::Rationals(vec![Rational::new(4, 1)]))
        );
        assert_eq!(far.format().as_deref(), Ok("[4/1]"));
    }

    #[test]
    fn far_value_out_of_bounds() {
        logger();
        let far = ctx(PrimitiveTy::Long, 2, [0, 0, 0, 4], &[0; 10]);
        assert_eq!(
            far.read_longs(),
            Err(ExifFieldError::OffsetOutOfBounds {
                offset: 4,
                size: 8,
                len: 10
            })
        );
    }

    #[test]
    fn effective_type_for_undefined() {
        logger();
        let mut undefined = ctx(PrimitiveTy::Undefined, 1, [0, 0, 0x12, 0x34], &[]);
        assert_eq!(
            undefined.format(),
            Err(ExifFieldError::EffectiveTypeNotSet)
        );

        undefined.set_undefined_type(PrimitiveTy::Long).unwrap();
        assert_eq!(undefined.size_in_bytes(), Ok(4));
        assert_eq!(undefined.read_longs(), Ok(vec![0x1234]));

        let mut short = ctx(PrimitiveTy::Short, 1, [0; 4], &[]);
        assert_eq!(
            short.set_undefined_type(PrimitiveTy::Long),
            Err(ExifFieldError::NotUndefined {
                ty: PrimitiveTy::Short
            })
        );
    }
}
