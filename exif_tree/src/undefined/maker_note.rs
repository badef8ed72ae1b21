//! `MakerNote` (0x927C). The layout belongs to each vendor, so it's kept as
//! bytes.

use exif_tree_types::exif::Endianness;

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, payload,
    wrong_kind,
};
use crate::{
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

/// How many leading bytes are kept as the "type ID".
const TYPE_ID_LEN: usize = 20;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MakerNote {
    /// The first few bytes. Vendors usually put a signature there.
    pub type_id: Vec<u8>,
    pub bytes: Vec<u8>,
}

impl MakerNote {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            type_id: bytes[..bytes.len().min(TYPE_ID_LEN)].to_vec(),
            bytes,
        }
    }
}

impl core::fmt::Display for MakerNote {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "MakerNote<TYPE-ID=[{}] LEN=({})>",
            crate::value::dump_bytes(&self.type_id),
            self.bytes.len()
        )
    }
}

/// Reads and writes [`UndefinedValue::MakerNote`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MakerNoteCodec;

impl UndefinedEncoder for MakerNoteCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        _endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::MakerNote(note) = value else {
            return Err(wrong_kind(UndefinedKind::MakerNote, value));
        };

        let count = count_of(&note.bytes)?;
        Ok((note.bytes.clone(), count))
    }
}

impl UndefinedDecoder for MakerNoteCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        payload(ctx).map(|bytes| UndefinedValue::MakerNote(MakerNote::new(bytes)))
    }
}
