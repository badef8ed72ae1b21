//! Turns builder trees into bytes.
//!
//! Each IFD is laid out as its table, then its data area, then each child
//! IFD (with the child's own data and children). The next sibling comes
//! after the last child.
//!
//! Offsets are found in two passes. A dry run sizes the table and the data
//! area. The real pass then knows where the data area starts and where the
//! first child goes.

use exif_tree_types::exif::Endianness;

use crate::{
    builder::{BuilderTag, BuilderTagValue, IfdBuilder},
    error::{EncodeError, EncodeResult},
    header::{HEADER_LEN, build_exif_header},
};

/// Bytes in one IFD table entry.
pub const ENTRY_LEN: u32 = 12;

/// Adds two offsets, failing if the result doesn't fit in a `u32`.
fn offset_add(a: u32, b: u32) -> EncodeResult<u32> {
    a.checked_add(b).ok_or_else(|| {
        log::error!("Offset overflowed while encoding. a: `{a}`, b: `{b}`");
        EncodeError::OffsetOverflow
    })
}

fn offset_from_len(len: usize) -> EncodeResult<u32> {
    u32::try_from(len).map_err(|_| EncodeError::OffsetOverflow)
}

/// Writes numbers in one byte order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteWriter {
    bytes: Vec<u8>,
    endianness: Endianness,
}

impl ByteWriter {
    pub fn new(endianness: Endianness) -> Self {
        Self {
            bytes: Vec::new(),
            endianness,
        }
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes
            .extend_from_slice(&self.endianness.u16_to_bytes(value));
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes
            .extend_from_slice(&self.endianness.u32_to_bytes(value));
    }

    /// Writes exactly four bytes, as-is.
    pub fn write_four_bytes(&mut self, bytes: &[u8]) -> EncodeResult<()> {
        if bytes.len() != 4 {
            return Err(EncodeError::NotFourBytes { got: bytes.len() });
        }

        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Hands out space in an IFD's data area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IfdDataAllocator {
    start: u32,
    data: Vec<u8>,
}

impl IfdDataAllocator {
    /// Makes an allocator whose first byte lives at `start`.
    pub fn new(start: u32) -> Self {
        Self {
            start,
            data: Vec::new(),
        }
    }

    /// Stores `value`, returning the offset it'll live at.
    pub fn allocate(&mut self, value: &[u8]) -> EncodeResult<u32> {
        let offset = self.next_offset()?;
        self.data.extend_from_slice(value);
        Ok(offset)
    }

    /// Where the next allocation will go.
    pub fn next_offset(&self) -> EncodeResult<u32> {
        offset_add(self.start, offset_from_len(self.data.len())?)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// One encoded IFD, plus the children written after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedIfd {
    /// Table, then data area, then child blocks.
    pub bytes: Vec<u8>,
    pub table_size: u32,
    pub data_size: u32,

    /// The size of each child block, in tag order.
    pub child_sizes: Vec<u32>,
}

/// Lays out [`IfdBuilder`] trees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IfdByteEncoder;

impl IfdByteEncoder {
    pub fn new() -> Self {
        Self
    }

    /// The size of a table with `entry_count` entries: the count, the
    /// entries, and the next-IFD offset.
    pub fn table_size(entry_count: usize) -> EncodeResult<u32> {
        let entries = offset_from_len(entry_count)?
            .checked_mul(ENTRY_LEN)
            .ok_or(EncodeError::OffsetOverflow)?;
        offset_add(entries, 2 + 4)
    }

    /// Writes one table entry.
    ///
    /// Values of four bytes or fewer are stored in the entry. Others go in
    /// the data area. Children are encoded at `next_ifd_offset_to_write`
    /// and returned, unless it's zero (a dry run), in which case the entry
    /// gets a zero offset.
    pub fn encode_tag_to_bytes(
        &self,
        ib: &IfdBuilder,
        tag: &BuilderTag,
        writer: &mut ByteWriter,
        allocator: &mut IfdDataAllocator,
        next_ifd_offset_to_write: u32,
    ) -> EncodeResult<Option<Vec<u8>>> {
        writer.write_u16(tag.tag_id);
        writer.write_u16(tag.ty.id());
        writer.write_u32(tag.unit_count);

        match &tag.value {
            BuilderTagValue::Bytes(bytes) if bytes.len() <= 4 => {
                let mut embedded = [0_u8; 4];
                embedded[..bytes.len()].copy_from_slice(bytes);
                writer.write_four_bytes(&embedded)?;
                Ok(None)
            }

            BuilderTagValue::Bytes(bytes) | BuilderTagValue::Blob(bytes) => {
                let offset = allocator.allocate(bytes)?;
                writer.write_u32(offset);
                Ok(None)
            }

            BuilderTagValue::Child(child) => {
                if next_ifd_offset_to_write == 0 {
                    writer.write_u32(0);
                    return Ok(None);
                }

                log::trace!(
                    "Encoding child IFD [{}] of [{}] at offset `{next_ifd_offset_to_write}`.",
                    child.identity(),
                    ib.identity()
                );
                let block = self.encode_and_attach_ifd(child, next_ifd_offset_to_write)?;
                writer.write_u32(next_ifd_offset_to_write);
                Ok(Some(block))
            }
        }
    }

    /// Encodes one IFD (not its siblings).
    ///
    /// The data area starts at `addressable_offset`, right after the table.
    /// Children are placed starting at `next_ifd_offset_to_write`. When
    /// `set_next` is true, the next-IFD field points just past the last
    /// child.
    pub fn encode_ifd_to_bytes(
        &self,
        ib: &IfdBuilder,
        addressable_offset: u32,
        mut next_ifd_offset_to_write: u32,
        set_next: bool,
    ) -> EncodeResult<EncodedIfd> {
        let table_size = Self::table_size(ib.tags().len())?;
        let entry_count =
            u16::try_from(ib.tags().len()).map_err(|_| EncodeError::OffsetOverflow)?;

        let mut writer = ByteWriter::new(ib.endianness());
        let mut allocator = IfdDataAllocator::new(addressable_offset);
        let mut child_blocks: Vec<Vec<u8>> = Vec::new();

        writer.write_u16(entry_count);
        for tag in ib.tags() {
            let child_block = self.encode_tag_to_bytes(
                ib,
                tag,
                &mut writer,
                &mut allocator,
                next_ifd_offset_to_write,
            )?;

            if let Some(block) = child_block {
                next_ifd_offset_to_write =
                    offset_add(next_ifd_offset_to_write, offset_from_len(block.len())?)?;
                child_blocks.push(block);
            }
        }

        writer.write_u32(if set_next { next_ifd_offset_to_write } else { 0 });

        let data = allocator.into_bytes();
        let data_size = offset_from_len(data.len())?;
        let child_sizes = child_blocks
            .iter()
            .map(|b| offset_from_len(b.len()))
            .collect::<EncodeResult<Vec<_>>>()?;

        let mut bytes = writer.into_bytes();
        bytes.extend_from_slice(&data);
        for block in child_blocks {
            bytes.extend_from_slice(&block);
        }

        Ok(EncodedIfd {
            bytes,
            table_size,
            data_size,
            child_sizes,
        })
    }

    /// Encodes an IFD, its children, and its siblings, with the first table
    /// at `ifd_offset`.
    pub fn encode_and_attach_ifd(&self, ib: &IfdBuilder, mut ifd_offset: u32) -> EncodeResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut current = Some(ib);

        while let Some(this) = current {
            if this.tags().is_empty() {
                log::error!("Can't encode IFD [{}] without any tags.", this.identity());
                return Err(EncodeError::EmptyIfd {
                    ifd_path: this.identity().fully_qualified_path(),
                });
            }

            // size things up first
            let dry = self.encode_ifd_to_bytes(this, ifd_offset, 0, false)?;
            let addressable_offset = offset_add(ifd_offset, dry.table_size)?;
            let next_ifd_offset_to_write = offset_add(addressable_offset, dry.data_size)?;

            let encoded = self.encode_ifd_to_bytes(
                this,
                addressable_offset,
                next_ifd_offset_to_write,
                this.next().is_some(),
            )?;
            log::debug!(
                "Encoded IFD [{}] at offset `{ifd_offset}`. table: `{}`, data: `{}`, children: `{:?}`",
                this.identity(),
                encoded.table_size,
                encoded.data_size,
                encoded.child_sizes
            );

            ifd_offset = offset_add(ifd_offset, offset_from_len(encoded.bytes.len())?)?;
            out.extend_from_slice(&encoded.bytes);
            current = this.next();
        }

        Ok(out)
    }
}

/// Encodes a tree without the TIFF header. The first IFD is placed as if
/// the header came right before it.
pub fn encode_to_exif_blob(ib: &IfdBuilder) -> EncodeResult<Vec<u8>> {
    IfdByteEncoder::new().encode_and_attach_ifd(ib, HEADER_LEN)
}

/// Encodes a tree into a complete Exif blob, header included.
///
/// ```
/// use exif_tree::{builder::IfdBuilder, encode::encode_to_exif};
/// use exif_tree_types::exif::Endianness;
///
/// let mut root = IfdBuilder::new_root(Endianness::Little);
/// root.add_standard_with_name("ImageWidth", vec![640_u32]).unwrap();
///
/// let exif = encode_to_exif(&root).unwrap();
/// assert_eq!(&exif[..8], b"II*\0\x08\0\0\0");
/// assert_eq!(exif.len(), 8 + 2 + 12 + 4);
/// ```
pub fn encode_to_exif(ib: &IfdBuilder) -> EncodeResult<Vec<u8>> {
    let mut exif = build_exif_header(ib.endianness(), HEADER_LEN);
    exif.extend(encode_to_exif_blob(ib)?);
    Ok(exif)
}
