//! Walks the IFDs in an Exif blob.
//!
//! Bad entries are logged and skipped, so one broken tag doesn't cost you
//! the rest of the file. Only a broken header (or an unreachable first IFD)
//! stops a scan.

use core::convert::Infallible;

use rustc_hash::{FxHashMap, FxHashSet};
use winnow::{
    Parser as _,
    binary::{u16, u32},
    error::EmptyError,
    token::take,
};

use exif_tree_types::exif::{
    Endianness,
    ifd::{IfdGroup, IfdIdentity},
    primitives::PrimitiveTy,
    tags::KnownTag,
};

use crate::{
    codec::{self, winnow_endianness},
    error::{ExifFatalError, ExifFatalResult, VisitError},
    header::{ExifHeader, HEADER_LEN, parse_exif_header},
    ifd::{Exif, Ifd},
    tag_entry::IfdTagEntry,
    tag_index::TagIndex,
};

/// Thumbnail offset tag.
const JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;

/// Thumbnail length tag.
const JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202;

/// How a scan behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanOptions {
    /// Look for unknown tags in other IFDs, too.
    pub universal_search: bool,

    /// Follow pointers into child IFDs.
    pub descend: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            universal_search: false,
            descend: true,
        }
    }
}

impl ScanOptions {
    pub fn with_universal_search(mut self, enabled: bool) -> Self {
        self.universal_search = enabled;
        self
    }

    pub fn with_descend(mut self, enabled: bool) -> Self {
        self.descend = enabled;
        self
    }
}

/// Where a tag was found.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagPosition {
    pub fq_ifd_path: String,
    pub ifd_path: String,
    pub tag_id: u16,
}

/// Facts about a blob that aren't part of any one IFD.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiscellaneousExifData {
    /// Tags that aren't known in the IFD they were found in.
    ///
    /// When universal search is on, each maps to the tag with the same ID
    /// from another IFD, if there is one.
    pub unknown_tags: FxHashMap<TagPosition, Option<KnownTag>>,

    /// The largest offset the scan read up to.
    pub furthest_offset: u32,
}

/// Parses an Exif blob (starting at its TIFF header) with default options.
pub fn parse_exif(data: &[u8]) -> ExifFatalResult<Exif<'_>> {
    IfdEnumerate::new(data, TagIndex::new(), ScanOptions::default()).collect()
}

/// Reads IFDs out of a blob that starts with a TIFF header.
#[derive(Clone, Debug)]
pub struct IfdEnumerate<'a> {
    data: &'a [u8],
    tag_index: TagIndex,
    options: ScanOptions,
    furthest_offset: u32,
}

impl<'a> IfdEnumerate<'a> {
    pub fn new(data: &'a [u8], tag_index: TagIndex, options: ScanOptions) -> Self {
        Self {
            data,
            tag_index,
            options,
            furthest_offset: 0,
        }
    }

    /// The largest offset read by the last scan.
    pub fn furthest_offset(&self) -> u32 {
        self.furthest_offset
    }

    /// Calls `visitor` on every entry, depth-first.
    ///
    /// An entry that points at a child IFD is visited before that child's
    /// entries. After them come the rest of the parent's entries, then its
    /// sibling. If the visitor fails, the scan stops and returns its error.
    pub fn scan<E>(
        &mut self,
        mut visitor: impl FnMut(&IfdTagEntry<'a>) -> Result<(), E>,
    ) -> Result<MiscellaneousExifData, VisitError<E>> {
        self.walk(&mut visitor).map(|(_, _, misc)| misc)
    }

    /// Reads the whole tree.
    pub fn collect(&mut self) -> ExifFatalResult<Exif<'a>> {
        let mut visitor = |_: &IfdTagEntry<'a>| Ok::<(), Infallible>(());

        let (header, root, misc) = self.walk(&mut visitor).map_err(|e| match e {
            VisitError::Exif(e) => e,
            VisitError::Visitor(never) => match never {},
        })?;

        Ok(Exif { header, root, misc })
    }

    fn walk<E>(
        &mut self,
        visitor: &mut impl FnMut(&IfdTagEntry<'a>) -> Result<(), E>,
    ) -> Result<(ExifHeader, Ifd<'a>, MiscellaneousExifData), VisitError<E>> {
        let header = parse_exif_header(self.data)?;

        let unreachable = ExifFatalError::FirstIfdUnreachable {
            offset: header.first_ifd_offset,
            len: self.data.len(),
        };

        let mut tag_index = self.tag_index;
        if self.options.universal_search {
            tag_index = tag_index.with_universal_search(true);
        }

        let mut walker = Walker {
            data: self.data,
            endianness: header.endianness,
            tag_index,
            descend: self.options.descend,
            visited: FxHashSet::default(),
            misc: MiscellaneousExifData {
                furthest_offset: HEADER_LEN,
                ..Default::default()
            },
        };

        let root = walker
            .chain(IfdIdentity::root(), header.first_ifd_offset, visitor)
            .map_err(VisitError::Visitor)?
            .ok_or_else(|| {
                log::error!("Couldn't read the first IFD. err: {unreachable}");
                unreachable
            })?;

        self.furthest_offset = walker.misc.furthest_offset;
        log::debug!(
            "Finished scan. furthest offset: `{}`, unknown tags: `{}`",
            walker.misc.furthest_offset,
            walker.misc.unknown_tags.len()
        );

        Ok((header, root, walker.misc))
    }
}

/// A table entry before it's been checked.
struct RawEntry {
    tag_id: u16,
    ty: u16,
    unit_count: u32,
    value: [u8; 4],
}

fn parse_raw_entry(input: &mut &[u8], endianness: Endianness) -> Result<RawEntry, EmptyError> {
    let e = winnow_endianness(endianness);

    let (tag_id, ty, unit_count, value): (u16, u16, u32, &[u8]) =
        (u16(e), u16(e), u32(e), take(4_usize))
            .parse_next(input)
            .map_err(|err: EmptyError| err)?;
    let value: [u8; 4] = [value[0], value[1], value[2], value[3]];

    Ok(RawEntry {
        tag_id,
        ty,
        unit_count,
        value,
    })
}

struct Walker<'a> {
    data: &'a [u8],
    endianness: Endianness,
    tag_index: TagIndex,
    descend: bool,
    visited: FxHashSet<u32>,
    misc: MiscellaneousExifData,
}

impl<'a> Walker<'a> {
    fn touch(&mut self, end: u64) {
        let end = u32::try_from(end).unwrap_or(u32::MAX);
        self.misc.furthest_offset = self.misc.furthest_offset.max(end);
    }

    /// Reads an IFD and every sibling after it.
    fn chain<E>(
        &mut self,
        identity: IfdIdentity,
        offset: u32,
        visitor: &mut impl FnMut(&IfdTagEntry<'a>) -> Result<(), E>,
    ) -> Result<Option<Ifd<'a>>, E> {
        let mut ifds: Vec<Ifd<'a>> = Vec::new();
        let mut next = Some(offset);
        let mut index = identity.index();

        while let Some(offset) = next {
            if !self.visited.insert(offset) {
                log::warn!(
                    "IFD at offset `{offset}` was already read. Skipping it to avoid a cycle. \
                    path: [{}]",
                    identity.new_sibling(index)
                );
                break;
            }

            let Some(ifd) = self.ifd(identity.new_sibling(index), offset, visitor)? else {
                break;
            };

            next = (ifd.next_ifd_offset != 0).then_some(ifd.next_ifd_offset);
            ifds.push(ifd);
            index += 1;
        }

        // link the chain back to front
        let mut linked: Option<Ifd<'a>> = None;
        while let Some(mut ifd) = ifds.pop() {
            ifd.next_ifd = linked.map(Box::new);
            linked = Some(ifd);
        }

        Ok(linked)
    }

    /// Reads one IFD, along with its children.
    fn ifd<E>(
        &mut self,
        identity: IfdIdentity,
        offset: u32,
        visitor: &mut impl FnMut(&IfdTagEntry<'a>) -> Result<(), E>,
    ) -> Result<Option<Ifd<'a>>, E> {
        let e = winnow_endianness(self.endianness);

        let Some(table) = self.data.get(offset as usize..) else {
            log::warn!(
                "IFD [{identity}] is out of bounds. offset: `{offset}`, blob len: `{}`",
                self.data.len()
            );
            return Ok(None);
        };
        let input = &mut &table[..];

        let Ok(entry_count) = u16(e).parse_next(input).map_err(|_: EmptyError| ()) else {
            log::warn!("IFD [{identity}] has no entry count. offset: `{offset}`");
            return Ok(None);
        };
        log::trace!("Reading IFD [{identity}] at `{offset}` with `{entry_count}` entries...");

        let mut raw_entries = Vec::with_capacity(entry_count as usize);
        let mut truncated = false;
        for i in 0..entry_count {
            match parse_raw_entry(input, self.endianness) {
                Ok(raw) => raw_entries.push(raw),
                Err(_) => {
                    log::warn!(
                        "IFD [{identity}] was cut short. expected `{entry_count}` entries, got `{i}`"
                    );
                    truncated = true;
                    break;
                }
            }
        }

        let next_ifd_offset = if truncated {
            0
        } else {
            u32(e).parse_next(input).unwrap_or_else(|_: EmptyError| {
                log::warn!("IFD [{identity}] has no next-IFD offset.");
                0
            })
        };
        self.touch(offset as u64 + (table.len() - input.len()) as u64);

        let mut ifd = Ifd::new(identity.clone(), offset, self.endianness, self.tag_index);
        ifd.next_ifd_offset = next_ifd_offset;

        for (position, raw) in raw_entries.into_iter().enumerate() {
            let Some(entry) = self.entry(&identity, position, raw) else {
                continue;
            };

            visitor(&entry)?;

            let child = entry
                .child_ifd
                .filter(|_| self.descend)
                .map(|group| (group, entry.value_offset));
            let index = ifd.entries.len();
            ifd.push_entry(entry);

            let Some((group, child_offset)) = child else {
                continue;
            };

            log::trace!("Descending into [{group}] at `{child_offset}`.");
            if let Some(child) = self.chain(identity.new_child(group), child_offset, visitor)? {
                ifd.children.push((index, child));
            }
        }

        if identity.group() == IfdGroup::Root {
            ifd.thumbnail_data = self.thumbnail(&ifd);
        }

        Ok(Some(ifd))
    }

    /// Checks a raw entry, returning `None` (with a warning) if it can't be
    /// used.
    fn entry(
        &mut self,
        identity: &IfdIdentity,
        position: usize,
        raw: RawEntry,
    ) -> Option<IfdTagEntry<'a>> {
        let tag_id = raw.tag_id;

        let Ok(ty) = PrimitiveTy::try_from(raw.ty) else {
            log::warn!(
                "Tag (0x{tag_id:04x}) in [{identity}] has an unknown type. Skipping it. got: `{}`",
                raw.ty
            );
            return None;
        };

        let size = codec::byte_len(ty, raw.unit_count)
            .inspect_err(|e| {
                log::warn!("Tag (0x{tag_id:04x}) in [{identity}] is too large. Skipping it. err: {e}")
            })
            .ok()?;

        let value_offset = self.endianness.u32_from_bytes(raw.value);
        if size > 4 {
            let end = value_offset as u64 + size as u64;
            if end > self.data.len() as u64 {
                log::warn!(
                    "Value of tag (0x{tag_id:04x}) in [{identity}] is out of bounds. Skipping it. \
                    offset: `{value_offset}`, size: `{size}`, blob len: `{}`",
                    self.data.len()
                );
                return None;
            }
            self.touch(end);
        }

        let group = identity.group();
        let known = match KnownTag::try_from((group, tag_id)) {
            Ok(tag) if !tag.supports_type(ty) => {
                log::warn!(
                    "Tag `{}` in [{identity}] doesn't support type `{ty}`. Skipping it.",
                    tag.tag_name()
                );
                return None;
            }
            Ok(tag) => Some(tag),
            Err(_) => {
                let elsewhere = self
                    .tag_index
                    .universal_search()
                    .then(|| self.tag_index.find_first(tag_id, Some(ty)).ok())
                    .flatten();

                match elsewhere {
                    Some(tag) => log::warn!(
                        "Tag (0x{tag_id:04x}) isn't known in [{identity}]. It might be `{}` \
                        from [{}], written to the wrong IFD.",
                        tag.tag_name(),
                        tag.ifd_group()
                    ),
                    None => log::debug!("Tag (0x{tag_id:04x}) isn't known in [{identity}]."),
                }

                self.misc.unknown_tags.insert(
                    TagPosition {
                        fq_ifd_path: identity.fully_qualified_path(),
                        ifd_path: identity.unindexed_path(),
                        tag_id,
                    },
                    elsewhere,
                );
                elsewhere
            }
        };

        Some(IfdTagEntry {
            ifd: identity.clone(),
            tag_id,
            position,
            ty,
            unit_count: raw.unit_count,
            value_offset,
            raw_value_offset: raw.value,
            addressable: self.data,
            endianness: self.endianness,
            child_ifd: group.child_for_tag(tag_id),
            known,
        })
    }

    /// Grabs the thumbnail, if the IFD says where it is.
    fn thumbnail(&mut self, ifd: &Ifd<'a>) -> Option<&'a [u8]> {
        let first_long = |tag_id: u16| -> Option<u32> {
            let entry = ifd.find_tag_with_id(tag_id).ok()?.into_iter().next()?;
            entry.value_context().read_longs().ok()?.first().copied()
        };

        let offset = first_long(JPEG_INTERCHANGE_FORMAT)?;
        let len = first_long(JPEG_INTERCHANGE_FORMAT_LENGTH)?;

        let end = offset as u64 + len as u64;
        let Some(data) = self.data.get(offset as usize..end as usize) else {
            log::warn!(
                "Thumbnail in [{}] is out of bounds. offset: `{offset}`, len: `{len}`, blob len: `{}`",
                ifd.identity,
                self.data.len()
            );
            return None;
        };

        self.touch(end);
        Some(data)
    }
}
