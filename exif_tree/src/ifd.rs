//! The parsed IFD tree.

use rustc_hash::FxHashMap;

use exif_tree_types::exif::{
    Endianness,
    ifd::{IfdGroup, IfdIdentity, IfdIdentityPart},
};

use crate::{
    enumerate::MiscellaneousExifData,
    error::{LookupError, LookupResult},
    gps::GpsInfo,
    header::ExifHeader,
    tag_entry::IfdTagEntry,
    tag_index::TagIndex,
};

/// Everything read from one Exif blob.
#[derive(Clone, Debug, PartialEq)]
pub struct Exif<'a> {
    pub header: ExifHeader,

    /// IFD 0. Its siblings hang off of it.
    pub root: Ifd<'a>,

    /// Things noticed while reading that don't belong to any IFD.
    pub misc: MiscellaneousExifData,
}

impl<'a> Exif<'a> {
    /// Finds an IFD by its fully-qualified path, like `IFD1` or
    /// `IFD/Exif/Iop`.
    pub fn lookup(&self, fq_path: &str) -> LookupResult<&Ifd<'a>> {
        self.root.find_ifd_from_root(fq_path)
    }

    /// Every IFD, depth-first: an IFD, then its children, then its sibling.
    pub fn ifds(&self) -> Vec<&Ifd<'a>> {
        let mut out = Vec::new();
        self.root.collect_ifds(&mut out);
        out
    }

    pub fn dump_tree(&self) -> Vec<String> {
        self.root.dump_tree()
    }
}

/// A parsed image file directory.
#[derive(Clone, Debug, PartialEq)]
pub struct Ifd<'a> {
    pub(crate) identity: IfdIdentity,
    pub(crate) offset: u32,
    pub(crate) endianness: Endianness,
    pub(crate) tag_index: TagIndex,

    /// In table order.
    pub(crate) entries: Vec<IfdTagEntry<'a>>,
    pub(crate) entries_by_tag_id: FxHashMap<u16, Vec<usize>>,

    /// Each child, next to the position of the entry that points at it.
    pub(crate) children: Vec<(usize, Ifd<'a>)>,

    pub(crate) next_ifd_offset: u32,
    pub(crate) next_ifd: Option<Box<Ifd<'a>>>,

    pub(crate) thumbnail_data: Option<&'a [u8]>,
}

impl<'a> Ifd<'a> {
    pub(crate) fn new(
        identity: IfdIdentity,
        offset: u32,
        endianness: Endianness,
        tag_index: TagIndex,
    ) -> Self {
        Self {
            identity,
            offset,
            endianness,
            tag_index,
            entries: Vec::new(),
            entries_by_tag_id: FxHashMap::default(),
            children: Vec::new(),
            next_ifd_offset: 0,
            next_ifd: None,
            thumbnail_data: None,
        }
    }

    pub(crate) fn push_entry(&mut self, entry: IfdTagEntry<'a>) {
        self.entries_by_tag_id
            .entry(entry.tag_id)
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    pub fn identity(&self) -> &IfdIdentity {
        &self.identity
    }

    pub fn group(&self) -> IfdGroup {
        self.identity.group()
    }

    /// Where this IFD's table starts in the blob.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn entries(&self) -> &[IfdTagEntry<'a>] {
        &self.entries
    }

    pub fn children(&self) -> impl Iterator<Item = &Ifd<'a>> {
        self.children.iter().map(|(_, child)| child)
    }

    /// The child IFD that follows the entry at `position`, if any.
    pub fn child_at(&self, position: usize) -> Option<&Ifd<'a>> {
        self.children
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, child)| child)
    }

    pub fn next_ifd(&self) -> Option<&Ifd<'a>> {
        self.next_ifd.as_deref()
    }

    /// The offset stored in this IFD's "next" field. Zero means there isn't
    /// a sibling.
    pub fn next_ifd_offset(&self) -> u32 {
        self.next_ifd_offset
    }

    /// The unindexed path of the parent IFD, if this isn't a root IFD.
    pub fn parent_ifd_path(&self) -> Option<String> {
        self.identity.parent().map(|p| p.unindexed_path())
    }

    /// All entries with the given tag ID.
    ///
    /// Files may repeat a tag, so this can find more than one.
    pub fn find_tag_with_id(&self, tag_id: u16) -> LookupResult<Vec<&IfdTagEntry<'a>>> {
        match self.entries_by_tag_id.get(&tag_id) {
            Some(positions) if !positions.is_empty() => {
                Ok(positions.iter().map(|i| &self.entries[*i]).collect())
            }
            _ => Err(LookupError::TagNotFound {
                ifd_path: self.identity.fully_qualified_path(),
                tag_id,
            }),
        }
    }

    /// All entries with the given tag name.
    pub fn find_tag_with_name(&self, name: &str) -> LookupResult<Vec<&IfdTagEntry<'a>>> {
        let tag = self.tag_index.get_with_name(self.group(), name)?;
        self.find_tag_with_id(tag.tag_id())
    }

    /// Finds a child by its unindexed path, like `IFD/Exif`.
    pub fn child_with_ifd_path(&self, path: &str) -> LookupResult<&Ifd<'a>> {
        self.children()
            .find(|child| child.identity.unindexed_path() == path)
            .ok_or_else(|| LookupError::ChildIfdNotFound {
                ifd_path: self.identity.fully_qualified_path(),
                child_path: path.to_string(),
            })
    }

    /// Visits every entry in this IFD, its children, and its siblings.
    ///
    /// Children are visited right after the entry that points at them.
    pub fn enumerate_tags_recursively<E>(
        &self,
        visitor: &mut impl FnMut(&IfdTagEntry<'a>) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut current = Some(self);

        while let Some(ifd) = current {
            for (position, entry) in ifd.entries.iter().enumerate() {
                visitor(entry)?;

                if let Some(child) = ifd.child_at(position) {
                    child.enumerate_tags_recursively(visitor)?;
                }
            }

            current = ifd.next_ifd();
        }

        Ok(())
    }

    /// The thumbnail pointed to by `JPEGInterchangeFormat` and
    /// `JPEGInterchangeFormatLength`.
    pub fn thumbnail(&self) -> LookupResult<&'a [u8]> {
        self.thumbnail_data.ok_or(LookupError::NoThumbnail)
    }

    /// Reads the position and time out of a GPS IFD.
    pub fn gps_info(&self) -> LookupResult<GpsInfo> {
        GpsInfo::from_ifd(self)
    }

    /// Treating this IFD as the root, finds the IFD at a fully-qualified
    /// path.
    ///
    /// ```
    /// # use exif_tree::{builder::IfdBuilder, encode::encode_to_exif, enumerate::parse_exif};
    /// # use exif_tree_types::exif::{Endianness, ifd::IfdGroup};
    /// let mut root = IfdBuilder::new_root(Endianness::Big);
    /// root.add_standard_with_name("Make", "Canon").unwrap();
    ///
    /// let mut exif = root.new_child(IfdGroup::Exif).unwrap();
    /// exif.add_standard_with_name("ISOSpeed", vec![100_u32]).unwrap();
    /// root.add_child(exif).unwrap();
    ///
    /// let encoded = encode_to_exif(&root).unwrap();
    /// let parsed = parse_exif(&encoded).unwrap();
    ///
    /// let found = parsed.root.find_ifd_from_root("IFD/Exif").unwrap();
    /// assert_eq!(found.group(), IfdGroup::Exif);
    /// assert!(parsed.root.find_ifd_from_root("IFD1").is_err());
    /// ```
    pub fn find_ifd_from_root(&self, fq_path: &str) -> LookupResult<&Ifd<'a>> {
        let not_found = || LookupError::IfdNotFound {
            path: fq_path.to_string(),
        };

        let parts = parse_ifd_path(fq_path).ok_or_else(not_found)?;
        let Some((first, rest)) = parts.split_first() else {
            return Err(not_found());
        };

        if first.group != self.group() {
            return Err(not_found());
        }

        let mut current = self.sibling(first.index).ok_or_else(not_found)?;
        for part in rest {
            current = current
                .children()
                .find(|c| c.group() == part.group)
                .and_then(|c| c.sibling(part.index))
                .ok_or_else(not_found)?;
        }

        Ok(current)
    }

    /// Walks `index` steps down the sibling chain.
    fn sibling(&self, index: u32) -> Option<&Ifd<'a>> {
        let mut current = self;
        for _ in 0..index {
            current = current.next_ifd()?;
        }
        Some(current)
    }

    fn collect_ifds<'s>(&'s self, out: &mut Vec<&'s Ifd<'a>>) {
        let mut current = Some(self);
        while let Some(ifd) = current {
            out.push(ifd);
            for child in ifd.children() {
                child.collect_ifds(out);
            }
            current = ifd.next_ifd();
        }
    }

    /// Lists the tree from here down, one line per entry and IFD boundary.
    ///
    /// Siblings are included.
    pub fn dump_tree(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.dump_tree_into(&mut lines, 0);
        lines
    }

    fn dump_tree_into(&self, lines: &mut Vec<String>, level: usize) {
        let mut current = Some(self);

        while let Some(ifd) = current {
            let indent = "  ".repeat(level);
            let parent = ifd
                .parent_ifd_path()
                .unwrap_or_else(|| "ROOT".to_string());
            let path = ifd.identity.unindexed_path();
            let index = ifd.identity.index();

            lines.push(format!("{indent}> IFD [{parent}]->[{path}]:({index}) TOP"));
            for (position, entry) in ifd.entries.iter().enumerate() {
                lines.push(format!("{indent}  - (0x{:04x})", entry.tag_id));

                if let Some(child) = ifd.child_at(position) {
                    child.dump_tree_into(lines, level + 1);
                }
            }
            lines.push(format!("{indent}< IFD [{parent}]->[{path}]:({index}) BOTTOM"));

            current = ifd.next_ifd();
            if let Some(next) = current {
                lines.push(format!(
                    "{indent}* LINKING TO SIBLING IFD [{}]:({})",
                    next.identity.unindexed_path(),
                    next.identity.index()
                ));
            }
        }
    }
}

/// Splits a fully-qualified path like `IFD1/Exif` into its parts.
///
/// Returns `None` if any part isn't a group that can sit there.
pub fn parse_ifd_path(fq_path: &str) -> Option<Vec<IfdIdentityPart>> {
    let mut parts: Vec<IfdIdentityPart> = Vec::new();

    for component in fq_path.split('/') {
        let digits = component
            .bytes()
            .rev()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let (name, index) = component.split_at(component.len() - digits);
        let index: u32 = match index {
            "" => 0,
            i => i.parse().ok()?,
        };

        let candidates: &[IfdGroup] = match parts.last() {
            None => &[IfdGroup::Root],
            Some(parent) => parent.group.children(),
        };
        let group = candidates.iter().copied().find(|g| g.name() == name)?;

        parts.push(IfdIdentityPart { group, index });
    }

    Some(parts)
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::ifd::{IfdGroup, IfdIdentityPart};

    use super::parse_ifd_path;

    #[test]
    fn paths() {
        assert_eq!(
            parse_ifd_path("IFD1/Exif"),
            Some(vec![
                IfdIdentityPart {
                    group: IfdGroup::Root,
                    index: 1
                },
                IfdIdentityPart {
                    group: IfdGroup::Exif,
                    index: 0
                },
            ])
        );
        assert_eq!(
            parse_ifd_path("IFD/Exif/Iop").map(|p| p.len()),
            Some(3)
        );

        // GPS doesn't hang off of Exif
        assert_eq!(parse_ifd_path("IFD/Exif/GPSInfo"), None);
        assert_eq!(parse_ifd_path("Exif"), None);
        assert_eq!(parse_ifd_path(""), None);
    }
}
