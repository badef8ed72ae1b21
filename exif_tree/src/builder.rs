//! Builds IFD trees for the encoder.
//!
//! A builder owns its tags, its children (as tag values), and its next
//! sibling. Values are encoded in the builder's byte order as they're added,
//! so the encoder only ever lays out bytes.

use exif_tree_types::exif::{
    Endianness,
    ifd::{IfdGroup, IfdIdentity},
    primitives::PrimitiveTy,
    tags::KnownTag,
};

use crate::{
    codec,
    error::{EncodeError, EncodeResult, LookupError, LookupResult},
    ifd::{Ifd, parse_ifd_path},
    tag_index::TagIndex,
    value::{Value, dump_bytes},
};

pub(crate) const JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;
pub(crate) const JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202;

/// What a [`BuilderTag`] holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuilderTagValue {
    /// The value, already encoded in the builder's byte order.
    Bytes(Vec<u8>),

    /// Bytes that always go in the data area, even when they're short. The
    /// entry stores their offset.
    ///
    /// Thumbnails are stored this way.
    Blob(Vec<u8>),

    /// A child IFD. The entry stores the child's offset.
    Child(Box<IfdBuilder>),
}

/// One tag in an [`IfdBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderTag {
    /// The group of the IFD holding this tag.
    pub group: IfdGroup,
    pub tag_id: u16,
    pub ty: PrimitiveTy,
    pub unit_count: u32,
    pub value: BuilderTagValue,
}

impl BuilderTag {
    pub fn new(
        group: IfdGroup,
        tag_id: u16,
        ty: PrimitiveTy,
        unit_count: u32,
        value: BuilderTagValue,
    ) -> Self {
        Self {
            group,
            tag_id,
            ty,
            unit_count,
            value,
        }
    }

    /// The child IFD, if this is a pointer tag.
    pub fn child_ifd(&self) -> Option<&IfdBuilder> {
        match &self.value {
            BuilderTagValue::Child(child) => Some(&**child),
            _ => None,
        }
    }
}

impl core::fmt::Display for BuilderTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "BuilderTag<IFD=[{}] TAG-ID=(0x{:04x}) TAG-TYPE=[{}] UNIT-COUNT=({}) VALUE=[",
            self.group, self.tag_id, self.ty, self.unit_count
        )?;

        match &self.value {
            BuilderTagValue::Bytes(bytes) => f.write_str(&dump_bytes(bytes))?,
            BuilderTagValue::Blob(bytes) => write!(f, "BLOB LEN=({})", bytes.len())?,
            BuilderTagValue::Child(child) => write!(f, "IFD {}", child.identity)?,
        }

        f.write_str("]>")
    }
}

/// An IFD under construction.
///
/// ```
/// use exif_tree::builder::IfdBuilder;
/// use exif_tree_types::exif::{Endianness, ifd::IfdGroup};
///
/// let mut root = IfdBuilder::new_root(Endianness::Little);
/// root.add_standard_with_name("Model", "EOS").unwrap();
///
/// let gps = root.new_child(IfdGroup::Gps).unwrap();
/// root.add_child(gps).unwrap();
///
/// // the pointer tag was made for us
/// assert_eq!(root.find_tag_with_name("GPSTag").unwrap().tag_id, 0x8825);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfdBuilder {
    identity: IfdIdentity,
    endianness: Endianness,
    tags: Vec<BuilderTag>,
    next: Option<Box<IfdBuilder>>,
    tag_index: TagIndex,
}

impl IfdBuilder {
    pub fn new(identity: IfdIdentity, endianness: Endianness) -> Self {
        Self {
            identity,
            endianness,
            tags: Vec::new(),
            next: None,
            tag_index: TagIndex::default(),
        }
    }

    /// A builder for `IFD`, the first root IFD.
    pub fn new_root(endianness: Endianness) -> Self {
        Self::new(IfdIdentity::root(), endianness)
    }

    /// Uses the given index for tag lookups.
    pub fn with_tag_index(mut self, tag_index: TagIndex) -> Self {
        self.tag_index = tag_index;
        self
    }

    /// Makes an empty builder for a child of this IFD.
    ///
    /// It isn't attached until you call [`IfdBuilder::add_child`].
    pub fn new_child(&self, group: IfdGroup) -> EncodeResult<Self> {
        if group.parent() != Some(self.group()) {
            return Err(EncodeError::NotChildIfd {
                parent: self.group(),
                child: group,
            });
        }

        Ok(Self::new(self.identity.new_child(group), self.endianness)
            .with_tag_index(self.tag_index))
    }

    pub fn identity(&self) -> &IfdIdentity {
        &self.identity
    }

    pub fn group(&self) -> IfdGroup {
        self.identity.group()
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn tag_index(&self) -> TagIndex {
        self.tag_index
    }

    /// The tags, in the order they'll be written.
    pub fn tags(&self) -> &[BuilderTag] {
        &self.tags
    }

    pub fn next(&self) -> Option<&IfdBuilder> {
        self.next.as_deref()
    }

    pub fn next_mut(&mut self) -> Option<&mut IfdBuilder> {
        self.next.as_deref_mut()
    }

    /// The attached child of the given group.
    pub fn child(&self, group: IfdGroup) -> Option<&IfdBuilder> {
        self.tags
            .iter()
            .filter_map(|t| t.child_ifd())
            .find(|c| c.group() == group)
    }

    /// Adds a tag to the end of this IFD.
    ///
    /// Child values get their group's pointer tag, whatever `tag_id` says.
    pub fn add(&mut self, tag: BuilderTag) -> EncodeResult<()> {
        let tag = self.prepare(tag)?;

        if let Some(child) = tag.child_ifd() {
            if self.child(child.group()).is_some() {
                return Err(EncodeError::DuplicateChildIfd {
                    ifd_path: self.identity.fully_qualified_path(),
                    child: child.group(),
                });
            }
        }

        log::trace!("Adding tag (0x{:04x}) to IFD [{}].", tag.tag_id, self.identity);
        self.tags.push(tag);
        Ok(())
    }

    /// Adds a value that's already encoded.
    ///
    /// The bytes must hold exactly `unit_count` units of `ty`.
    pub fn add_raw(
        &mut self,
        tag_id: u16,
        ty: PrimitiveTy,
        unit_count: u32,
        bytes: Vec<u8>,
    ) -> EncodeResult<()> {
        let expected = codec::byte_len(ty, unit_count)?;
        if expected as usize != bytes.len() {
            return Err(EncodeError::ValueSizeMismatch {
                ty,
                len: bytes.len(),
            });
        }

        self.add(BuilderTag::new(
            self.group(),
            tag_id,
            ty,
            unit_count,
            BuilderTagValue::Bytes(bytes),
        ))
    }

    /// Adds a known tag, encoding its value.
    ///
    /// The value's type must be one the tag accepts.
    pub fn add_standard(&mut self, tag_id: u16, value: impl Into<Value>) -> EncodeResult<()> {
        let tag = self.tag_index.get(self.group(), tag_id)?;
        let tag = self.standard_tag(tag, &value.into())?;
        self.add(tag)
    }

    /// Like [`IfdBuilder::add_standard`], but finds the tag by name.
    pub fn add_standard_with_name(&mut self, name: &str, value: impl Into<Value>) -> EncodeResult<()> {
        let tag = self.tag_index.get_with_name(self.group(), name)?;
        let tag = self.standard_tag(tag, &value.into())?;
        self.add(tag)
    }

    /// Attaches a child IFD, making its pointer tag.
    pub fn add_child(&mut self, child: IfdBuilder) -> EncodeResult<()> {
        self.add(BuilderTag::new(
            self.group(),
            0,
            PrimitiveTy::Long,
            1,
            BuilderTagValue::Child(Box::new(child)),
        ))
    }

    /// Makes `next` the sibling that follows this IFD, replacing any
    /// existing one.
    pub fn set_next(&mut self, mut next: IfdBuilder) -> EncodeResult<()> {
        if next.endianness != self.endianness {
            return Err(EncodeError::EndiannessMismatch {
                parent: self.endianness,
                child: next.endianness,
            });
        }

        next.reindex(self.identity.new_sibling(self.identity.index() + 1));
        self.next = Some(Box::new(next));
        Ok(())
    }

    /// Removes the next sibling, returning it.
    pub fn take_next(&mut self) -> Option<IfdBuilder> {
        self.next.take().map(|next| *next)
    }

    /// Replaces the first tag with `tag_id`.
    pub fn replace(&mut self, tag_id: u16, tag: BuilderTag) -> EncodeResult<()> {
        let position = self.find(tag_id)?;
        self.replace_at(position, tag)
    }

    /// Replaces the tag at `position`.
    pub fn replace_at(&mut self, position: usize, tag: BuilderTag) -> EncodeResult<()> {
        let tag = self.prepare(tag)?;
        let ifd_path = self.identity.fully_qualified_path();

        let Some(slot) = self.tags.get_mut(position) else {
            return Err(LookupError::TagNotFound {
                ifd_path,
                tag_id: tag.tag_id,
            }
            .into());
        };

        *slot = tag;
        Ok(())
    }

    /// Replaces the first tag with the same ID, or adds the tag if there
    /// isn't one.
    pub fn set(&mut self, tag: BuilderTag) -> EncodeResult<()> {
        let tag = self.prepare(tag)?;

        match self.find(tag.tag_id) {
            Ok(position) => self.replace_at(position, tag),
            Err(_) => self.add(tag),
        }
    }

    /// Like [`IfdBuilder::set`], encoding the value of a known tag.
    pub fn set_standard(&mut self, tag_id: u16, value: impl Into<Value>) -> EncodeResult<()> {
        let tag = self.tag_index.get(self.group(), tag_id)?;
        let tag = self.standard_tag(tag, &value.into())?;
        self.set(tag)
    }

    pub fn set_standard_with_name(&mut self, name: &str, value: impl Into<Value>) -> EncodeResult<()> {
        let tag = self.tag_index.get_with_name(self.group(), name)?;
        let tag = self.standard_tag(tag, &value.into())?;
        self.set(tag)
    }

    /// Deletes the first `n` tags with `tag_id`.
    ///
    /// Fails with [`LookupError::TagNotFound`] if there were fewer than `n`.
    /// The ones found before that are still deleted.
    pub fn delete_n(&mut self, tag_id: u16, n: usize) -> LookupResult<()> {
        for _ in 0..n {
            let position = self.find(tag_id)?;
            self.tags.remove(position);
        }

        Ok(())
    }

    pub fn delete_first(&mut self, tag_id: u16) -> LookupResult<()> {
        self.delete_n(tag_id, 1)
    }

    /// Deletes every tag with `tag_id`, returning how many there were.
    pub fn delete_all(&mut self, tag_id: u16) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| t.tag_id != tag_id);
        before - self.tags.len()
    }

    /// Positions of the tags with `tag_id`. A `max_found` of zero means no
    /// limit.
    pub fn find_n(&self, tag_id: u16, max_found: usize) -> Vec<usize> {
        let limit = match max_found {
            0 => usize::MAX,
            n => n,
        };

        self.tags
            .iter()
            .enumerate()
            .filter(|(_, t)| t.tag_id == tag_id)
            .map(|(i, _)| i)
            .take(limit)
            .collect()
    }

    /// Position of the first tag with `tag_id`.
    pub fn find(&self, tag_id: u16) -> LookupResult<usize> {
        self.find_n(tag_id, 1)
            .first()
            .copied()
            .ok_or_else(|| LookupError::TagNotFound {
                ifd_path: self.identity.fully_qualified_path(),
                tag_id,
            })
    }

    pub fn find_tag(&self, tag_id: u16) -> LookupResult<&BuilderTag> {
        let position = self.find(tag_id)?;
        self.tags.get(position).ok_or(LookupError::TagNotFound {
            ifd_path: self.identity.fully_qualified_path(),
            tag_id,
        })
    }

    pub fn find_tag_with_name(&self, name: &str) -> LookupResult<&BuilderTag> {
        let tag = self.tag_index.get_with_name(self.group(), name)?;
        self.find_tag(tag.tag_id())
    }

    /// Stores a thumbnail, writing both `JPEGInterchangeFormat` and
    /// `JPEGInterchangeFormatLength`.
    ///
    /// Only root IFDs (usually `IFD1`) may hold one.
    pub fn set_thumbnail(&mut self, data: Vec<u8>) -> EncodeResult<()> {
        if self.group() != IfdGroup::Root {
            log::error!("Tried to put a thumbnail in IFD [{}].", self.identity);
            return Err(EncodeError::ThumbnailNotAllowed {
                ifd_path: self.identity.fully_qualified_path(),
            });
        }

        if data.is_empty() {
            return Err(EncodeError::EmptyThumbnail);
        }

        let len = u32::try_from(data.len()).map_err(|_| EncodeError::OffsetOverflow)?;
        let length_bytes = self.endianness.u32_to_bytes(len).to_vec();

        self.set(BuilderTag::new(
            IfdGroup::Root,
            JPEG_INTERCHANGE_FORMAT,
            PrimitiveTy::Long,
            1,
            BuilderTagValue::Blob(data),
        ))?;
        self.set(BuilderTag::new(
            IfdGroup::Root,
            JPEG_INTERCHANGE_FORMAT_LENGTH,
            PrimitiveTy::Long,
            1,
            BuilderTagValue::Bytes(length_bytes),
        ))
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        match &self.find_tag(JPEG_INTERCHANGE_FORMAT).ok()?.value {
            BuilderTagValue::Blob(data) => Some(data),
            _ => None,
        }
    }

    /// Finds the builder at a fully-qualified path (like `IFD1/Exif`),
    /// treating this builder as `IFD`. Missing IFDs along the way are made
    /// empty.
    pub fn get_or_create_child(&mut self, fq_path: &str) -> EncodeResult<&mut IfdBuilder> {
        let not_found = || LookupError::IfdNotFound {
            path: fq_path.to_string(),
        };

        let parts = parse_ifd_path(fq_path).ok_or_else(not_found)?;
        let Some((first, rest)) = parts.split_first() else {
            return Err(not_found().into());
        };
        if first.group != self.group() {
            return Err(not_found().into());
        }

        let mut current = self.sibling_or_insert(first.index);
        for part in rest {
            current = current
                .child_or_insert(part.group)?
                .sibling_or_insert(part.index);
        }

        Ok(current)
    }

    fn sibling_or_insert(&mut self, index: u32) -> &mut IfdBuilder {
        let mut current = self;

        for _ in 0..index {
            let identity = current.identity.new_sibling(current.identity.index() + 1);
            let (endianness, tag_index) = (current.endianness, current.tag_index);

            current = &mut **current.next.get_or_insert_with(|| {
                log::debug!("Creating sibling IFD [{identity}].");
                Box::new(IfdBuilder::new(identity, endianness).with_tag_index(tag_index))
            });
        }

        current
    }

    fn child_or_insert(&mut self, group: IfdGroup) -> EncodeResult<&mut IfdBuilder> {
        let position = match self.tags.iter().position(|t| {
            t.child_ifd().is_some_and(|c| c.group() == group)
        }) {
            Some(position) => position,
            None => {
                log::debug!("Creating child IFD [{group}] under [{}].", self.identity);
                let child = self.new_child(group)?;
                self.add_child(child)?;
                self.tags.len() - 1
            }
        };

        match self.tags.get_mut(position).map(|t| &mut t.value) {
            Some(BuilderTagValue::Child(child)) => Ok(child.as_mut()),
            _ => Err(LookupError::ChildIfdNotFound {
                ifd_path: self.identity.fully_qualified_path(),
                child_path: group.path().to_string(),
            }
            .into()),
        }
    }

    /// Lists every IFD and tag from here down, siblings included.
    pub fn dump_to_strings(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.dump_into(&mut lines, "", 0);
        lines
    }

    fn dump_into(&self, lines: &mut Vec<String>, prefix: &str, pointer_tag_id: u16) {
        let mut current = Some(self);
        let mut index = 0;

        while let Some(ib) = current {
            let fq_path = ib.identity.fully_qualified_path();
            let ifd_tag_id = ib.group().pointer_tag_id().unwrap_or(0);

            lines.push(format!(
                "IFD<PARENTS=[{prefix}] FQ-IFD-PATH=[{fq_path}] IFD-INDEX=({index}) \
                IFD-TAG-ID=(0x{ifd_tag_id:04x}) TAG=[0x{pointer_tag_id:04x}]>"
            ));

            for (position, tag) in ib.tags.iter().enumerate() {
                let child = tag.child_ifd();
                let child_path = child.map(|c| c.identity.unindexed_path()).unwrap_or_default();

                lines.push(format!(
                    "TAG<PARENTS=[{prefix}] FQ-IFD-PATH=[{fq_path}] IFD-TAG-ID=(0x{ifd_tag_id:04x}) \
                    CHILD-IFD=[{child_path}] TAG-INDEX=({position}) TAG=[0x{:04x}]>",
                    tag.tag_id
                ));

                if let Some(child) = child {
                    let own_path = ib.identity.unindexed_path();
                    let child_prefix = match prefix {
                        "" => own_path,
                        p => format!("{p}->{own_path}"),
                    };
                    child.dump_into(lines, &child_prefix, tag.tag_id);
                }
            }

            current = ib.next();
            index += 1;
        }
    }

    /// Makes builders for a parsed IFD, its children, and its siblings.
    ///
    /// Payloads are copied as stored, so an unchanged tree encodes back to
    /// the same tag bytes.
    pub fn from_existing_chain(ifd: &Ifd<'_>) -> EncodeResult<Self> {
        let mut chain = Vec::new();
        let mut current = Some(ifd);

        while let Some(ifd) = current {
            let mut ib = Self::new(ifd.identity().clone(), ifd.endianness())
                .with_tag_index(ifd.tag_index);
            ib.add_tags_from_existing(ifd, None, None)?;
            chain.push(ib);
            current = ifd.next_ifd();
        }

        // link back to front so each builder owns the rest of the chain
        let mut next: Option<IfdBuilder> = None;
        while let Some(mut ib) = chain.pop() {
            ib.next = next.map(Box::new);
            next = Some(ib);
        }

        next.ok_or_else(|| {
            EncodeError::EmptyIfd {
                ifd_path: ifd.identity().fully_qualified_path(),
            }
        })
    }

    /// Copies tags out of a parsed IFD.
    ///
    /// With `include`, only those IDs are copied. IDs in `exclude` are
    /// skipped. Child IFDs come along with their pointer tags.
    pub fn add_tags_from_existing(
        &mut self,
        ifd: &Ifd<'_>,
        include: Option<&[u16]>,
        exclude: Option<&[u16]>,
    ) -> EncodeResult<()> {
        let thumbnail = ifd.thumbnail().ok();

        for (position, entry) in ifd.entries().iter().enumerate() {
            let tag_id = entry.tag_id();
            if include.is_some_and(|ids| !ids.contains(&tag_id))
                || exclude.is_some_and(|ids| ids.contains(&tag_id))
            {
                continue;
            }

            if let Some(group) = entry.child_ifd_group() {
                let Some(child) = ifd.child_at(position) else {
                    log::warn!(
                        "Pointer tag (0x{tag_id:04x}) in [{}] has no parsed child. Skipping it.",
                        ifd.identity()
                    );
                    continue;
                };

                if self.child(group).is_some() {
                    log::warn!("IFD [{}] already has a [{group}] child. Skipping.", self.identity);
                    continue;
                }

                self.add_child(Self::from_existing_chain(child)?)?;
                continue;
            }

            if let Some(data) = thumbnail {
                match tag_id {
                    JPEG_INTERCHANGE_FORMAT => {
                        self.add(BuilderTag::new(
                            self.group(),
                            tag_id,
                            entry.ty(),
                            entry.unit_count(),
                            BuilderTagValue::Blob(data.to_vec()),
                        ))?;
                        continue;
                    }
                    JPEG_INTERCHANGE_FORMAT_LENGTH => {
                        let len = u32::try_from(data.len()).map_err(|_| EncodeError::OffsetOverflow)?;
                        self.add_raw(
                            tag_id,
                            PrimitiveTy::Long,
                            1,
                            self.endianness.u32_to_bytes(len).to_vec(),
                        )?;
                        continue;
                    }
                    _ => (),
                }
            }

            let bytes = match entry.raw_bytes() {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Couldn't copy tag (0x{tag_id:04x}) from [{}]. err: {e}", ifd.identity());
                    continue;
                }
            };

            self.add_raw(tag_id, entry.ty(), entry.unit_count(), bytes)?;
        }

        Ok(())
    }

    /// Encodes `value` for `tag`, checking that the tag takes its type.
    fn standard_tag(&self, tag: KnownTag, value: &Value) -> EncodeResult<BuilderTag> {
        let encoded = codec::encode_value(value, self.endianness)?;

        if !tag.supports_type(encoded.ty) {
            log::error!(
                "Tag `{}` doesn't take `{}` values.",
                tag.tag_name(),
                encoded.ty
            );
            return Err(EncodeError::TypeNotSupported {
                tag_name: tag.tag_name(),
                ty: encoded.ty,
            });
        }

        Ok(BuilderTag::new(
            self.group(),
            tag.tag_id(),
            encoded.ty,
            encoded.unit_count,
            BuilderTagValue::Bytes(encoded.bytes),
        ))
    }

    /// Fixes up a tag before it's stored here.
    ///
    /// Children are checked against this IFD and given their new identity.
    fn prepare(&self, mut tag: BuilderTag) -> EncodeResult<BuilderTag> {
        if let BuilderTagValue::Child(child) = &mut tag.value {
            let group = child.group();
            let pointer_tag_id = group
                .pointer_tag_id()
                .filter(|_| group.parent() == Some(self.group()))
                .ok_or(EncodeError::NotChildIfd {
                    parent: self.group(),
                    child: group,
                })?;

            if child.endianness != self.endianness {
                return Err(EncodeError::EndiannessMismatch {
                    parent: self.endianness,
                    child: child.endianness,
                });
            }

            child.reindex(self.identity.new_child(group));
            tag.tag_id = pointer_tag_id;
            tag.ty = PrimitiveTy::Long;
            tag.unit_count = 1;
        }

        tag.group = self.group();
        Ok(tag)
    }

    /// Moves this builder (and everything under it) to a new place in the
    /// tree.
    fn reindex(&mut self, identity: IfdIdentity) {
        for tag in &mut self.tags {
            tag.group = identity.group();

            if let BuilderTagValue::Child(child) = &mut tag.value {
                let group = child.group();
                child.reindex(identity.new_child(group));
            }
        }

        if let Some(next) = &mut self.next {
            next.reindex(identity.new_sibling(identity.index() + 1));
        }

        self.identity = identity;
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{Endianness, ifd::IfdGroup, primitives::{PrimitiveTy, Rational}};

    use super::{BuilderTag, BuilderTagValue, IfdBuilder};
    use crate::{
        error::{EncodeError, LookupError},
        util::logger,
    };

    #[test]
    fn add_standard_checks_types() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Big);

        root.add_standard(0x0100, vec![640_u32]).unwrap();
        root.add_standard(0x0100, vec![640_u16]).unwrap();
        assert_eq!(
            root.add_standard(0x0100, vec![Rational::new(1, 1)]),
            Err(EncodeError::TypeNotSupported {
                tag_name: "ImageWidth",
                ty: PrimitiveTy::Rational
            })
        );

        root.add_standard_with_name("Make", "Canon").unwrap();
        let make = root.find_tag(0x010f).unwrap();
        assert_eq!(make.ty, PrimitiveTy::Ascii);
        assert_eq!(make.unit_count, 6);
        assert_eq!(make.value, BuilderTagValue::Bytes(b"Canon\0".to_vec()));

        assert_eq!(
            root.add_standard(0xbeef, vec![1_u32]),
            Err(EncodeError::Lookup(LookupError::UnknownTag {
                group: IfdGroup::Root,
                tag_id: 0xbeef
            }))
        );
    }

    #[test]
    fn raw_values_must_fit() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Little);

        assert_eq!(
            root.add_raw(0x0100, PrimitiveTy::Short, 2, vec![1, 2, 3]),
            Err(EncodeError::ValueSizeMismatch {
                ty: PrimitiveTy::Short,
                len: 3
            })
        );
        root.add_raw(0x0100, PrimitiveTy::Short, 2, vec![1, 0, 2, 0]).unwrap();
        root.add_raw(0xbeef, PrimitiveTy::Undefined, 3, vec![9, 9, 9]).unwrap();
        assert_eq!(root.tags().len(), 2);
    }

    #[test]
    fn find_set_replace_delete() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Big);
        root.add_standard_with_name("Make", "a").unwrap();
        root.add_standard_with_name("Model", "b").unwrap();
        root.add_standard_with_name("Make", "c").unwrap();

        assert_eq!(root.find_n(0x010f, 0), vec![0, 2]);
        assert_eq!(root.find_n(0x010f, 1), vec![0]);
        assert_eq!(root.find(0x0110), Ok(1));

        // set replaces the first match in place
        root.set_standard_with_name("Make", "d").unwrap();
        assert_eq!(
            root.find_tag(0x010f).unwrap().value,
            BuilderTagValue::Bytes(b"d\0".to_vec())
        );

        // ...and adds when there's nothing to replace
        root.set_standard(0x0131, "software").unwrap();
        assert_eq!(root.find(0x0131), Ok(3));

        let replacement = BuilderTag::new(
            IfdGroup::Root,
            0x0110,
            PrimitiveTy::Ascii,
            2,
            BuilderTagValue::Bytes(b"e\0".to_vec()),
        );
        root.replace(0x0110, replacement).unwrap();
        assert_eq!(root.find(0x0110), Ok(1));

        assert_eq!(root.delete_all(0x010f), 2);
        assert_eq!(
            root.delete_first(0x010f),
            Err(LookupError::TagNotFound {
                ifd_path: "IFD".into(),
                tag_id: 0x010f
            })
        );
        root.delete_n(0x0110, 1).unwrap();
        assert_eq!(root.tags().len(), 1);
    }

    #[test]
    fn children() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Big);

        assert_eq!(
            root.new_child(IfdGroup::Interop),
            Err(EncodeError::NotChildIfd {
                parent: IfdGroup::Root,
                child: IfdGroup::Interop
            })
        );

        let mut exif = root.new_child(IfdGroup::Exif).unwrap();
        let iop = exif.new_child(IfdGroup::Interop).unwrap();
        exif.add_child(iop).unwrap();
        root.add_child(exif).unwrap();

        let pointer = root.find_tag(0x8769).unwrap();
        assert_eq!((pointer.ty, pointer.unit_count), (PrimitiveTy::Long, 1));

        let again = root.new_child(IfdGroup::Exif).unwrap();
        assert_eq!(
            root.add_child(again),
            Err(EncodeError::DuplicateChildIfd {
                ifd_path: "IFD".into(),
                child: IfdGroup::Exif
            })
        );

        let little = IfdBuilder::new_root(Endianness::Little).new_child(IfdGroup::Gps).unwrap();
        assert_eq!(
            root.add_child(little),
            Err(EncodeError::EndiannessMismatch {
                parent: Endianness::Big,
                child: Endianness::Little
            })
        );
    }

    #[test]
    fn thumbnails() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Big);
        let mut exif = root.new_child(IfdGroup::Exif).unwrap();

        assert_eq!(
            exif.set_thumbnail(vec![1, 2, 3]),
            Err(EncodeError::ThumbnailNotAllowed {
                ifd_path: "IFD/Exif".into()
            })
        );
        assert_eq!(root.set_thumbnail(Vec::new()), Err(EncodeError::EmptyThumbnail));

        root.set_thumbnail(vec![0xff, 0xd8, 0xff, 0xd9]).unwrap();
        root.set_thumbnail(vec![0xff, 0xd8, 0x00, 0xff, 0xd9]).unwrap();
        assert_eq!(root.tags().len(), 2);
        assert_eq!(root.thumbnail(), Some([0xff, 0xd8, 0x00, 0xff, 0xd9].as_slice()));
        assert_eq!(
            root.find_tag(0x0202).unwrap().value,
            BuilderTagValue::Bytes(vec![0, 0, 0, 5])
        );
    }

    #[test]
    fn get_or_create() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Big);

        let iop = root.get_or_create_child("IFD/Exif/Iop").unwrap();
        assert_eq!(iop.identity().fully_qualified_path(), "IFD/Exif/Iop");
        iop.add_standard_with_name("InteroperabilityIndex", "R98").unwrap();

        // it's found, not made again
        let iop = root.get_or_create_child("IFD/Exif/Iop").unwrap();
        assert_eq!(iop.tags().len(), 1);
        assert_eq!(root.tags().len(), 1);

        let ifd1 = root.get_or_create_child("IFD1").unwrap();
        assert_eq!(ifd1.identity().fully_qualified_path(), "IFD1");
        assert!(root.next().is_some());

        assert!(root.get_or_create_child("IFD/Exif/GPSInfo").is_err());
    }

    #[test]
    fn dump() {
        logger();
        let mut root = IfdBuilder::new_root(Endianness::Big);
        root.add_standard_with_name("Make", "x").unwrap();
        let mut exif = root.new_child(IfdGroup::Exif).unwrap();
        exif.add_standard_with_name("ISOSpeed", vec![100_u32]).unwrap();
        root.add_child(exif).unwrap();

        let mut ifd1 = IfdBuilder::new_root(Endianness::Big);
        ifd1.add_standard(0x0100, vec![1_u32]).unwrap();
        root.set_next(ifd1).unwrap();

        assert_eq!(
            root.dump_to_strings(),
            vec![
                "IFD<PARENTS=[] FQ-IFD-PATH=[IFD] IFD-INDEX=(0) IFD-TAG-ID=(0x0000) TAG=[0x0000]>",
                "TAG<PARENTS=[] FQ-IFD-PATH=[IFD] IFD-TAG-ID=(0x0000) CHILD-IFD=[] TAG-INDEX=(0) TAG=[0x010f]>",
                "TAG<PARENTS=[] FQ-IFD-PATH=[IFD] IFD-TAG-ID=(0x0000) CHILD-IFD=[IFD/Exif] TAG-INDEX=(1) TAG=[0x8769]>",
                "IFD<PARENTS=[IFD] FQ-IFD-PATH=[IFD/Exif] IFD-INDEX=(0) IFD-TAG-ID=(0x8769) TAG=[0x8769]>",
                "TAG<PARENTS=[IFD] FQ-IFD-PATH=[IFD/Exif] IFD-TAG-ID=(0x8769) CHILD-IFD=[] TAG-INDEX=(0) TAG=[0x8833]>",
                "IFD<PARENTS=[] FQ-IFD-PATH=[IFD1] IFD-INDEX=(1) IFD-TAG-ID=(0x0000) TAG=[0x0000]>",
                "TAG<PARENTS=[] FQ-IFD-PATH=[IFD1] IFD-TAG-ID=(0x0000) CHILD-IFD=[] TAG-INDEX=(0) TAG=[0x0100]>",
            ]
        );
    }
}
