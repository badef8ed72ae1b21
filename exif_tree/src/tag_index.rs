//! Queries against the known-tag tables.

use exif_tree_types::exif::{ifd::IfdGroup, primitives::PrimitiveTy, tags::KnownTag};

use crate::error::{LookupError, LookupResult};

/// Finds tags by ID or name.
///
/// By default, a tag is only found in the group it belongs to. With
/// "universal search" on, a miss falls back to the first group that knows the
/// tag. Some writers put tags in the wrong IFD, so this helps with reading
/// their files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagIndex {
    universal_search: bool,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_universal_search(mut self, enabled: bool) -> Self {
        self.universal_search = enabled;
        self
    }

    pub fn universal_search(&self) -> bool {
        self.universal_search
    }

    /// Finds a tag by its ID.
    pub fn get(&self, group: IfdGroup, tag_id: u16) -> LookupResult<KnownTag> {
        if let Ok(tag) = KnownTag::try_from((group, tag_id)) {
            return Ok(tag);
        }

        if !self.universal_search {
            return Err(LookupError::UnknownTag { group, tag_id });
        }

        let found = self
            .find_first(tag_id, None)
            .map_err(|_| LookupError::UnknownTag { group, tag_id })?;
        log::warn!(
            "Tag (0x{tag_id:04x}) isn't known in [{group}], \
            but universal search found it in [{}] as `{}`.",
            found.ifd_group(),
            found.tag_name()
        );
        Ok(found)
    }

    /// Finds a tag by its canonical name.
    pub fn get_with_name(&self, group: IfdGroup, name: &str) -> LookupResult<KnownTag> {
        if let Some(tag) = KnownTag::from_name(group, name) {
            return Ok(tag);
        }

        let unknown = || LookupError::UnknownTagName {
            group,
            name: name.to_string(),
        };

        if !self.universal_search {
            return Err(unknown());
        }

        let found = IfdGroup::ALL
            .iter()
            .find_map(|g| KnownTag::from_name(*g, name))
            .ok_or_else(unknown)?;
        log::warn!(
            "Tag `{name}` isn't known in [{group}], \
            but universal search found it in [{}].",
            found.ifd_group()
        );
        Ok(found)
    }

    /// Finds the first group (parents before children) that knows the tag.
    ///
    /// When `ty` is given, groups whose definition doesn't accept that type
    /// are skipped.
    pub fn find_first(&self, tag_id: u16, ty: Option<PrimitiveTy>) -> LookupResult<KnownTag> {
        IfdGroup::ALL
            .iter()
            .filter_map(|g| KnownTag::try_from((*g, tag_id)).ok())
            .find(|tag| ty.is_none_or(|ty| tag.supports_type(ty)))
            .ok_or(LookupError::UnknownTag {
                group: IfdGroup::Root,
                tag_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use exif_tree_types::exif::{
        ifd::IfdGroup,
        primitives::PrimitiveTy,
        tags::{ExifIfdTag, InteropIfdTag, KnownTag},
    };

    use super::TagIndex;
    use crate::{error::LookupError, util::logger};

    #[test]
    fn strict_lookup() {
        logger();
        let index = TagIndex::new();

        assert_eq!(
            index.get(IfdGroup::Exif, 0x829d),
            Ok(KnownTag::ExifIfdTag(ExifIfdTag::FNumber))
        );
        assert_eq!(
            index.get(IfdGroup::Root, 0x829d),
            Err(LookupError::UnknownTag {
                group: IfdGroup::Root,
                tag_id: 0x829d
            })
        );
    }

    #[test]
    fn universal_search_falls_back() {
        logger();
        let index = TagIndex::new().with_universal_search(true);

        assert_eq!(
            index.get(IfdGroup::Root, 0x829d),
            Ok(KnownTag::ExifIfdTag(ExifIfdTag::FNumber))
        );
        assert_eq!(
            index.get_with_name(IfdGroup::Gps, "InteroperabilityIndex"),
            Ok(KnownTag::InteropIfdTag(InteropIfdTag::InteroperabilityIndex))
        );
        assert!(index.get(IfdGroup::Root, 0xfefe).is_err());
    }

    #[test]
    fn find_first_checks_type() {
        logger();
        let index = TagIndex::new();

        // 0x0002 is GPSLatitude (rational) and InteroperabilityVersion (undefined)
        assert_eq!(
            index
                .find_first(0x0002, Some(PrimitiveTy::Undefined))
                .map(|t| t.ifd_group()),
            Ok(IfdGroup::Interop)
        );
        assert_eq!(
            index
                .find_first(0x0002, Some(PrimitiveTy::Rational))
                .map(|t| t.ifd_group()),
            Ok(IfdGroup::Gps)
        );
        assert_eq!(
            index.find_first(0x0002, None).map(|t| t.ifd_group()),
            Ok(IfdGroup::Interop)
        );
    }
}
