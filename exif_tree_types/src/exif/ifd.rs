//! Contains stuff related to IFDs.
//!
//! [`IfdGroup`] is the static map of IFDs we recognize, including which tag
//! in a parent opens each child. [`IfdIdentity`] says where a parsed (or
//! built) IFD sits in a tree, including sibling indices.

/// A kind of IFD, described by where it lives in the hierarchy.
///
/// IFDs aren't self-describing in their type. Instead, a parent IFD carries a
/// "pointer" tag whose value is the offset of the child's table. This enum
/// records those relationships:
///
/// ```text
/// IFD                    (root, also used for siblings like IFD1)
/// ├── Exif     (0x8769)
/// │   └── Iop  (0xA005)
/// └── GPSInfo  (0x8825)
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdGroup {
    /// Refers to "IFD 0" (and any sibling chained after it, like IFD 1).
    ///
    /// This one stems from TIFF, as it's the only supported group there.
    #[doc(alias = "IFD0")]
    #[doc(alias = "TIFF")]
    Root,

    /// The "Exif" IFD provides camera-based metadata.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// The GPS IFD contains location metadata.
    #[doc(alias = "GPSIFD")]
    #[doc(alias = "GPSInfo")]
    Gps,

    /// The interoperability IFD, a child of the Exif IFD.
    #[doc(alias = "Iop")]
    #[doc(alias = "InteroperabilityIFD")]
    Interop,
}

impl IfdGroup {
    /// All known groups, parents before children.
    pub const ALL: &'static [IfdGroup] = &[
        IfdGroup::Root,
        IfdGroup::Exif,
        IfdGroup::Interop,
        IfdGroup::Gps,
    ];

    /// The name of this IFD in a path.
    pub const fn name(&self) -> &'static str {
        match self {
            IfdGroup::Root => "IFD",
            IfdGroup::Exif => "Exif",
            IfdGroup::Gps => "GPSInfo",
            IfdGroup::Interop => "Iop",
        }
    }

    /// The unindexed path of this IFD.
    ///
    /// ```
    /// use exif_tree_types::exif::ifd::IfdGroup;
    ///
    /// assert_eq!(IfdGroup::Interop.path(), "IFD/Exif/Iop");
    /// ```
    pub const fn path(&self) -> &'static str {
        match self {
            IfdGroup::Root => "IFD",
            IfdGroup::Exif => "IFD/Exif",
            IfdGroup::Gps => "IFD/GPSInfo",
            IfdGroup::Interop => "IFD/Exif/Iop",
        }
    }

    /// The group whose tag points at this one.
    pub const fn parent(&self) -> Option<IfdGroup> {
        match self {
            IfdGroup::Root => None,
            IfdGroup::Exif | IfdGroup::Gps => Some(IfdGroup::Root),
            IfdGroup::Interop => Some(IfdGroup::Exif),
        }
    }

    /// The tag, in the parent IFD, whose value is this IFD's offset.
    pub const fn pointer_tag_id(&self) -> Option<u16> {
        match self {
            IfdGroup::Root => None,
            IfdGroup::Exif => Some(0x8769),
            IfdGroup::Gps => Some(0x8825),
            IfdGroup::Interop => Some(0xA005),
        }
    }

    /// The groups that may hang off this one.
    pub const fn children(&self) -> &'static [IfdGroup] {
        match self {
            IfdGroup::Root => &[IfdGroup::Exif, IfdGroup::Gps],
            IfdGroup::Exif => &[IfdGroup::Interop],
            IfdGroup::Gps | IfdGroup::Interop => &[],
        }
    }

    /// If `tag_id` opens a child IFD from this group, returns that child.
    ///
    /// ```
    /// use exif_tree_types::exif::ifd::IfdGroup;
    ///
    /// assert_eq!(IfdGroup::Root.child_for_tag(0x8825), Some(IfdGroup::Gps));
    /// assert_eq!(IfdGroup::Gps.child_for_tag(0x8825), None);
    /// ```
    pub fn child_for_tag(&self, tag_id: u16) -> Option<IfdGroup> {
        self.children()
            .iter()
            .copied()
            .find(|child| child.pointer_tag_id() == Some(tag_id))
    }

    /// Finds the group with the given unindexed path.
    pub fn from_path(path: &str) -> Option<IfdGroup> {
        Self::ALL.iter().copied().find(|g| g.path() == path)
    }
}

impl core::fmt::Display for IfdGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// One step in an [`IfdIdentity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IfdIdentityPart {
    pub group: IfdGroup,

    /// Position in a chain of siblings. `IFD1` is the root group at index 1.
    pub index: u32,
}

/// Where an IFD sits in the tree.
///
/// This has two string forms:
///
/// - the "unindexed" path, like `IFD/Exif`, used for tag lookups, and
/// - the "fully qualified" path, like `IFD1`, which includes sibling
///   indices whenever they're non-zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IfdIdentity {
    parts: Vec<IfdIdentityPart>,
}

impl IfdIdentity {
    /// The first root IFD, `IFD`.
    pub fn root() -> Self {
        Self {
            parts: vec![IfdIdentityPart {
                group: IfdGroup::Root,
                index: 0,
            }],
        }
    }

    /// The standard identity of a group: every index is zero.
    ///
    /// ```
    /// use exif_tree_types::exif::ifd::{IfdGroup, IfdIdentity};
    ///
    /// let iop = IfdIdentity::standard(IfdGroup::Interop);
    /// assert_eq!(iop.unindexed_path(), "IFD/Exif/Iop");
    /// assert_eq!(iop.parent().map(|p| p.group()), Some(IfdGroup::Exif));
    /// ```
    pub fn standard(group: IfdGroup) -> Self {
        let mut parts = Vec::new();
        let mut current = Some(group);
        while let Some(g) = current {
            parts.push(IfdIdentityPart { group: g, index: 0 });
            current = g.parent();
        }
        parts.reverse();
        Self { parts }
    }

    /// Makes the identity of a child IFD, at index zero.
    pub fn new_child(&self, group: IfdGroup) -> Self {
        let mut parts = self.parts.clone();
        parts.push(IfdIdentityPart { group, index: 0 });
        Self { parts }
    }

    /// Makes the identity of a sibling at the given index.
    pub fn new_sibling(&self, index: u32) -> Self {
        let mut parts = self.parts.clone();
        if let Some(last) = parts.last_mut() {
            last.index = index;
        }
        Self { parts }
    }

    /// The identity of the IFD that points at this one, if any.
    pub fn parent(&self) -> Option<Self> {
        match self.parts.len() {
            0 | 1 => None,
            n => Some(Self {
                parts: self.parts[..n - 1].to_vec(),
            }),
        }
    }

    pub fn group(&self) -> IfdGroup {
        self.parts
            .last()
            .map(|p| p.group)
            .unwrap_or(IfdGroup::Root)
    }

    pub fn index(&self) -> u32 {
        self.parts.last().map(|p| p.index).unwrap_or(0)
    }

    pub fn parts(&self) -> &[IfdIdentityPart] {
        &self.parts
    }

    /// The path without any indices, like `IFD/Exif`.
    pub fn unindexed_path(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.group.name())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The path with indices, like `IFD1/Exif`.
    ///
    /// ```
    /// use exif_tree_types::exif::ifd::{IfdGroup, IfdIdentity};
    ///
    /// let thumbnail_ifd = IfdIdentity::root().new_sibling(1);
    /// assert_eq!(thumbnail_ifd.fully_qualified_path(), "IFD1");
    /// assert_eq!(
    ///     thumbnail_ifd.new_child(IfdGroup::Exif).fully_qualified_path(),
    ///     "IFD1/Exif"
    /// );
    /// ```
    pub fn fully_qualified_path(&self) -> String {
        self.parts
            .iter()
            .map(|p| match p.index {
                0 => p.group.name().to_string(),
                i => format!("{}{i}", p.group.name()),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl core::fmt::Display for IfdIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.fully_qualified_path())
    }
}
