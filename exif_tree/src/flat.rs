//! A flat list of every tag in a blob, for dumping and comparing.

use core::convert::Infallible;
use std::io::{Read, Seek};

use crate::{
    enumerate::{IfdEnumerate, MiscellaneousExifData, ScanOptions},
    error::{ExifFatalError, ExifFatalResult, VisitError},
    header::search_and_extract_exif,
    tag_entry::IfdTagEntry,
    tag_index::TagIndex,
    undefined::UNKNOWN_PLACEHOLDER,
    value::Value,
};

/// One tag, with everything already read out of it.
#[derive(Clone, Debug, PartialEq)]
pub struct ExifTag {
    /// The fully-qualified path of the IFD holding the tag, like `IFD1`.
    pub ifd_path: String,
    pub id: u16,

    /// The tag's name. Empty for unknown tags.
    pub name: String,
    pub unit_count: u32,
    pub type_id: u16,
    pub type_name: String,

    /// The decoded value, if it could be decoded.
    pub value: Option<Value>,

    /// The value's bytes, as stored.
    pub value_bytes: Vec<u8>,
    pub formatted: String,
    pub formatted_first: String,

    /// The unindexed path of the IFD this tag points at, for pointer tags.
    pub child_ifd_path: Option<String>,
}

impl ExifTag {
    fn from_entry(entry: &IfdTagEntry<'_>) -> Option<Self> {
        let value_bytes = match entry.raw_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!(
                    "Couldn't read bytes of tag (0x{:04x}) in [{}]. Skipping it. err: {e}",
                    entry.tag_id(),
                    entry.ifd()
                );
                return None;
            }
        };

        let value = entry
            .value()
            .inspect_err(|e| {
                log::debug!("Couldn't decode tag (0x{:04x}). err: {e}", entry.tag_id())
            })
            .ok();
        let formatted = entry
            .format()
            .unwrap_or_else(|_| UNKNOWN_PLACEHOLDER.to_string());
        let formatted_first = entry
            .format_first()
            .unwrap_or_else(|_| UNKNOWN_PLACEHOLDER.to_string());

        Some(Self {
            ifd_path: entry.ifd().fully_qualified_path(),
            id: entry.tag_id(),
            name: entry.tag_name().unwrap_or_default().to_string(),
            unit_count: entry.unit_count(),
            type_id: entry.ty().id(),
            type_name: entry.ty().name().to_string(),
            value,
            value_bytes,
            formatted,
            formatted_first,
            child_ifd_path: entry.child_ifd_path().map(String::from),
        })
    }

    /// One line in the style of common Exif dumping tools.
    ///
    /// ```text
    /// IFD-PATH=[IFD] ID=(0x010f) NAME=[Make] COUNT=(6) TYPE=[ASCII] VALUE=[Canon]
    /// ```
    pub fn to_tool_line(&self) -> String {
        format!(
            "IFD-PATH=[{}] ID=(0x{:04x}) NAME=[{}] COUNT=({}) TYPE=[{}] VALUE=[{}]",
            self.ifd_path, self.id, self.name, self.unit_count, self.type_name, self.formatted
        )
    }
}

impl core::fmt::Display for ExifTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "ExifTag<IFD-PATH=[{}] TAG-ID=(0x{:02x}) TAG-NAME=[{}] TAG-TYPE=[{}] VALUE=[{}] \
            VALUE-BYTES=({}) CHILD-IFD-PATH=[{}]>",
            self.ifd_path,
            self.id,
            self.name,
            self.type_name,
            self.formatted_first,
            self.value_bytes.len(),
            self.child_ifd_path.as_deref().unwrap_or_default()
        )
    }
}

/// Lists every tag in a blob that starts with a TIFF header, in scan order.
pub fn get_flat_exif_data(
    data: &[u8],
    options: &ScanOptions,
) -> ExifFatalResult<(Vec<ExifTag>, MiscellaneousExifData)> {
    let tag_index = TagIndex::new().with_universal_search(options.universal_search);
    let mut tags = Vec::new();

    let misc = IfdEnumerate::new(data, tag_index, *options)
        .scan(|entry| {
            tags.extend(ExifTag::from_entry(entry));
            Ok::<(), Infallible>(())
        })
        .map_err(|e| match e {
            VisitError::Exif(e) => e,
            VisitError::Visitor(never) => match never {},
        })?;

    log::debug!("Found `{}` tags.", tags.len());
    Ok((tags, misc))
}

/// Like [`get_flat_exif_data`], reading the blob from the reader's current
/// position to its end.
pub fn get_flat_exif_data_from_reader(
    mut reader: impl Read + Seek,
    options: &ScanOptions,
) -> ExifFatalResult<(Vec<ExifTag>, MiscellaneousExifData)> {
    let io_err = |e: std::io::Error| {
        log::error!("Failed to read Exif blob. err: {e}");
        ExifFatalError::Io { kind: e.kind() }
    };

    let start = reader.stream_position().map_err(io_err)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(io_err)?;
    log::trace!("Read `{}` bytes starting at `{start}`.", data.len());

    get_flat_exif_data(&data, options)
}

/// Finds and lists the tags of every Exif block in `image_data`.
///
/// Stops after `max_block` blocks, or never when it's `-1`. Blocks cut
/// short are skipped. Returns the tags and the number of blocks read.
pub fn get_all_exif_data(
    image_data: &[u8],
    options: &ScanOptions,
    max_block: isize,
) -> ExifFatalResult<(Vec<ExifTag>, usize)> {
    if max_block < -1 {
        log::error!("`max_block` must be -1 or greater. got: `{max_block}`");
        return Err(ExifFatalError::InvalidMaxBlock { got: max_block });
    }

    let limit = usize::try_from(max_block).ok();
    let mut tags = Vec::new();
    let mut blocks_read = 0_usize;
    let mut searched = 0_usize;
    let mut remaining = image_data;

    while limit.is_none_or(|limit| searched < limit) {
        let block = match search_and_extract_exif(remaining) {
            Ok(block) => block,
            Err(ExifFatalError::NoExif) => break,
            Err(e) => return Err(e),
        };
        searched += 1;

        // look for the next one after this signature
        remaining = block.get(4..).unwrap_or_default();

        match get_flat_exif_data(block, options) {
            Ok((found, _)) => {
                blocks_read += 1;
                tags.extend(found);
            }
            Err(
                e @ (ExifFatalError::FirstIfdUnreachable { .. }
                | ExifFatalError::NoFirstIfdOffset
                | ExifFatalError::NoTiffMagicNumber),
            ) => {
                log::warn!("Skipping a truncated Exif block. err: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok((tags, blocks_read))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use exif_tree_types::exif::{Endianness, ifd::IfdGroup};

    use super::{get_all_exif_data, get_flat_exif_data, get_flat_exif_data_from_reader};
    use crate::{
        builder::IfdBuilder,
        encode::encode_to_exif,
        enumerate::ScanOptions,
        error::ExifFatalError,
        util::logger,
        value::Value,
    };

    fn sample(make: &str) -> Vec<u8> {
        let mut root = IfdBuilder::new_root(Endianness::Big);
        root.add_standard_with_name("Make", make).unwrap();

        let mut exif = root.new_child(IfdGroup::Exif).unwrap();
        exif.add_standard_with_name("ISOSpeed", vec![400_u32]).unwrap();
        root.add_child(exif).unwrap();

        encode_to_exif(&root).unwrap()
    }

    #[test]
    fn flat_tags() {
        logger();
        let blob = sample("Canon");
        let (tags, misc) = get_flat_exif_data(&blob, &ScanOptions::default()).unwrap();

        let lines: Vec<String> = tags.iter().map(|t| t.to_tool_line()).collect();
        assert_eq!(
            lines,
            vec![
                "IFD-PATH=[IFD] ID=(0x010f) NAME=[Make] COUNT=(6) TYPE=[ASCII] VALUE=[Canon]",
                "IFD-PATH=[IFD] ID=(0x8769) NAME=[ExifTag] COUNT=(1) TYPE=[LONG] VALUE=[[44]]",
                "IFD-PATH=[IFD/Exif] ID=(0x8833) NAME=[ISOSpeed] COUNT=(1) TYPE=[LONG] VALUE=[[400]]",
            ]
        );

        assert_eq!(tags[0].value, Some(Value::Ascii("Canon".into())));
        assert_eq!(tags[0].value_bytes, b"Canon\0".to_vec());
        assert_eq!(tags[1].child_ifd_path.as_deref(), Some("IFD/Exif"));
        assert!(misc.unknown_tags.is_empty());
    }

    #[test]
    fn from_reader() {
        logger();
        let blob = sample("Nikon");
        let (tags, _) = get_flat_exif_data_from_reader(Cursor::new(blob), &ScanOptions::default())
            .unwrap();
        assert_eq!(tags[0].formatted, "Nikon");
    }

    #[test]
    fn every_block() {
        logger();
        let mut image = b"junk before".to_vec();
        image.extend(sample("first"));
        image.extend(b"some pixels");
        image.extend(sample("second"));

        let (tags, blocks) = get_all_exif_data(&image, &ScanOptions::default(), -1).unwrap();
        assert_eq!(blocks, 2);
        assert_eq!(tags.len(), 6);
        assert_eq!(tags[3].formatted, "second");

        let (tags, blocks) = get_all_exif_data(&image, &ScanOptions::default(), 1).unwrap();
        assert_eq!((tags.len(), blocks), (3, 1));

        assert_eq!(
            get_all_exif_data(&image, &ScanOptions::default(), -2),
            Err(ExifFatalError::InvalidMaxBlock { got: -2 })
        );

        let (tags, blocks) = get_all_exif_data(b"nothing here", &ScanOptions::default(), -1).unwrap();
        assert_eq!((tags.len(), blocks), (0, 0));
    }
}
