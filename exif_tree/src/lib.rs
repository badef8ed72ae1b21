//! # `exif_tree`
//!
//! A library to read, edit, and write the IFD trees inside Exif blobs.
//!
//! ## Reading
//!
//! [`enumerate::parse_exif`] reads a blob (starting at its TIFF header) into
//! an [`ifd::Exif`] tree. Values aren't decoded until you ask for them, and
//! broken entries are logged and skipped instead of failing the whole read.
//!
//! For a quick dump, [`flat::get_flat_exif_data`] lists every tag with its
//! value already rendered.
//!
//! ## Writing
//!
//! Build a tree with [`builder::IfdBuilder`] (or copy a parsed one with
//! [`builder::IfdBuilder::from_existing_chain`]), then lay it out with
//! [`encode::encode_to_exif`].
//!
//! ```
//! use exif_tree::{builder::IfdBuilder, encode::encode_to_exif, enumerate::parse_exif};
//! use exif_tree_types::exif::Endianness;
//!
//! let mut root = IfdBuilder::new_root(Endianness::Big);
//! root.add_standard_with_name("Make", "Canon").unwrap();
//!
//! let blob = encode_to_exif(&root).unwrap();
//! let exif = parse_exif(&blob).unwrap();
//!
//! let make = exif.root.find_tag_with_name("Make").unwrap();
//! assert_eq!(make[0].format().unwrap(), "Canon");
//! ```
//!
//! ## `Undefined` values
//!
//! Tags of type `UNDEFINED` are decoded by codecs in [`undefined`]. The
//! common ones are registered for you, and you can add your own.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

pub mod builder;
pub mod codec;
pub mod context;
pub mod encode;
pub mod enumerate;
pub mod error;
pub mod flat;
pub mod gps;
pub mod header;
pub mod ifd;
pub mod tag_entry;
pub mod tag_index;
pub mod undefined;
pub mod value;

/// Internal utility methods.
pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
