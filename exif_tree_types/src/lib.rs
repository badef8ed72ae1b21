//! # `exif_tree_types`
//!
//! Constant data used by `exif_tree`: byte orders, primitive types, the IFD
//! hierarchy, and the tables of known tags.
//!
//! Nothing in here touches a byte stream. For parsing and writing, see the
//! `exif_tree` crate.

#![forbid(unsafe_code)]

pub mod exif;
