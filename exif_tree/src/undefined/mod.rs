//! Codecs for `Undefined`-typed values.
//!
//! The `Undefined` type is just a run of bytes. What's inside depends on the
//! tag, so each supported tag gets a codec that knows its layout.
//!
//! Codecs are kept in a process-wide registry:
//!
//! - decoders are looked up by (IFD group, tag ID), and
//! - encoders are looked up by the kind of value being written, registered
//!   with an example value of that kind.
//!
//! The defaults are registered on first use. You can register more with
//! [`register_decoder`] and [`register_encoder`], but each key may only be
//! registered once.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use exif_tree_types::exif::{Endianness, ifd::IfdGroup, primitives::PrimitiveTy};

use crate::{
    context::ValueContext,
    error::{EncodeError, EncodeResult, ExifFieldError, ExifFieldResult, RegistryError},
};

mod cfa_pattern;
mod components_configuration;
mod maker_note;
mod oecf;
mod print_im;
mod source;
mod text;
mod user_comment;

pub use cfa_pattern::{CfaPattern, CfaPatternCodec};
pub use components_configuration::{
    ComponentsConfiguration, ComponentsConfigurationCodec, ComponentsConfigurationId,
};
pub use maker_note::{MakerNote, MakerNoteCodec};
pub use oecf::{Oecf, OecfCodec};
pub use print_im::{PrintIm, PrintImCodec};
pub use source::{FileSourceCodec, SceneTypeCodec};
pub use text::TextCodec;
pub use user_comment::{UserComment, UserCommentCodec, UserCommentEncoding};

/// Shown in place of an `Undefined` value that couldn't be decoded.
pub const UNKNOWN_PLACEHOLDER: &str = "!UNKNOWN";

/// A decoded `Undefined` value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UndefinedValue {
    /// Optoelectric conversion function (0x8828).
    Oecf(Oecf),

    /// Text without a NUL, like `ExifVersion` (`0230`) or
    /// `GPSProcessingMethod`.
    Text(String),

    /// Channel layout (0x9101).
    ComponentsConfiguration(ComponentsConfiguration),

    /// A vendor's opaque notes (0x927C).
    MakerNote(MakerNote),

    /// A comment with an encoding header (0x9286).
    UserComment(UserComment),

    /// Where the image came from (0xA300).
    FileSource(u32),

    /// What kind of scene it is (0xA301).
    SceneType(u32),

    /// Color filter array layout (0xA302).
    CfaPattern(CfaPattern),

    /// Print Image Matching data (0xC4A5).
    PrintIm(PrintIm),
}

/// The kind of an [`UndefinedValue`], used to pick an encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UndefinedKind {
    Oecf,
    Text,
    ComponentsConfiguration,
    MakerNote,
    UserComment,
    FileSource,
    SceneType,
    CfaPattern,
    PrintIm,
}

impl UndefinedValue {
    pub fn kind(&self) -> UndefinedKind {
        match self {
            UndefinedValue::Oecf(_) => UndefinedKind::Oecf,
            UndefinedValue::Text(_) => UndefinedKind::Text,
            UndefinedValue::ComponentsConfiguration(_) => UndefinedKind::ComponentsConfiguration,
            UndefinedValue::MakerNote(_) => UndefinedKind::MakerNote,
            UndefinedValue::UserComment(_) => UndefinedKind::UserComment,
            UndefinedValue::FileSource(_) => UndefinedKind::FileSource,
            UndefinedValue::SceneType(_) => UndefinedKind::SceneType,
            UndefinedValue::CfaPattern(_) => UndefinedKind::CfaPattern,
            UndefinedValue::PrintIm(_) => UndefinedKind::PrintIm,
        }
    }
}

impl core::fmt::Display for UndefinedValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UndefinedValue::Oecf(v) => write!(f, "{v}"),
            UndefinedValue::Text(s) => f.write_str(s),
            UndefinedValue::ComponentsConfiguration(v) => write!(f, "{v}"),
            UndefinedValue::MakerNote(v) => write!(f, "{v}"),
            UndefinedValue::UserComment(v) => write!(f, "{v}"),
            UndefinedValue::FileSource(v) | UndefinedValue::SceneType(v) => {
                write!(f, "0x{v:08x}")
            }
            UndefinedValue::CfaPattern(v) => write!(f, "{v}"),
            UndefinedValue::PrintIm(v) => write!(f, "{v}"),
        }
    }
}

/// Turns an [`UndefinedValue`] into bytes.
pub trait UndefinedEncoder: Send + Sync {
    /// Returns the bytes and the unit count to write into the entry.
    fn encode(&self, value: &UndefinedValue, endianness: Endianness)
    -> EncodeResult<(Vec<u8>, u32)>;
}

/// Reads an [`UndefinedValue`] out of an entry.
pub trait UndefinedDecoder: Send + Sync {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue>;
}

struct Registry {
    encoders: FxHashMap<UndefinedKind, Arc<dyn UndefinedEncoder>>,
    decoders: FxHashMap<(IfdGroup, u16), Arc<dyn UndefinedDecoder>>,
}

impl Registry {
    fn with_defaults() -> Self {
        let mut registry = Registry {
            encoders: FxHashMap::default(),
            decoders: FxHashMap::default(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        let text: Arc<TextCodec> = Arc::new(TextCodec);
        let oecf: Arc<OecfCodec> = Arc::new(OecfCodec);
        let components: Arc<ComponentsConfigurationCodec> = Arc::new(ComponentsConfigurationCodec);
        let maker_note: Arc<MakerNoteCodec> = Arc::new(MakerNoteCodec);
        let user_comment: Arc<UserCommentCodec> = Arc::new(UserCommentCodec);
        let file_source: Arc<FileSourceCodec> = Arc::new(FileSourceCodec);
        let scene_type: Arc<SceneTypeCodec> = Arc::new(SceneTypeCodec);
        let cfa: Arc<CfaPatternCodec> = Arc::new(CfaPatternCodec);
        let print_im: Arc<PrintImCodec> = Arc::new(PrintImCodec);

        self.encoders.insert(UndefinedKind::Oecf, oecf.clone());
        self.encoders.insert(UndefinedKind::Text, text.clone());
        self.encoders
            .insert(UndefinedKind::ComponentsConfiguration, components.clone());
        self.encoders.insert(UndefinedKind::MakerNote, maker_note.clone());
        self.encoders
            .insert(UndefinedKind::UserComment, user_comment.clone());
        self.encoders
            .insert(UndefinedKind::FileSource, file_source.clone());
        self.encoders.insert(UndefinedKind::SceneType, scene_type.clone());
        self.encoders.insert(UndefinedKind::CfaPattern, cfa.clone());
        self.encoders.insert(UndefinedKind::PrintIm, print_im.clone());

        // version strings and GPS text all share one codec
        self.decoders.insert((IfdGroup::Exif, 0x9000), text.clone());
        self.decoders.insert((IfdGroup::Exif, 0xA000), text.clone());
        self.decoders.insert((IfdGroup::Interop, 0x0002), text.clone());
        self.decoders.insert((IfdGroup::Gps, 0x001B), text.clone());
        self.decoders.insert((IfdGroup::Gps, 0x001C), text);

        self.decoders.insert((IfdGroup::Exif, 0x8828), oecf);
        self.decoders.insert((IfdGroup::Exif, 0x9101), components);
        self.decoders.insert((IfdGroup::Exif, 0x927C), maker_note);
        self.decoders.insert((IfdGroup::Exif, 0x9286), user_comment);
        self.decoders.insert((IfdGroup::Exif, 0xA300), file_source);
        self.decoders.insert((IfdGroup::Exif, 0xA301), scene_type);
        self.decoders.insert((IfdGroup::Exif, 0xA302), cfa);
        self.decoders.insert((IfdGroup::Root, 0xC4A5), print_im);

        log::trace!(
            "Registered `{}` default encoders and `{}` default decoders.",
            self.encoders.len(),
            self.decoders.len()
        );
    }
}

static REGISTRY: LazyLock<RwLock<Registry>> =
    LazyLock::new(|| RwLock::new(Registry::with_defaults()));

/// Adds an encoder for values of the same kind as `example`.
///
/// ```
/// use exif_tree::undefined::{TextCodec, UndefinedValue, register_encoder};
///
/// // text already has an encoder
/// assert!(register_encoder(&UndefinedValue::Text("0230".into()), TextCodec).is_err());
/// ```
pub fn register_encoder(
    example: &UndefinedValue,
    encoder: impl UndefinedEncoder + 'static,
) -> Result<(), RegistryError> {
    let kind = example.kind();

    let mut registry = REGISTRY.write();
    if registry.encoders.contains_key(&kind) {
        log::error!("Encoder for `{kind:?}` is already registered. example: `{example}`");
        return Err(RegistryError::DuplicateEncoder { kind });
    }

    registry.encoders.insert(kind, Arc::new(encoder));
    Ok(())
}

/// Adds a decoder for a tag.
///
/// This is how vendor tags can reuse a shipped codec:
///
/// ```
/// use exif_tree::undefined::{TextCodec, register_decoder};
/// use exif_tree_types::exif::ifd::IfdGroup;
///
/// register_decoder(IfdGroup::Root, 0xfe01, TextCodec).unwrap();
///
/// // only once, though!
/// assert!(register_decoder(IfdGroup::Root, 0xfe01, TextCodec).is_err());
/// ```
pub fn register_decoder(
    group: IfdGroup,
    tag_id: u16,
    decoder: impl UndefinedDecoder + 'static,
) -> Result<(), RegistryError> {
    let mut registry = REGISTRY.write();
    if registry.decoders.contains_key(&(group, tag_id)) {
        log::error!("Decoder for tag (0x{tag_id:04x}) in [{group}] is already registered.");
        return Err(RegistryError::DuplicateDecoder { group, tag_id });
    }

    registry.decoders.insert((group, tag_id), Arc::new(decoder));
    Ok(())
}

/// Whether a decoder exists for the tag.
pub fn has_decoder(group: IfdGroup, tag_id: u16) -> bool {
    REGISTRY.read().decoders.contains_key(&(group, tag_id))
}

/// Decodes the value in `ctx` with the codec registered for its tag.
pub fn decode(ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
    let group = ctx.ifd().group();
    let tag_id = ctx.tag_id();

    let decoder = REGISTRY
        .read()
        .decoders
        .get(&(group, tag_id))
        .cloned()
        .ok_or_else(|| ExifFieldError::UnhandledUndefined {
            ifd_path: ctx.ifd().unindexed_path(),
            tag_id,
        })?;

    decoder.decode(ctx).map_err(|e| match e {
        e @ (ExifFieldError::UnparseableValue { .. } | ExifFieldError::UnhandledUndefined { .. }) => {
            e
        }
        other => ExifFieldError::UnparseableValue {
            tag_id,
            reason: other.to_string(),
        },
    })
}

/// Encodes `value` with the encoder registered for its kind.
pub fn encode(value: &UndefinedValue, endianness: Endianness) -> EncodeResult<(Vec<u8>, u32)> {
    let kind = value.kind();

    let encoder = REGISTRY
        .read()
        .encoders
        .get(&kind)
        .cloned()
        .ok_or(EncodeError::NoEncoder { kind })?;

    encoder.encode(value, endianness)
}

/// Reads the whole payload as bytes.
pub(crate) fn payload(ctx: &ValueContext<'_>) -> ExifFieldResult<Vec<u8>> {
    let mut ctx = ctx.clone();
    if ctx.ty() == PrimitiveTy::Undefined {
        ctx.set_undefined_type(PrimitiveTy::Byte)?;
    }
    ctx.read_bytes()
}

pub(crate) fn unparseable(ctx: &ValueContext<'_>, reason: impl Into<String>) -> ExifFieldError {
    let e = ExifFieldError::UnparseableValue {
        tag_id: ctx.tag_id(),
        reason: reason.into(),
    };
    log::warn!("Failed to decode undefined value. err: {e}");
    e
}

/// An encoder was handed a value of another kind.
pub(crate) fn wrong_kind(expected: UndefinedKind, value: &UndefinedValue) -> EncodeError {
    log::error!(
        "Encoder for `{expected:?}` was given a `{:?}` value.",
        value.kind()
    );
    EncodeError::NoEncoder {
        kind: value.kind(),
    }
}

pub(crate) fn count_of(bytes: &[u8]) -> EncodeResult<u32> {
    u32::try_from(bytes.len()).map_err(|_| EncodeError::OffsetOverflow)
}

#[cfg(test)]
pub(crate) mod test_util {
    use exif_tree_types::exif::{
        Endianness,
        ifd::{IfdGroup, IfdIdentity},
        primitives::PrimitiveTy,
    };

    use crate::context::ValueContext;

    /// A context where `encoded` is the whole addressable area, at offset 0.
    pub fn far_context(group: IfdGroup, tag_id: u16, encoded: &[u8]) -> ValueContext<'_> {
        far_context_in(group, tag_id, encoded, Endianness::Big)
    }

    /// Like [`far_context`], in the given byte order.
    pub fn far_context_in(
        group: IfdGroup,
        tag_id: u16,
        encoded: &[u8],
        endianness: Endianness,
    ) -> ValueContext<'_> {
        let mut raw = [0_u8; 4];
        let embedded = encoded.len().min(4);
        raw[..embedded].copy_from_slice(&encoded[..embedded]);

        ValueContext::new(
            IfdIdentity::standard(group),
            tag_id,
            encoded.len() as u32,
            0,
            raw,
            encoded,
            PrimitiveTy::Undefined,
            endianness,
        )
    }
}
