//! `UserComment` (0x9286): an eight-byte encoding header, then the comment.

use exif_tree_types::exif::Endianness;

use super::{
    UndefinedDecoder, UndefinedEncoder, UndefinedKind, UndefinedValue, count_of, payload,
    unparseable, wrong_kind,
};
use crate::{
    context::ValueContext,
    error::{EncodeResult, ExifFieldResult},
};

const HEADER_LEN: usize = 8;

/// Only this much of a non-ASCII payload is shown when displaying.
const DISPLAY_LIMIT: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserCommentEncoding {
    Ascii,
    Jis,
    Unicode,
    Undefined,
}

impl UserCommentEncoding {
    pub const ALL: [UserCommentEncoding; 4] = [
        UserCommentEncoding::Ascii,
        UserCommentEncoding::Jis,
        UserCommentEncoding::Unicode,
        UserCommentEncoding::Undefined,
    ];

    pub const fn header(&self) -> [u8; HEADER_LEN] {
        match self {
            UserCommentEncoding::Ascii => *b"ASCII\0\0\0",
            UserCommentEncoding::Jis => *b"JIS\0\0\0\0\0",
            UserCommentEncoding::Unicode => *b"UNICODE\0",
            UserCommentEncoding::Undefined => [0; HEADER_LEN],
        }
    }

    pub fn from_header(header: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.header() == header)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UserCommentEncoding::Ascii => "ASCII",
            UserCommentEncoding::Jis => "JIS",
            UserCommentEncoding::Unicode => "UNICODE",
            UserCommentEncoding::Undefined => "UNDEFINED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserComment {
    pub encoding: UserCommentEncoding,
    pub payload: Vec<u8>,
}

impl UserComment {
    pub fn ascii(comment: &str) -> Self {
        Self {
            encoding: UserCommentEncoding::Ascii,
            payload: comment.as_bytes().to_vec(),
        }
    }
}

impl core::fmt::Display for UserComment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.encoding == UserCommentEncoding::Ascii {
            return write!(f, "[ASCII] {}", String::from_utf8_lossy(&self.payload));
        }

        let shown = &self.payload[..self.payload.len().min(DISPLAY_LIMIT)];
        write!(
            f,
            "UserComment<SIZE=({}) ENCODING=[{}] V=[{}] LEN=({})>",
            self.payload.len(),
            self.encoding.name(),
            crate::value::dump_bytes(shown),
            self.payload.len()
        )
    }
}

/// Reads and writes [`UndefinedValue::UserComment`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UserCommentCodec;

impl UndefinedEncoder for UserCommentCodec {
    fn encode(
        &self,
        value: &UndefinedValue,
        _endianness: Endianness,
    ) -> EncodeResult<(Vec<u8>, u32)> {
        let UndefinedValue::UserComment(comment) = value else {
            return Err(wrong_kind(UndefinedKind::UserComment, value));
        };

        let mut bytes = Vec::with_capacity(HEADER_LEN + comment.payload.len());
        bytes.extend_from_slice(&comment.encoding.header());
        bytes.extend_from_slice(&comment.payload);

        let count = count_of(&bytes)?;
        Ok((bytes, count))
    }
}

impl UndefinedDecoder for UserCommentCodec {
    fn decode(&self, ctx: &ValueContext<'_>) -> ExifFieldResult<UndefinedValue> {
        let bytes = payload(ctx)?;

        // too short for a header. keep it all
        if bytes.len() < HEADER_LEN {
            return Ok(UndefinedValue::UserComment(UserComment {
                encoding: UserCommentEncoding::Undefined,
                payload: bytes,
            }));
        }

        let (header, rest) = bytes.split_at(HEADER_LEN);
        let Some(encoding) = UserCommentEncoding::from_header(header) else {
            return Err(unparseable(
                ctx,
                format!(
                    "unknown user comment encoding: [{}]",
                    crate::value::dump_bytes(header)
                ),
            ));
        };

        Ok(UndefinedValue::UserComment(UserComment {
            encoding,
            payload: rest.to_vec(),
        }))
    }
}
