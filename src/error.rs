//! Contains the Error and Result type used throughout the crate.
use thiserror::Error;

use crate::TagKind;

/// Various errors that can occur while decoding, encoding, editing or doing
/// file IO.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input bytes are not valid NBT. `offset` is the position in the
    /// (decompressed) stream where the problem was detected.
    #[error("malformed nbt at byte {offset}: {msg}")]
    MalformedInput { offset: usize, msg: String },

    /// A tree that cannot be written, eg a list mixing tag kinds.
    #[error("invalid nbt tree: {0}")]
    InvalidTree(String),

    /// Opening, reading, writing or (de)compressing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Text given for a value edit is not a valid literal for the node.
    #[error("cannot parse {text:?} as {kind}")]
    Parse { kind: TagKind, text: String },

    /// A rename or insert would give a compound two children with one name.
    #[error("duplicate name in compound: {0:?}")]
    DuplicateName(String),

    /// The node handle is stale, or the edit is not allowed on that node.
    #[error("invalid node: {0}")]
    InvalidNode(String),
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedInput { .. })
    }

    pub fn is_invalid_tree(&self) -> bool {
        matches!(self, Error::InvalidTree(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Byte offset for decode errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::MalformedInput { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    pub(crate) fn malformed(offset: usize, msg: impl Into<String>) -> Error {
        Error::MalformedInput {
            offset,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_tag(offset: usize, id: u8) -> Error {
        Error::malformed(offset, format!("invalid nbt tag value: {}", id))
    }

    pub(crate) fn unexpected_eof(offset: usize, wanted: usize) -> Error {
        Error::malformed(
            offset,
            format!("eof: needed {} more bytes, ran out of input", wanted),
        )
    }

    pub(crate) fn nonunicode_string(offset: usize, data: &[u8]) -> Error {
        Error::malformed(
            offset,
            format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
        )
    }

    pub(crate) fn invalid_tree(msg: impl Into<String>) -> Error {
        Error::InvalidTree(msg.into())
    }

    pub(crate) fn parse(kind: TagKind, text: &str) -> Error {
        Error::Parse {
            kind,
            text: text.to_owned(),
        }
    }

    pub(crate) fn invalid_node(msg: impl Into<String>) -> Error {
        Error::InvalidNode(msg.into())
    }
}
