use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the record protocol can report.
///
/// Buffers keep the first `Error` they hit and hand out clones of it from then on,
/// hence `Clone`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The byte source or sink failed outside of any open frame.
    #[error("stream error at offset {pos} ({kind:?}): {msg}")]
    Stream {
        pos: u64,
        kind: io::ErrorKind,
        msg: String,
    },

    /// A frame did not deliver the bytes its byte count declared.
    #[error("corrupted {class} record: byte count declares {expected} bytes, consumed {actual}")]
    Corruption {
        class: String,
        expected: u64,
        actual: u64,
    },

    /// The bytes were all there, but they do not describe a valid record.
    #[error("malformed {class} record: {reason}")]
    Malformed { class: String, reason: String },

    /// The stream names a class nobody registered a constructor for.
    #[error("unknown class {class:?}: no constructor registered")]
    UnknownClass { class: String },

    /// A typed pointer decoded to some other concrete class.
    #[error("expected a {expected} object, decoded a {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// Caller error; never stored as a buffer's sticky state.
    #[error("{what} index {index} out of bounds (len {len})")]
    Bounds {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl Error {
    pub fn stream(pos: u64, kind: io::ErrorKind, msg: impl Into<String>) -> Self {
        Self::Stream {
            pos,
            kind,
            msg: msg.into(),
        }
    }

    pub fn malformed(class: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            class: class.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn bounds(what: &'static str, index: usize, len: usize) -> Self {
        Self::Bounds { what, index, len }
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corruption { .. })
    }
}
