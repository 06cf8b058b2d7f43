use smallvec::SmallVec;
use thiserror::Error;

use crate::value::{SelectorKind, ValueKind};

/// Failure surfaced verbatim from an injected [`JsonDecoder`](crate::JsonDecoder).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The byte values a scan step was prepared to accept, kept inline for error
/// reporting.
pub type ExpectedBytes = SmallVec<[u8; 4]>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("range end {end} is before start {start}")]
    InvalidRange { start: usize, end: usize },

    #[error("expected one of {expected:?} at offset {offset}, found {found:?}")]
    UnexpectedByte {
        expected: ExpectedBytes,
        found: Option<u8>,
        offset: usize,
    },

    #[error("invalid or truncated escape sequence at offset {offset}")]
    InvalidEscapeSequence { offset: usize },

    #[error("object key at offset {offset} is not a string")]
    NonStringKey { offset: usize },

    #[error("cannot select {selector} from {kind} value")]
    TypeMismatch {
        kind: ValueKind,
        selector: SelectorKind,
    },

    #[error("nesting deeper than {limit} levels at offset {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },

    #[error("decode failed at offset {offset}: {source}")]
    Decode {
        #[source]
        source: BoxError,
        offset: usize,
    },
}
