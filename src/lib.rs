//! Lazy, partial access into JSON documents.
//!
//! [`attach`] wraps a raw byte buffer without parsing it; navigating with
//! [`LazyValue::get`] scans only the bytes on the way to the requested value,
//! and [`LazyValue::decode`] hands precisely bounded spans to an injectable
//! JSON decoder. Large documents are never parsed past the path actually
//! visited.

pub mod decode;
pub mod error;
pub mod options;
pub mod range;
mod scan;
pub mod value;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use crate::decode::{JsonDecoder, SerdeDecoder};
pub use crate::error::{BoxError, Error};
pub use crate::options::{AttachOptions, DEFAULT_MAX_DEPTH};
pub use crate::range::ByteRange;
pub use crate::value::{LazyValue, Selector, SelectorKind, ValueKind};

pub type Result<T> = std::result::Result<T, Error>;

/// Attach to a buffer of UTF-8 JSON text without scanning any of it. The
/// returned root [`LazyValue`] spans the whole input.
pub fn attach(input: impl Into<Arc<[u8]>>) -> LazyValue {
    attach_with_options(input, AttachOptions::default())
}

pub fn attach_str(input: &str) -> LazyValue {
    attach(input.as_bytes())
}

pub fn attach_with_options(input: impl Into<Arc<[u8]>>, options: AttachOptions) -> LazyValue {
    LazyValue::root(input.into(), options)
}

/// One-shot full decode of a document.
pub fn to_value(input: &str) -> Result<Value> {
    attach_str(input).decode()
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    attach(input).decode_as()
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_slice(input.as_bytes())
}
