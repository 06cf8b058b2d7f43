use serde_json::Value;

use crate::error::BoxError;

/// External decoder a byte span is handed to once its boundaries are known.
///
/// The scanner locates values but never interprets number/string/boolean/null
/// grammar itself; any standards-conformant JSON decoder can be plugged in
/// through [`AttachOptions`](crate::AttachOptions). Failures are surfaced
/// verbatim as [`Error::Decode`](crate::Error::Decode).
pub trait JsonDecoder {
    fn decode(&self, bytes: &[u8]) -> std::result::Result<Value, BoxError>;
}

/// Default decoder, backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeDecoder;

impl JsonDecoder for SerdeDecoder {
    fn decode(&self, bytes: &[u8]) -> std::result::Result<Value, BoxError> {
        serde_json::from_slice(bytes).map_err(Into::into)
    }
}
