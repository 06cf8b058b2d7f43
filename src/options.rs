use std::fmt;
use std::sync::Arc;

use crate::decode::{JsonDecoder, SerdeDecoder};

/// Default bound on structural nesting, applied both to the skim stack and to
/// value classification depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Clone)]
pub struct AttachOptions {
    pub max_depth: usize,
    pub decoder: Arc<dyn JsonDecoder>,
}

impl AttachOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn JsonDecoder>) -> Self {
        self.decoder = decoder;
        self
    }
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            decoder: Arc::new(SerdeDecoder),
        }
    }
}

impl fmt::Debug for AttachOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachOptions")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
