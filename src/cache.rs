use crate::error::Result;
use crate::format::FormatSpec;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Memoizes compiled formats by their format string.
///
/// Compiled formats are immutable, so one `Arc<FormatSpec>` can be handed to every caller
/// that asks for the same string, from any thread. Failed compilations are not cached.
#[derive(Debug, Default)]
pub struct FormatCache {
    entries: RwLock<HashMap<String, Arc<FormatSpec>>>,
}

impl FormatCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `format`, compiling it on first use.
    pub fn get(&self, format: &str) -> Result<Arc<FormatSpec>> {
        if let Some(spec) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(format)
        {
            tracing::trace!(format, "struct format cache hit");
            return Ok(Arc::clone(spec));
        }

        tracing::trace!(format, "struct format cache miss");
        let spec = Arc::new(FormatSpec::compile(format)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have compiled the same format in the meantime; keep the first.
        let spec = entries.entry(format.into()).or_insert(spec);
        Ok(Arc::clone(spec))
    }

    /// Number of cached formats.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached format. Handles already given out stay valid.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
