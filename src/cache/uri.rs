//! Cache-busting URIs embedding the current generation

use std::fmt;

use crate::cache::error::Result;
use crate::cache::generation::{GenerationId, GenerationStore};
use crate::core::util::{trim_query_prefix, trim_trailing_slashes};

/// A built URI together with the generation it embeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheUri {
    pub generation: GenerationId,
    pub uri: String,
}

impl fmt::Display for CacheUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Build a URI for the static cache, e.g. `/min/static/1467089473/b=scripts&f=1.js`.
///
/// Creates the generation directory when none exists yet.
pub fn build_uri(store: &GenerationStore, static_base: &str, raw_query: &str) -> Result<CacheUri> {
    let base = trim_trailing_slashes(static_base);
    let query = trim_query_prefix(raw_query);

    let generation = store.ensure_generation()?;
    let uri = format!("{}/{}/{}", base, generation, query);

    Ok(CacheUri { generation, uri })
}
