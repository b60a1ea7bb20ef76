//! Generation directories - timestamp-named cache epochs under the cache root
//!
//! At most one generation directory is expected to exist at a time. Nothing
//! enforces that: lookup returns the first digit-named directory the root
//! listing yields, in filesystem order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cache::error::{CacheError, Result};
use crate::core::paths::generation_dir;
use crate::core::util::{is_all_digits, now_secs};

/// Name of a generation directory: a non-empty run of ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationId(String);

impl GenerationId {
    /// Accept a directory name as a generation id if it is all digits
    pub fn parse(name: &str) -> Option<Self> {
        is_all_digits(name).then(|| Self(name.to_string()))
    }

    /// Generation id for a Unix timestamp in seconds
    pub fn from_timestamp(secs: i64) -> Self {
        Self(secs.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Manages the generation directory beneath one cache root
#[derive(Debug, Clone)]
pub struct GenerationStore {
    root: PathBuf,
}

impl GenerationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory of a generation under this root
    pub fn path_of(&self, id: &GenerationId) -> PathBuf {
        generation_dir(&self.root, id.as_str())
    }

    /// Get the current generation, creating one when missing and `auto_create` is set.
    ///
    /// `Ok(None)` means no generation exists and creation was not requested.
    pub fn current_generation(&self, auto_create: bool) -> Result<Option<GenerationId>> {
        if auto_create {
            return self.ensure_generation().map(Some);
        }

        let found = self.find_generation()?;
        if found.is_none() {
            debug!("No generation under {}", self.root.display());
        }
        Ok(found)
    }

    /// Get the current generation, creating one when missing
    pub fn ensure_generation(&self) -> Result<GenerationId> {
        self.ensure_generation_created().map(|(id, _)| id)
    }

    /// Like [`Self::ensure_generation`], also reporting whether this call
    /// created the directory
    pub fn ensure_generation_created(&self) -> Result<(GenerationId, bool)> {
        match self.find_generation()? {
            Some(id) => {
                debug!("Current generation is {}", id);
                Ok((id, false))
            }
            None => self.create_generation(GenerationId::from_timestamp(now_secs())),
        }
    }

    /// Remove the current generation and everything beneath it.
    ///
    /// Returns the flushed id, or `Ok(None)` when there was nothing to flush.
    pub fn flush(&self) -> Result<Option<GenerationId>> {
        let Some(id) = self.current_generation(false)? else {
            return Ok(None);
        };

        remove_tree(&self.path_of(&id))?;
        info!("Flushed generation {}", id);
        Ok(Some(id))
    }

    fn find_generation(&self) -> Result<Option<GenerationId>> {
        let entries = fs::read_dir(&self.root).map_err(|source| CacheError::ReadRoot {
            path: self.root.clone(),
            source,
        })?;

        for entry in entries {
            // Entries can vanish between listing and inspection
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry in {}: {}", self.root.display(), e);
                    continue;
                }
            };

            let Some(id) = entry.file_name().to_str().and_then(GenerationId::parse) else {
                continue;
            };

            // file_type() does not follow symlinks
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                return Ok(Some(id));
            }
        }

        Ok(None)
    }

    fn create_generation(&self, id: GenerationId) -> Result<(GenerationId, bool)> {
        let path = self.path_of(&id);
        match fs::create_dir(&path) {
            Ok(()) => {
                info!("Created generation {}", id);
                Ok((id, true))
            }
            // Another caller created the same generation first
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
                debug!("Generation {} already created", id);
                Ok((id, false))
            }
            Err(source) => Err(CacheError::CreateGeneration { path, source }),
        }
    }
}

/// Recursively delete a directory and everything beneath it.
///
/// Symlinks are unlinked, never followed. Failures on individual entries are
/// logged and skipped; the result reflects removal of `path` itself.
pub fn remove_tree(path: &Path) -> Result<()> {
    let remove_err = |source: io::Error| CacheError::RemoveTree {
        path: path.to_path_buf(),
        source,
    };

    if fs::symlink_metadata(path).map_err(remove_err)?.file_type().is_symlink() {
        return fs::remove_file(path).map_err(remove_err);
    }

    let walker = WalkDir::new(path)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read entry under {}: {}", path.display(), e);
                continue;
            }
        };

        let removed = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        if let Err(e) = removed {
            warn!("Failed to remove {}: {}", entry.path().display(), e);
        }
    }

    fs::remove_dir(path).map_err(remove_err)
}
