//! Durable per-article record of already-processed link URLs.
//!
//! Persisted as a JSON object keyed by article slug, each value an
//! unordered list of URLs: `{"my-article": ["http://host/page", ...]}`.
//! Entries are only ever added during a run; the runner persists the cache
//! on every exit path so partial progress survives an interrupted build.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache io error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed cache file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkCache {
    entries: HashMap<String, HashSet<String>>,
}

impl LinkCache {
    /// Loads the cache from `path`. A missing file is an empty cache; a
    /// file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(CacheError::Io {
                    path: path.display().to_string(),
                    source: err,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|err| CacheError::Malformed {
            path: path.display().to_string(),
            source: err,
        })
    }

    /// Like [`LinkCache::load`] but degrades a malformed file to an empty
    /// cache with a warning, for hosts that prefer redundant notifications
    /// over a failed build.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cache) => cache,
            Err(err) => {
                warn!("starting with an empty link cache: {err}");
                Self::default()
            }
        }
    }

    /// Writes the cache to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string(self).map_err(|err| CacheError::Malformed {
            path: path.display().to_string(),
            source: err,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn contains(&self, slug: &str, url: &str) -> bool {
        self.entries.get(slug).is_some_and(|urls| urls.contains(url))
    }

    /// Records `url` as processed for `slug`. Returns whether the entry
    /// was new.
    pub fn add(&mut self, slug: &str, url: &str) -> bool {
        self.entries
            .entry(slug.to_string())
            .or_default()
            .insert(url.to_string())
    }

    /// Total number of cached URLs across all articles.
    pub fn total_urls(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }
}
