//! Font database cache for the text rasterizer.
//!
//! Loading a font file (or worse, scanning the system fonts) on every
//! recomposite is wasteful, so each resolved font is loaded once into its
//! own database and shared afterwards.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use usvg::fontdb::Database;

/// Family used when no font file could be resolved.
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Installed families tried, in order, as the concrete fallback face.
const PREFERRED_FALLBACKS: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
    "FreeSans",
];

/// Pick an installed family to stand in for [`FALLBACK_FAMILY`].
///
/// fontdb maps the generic family to a fixed name that is often not
/// installed, which renders nothing. Returns `None` for an empty database.
#[must_use]
pub fn fallback_family(database: &Database) -> Option<String> {
    let installed = || {
        database
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name))
    };
    PREFERRED_FALLBACKS
        .iter()
        .find_map(|wanted| installed().find(|name| name.eq_ignore_ascii_case(wanted)))
        .or_else(|| installed().next())
        .cloned()
}

/// A loaded font database and the family to request from it.
#[derive(Clone)]
pub struct LoadedFont {
    /// Database holding the font (or the system fonts).
    pub database: Arc<Database>,
    /// Family name to put in `font-family`.
    pub family: String,
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("family", &self.family)
            .field("faces", &self.database.len())
            .finish()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that loaded a database.
    pub misses: u64,
    /// Font files that could not be loaded.
    pub failures: u64,
}

/// Databases keyed by font file; `None` is the system fallback.
#[derive(Debug, Default)]
pub struct FontCache {
    entries: HashMap<Option<PathBuf>, LoadedFont>,
    stats: CacheStats,
}

impl FontCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Database for `path`, loading it on first use. Unloadable files fall
    /// back to the system fonts.
    pub fn get(&mut self, path: Option<&Path>) -> LoadedFont {
        let key = path.map(Path::to_path_buf);
        if let Some(entry) = self.entries.get(&key) {
            self.stats.hits += 1;
            return entry.clone();
        }
        self.stats.misses += 1;

        let loaded = match path {
            Some(path) => Self::load_file(path).unwrap_or_else(|| {
                self.stats.failures += 1;
                tracing::warn!("Font {} unusable, using {FALLBACK_FAMILY}", path.display());
                self.system()
            }),
            None => self.system(),
        };
        self.entries.insert(key, loaded.clone());
        loaded
    }

    /// Current statistics.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached databases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn system(&mut self) -> LoadedFont {
        if let Some(entry) = self.entries.get(&None) {
            return entry.clone();
        }
        let mut database = Database::new();
        database.load_system_fonts();
        let family = match fallback_family(&database) {
            Some(family) => {
                database.set_sans_serif_family(family.clone());
                tracing::debug!(
                    "Loaded {} system font face(s), falling back to {family:?}",
                    database.len()
                );
                family
            }
            None => {
                tracing::warn!("No system fonts found; text without a font file will not render");
                FALLBACK_FAMILY.to_string()
            }
        };
        let loaded = LoadedFont {
            database: Arc::new(database),
            family,
        };
        self.entries.insert(None, loaded.clone());
        loaded
    }

    fn load_file(path: &Path) -> Option<LoadedFont> {
        let mut database = Database::new();
        if let Err(e) = database.load_font_file(path) {
            tracing::debug!("Cannot read font {}: {e}", path.display());
            return None;
        }
        let family = database
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))?;
        tracing::debug!("Loaded font {} as family {family:?}", path.display());
        Some(LoadedFont {
            database: Arc::new(database),
            family,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloadable_file_falls_back_and_is_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").expect("write");

        let mut cache = FontCache::new();
        let first = cache.get(Some(&bogus));
        assert_eq!(first.family, cache.get(None).family);
        let second = cache.get(Some(&bogus));
        assert!(Arc::ptr_eq(&first.database, &second.database));

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.failures, 1);
        // bogus path + system fallback
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_system_fallback_shared() {
        let mut cache = FontCache::new();
        let a = cache.get(None);
        let b = cache.get(None);
        assert!(Arc::ptr_eq(&a.database, &b.database));
        if a.database.is_empty() {
            assert_eq!(a.family, FALLBACK_FAMILY);
        } else {
            assert_ne!(a.family, FALLBACK_FAMILY);
            assert_eq!(fallback_family(&a.database).as_deref(), Some(a.family.as_str()));
        }
    }

    #[test]
    fn test_fallback_family_is_installed() {
        assert_eq!(fallback_family(&Database::new()), None);

        let mut database = Database::new();
        database.load_system_fonts();
        if let Some(family) = fallback_family(&database) {
            assert!(database
                .faces()
                .any(|face| face.families.iter().any(|(name, _)| *name == family)));
        }
    }
}
