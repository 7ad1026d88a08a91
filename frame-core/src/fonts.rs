//! Font file resolution.
//!
//! Families are matched against font file names in a fonts directory,
//! ignoring case, spaces, dashes and underscores. Resolution never fails:
//! when nothing matches, the configured default font (or none, meaning
//! "let the rasterizer use a system sans-serif") is returned.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::StudioConfig;

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Outcome of resolving a family or font name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    /// Font file to load, if any was found.
    pub path: Option<PathBuf>,
    /// Whether this is a fallback rather than a match.
    pub is_fallback: bool,
}

/// Looks up font files by family name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontResolver {
    fonts_dir: PathBuf,
    default_font: Option<PathBuf>,
}

impl FontResolver {
    /// Create a resolver over `fonts_dir`.
    #[must_use]
    pub fn new(fonts_dir: impl Into<PathBuf>, default_font: Option<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            default_font,
        }
    }

    /// Fonts directory searched by this resolver.
    #[must_use]
    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    /// Resolve a family name to a font file.
    #[must_use]
    pub fn resolve_family(&self, family: &str) -> ResolvedFont {
        let wanted = normalize(family);
        let found = self.font_files().find(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| normalize(stem) == wanted)
        });
        match found {
            Some(path) => ResolvedFont {
                path: Some(path),
                is_fallback: false,
            },
            None => {
                tracing::debug!("No font file for family {family:?}, using fallback");
                self.fallback()
            }
        }
    }

    /// Locate a persisted font name: an existing path, a file name inside the
    /// fonts directory, or a family-like stem. Falls back like
    /// [`Self::resolve_family`].
    #[must_use]
    pub fn locate(&self, font_name: &str, family: &str) -> ResolvedFont {
        let direct = Path::new(font_name);
        if !font_name.is_empty() && direct.is_file() {
            return ResolvedFont {
                path: Some(direct.to_path_buf()),
                is_fallback: false,
            };
        }
        if let Some(file_name) = direct.file_name() {
            if let Some(path) = self.font_files().find(|p| p.file_name() == Some(file_name)) {
                return ResolvedFont {
                    path: Some(path),
                    is_fallback: false,
                };
            }
        }
        if let Some(stem) = direct.file_stem().and_then(|s| s.to_str()) {
            let by_stem = self.resolve_family(stem);
            if !by_stem.is_fallback {
                return by_stem;
            }
        }
        self.resolve_family(family)
    }

    /// Name stored in a text layer for `family`: the matched file path, or
    /// `{family}.ttf` when no file matched.
    #[must_use]
    pub fn font_name_for(&self, family: &str) -> String {
        match self.resolve_family(family) {
            ResolvedFont {
                path: Some(path),
                is_fallback: false,
            } => path.to_string_lossy().into_owned(),
            _ => format!("{family}.ttf"),
        }
    }

    fn fallback(&self) -> ResolvedFont {
        ResolvedFont {
            path: self.default_font.clone().filter(|p| p.is_file()),
            is_fallback: true,
        }
    }

    fn font_files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.fonts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            })
    }
}

impl From<&StudioConfig> for FontResolver {
    fn from(config: &StudioConfig) -> Self {
        Self::new(config.fonts_dir.clone(), config.default_font.clone())
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::from(&StudioConfig::default())
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
