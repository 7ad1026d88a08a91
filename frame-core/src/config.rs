//! Studio configuration.
//!
//! Passed explicitly to [`crate::Project`] and [`crate::Editor`]; nothing in
//! the crate reads process-wide defaults.

use std::path::PathBuf;

/// Default preview width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 600;

/// Default preview height in pixels.
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 400;

/// Default export/preview ratio (600x400 preview, 1800x1200 export).
pub const DEFAULT_RATIO: u32 = 3;

/// Default template identifier.
pub const DEFAULT_TEMPLATE: &str = "template_std.xml";

/// Default project name used as the export file prefix.
pub const DEFAULT_PROJECT_NAME: &str = "frame_set";

/// Geometry of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Preview surface width.
    pub preview_width: u32,
    /// Preview surface height.
    pub preview_height: u32,
    /// Export/preview ratio.
    pub ratio: u32,
}

impl PanelConfig {
    /// Preview surface size.
    #[must_use]
    pub const fn preview_size(&self) -> (u32, u32) {
        (self.preview_width, self.preview_height)
    }

    /// Export surface size.
    #[must_use]
    pub const fn export_size(&self) -> (u32, u32) {
        (
            self.preview_width.saturating_mul(self.ratio),
            self.preview_height.saturating_mul(self.ratio),
        )
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            preview_width: DEFAULT_PREVIEW_WIDTH,
            preview_height: DEFAULT_PREVIEW_HEIGHT,
            ratio: DEFAULT_RATIO,
        }
    }
}

/// Configuration shared by both panels of a project.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Panel geometry (both panels use it).
    pub panel: PanelConfig,
    /// Directory searched for font files.
    pub fonts_dir: PathBuf,
    /// Font used when no file matches a family.
    pub default_font: Option<PathBuf>,
    /// Directory holding template geometry files.
    pub templates_dir: PathBuf,
    /// Template selected for new projects.
    pub default_template: String,
    /// Project name for new projects.
    pub project_name: String,
}

impl StudioConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            panel: PanelConfig::default(),
            fonts_dir: PathBuf::from("fonts"),
            default_font: None,
            templates_dir: PathBuf::from("templates"),
            default_template: DEFAULT_TEMPLATE.to_string(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }

    /// Set the panel geometry.
    #[must_use]
    pub fn with_panel(mut self, panel: PanelConfig) -> Self {
        self.panel = panel;
        self
    }

    /// Set the fonts directory.
    #[must_use]
    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Set the templates directory.
    #[must_use]
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}
