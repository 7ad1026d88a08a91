//! # Frame Studio
//!
//! Command-line host for Frame Studio projects.
//!
//! Every invocation opens a project file (or starts a fresh project when the
//! file does not exist yet), applies one command to it and saves it back when
//! the command changed anything.
//!
//! ## Usage
//!
//! ```bash
//! frame-studio --project wedding.json add-image single photo.jpg
//! frame-studio --project wedding.json drag single 1 10 -5
//! frame-studio --project wedding.json copy layer single quad --layer 1
//! frame-studio --project wedding.json export out/
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StudioConfig` - Built from the arguments, passed to the project
//! - `Session` - Open project plus template resolver and compositor

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod session;

pub use session::{Outcome, Session};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use frame_core::config::{DEFAULT_PREVIEW_HEIGHT, DEFAULT_PREVIEW_WIDTH, DEFAULT_RATIO};
use frame_core::{PanelConfig, PanelId, StudioConfig};

/// Command-line arguments for frame-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "frame-studio")]
#[command(about = "Compose photo-frame panels and export them for print")]
#[command(version)]
pub struct CliArgs {
    /// Project file (JSON); created on first save
    #[arg(short, long, env = "FRAME_PROJECT", default_value = "project.json")]
    pub project: PathBuf,

    /// Directory searched for font files
    #[arg(long, env = "FRAME_FONTS_DIR", default_value = "fonts")]
    pub fonts_dir: PathBuf,

    /// Font file used when no file matches a family
    #[arg(long, env = "FRAME_DEFAULT_FONT")]
    pub default_font: Option<PathBuf>,

    /// Directory holding template geometry files
    #[arg(long, env = "FRAME_TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,

    /// Template applied to new projects
    #[arg(long, env = "FRAME_TEMPLATE", default_value = frame_core::config::DEFAULT_TEMPLATE)]
    pub template: String,

    /// Preview width in pixels
    #[arg(long, default_value_t = DEFAULT_PREVIEW_WIDTH)]
    pub width: u32,

    /// Preview height in pixels
    #[arg(long, default_value_t = DEFAULT_PREVIEW_HEIGHT)]
    pub height: u32,

    /// Export/preview size ratio
    #[arg(long, env = "FRAME_RATIO", default_value_t = DEFAULT_RATIO)]
    pub ratio: u32,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Project commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a new project, overwriting the project file
    New {
        /// Export base name
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the layer stacks and each layer's fields
    Show {
        /// Panel to describe (both when omitted)
        panel: Option<PanelId>,
    },
    /// Add an image layer, optionally importing a file into it
    AddImage {
        /// Target panel
        panel: PanelId,
        /// Image file to import
        path: Option<PathBuf>,
    },
    /// Add a text layer
    AddText {
        /// Target panel
        panel: PanelId,
        /// Initial text
        text: Option<String>,
    },
    /// Delete a layer
    Delete {
        /// Layer to delete
        #[command(flatten)]
        target: LayerTarget,
    },
    /// Move a layer one step in the stack
    Move {
        /// Layer to move
        #[command(flatten)]
        target: LayerTarget,
        /// Direction
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Drag a layer by a preview-space offset
    Drag {
        /// Layer to drag
        #[command(flatten)]
        target: LayerTarget,
        /// Horizontal offset
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        /// Vertical offset
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },
    /// Turn the wheel over a layer (positive grows)
    Wheel {
        /// Layer to resize
        #[command(flatten)]
        target: LayerTarget,
        /// Wheel notches
        #[arg(allow_negative_numbers = true)]
        notches: i32,
    },
    /// Edit a text layer
    Text {
        /// Layer to edit
        #[command(flatten)]
        target: LayerTarget,
        /// New content
        #[arg(long)]
        content: Option<String>,
        /// New color (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
        /// New font family
        #[arg(long)]
        family: Option<String>,
        /// New font size
        #[arg(long)]
        size: Option<u32>,
    },
    /// Change visibility or lock state of a layer
    Flags {
        /// Layer to change
        #[command(flatten)]
        target: LayerTarget,
        /// Visibility
        #[arg(long)]
        visible: Option<bool>,
        /// Lock state
        #[arg(long)]
        locked: Option<bool>,
    },
    /// Set a panel's background color
    Background {
        /// Target panel
        panel: PanelId,
        /// Color (#RRGGBB)
        color: String,
    },
    /// Switch template
    Template {
        /// Template id
        id: String,
    },
    /// Copy between panels
    Copy {
        /// What to copy
        #[arg(value_enum)]
        what: CopyTarget,
        /// Source panel
        from: PanelId,
        /// Destination panel
        to: PanelId,
        /// Source layer index, for `copy layer`
        #[arg(long)]
        layer: Option<usize>,
    },
    /// Set the export base name
    Rename {
        /// New name
        name: String,
    },
    /// Write a panel's preview composite as PNG
    Preview {
        /// Panel to render
        panel: PanelId,
        /// Output file
        out: PathBuf,
    },
    /// Export both panels and the template into a directory
    Export {
        /// Output directory
        out_dir: PathBuf,
    },
}

/// A layer addressed by panel and stack index (0 is the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct LayerTarget {
    /// Panel holding the layer
    pub panel: PanelId,
    /// Stack index
    pub layer: usize,
}

/// Stack direction for [`Command::Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Toward the top (index 0).
    Up,
    /// Toward the bottom.
    Down,
}

impl Direction {
    /// Index offset of one step.
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// What [`Command::Copy`] copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyTarget {
    /// The layer given by `--layer`.
    Layer,
    /// Every non-zone layer, replacing the destination's.
    All,
    /// The background color.
    Background,
}

impl From<&CliArgs> for StudioConfig {
    fn from(args: &CliArgs) -> Self {
        let mut config = Self::new()
            .with_panel(PanelConfig {
                preview_width: args.width,
                preview_height: args.height,
                ratio: args.ratio.max(1),
            })
            .with_fonts_dir(&args.fonts_dir)
            .with_templates_dir(&args.templates_dir);
        config.default_font.clone_from(&args.default_font);
        config.default_template.clone_from(&args.template);
        config
    }
}

/// Open the project named by `args`, run its command and save if needed.
///
/// Returns the text to print.
///
/// # Errors
///
/// Returns an error if the project cannot be opened, the command fails or
/// the project cannot be saved.
pub fn run(args: &CliArgs) -> anyhow::Result<String> {
    let config = StudioConfig::from(args);
    let mut session = if matches!(args.command, Command::New { .. }) {
        Session::create(&config, &args.project)
    } else {
        Session::open(&config, &args.project)?
    };
    let outcome = session.execute(&args.command)?;
    if outcome.modified {
        session.save()?;
    }
    Ok(outcome.message)
}
