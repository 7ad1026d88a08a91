//! An open project and the services commands run against.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use frame_core::{
    ControlField, ControlList, DrawioTemplates, Editor, Layer, PanelEvent, PanelId, Project,
    StudioConfig,
};
use frame_renderer::{save_preview_png, Compositor, ProjectExporter};

use crate::{Command, CopyTarget, LayerTarget};

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text for the user.
    pub message: String,
    /// Whether the project changed and must be saved.
    pub modified: bool,
}

impl Outcome {
    fn changed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            modified: true,
        }
    }

    fn report(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            modified: false,
        }
    }
}

/// Project opened from (and saved back to) one file.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    project: Project,
    templates: DrawioTemplates,
    compositor: Compositor,
}

impl Session {
    /// Start a fresh project that will be saved to `path`.
    ///
    /// The configured default template is applied; if it cannot be read the
    /// panels start without exclusion rectangles.
    #[must_use]
    pub fn create(config: &StudioConfig, path: impl Into<PathBuf>) -> Self {
        let templates = DrawioTemplates::new(&config.templates_dir);
        let mut project = Project::new(config);
        if project
            .switch_template(&config.default_template, &templates)
            .is_err()
        {
            tracing::warn!("New project starts without exclusion zones");
        }
        Self {
            path: path.into(),
            project,
            templates,
            compositor: Compositor::new(),
        }
    }

    /// Load the project at `path`, or start a fresh one if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn open(config: &StudioConfig, path: impl Into<PathBuf>) -> Result<Self> {
        let mut session = Self::create(config, path);
        if session.path.exists() {
            session
                .project
                .load(&session.path)
                .with_context(|| format!("Failed to open project {}", session.path.display()))?;
        } else {
            tracing::info!("{} not found, starting a new project", session.path.display());
        }
        Ok(session)
    }

    /// Project file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open project.
    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Write the project back to its file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.project
            .save(&self.path)
            .with_context(|| format!("Failed to save project {}", self.path.display()))
    }

    /// Run one command against the project.
    ///
    /// # Errors
    ///
    /// Returns an error when the command is rejected (bad index, invalid
    /// color, unreadable image or template, export failure). The project is
    /// unchanged in that case.
    pub fn execute(&mut self, command: &Command) -> Result<Outcome> {
        match command {
            Command::New { name } => {
                if let Some(name) = name {
                    self.project.set_name(name.clone());
                }
                Ok(Outcome::changed(format!(
                    "New project {:?} ({})",
                    self.project.name(),
                    self.path.display()
                )))
            }
            Command::Show { panel } => Ok(Outcome::report(self.show(*panel))),
            Command::AddImage { panel, path } => {
                let editor = self.project.panel_mut(*panel);
                match editor.add_image_layer(path.as_deref())? {
                    Some(index) => Ok(Outcome::changed(format!(
                        "Added {} at index {index} of {panel}",
                        layer_name(editor, index)
                    ))),
                    None => Ok(Outcome::report("No image given, nothing added")),
                }
            }
            Command::AddText { panel, text } => {
                let editor = self.project.panel_mut(*panel);
                let index = editor.add_text_layer();
                if let Some(text) = text {
                    editor.set_active_text(text);
                }
                Ok(Outcome::changed(format!(
                    "Added {} at index {index} of {panel}",
                    layer_name(editor, index)
                )))
            }
            Command::Delete { target } => {
                let editor = self.select(*target)?;
                let name = layer_name(editor, target.layer);
                if !editor.delete_active_layer() {
                    bail!("{name} is an exclusion zone layer and cannot be deleted");
                }
                Ok(Outcome::changed(format!("Deleted {name}")))
            }
            Command::Move { target, direction } => {
                let editor = self.select(*target)?;
                if !editor.move_active_layer(direction.offset()) {
                    return Ok(Outcome::report("Layer is already at the edge of the stack"));
                }
                let index = editor.active_index().unwrap_or(target.layer);
                Ok(Outcome::changed(format!(
                    "Moved {} to index {index}",
                    layer_name(editor, index)
                )))
            }
            Command::Drag { target, dx, dy } => self.drag(*target, *dx, *dy),
            Command::Wheel { target, notches } => self.wheel(*target, *notches),
            Command::Text {
                target,
                content,
                color,
                family,
                size,
            } => self.edit_text(
                *target,
                content.as_deref(),
                color.as_deref(),
                family.as_deref(),
                *size,
            ),
            Command::Flags {
                target,
                visible,
                locked,
            } => self.set_flags(*target, *visible, *locked),
            Command::Background { panel, color } => {
                self.project.panel_mut(*panel).set_background_color(color)?;
                Ok(Outcome::changed(format!("Background of {panel} set to {color}")))
            }
            Command::Template { id } => {
                self.project.switch_template(id, &self.templates)?;
                Ok(Outcome::changed(format!("Template {id} applied")))
            }
            Command::Copy {
                what,
                from,
                to,
                layer,
            } => self.copy(*what, *from, *to, *layer),
            Command::Rename { name } => {
                self.project.set_name(name.clone());
                Ok(Outcome::changed(format!("Project renamed to {name:?}")))
            }
            Command::Preview { panel, out } => {
                save_preview_png(&mut self.compositor, self.project.panel(*panel), out)?;
                Ok(Outcome::report(format!("Preview of {panel} written to {}", out.display())))
            }
            Command::Export { out_dir } => self.export(out_dir),
        }
    }

    fn select(&mut self, target: LayerTarget) -> Result<&mut Editor> {
        let editor = self.project.panel_mut(target.panel);
        if !editor.select_layer(target.layer) {
            bail!(
                "Panel {} has no layer {} ({} layer(s))",
                target.panel,
                target.layer,
                editor.len()
            );
        }
        Ok(editor)
    }

    fn drag(&mut self, target: LayerTarget, dx: i32, dy: i32) -> Result<Outcome> {
        let editor = self.select(target)?;
        editor.handle_event(&PanelEvent::PointerDown { x: 0, y: 0 });
        let moved = editor.handle_event(&PanelEvent::PointerDrag { x: dx, y: dy });
        editor.handle_event(&PanelEvent::PointerUp);
        if !moved {
            return Ok(Outcome::report("Layer is locked or hidden, nothing moved"));
        }
        let at = editor
            .active_layer()
            .map(Layer::display_position)
            .unwrap_or_default();
        Ok(Outcome::changed(format!(
            "Moved {} to ({}, {})",
            layer_name(editor, target.layer),
            at.x,
            at.y
        )))
    }

    fn wheel(&mut self, target: LayerTarget, notches: i32) -> Result<Outcome> {
        let editor = self.select(target)?;
        let delta = notches.signum();
        let mut changed = false;
        for _ in 0..notches.unsigned_abs() {
            changed |= editor.handle_event(&PanelEvent::Wheel { delta });
        }
        Ok(if changed {
            Outcome::changed(format!("Resized {}", layer_name(editor, target.layer)))
        } else {
            Outcome::report("Nothing resized")
        })
    }

    fn edit_text(
        &mut self,
        target: LayerTarget,
        content: Option<&str>,
        color: Option<&str>,
        family: Option<&str>,
        size: Option<u32>,
    ) -> Result<Outcome> {
        let editor = self.select(target)?;
        let Some(font) = editor
            .active_layer()
            .and_then(Layer::as_text)
            .map(|t| t.font().clone())
        else {
            bail!("{} is not a text layer", layer_name(editor, target.layer));
        };
        if let Some(color) = color {
            editor.set_active_text_color(color)?;
        }
        if let Some(content) = content {
            editor.set_active_text(content);
        }
        if family.is_some() || size.is_some() {
            editor.set_active_font(family.unwrap_or(&font.family), size.unwrap_or(font.size));
        }
        Ok(Outcome::changed(format!(
            "Updated {}",
            layer_name(editor, target.layer)
        )))
    }

    fn set_flags(
        &mut self,
        target: LayerTarget,
        visible: Option<bool>,
        locked: Option<bool>,
    ) -> Result<Outcome> {
        let editor = self.select(target)?;
        if let Some(visible) = visible {
            editor.set_active_visible(visible);
        }
        if let Some(locked) = locked {
            editor.set_active_locked(locked);
        }
        Ok(Outcome::changed(format!(
            "Updated {}",
            layer_name(editor, target.layer)
        )))
    }

    fn export(&mut self, out_dir: &Path) -> Result<Outcome> {
        let report =
            ProjectExporter::new(out_dir).export(&self.project, &mut self.compositor, &self.templates)?;
        let mut message = String::from("Exported:");
        for path in report.panels.iter().chain(std::iter::once(&report.template)) {
            let _ = write!(message, "\n  {}", path.display());
        }
        Ok(Outcome::report(message))
    }

    fn copy(
        &mut self,
        what: CopyTarget,
        from: PanelId,
        to: PanelId,
        layer: Option<usize>,
    ) -> Result<Outcome> {
        match what {
            CopyTarget::Layer => {
                let Some(layer) = layer else {
                    bail!("copy layer needs --layer");
                };
                self.select(LayerTarget { panel: from, layer })?;
                let index = self.project.copy_layer(from, to)?;
                Ok(Outcome::changed(format!(
                    "Copied to {to} as {}",
                    layer_name(self.project.panel(to), index)
                )))
            }
            CopyTarget::All => {
                self.project.copy_all_editable_layers(from, to)?;
                Ok(Outcome::changed(format!("Copied every layer from {from} to {to}")))
            }
            CopyTarget::Background => {
                self.project.copy_background(from, to)?;
                Ok(Outcome::changed(format!("Copied background from {from} to {to}")))
            }
        }
    }

    fn show(&self, panel: Option<PanelId>) -> String {
        let panels = panel.map_or_else(|| PanelId::ALL.to_vec(), |p| vec![p]);
        let mut out = format!(
            "project {:?}, template {}",
            self.project.name(),
            self.project.template()
        );
        for id in panels {
            let editor = self.project.panel(id);
            let _ = write!(
                out,
                "\npanel {id} (background {}, {} zone(s))",
                editor.background(),
                editor.zone_count()
            );
            let mut controls = ControlList::default();
            for (index, layer) in editor.layers().iter().enumerate() {
                let at = layer.display_position();
                let _ = write!(
                    out,
                    "\n  [{index}] {} ({}) at ({}, {}){}{}",
                    layer.name,
                    layer.layer_type(),
                    at.x,
                    at.y,
                    if layer.visible { "" } else { " hidden" },
                    if layer.locked { " locked" } else { "" }
                );
                layer.describe_controls(&mut controls);
                for field in &controls.fields {
                    if let Some(line) = describe_field(field) {
                        let _ = write!(out, "\n      {line}");
                    }
                }
            }
        }
        out
    }
}

fn layer_name(editor: &Editor, index: usize) -> String {
    editor
        .layer(index)
        .map_or_else(|| format!("layer {index}"), |l| format!("{:?}", l.name))
}

fn describe_field(field: &ControlField) -> Option<String> {
    match field {
        ControlField::Label(_) => None,
        ControlField::Text(text) => Some(format!("text: {text:?}")),
        ControlField::Color(color) => Some(format!("color: {color}")),
        ControlField::Font { family, size } => Some(format!("font: {family} {size}")),
        ControlField::Source(Some(path)) => Some(format!("source: {}", path.display())),
        ControlField::Source(None) => Some("source: none".to_string()),
        ControlField::Size { width, height } => Some(format!("size: {width}x{height}")),
        ControlField::ZoneCount(n) => Some(format!("zones: {n}")),
    }
}
