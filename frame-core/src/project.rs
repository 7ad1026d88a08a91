//! Two-panel project: a single-photo frame and a four-photo frame sharing a
//! template.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::fonts::FontResolver;
use crate::layer::Layer;
use crate::record::{LayerRecord, PanelRecord, ProjectDocument};
use crate::template::TemplateResolver;
use crate::{Editor, FrameError, FrameResult, PanelConfig, StudioConfig};

/// Identifies one of the two panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    /// Single-photo panel, persisted as `app1`.
    Single,
    /// Four-photo panel, persisted as `app4`.
    Quad,
}

impl PanelId {
    /// Both panels in persistence order.
    pub const ALL: [Self; 2] = [Self::Single, Self::Quad];

    /// The other panel.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Single => Self::Quad,
            Self::Quad => Self::Single,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Quad => "quad",
        })
    }
}

impl FromStr for PanelId {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "app1" | "1" => Ok(Self::Single),
            "quad" | "app4" | "4" => Ok(Self::Quad),
            other => Err(FrameError::InvalidOperation(format!(
                "unknown panel {other:?} (expected single or quad)"
            ))),
        }
    }
}

/// Both panels plus the shared template and export name.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    template: String,
    single: Editor,
    quad: Editor,
}

impl Project {
    /// Empty project: white backgrounds, one empty exclusion layer per panel
    /// and the configured default template id. Zones are filled in by
    /// [`Self::switch_template`].
    #[must_use]
    pub fn new(config: &StudioConfig) -> Self {
        let fonts = FontResolver::from(config);
        Self {
            name: config.project_name.clone(),
            template: config.default_template.clone(),
            single: Editor::with_zones(config.panel, fonts.clone(), Vec::new()),
            quad: Editor::with_zones(config.panel, fonts, Vec::new()),
        }
    }

    /// Export base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the export base name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Selected template id.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Panel editor.
    #[must_use]
    pub const fn panel(&self, id: PanelId) -> &Editor {
        match id {
            PanelId::Single => &self.single,
            PanelId::Quad => &self.quad,
        }
    }

    /// Mutable panel editor.
    pub fn panel_mut(&mut self, id: PanelId) -> &mut Editor {
        match id {
            PanelId::Single => &mut self.single,
            PanelId::Quad => &mut self.quad,
        }
    }

    fn pair_mut(&mut self, from: PanelId, to: PanelId) -> FrameResult<(&Editor, &mut Editor)> {
        match (from, to) {
            (PanelId::Single, PanelId::Quad) => Ok((&self.single, &mut self.quad)),
            (PanelId::Quad, PanelId::Single) => Ok((&self.quad, &mut self.single)),
            _ => Err(FrameError::InvalidOperation(format!(
                "cannot copy panel {from} onto itself"
            ))),
        }
    }

    /// Clone the active layer of `from` onto the end of `to`, named after
    /// `to`'s own same-type count. Returns the new index in `to`.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidOperation`] if the panels are the same, `from`
    /// has no active layer, or the active layer is an exclusion zone.
    pub fn copy_layer(&mut self, from: PanelId, to: PanelId) -> FrameResult<usize> {
        let (source, dest) = self.pair_mut(from, to)?;
        let layer = source
            .active_layer()
            .ok_or_else(|| FrameError::InvalidOperation(format!("panel {from} has no active layer")))?;
        if layer.is_exclusion_zone() {
            return Err(FrameError::InvalidOperation(
                "exclusion zones follow the template and cannot be copied".to_string(),
            ));
        }
        let mut copy = layer.clone_layer();
        copy.name = dest.next_layer_name(copy.layer_type());
        tracing::debug!("Copying layer {:?} from {from} to {to} as {:?}", layer.name, copy.name);
        Ok(dest.push_layer(copy))
    }

    /// Replace every editable layer of `to` with deep copies of `from`'s,
    /// keeping names and order. `to`'s exclusion layer takes the stack slot
    /// `from`'s exclusion layer holds.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidOperation`] if the panels are the same.
    pub fn copy_all_editable_layers(&mut self, from: PanelId, to: PanelId) -> FrameResult<()> {
        let (source, dest) = self.pair_mut(from, to)?;
        let zone_index = source.layers().iter().position(Layer::is_exclusion_zone);
        let copies: Vec<Layer> = source.editable_layers().cloned().collect();
        tracing::debug!("Copying {} layer(s) from {from} to {to}", copies.len());
        dest.replace_editable_layers(copies, zone_index);
        Ok(())
    }

    /// Copy the background color of `from` onto `to`.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidOperation`] if the panels are the same.
    pub fn copy_background(&mut self, from: PanelId, to: PanelId) -> FrameResult<()> {
        let (source, dest) = self.pair_mut(from, to)?;
        dest.set_background(source.background());
        Ok(())
    }

    /// Resolve `id` and push its zones into both panels.
    ///
    /// # Errors
    ///
    /// Resolution failures are logged and returned; both panels keep their
    /// previous zones and the template id is unchanged.
    pub fn switch_template(&mut self, id: &str, templates: &dyn TemplateResolver) -> FrameResult<()> {
        let zones = templates.resolve(id).map_err(|e| {
            tracing::warn!("Template {id:?} not applied: {e}");
            e
        })?;
        self.single.set_zones(&zones.single);
        self.quad.set_zones(&zones.quad);
        self.template = id.to_string();
        tracing::debug!(
            "Template {id:?} applied ({} + {} zones)",
            zones.single.len(),
            zones.quad.len()
        );
        Ok(())
    }

    /// Persistable snapshot of the project.
    #[must_use]
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            project_name: Some(self.name.clone()),
            app1: panel_record(&self.single),
            app4: panel_record(&self.quad),
            template: self.template.clone(),
        }
    }

    /// Rebuild both panels from `document`. Every layer is rebuilt before
    /// either panel is touched.
    pub fn apply_document(&mut self, document: ProjectDocument) {
        let single = restore_layers(document.app1.layers, self.single.panel());
        let quad = restore_layers(document.app4.layers, self.quad.panel());

        self.single.restore_layers(single);
        self.single.set_background(document.app1.background_couleur);
        self.quad.restore_layers(quad);
        self.quad.set_background(document.app4.background_couleur);
        self.template = document.template;
        if let Some(name) = document.project_name {
            self.name = name;
        }
    }

    /// Write the project as JSON to `path`.
    ///
    /// # Errors
    ///
    /// [`FrameError::Io`] (or [`FrameError::NotFound`] for a missing parent
    /// directory) if the file cannot be written.
    pub fn save(&self, path: &Path) -> FrameResult<()> {
        let json = serde_json::to_string_pretty(&self.to_document())?;
        std::fs::write(path, json).map_err(|e| FrameError::from_io(e, path))?;
        tracing::info!("Project saved to {}", path.display());
        Ok(())
    }

    /// Replace the project with the one stored at `path`.
    ///
    /// # Errors
    ///
    /// [`FrameError::NotFound`]/[`FrameError::Io`] if the file cannot be read,
    /// [`FrameError::Format`] if it is not a valid project document. On error
    /// the project is left untouched.
    pub fn load(&mut self, path: &Path) -> FrameResult<()> {
        let json = std::fs::read_to_string(path).map_err(|e| FrameError::from_io(e, path))?;
        let document: ProjectDocument = serde_json::from_str(&json)?;
        self.apply_document(document);
        tracing::info!("Project loaded from {}", path.display());
        Ok(())
    }
}

fn panel_record(editor: &Editor) -> PanelRecord {
    PanelRecord {
        layers: editor.layers().iter().map(LayerRecord::from).collect(),
        background_couleur: editor.background(),
    }
}

fn restore_layers(records: Vec<LayerRecord>, panel: &PanelConfig) -> Vec<Layer> {
    records.into_iter().map(|r| r.into_layer(panel)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateZones;
    use crate::{HexColor, Point, Rect};

    struct FixedTemplates;

    impl TemplateResolver for FixedTemplates {
        fn resolve(&self, id: &str) -> FrameResult<TemplateZones> {
            match id {
                "std" => Ok(TemplateZones {
                    single: vec![Rect::new(50.0, 20.0, 330.0, 470.0)],
                    quad: vec![Rect::new(0.0, 0.0, 10.0, 10.0); 4],
                }),
                _ => Err(FrameError::Format(format!("bad template {id}"))),
            }
        }

        fn source_path(&self, _id: &str) -> Option<std::path::PathBuf> {
            None
        }
    }

    fn project() -> Project {
        let config = StudioConfig::default().with_fonts_dir("/no/fonts");
        let mut project = Project::new(&config);
        project.switch_template("std", &FixedTemplates).expect("template");
        project
    }

    #[test]
    fn test_panel_id_parse() {
        assert_eq!("app1".parse::<PanelId>().expect("parse"), PanelId::Single);
        assert_eq!("Quad".parse::<PanelId>().expect("parse"), PanelId::Quad);
        assert!("both".parse::<PanelId>().is_err());
        assert_eq!(PanelId::Single.other(), PanelId::Quad);
    }

    #[test]
    fn test_copy_layer_renames_in_destination() {
        let mut p = project();
        p.panel_mut(PanelId::Quad).add_text_layer();
        p.panel_mut(PanelId::Single).add_text_layer();
        p.panel_mut(PanelId::Single).handle_event(&crate::PanelEvent::PointerDown { x: 0, y: 0 });
        p.panel_mut(PanelId::Single).handle_event(&crate::PanelEvent::PointerDrag { x: 4, y: 4 });

        let index = p.copy_layer(PanelId::Single, PanelId::Quad).expect("copy");
        let copied = p.panel(PanelId::Quad).layer(index).expect("copied");
        assert_eq!(copied.name, "Text 2");
        assert_eq!(copied.display_position(), Point::new(4, 4));
        assert_eq!(p.panel(PanelId::Single).len(), 2);
    }

    #[test]
    fn test_copy_layer_rejects_zone_and_self() {
        let mut p = project();
        p.panel_mut(PanelId::Single).select_layer(0);
        assert!(matches!(
            p.copy_layer(PanelId::Single, PanelId::Quad),
            Err(FrameError::InvalidOperation(_))
        ));
        assert!(p.copy_layer(PanelId::Single, PanelId::Single).is_err());
    }

    #[test]
    fn test_copy_all_keeps_destination_zones() {
        let mut p = project();
        p.panel_mut(PanelId::Quad).add_text_layer();
        p.panel_mut(PanelId::Single).add_text_layer();
        p.panel_mut(PanelId::Single).add_text_layer();
        p.panel_mut(PanelId::Single).set_active_text("second");

        p.copy_all_editable_layers(PanelId::Single, PanelId::Quad).expect("copy all");
        let quad = p.panel(PanelId::Quad);
        let names: Vec<_> = quad.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Zone 1", "Text 1", "Text 2"]);
        assert_eq!(quad.zone_count(), 4);
        assert_eq!(
            quad.layer(2).and_then(Layer::as_text).map(|t| t.text().to_string()),
            Some("second".to_string())
        );
    }

    #[test]
    fn test_copy_background() {
        let mut p = project();
        p.panel_mut(PanelId::Quad).set_background_color("#102030").expect("color");
        p.copy_background(PanelId::Quad, PanelId::Single).expect("copy");
        assert_eq!(p.panel(PanelId::Single).background(), HexColor::rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_failed_template_keeps_zones() {
        let mut p = project();
        assert!(matches!(
            p.switch_template("broken", &FixedTemplates),
            Err(FrameError::Format(_))
        ));
        assert_eq!(p.template(), "std");
        assert_eq!(p.panel(PanelId::Single).zone_count(), 1);
        assert_eq!(p.panel(PanelId::Quad).zone_count(), 4);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.json");
        let mut p = project();
        p.set_name("wedding");
        p.panel_mut(PanelId::Single).add_text_layer();
        p.panel_mut(PanelId::Single).set_active_text("Hello");
        p.panel_mut(PanelId::Single).set_active_locked(true);
        p.panel_mut(PanelId::Quad).set_background_color("#ABCDEF").expect("color");
        p.save(&path).expect("save");

        let config = StudioConfig::default().with_fonts_dir("/no/fonts");
        let mut loaded = Project::new(&config);
        loaded.load(&path).expect("load");
        assert_eq!(loaded.name(), "wedding");
        assert_eq!(loaded.template(), "std");
        assert_eq!(loaded.to_document(), p.to_document());
    }

    #[test]
    fn test_corrupt_document_leaves_project_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.json");
        std::fs::write(&path, r##"{"app1": {"layers": [], "background_couleur": "#FFFFFF"}}"##)
            .expect("write");
        let mut p = project();
        p.panel_mut(PanelId::Single).add_text_layer();
        let before = p.to_document();
        assert!(matches!(p.load(&path), Err(FrameError::Format(_))));
        assert_eq!(p.to_document(), before);
    }

    #[test]
    fn test_load_without_zone_records_keeps_zone_layer() {
        let mut p = project();
        let mut document = p.to_document();
        document.app1.layers.clear();
        p.apply_document(document);
        let single = p.panel(PanelId::Single);
        assert_eq!(single.len(), 1);
        assert_eq!(single.zone_count(), 1);
    }
}
