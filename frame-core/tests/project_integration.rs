//! Project Integration Tests
//!
//! Exercises the two-panel project end to end:
//! - Image import into a panel and positioning
//! - Deep copies across panels
//! - Template switching from draw.io files
//! - Save/load round trips through JSON

use std::path::{Path, PathBuf};

use frame_core::{
    DrawioTemplates, FrameError, HexColor, Layer, LayerType, PanelConfig, PanelEvent, PanelId,
    Point, Project, Rect, StudioConfig,
};
use image::{Rgba, RgbaImage};

const TEMPLATE: &str = r#"<mxfile>
  <diagram name="Page-5"><mxGraphModel><root>
    <mxCell id="z"><mxGeometry x="50" y="20" width="330" height="470" as="geometry"/></mxCell>
  </root></mxGraphModel></diagram>
  <diagram name="Page-8"><mxGraphModel><root>
    <mxCell id="a"><mxGeometry x="10" y="10" width="100" height="80" as="geometry"/></mxCell>
    <mxCell id="b"><mxGeometry x="120" y="10" width="100" height="80" as="geometry"/></mxCell>
    <mxCell id="c"><mxGeometry x="10" y="100" width="100" height="80" as="geometry"/></mxCell>
    <mxCell id="d"><mxGeometry x="120" y="100" width="100" height="80" as="geometry"/></mxCell>
  </root></mxGraphModel></diagram>
</mxfile>"#;

struct Fixture {
    dir: tempfile::TempDir,
    config: StudioConfig,
}

impl Fixture {
    fn new(panel: PanelConfig) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).expect("mkdir");
        std::fs::write(templates.join("template_std.xml"), TEMPLATE).expect("write template");
        std::fs::write(templates.join("broken.xml"), "<mxfile><diagram").expect("write broken");
        let config = StudioConfig::default()
            .with_panel(panel)
            .with_fonts_dir(dir.path().join("fonts"))
            .with_templates_dir(&templates);
        Self { dir, config }
    }

    fn templates(&self) -> DrawioTemplates {
        DrawioTemplates::new(&self.config.templates_dir)
    }

    fn png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.dir.path().join(name);
        RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]))
            .save(&path)
            .expect("save png");
        path
    }

    fn project(&self) -> Project {
        let mut project = Project::new(&self.config);
        project
            .switch_template(&self.config.default_template, &self.templates())
            .expect("default template");
        project
    }
}

fn drag(project: &mut Project, panel: PanelId, from: (i32, i32), to: (i32, i32)) {
    let editor = project.panel_mut(panel);
    editor.handle_event(&PanelEvent::PointerDown { x: from.0, y: from.1 });
    editor.handle_event(&PanelEvent::PointerDrag { x: to.0, y: to.1 });
    editor.handle_event(&PanelEvent::PointerUp);
}

// ============================================================================
// Import and Positioning
// ============================================================================

#[test]
fn test_import_fits_width_and_drag_scales_to_export() {
    let fixture = Fixture::new(PanelConfig {
        preview_width: 600,
        preview_height: 400,
        ratio: 6,
    });
    let source = fixture.png("photo.png", 200, 100);
    let mut project = fixture.project();

    let index = project
        .panel_mut(PanelId::Single)
        .add_image_layer(Some(&source))
        .expect("import")
        .expect("not cancelled");
    drag(&mut project, PanelId::Single, (100, 100), (110, 95));

    let layer = project.panel(PanelId::Single).layer(index).expect("layer");
    let image = layer.as_image().expect("image layer");
    assert_eq!(layer.name, "Image 1");
    assert_eq!(image.preview_size(), (600, 300));
    assert_eq!(image.export_size(), (3600, 1800));
    assert_eq!(layer.display_position(), Point::new(10, -5));
    assert_eq!(layer.image_position(), Point::new(60, -30));
}

#[test]
fn test_locked_layer_ignores_drag() {
    let fixture = Fixture::new(PanelConfig::default());
    let mut project = fixture.project();
    project.panel_mut(PanelId::Quad).add_text_layer();
    project.panel_mut(PanelId::Quad).set_active_locked(true);
    drag(&mut project, PanelId::Quad, (0, 0), (50, 50));
    let layer = project.panel(PanelId::Quad).active_layer().expect("active");
    assert_eq!(layer.display_position(), Point::default());
}

// ============================================================================
// Cross-Panel Copies
// ============================================================================

#[test]
fn test_cloned_image_is_independent() {
    let fixture = Fixture::new(PanelConfig::default());
    let source = fixture.png("photo.png", 300, 200);
    let mut project = fixture.project();
    project
        .panel_mut(PanelId::Single)
        .add_image_layer(Some(&source))
        .expect("import");
    drag(&mut project, PanelId::Single, (0, 0), (20, 30));

    let index = project
        .copy_layer(PanelId::Single, PanelId::Quad)
        .expect("copy");
    drag(&mut project, PanelId::Quad, (0, 0), (-100, 5));
    project
        .panel_mut(PanelId::Quad)
        .handle_event(&PanelEvent::Wheel { delta: -1 });

    let original = project.panel(PanelId::Single).active_layer().expect("original");
    let copy = project.panel(PanelId::Quad).layer(index).expect("copy");
    assert_eq!(original.display_position(), Point::new(20, 30));
    assert_eq!(copy.display_position(), Point::new(-80, 35));
    assert_eq!(original.as_image().expect("image").preview_size(), (600, 400));
    assert_eq!(copy.as_image().expect("image").preview_size(), (590, 393));
}

#[test]
fn test_copy_all_replaces_editable_layers() {
    let fixture = Fixture::new(PanelConfig::default());
    let mut project = fixture.project();
    project.panel_mut(PanelId::Quad).add_text_layer();
    project.panel_mut(PanelId::Quad).add_text_layer();
    project.panel_mut(PanelId::Quad).add_text_layer();
    project.panel_mut(PanelId::Single).add_text_layer();
    project.panel_mut(PanelId::Single).set_active_text("Just married");

    project
        .copy_all_editable_layers(PanelId::Single, PanelId::Quad)
        .expect("copy all");

    let quad = project.panel(PanelId::Quad);
    assert_eq!(quad.len(), 2);
    assert_eq!(quad.zone_count(), 4);
    let text = quad.layer(1).and_then(Layer::as_text).expect("text");
    assert_eq!(text.text(), "Just married");
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_template_switch_updates_both_panels() {
    let fixture = Fixture::new(PanelConfig::default());
    let project = fixture.project();
    let single = project.panel(PanelId::Single).layer(0).expect("zone layer");
    assert_eq!(single.layer_type(), LayerType::ZoneEx);
    assert_eq!(
        single.as_exclusion_zone().expect("zone").zones(),
        &[Rect::new(50.0, 20.0, 330.0, 470.0)]
    );
    assert_eq!(project.panel(PanelId::Quad).zone_count(), 4);
}

#[test]
fn test_unreadable_template_keeps_previous_zones() {
    let fixture = Fixture::new(PanelConfig::default());
    let mut project = fixture.project();
    project.panel_mut(PanelId::Single).take_dirty();

    let err = project
        .switch_template("broken.xml", &fixture.templates())
        .unwrap_err();
    assert!(matches!(err, FrameError::Format(_)));
    let err = project
        .switch_template("absent.xml", &fixture.templates())
        .unwrap_err();
    assert!(matches!(err, FrameError::NotFound(_)));

    assert_eq!(project.template(), "template_std.xml");
    assert_eq!(project.panel(PanelId::Single).zone_count(), 1);
    assert_eq!(project.panel(PanelId::Quad).zone_count(), 4);
    assert!(!project.panel(PanelId::Single).is_dirty());
}

// ============================================================================
// Persistence
// ============================================================================

fn save_and_reload(fixture: &Fixture, project: &Project, path: &Path) -> Project {
    project.save(path).expect("save");
    let mut loaded = Project::new(&fixture.config);
    loaded.load(path).expect("load");
    loaded
}

#[test]
fn test_round_trip_preserves_every_layer() {
    let fixture = Fixture::new(PanelConfig::default());
    let source = fixture.png("photo.png", 400, 300);
    let mut project = fixture.project();
    project.set_name("garden_party");

    let single = project.panel_mut(PanelId::Single);
    single.add_image_layer(Some(&source)).expect("import");
    single.handle_event(&PanelEvent::Wheel { delta: -1 });
    single.handle_event(&PanelEvent::Wheel { delta: -1 });
    single.add_text_layer();
    single.set_active_text("Anna & Ben");
    single.set_active_text_color("#7F1D1D").expect("color");
    single.set_active_font("georgia", 48);
    single.set_active_visible(false);
    single.move_active_layer(-1);
    single.set_background_color("#1a2b3c").expect("background");
    project.panel_mut(PanelId::Quad).add_text_layer();

    let path = fixture.dir.path().join("project.json");
    let loaded = save_and_reload(&fixture, &project, &path);
    assert_eq!(loaded.to_document(), project.to_document());

    let layers = loaded.panel(PanelId::Single).layers();
    let kinds: Vec<_> = layers.iter().map(Layer::layer_type).collect();
    assert_eq!(kinds, [LayerType::ZoneEx, LayerType::Text, LayerType::Image]);
    assert!(!layers[1].visible);
    assert_eq!(layers[2].as_image().expect("image").preview_size(), (580, 435));
    assert_eq!(
        loaded.panel(PanelId::Single).background(),
        HexColor::rgb(0x1a, 0x2b, 0x3c)
    );
}

#[test]
fn test_document_shape() {
    let fixture = Fixture::new(PanelConfig::default());
    let mut project = fixture.project();
    project.panel_mut(PanelId::Single).add_text_layer();
    let path = fixture.dir.path().join("project.json");
    project.save(&path).expect("save");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(json["template"], "template_std.xml");
    assert_eq!(json["app1"]["background_couleur"], "#FFFFFF");
    let layers = json["app1"]["layers"].as_array().expect("layers");
    assert_eq!(layers[0]["class"], "LayerExcluZone");
    assert_eq!(layers[1]["class"], "LayerText");
    assert_eq!(layers[1]["sel_font"]["size"], 32);
    assert_eq!(layers[1]["display_position"], serde_json::json!([0, 0]));
}

#[test]
fn test_missing_image_survives_load() {
    let fixture = Fixture::new(PanelConfig::default());
    let source = fixture.png("photo.png", 40, 20);
    let mut project = fixture.project();
    project
        .panel_mut(PanelId::Quad)
        .add_image_layer(Some(&source))
        .expect("import");
    drag(&mut project, PanelId::Quad, (0, 0), (7, 9));
    let path = fixture.dir.path().join("project.json");
    project.save(&path).expect("save");
    std::fs::remove_file(&source).expect("remove source");

    let mut loaded = Project::new(&fixture.config);
    loaded.load(&path).expect("load");
    let layer = loaded.panel(PanelId::Quad).layer(1).expect("layer");
    assert_eq!(layer.name, "Image 1");
    assert_eq!(layer.display_position(), Point::new(7, 9));
    let image = layer.as_image().expect("image");
    assert!(!image.has_image());
    assert_eq!(image.source_path(), Some(source.as_path()));
}

#[test]
fn test_invalid_color_in_document_is_format_error() {
    let fixture = Fixture::new(PanelConfig::default());
    let path = fixture.dir.path().join("project.json");
    let mut project = fixture.project();
    project.save(&path).expect("save");
    let json = std::fs::read_to_string(&path)
        .expect("read")
        .replacen("#FFFFFF", "#GGGGGG", 1);
    std::fs::write(&path, json).expect("write");

    let err = project.load(&path).unwrap_err();
    assert!(matches!(err, FrameError::Format(_)));
}
