//! Integration tests for panel compositing (frame-renderer).
//!
//! Tests preview/export composites of real editors: image placement,
//! exclusion-zone ordering, background fill and visibility.

use std::path::PathBuf;

use frame_core::{Editor, FontResolver, PanelConfig, PanelEvent, Rect};
use frame_renderer::surface::PUNCH_PIXEL;
use frame_renderer::Compositor;
use image::{Rgba, RgbaImage};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn red_png(dir: &tempfile::TempDir, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join("red.png");
    RgbaImage::from_pixel(width, height, RED)
        .save(&path)
        .expect("save png");
    path
}

fn editor(ratio: u32, zones: Vec<Rect>) -> Editor {
    let panel = PanelConfig {
        preview_width: 600,
        preview_height: 400,
        ratio,
    };
    Editor::with_zones(panel, FontResolver::new("/no/fonts", None), zones)
}

// ==========================================================================
// Image placement
// ==========================================================================

#[test]
fn test_import_drag_export_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = red_png(&dir, 200, 100);
    let mut ed = editor(6, Vec::new());
    ed.set_background_color("#FFFFFF").expect("white");
    ed.add_image_layer(Some(&source)).expect("import");
    ed.handle_event(&PanelEvent::PointerDown { x: 300, y: 300 });
    ed.handle_event(&PanelEvent::PointerDrag { x: 310, y: 295 });

    let mut compositor = Compositor::new();
    let preview = compositor.render_preview(&ed);
    let export = compositor.export_composite(&ed);
    assert_eq!(preview.dimensions(), (600, 400));
    assert_eq!(export.dimensions(), (3600, 2400));

    // Image now spans x 10..610, y -5..295 in preview space.
    assert_eq!(*preview.get_pixel(9, 100), Rgba([255, 255, 255, 255]));
    assert_eq!(*preview.get_pixel(10, 0), RED);
    assert_eq!(*preview.get_pixel(599, 294), RED);
    assert_eq!(*preview.get_pixel(300, 295), Rgba([255, 255, 255, 255]));

    // Export position is (60, -30); image is 3600x1800.
    assert_eq!(*export.get_pixel(59, 500), Rgba([255, 255, 255, 255]));
    assert_eq!(*export.get_pixel(60, 0), RED);
    assert_eq!(*export.get_pixel(3599, 1769), RED);
    assert_eq!(*export.get_pixel(1000, 1770), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_hidden_layer_is_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = red_png(&dir, 60, 40);
    let mut ed = editor(3, Vec::new());
    ed.add_image_layer(Some(&source)).expect("import");
    ed.set_active_visible(false);

    let preview = Compositor::new().render_preview(&ed);
    assert!(preview.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
}

// ==========================================================================
// Exclusion zones
// ==========================================================================

#[test]
fn test_zone_on_top_punches_through_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = red_png(&dir, 200, 100);
    let mut ed = editor(3, vec![Rect::new(50.0, 20.0, 100.0, 50.0)]);
    ed.add_image_layer(Some(&source)).expect("import");
    assert!(ed.layers()[0].is_exclusion_zone());

    let export = Compositor::new().export_composite(&ed);
    assert_eq!(*export.get_pixel(150, 60), PUNCH_PIXEL);
    assert_eq!(*export.get_pixel(450, 210), PUNCH_PIXEL);
    assert_eq!(*export.get_pixel(451, 211), RED);
    assert_eq!(*export.get_pixel(149, 60), RED);
}

#[test]
fn test_layer_above_zone_covers_cutout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = red_png(&dir, 200, 100);
    let mut ed = editor(3, vec![Rect::new(50.0, 20.0, 100.0, 50.0)]);
    ed.add_image_layer(Some(&source)).expect("import");
    assert!(ed.move_active_layer(-1));
    assert!(ed.layers()[1].is_exclusion_zone());

    let export = Compositor::new().export_composite(&ed);
    assert_eq!(*export.get_pixel(150, 60), RED);
    assert_eq!(*export.get_pixel(300, 150), RED);
}

#[test]
fn test_zone_scaled_only_for_export() {
    let mut ed = editor(3, vec![Rect::new(10.0, 10.0, 20.0, 20.0)]);
    let mut compositor = Compositor::new();
    let preview = compositor.render_preview(&ed);
    assert_eq!(preview.pixels().filter(|p| p[3] == 0).count(), 21 * 21);
    let export = compositor.export_composite(&ed);
    assert_eq!(export.pixels().filter(|p| p[3] == 0).count(), 61 * 61);

    ed.set_zones(&[]);
    let preview = compositor.render_preview(&ed);
    assert!(preview.pixels().all(|p| p[3] == 255));
}

// ==========================================================================
// Background and text
// ==========================================================================

#[test]
fn test_background_color_reflected_in_preview() {
    let mut ed = editor(3, Vec::new());
    assert!(ed.set_background_color("#ZZZZZZ").is_err());
    ed.set_background_color("#1a2b3c").expect("valid color");
    assert!(ed.take_dirty());

    let preview = Compositor::new().render_preview(&ed);
    assert_eq!(*preview.get_pixel(0, 0), Rgba([0x1a, 0x2b, 0x3c, 255]));
    assert_eq!(*preview.get_pixel(599, 399), Rgba([0x1a, 0x2b, 0x3c, 255]));
}

#[test]
fn test_text_without_fonts_never_fails() {
    let mut ed = editor(3, Vec::new());
    ed.add_text_layer();
    ed.set_active_text("Hello");
    let mut compositor = Compositor::new();
    let preview = compositor.render_preview(&ed);
    let export = compositor.export_composite(&ed);
    assert_eq!(preview.dimensions(), (600, 400));
    assert_eq!(export.dimensions(), (1800, 1200));
    assert!(compositor.text().cache().stats().hits >= 1);
}

fn dark_pixels(surface: &RgbaImage) -> usize {
    surface.pixels().filter(|p| p[3] == 255 && p[0] < 128).count()
}

#[test]
fn test_text_fallback_paints_glyphs() {
    if frame_renderer::FontCache::new().get(None).database.is_empty() {
        eprintln!("no system fonts installed, nothing to rasterize with");
        return;
    }
    let mut ed = editor(3, Vec::new());
    ed.add_text_layer();
    ed.set_active_text("HELLO WORLD");

    let mut compositor = Compositor::new();
    let preview = dark_pixels(&compositor.render_preview(&ed));
    let export = dark_pixels(&compositor.export_composite(&ed));
    assert!(preview > 0, "preview text painted nothing");
    // Export glyphs cover roughly ratio^2 times the preview area.
    assert!(export > 5 * preview && export < 14 * preview, "{preview} vs {export}");
}

#[test]
fn test_resolved_font_file_paints_glyphs() {
    let mut system = usvg::fontdb::Database::new();
    system.load_system_fonts();
    let Some(source) = system.faces().find_map(|face| match &face.source {
        usvg::fontdb::Source::File(path)
            if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf")) =>
        {
            Some(path.clone())
        }
        _ => None,
    }) else {
        eprintln!("no system font file to copy");
        return;
    };
    let dir = tempfile::tempdir().expect("tempdir");
    let fonts_dir = dir.path().join("fonts");
    std::fs::create_dir_all(&fonts_dir).expect("mkdir");
    let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("ttf");
    std::fs::copy(&source, fonts_dir.join(format!("Frame Sans.{ext}"))).expect("copy font");

    let panel = PanelConfig {
        preview_width: 600,
        preview_height: 400,
        ratio: 3,
    };
    let mut ed = Editor::with_zones(panel, FontResolver::new(&fonts_dir, None), Vec::new());
    ed.add_text_layer();
    ed.set_active_text("HELLO WORLD");
    assert!(ed.set_active_font("Frame Sans", 32));

    let mut compositor = Compositor::new();
    let preview = compositor.render_preview(&ed);
    let export = compositor.export_composite(&ed);
    assert!(dark_pixels(&preview) > 0);
    assert!(dark_pixels(&export) > dark_pixels(&preview));
    assert_eq!(compositor.text().cache().stats().failures, 0);
}
