use super::*;
use kurbo::Shape as _;
use crate::assets::decode::ImageDims;
use crate::infer::heuristics::style_for_dims;
use crate::style::color::Color;
use crate::style::model::PlateShape;

fn headless() -> Compositor {
    Compositor::new(CompositorOpts {
        font_dirs: Vec::new(),
        load_system_fonts: false,
        clear_rgba: None,
    })
}

fn plate_only() -> TelopStyle {
    let mut s = style_for_dims(ImageDims {
        width: 320,
        height: 180,
    });
    s.text = None;
    s.shadow.enabled = false;
    s.position.x = 40;
    s.position.y = 120;
    s.plate.enabled = true;
    s.plate.shape = PlateShape::Rect;
    s.plate.size.w = 100;
    s.plate.size.h = 50;
    s.plate.opacity = 100;
    s.plate.stroke_width = 0;
    s.plate.color = Color::new(1.0, 0.0, 0.0).unwrap();
    s
}

#[test]
fn plate_only_fills_its_rectangle() {
    let frame = headless().render(&plate_only()).unwrap();
    assert_eq!((frame.width, frame.height), (320, 180));
    assert_eq!(frame.pixel(90, 95), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(30, 95), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(90, 125), Some([0, 0, 0, 0]));

    for (x, y, px) in frame.pixels() {
        if px[3] != 0 {
            assert!((39..=141).contains(&x) && (69..=121).contains(&y), "({x},{y})");
        }
    }
}

#[test]
fn plate_opacity_scales_alpha() {
    let mut s = plate_only();
    s.plate.opacity = 50;
    let frame = headless().render(&s).unwrap();
    let [r, _, _, a] = frame.pixel(90, 95).unwrap();
    assert!(a.abs_diff(128) <= 1, "alpha {a}");
    assert!(r.abs_diff(a) <= 1);
}

#[test]
fn zero_opacity_plate_paints_nothing() {
    let mut s = plate_only();
    s.plate.opacity = 0;
    assert!(headless().render(&s).unwrap().is_fully_transparent());
}

#[test]
fn text_without_any_font_is_skipped() {
    let mut s = plate_only();
    s.plate.enabled = false;
    s.text = Some("テロップ".to_string());
    s.shadow.enabled = true;
    let mut c = headless();
    assert_eq!(c.font_face_count(), 0);
    assert!(c.render(&s).unwrap().is_fully_transparent());
}

#[test]
fn clear_color_fills_background() {
    let mut s = plate_only();
    s.plate.enabled = false;
    let mut c = Compositor::new(
        CompositorOpts {
            font_dirs: Vec::new(),
            load_system_fonts: false,
            clear_rgba: None,
        }
        .with_clear_rgba(Some([0, 0, 0, 255])),
    );
    let frame = c.render(&s).unwrap();
    assert!(frame.pixels().all(|(_, _, px)| px == [0, 0, 0, 255]));
}

#[test]
fn explicit_canvas_overrides_comp_size() {
    let frame = headless()
        .render_with_canvas(
            &plate_only(),
            Canvas {
                width: 64,
                height: 32,
            },
        )
        .unwrap();
    assert_eq!((frame.width, frame.height), (64, 32));
    assert_eq!(frame.data.len(), 64 * 32 * 4);
}

#[test]
fn oversized_canvas_is_rejected() {
    let err = surface_dims(Canvas {
        width: 70_000,
        height: 1,
    })
    .unwrap_err();
    assert!(matches!(err, TelopError::Format(_)));
    assert!(surface_dims(Canvas { width: 0, height: 1 }).is_err());
    assert_eq!(
        surface_dims(Canvas {
            width: 1920,
            height: 1080
        })
        .unwrap(),
        (1920, 1080)
    );
}

#[test]
fn bezpath_conversion_keeps_elements() {
    let rect = kurbo::Rect::new(0.0, 0.0, 10.0, 5.0).to_path(0.1);
    let cpu = bezpath_to_cpu(&rect);
    assert_eq!(cpu.elements().len(), rect.elements().len());
}

#[test]
fn system_fonts_render_visible_text() {
    let mut c = Compositor::new(CompositorOpts::default().with_system_fonts(true));
    if c.font_face_count() == 0 {
        return;
    }
    let mut s = plate_only();
    s.plate.enabled = false;
    s.text = Some("Ab".to_string());
    s.fill.enabled = true;
    s.fill.color = Color::WHITE;
    s.position.x = 20;
    s.position.y = 140;
    s.font_size = 64;
    assert!(!c.render(&s).unwrap().is_fully_transparent());
}

#[test]
fn plate_only_with_fonts_loaded_matches_headless() {
    let mut c = Compositor::new(CompositorOpts::default().with_system_fonts(true));
    if c.font_face_count() == 0 {
        return;
    }
    let mut s = plate_only();
    s.fill.enabled = true;
    s.strokes = vec![crate::style::model::Stroke {
        color: Color::WHITE,
        width: 20,
    }];
    s.shadow.enabled = true;
    s.shadow.opacity = 100;
    s.shadow.distance = 10;

    let with_fonts = c.render(&s).unwrap();
    let without = headless().render(&s).unwrap();
    assert_eq!(with_fonts, without);
}
