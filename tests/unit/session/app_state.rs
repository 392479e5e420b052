use std::cell::RefCell;

use super::*;
use crate::render::cpu::CompositorOpts;

fn compositor() -> Compositor {
    Compositor::new(CompositorOpts::default().with_system_fonts(false))
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::new(width, height);
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[derive(Default)]
struct RecordingGateway {
    calls: RefCell<Vec<String>>,
}

impl ExportGateway for RecordingGateway {
    fn export(&self, _style: &TelopStyle, base: &BaseName) -> TelopResult<ExportReport> {
        self.calls.borrow_mut().push(base.to_string());
        Err(TelopError::tool_not_found("not installed here"))
    }
}

#[test]
fn empty_state_rejects_style_operations() {
    let state = AppState::new();
    assert!(state.style().is_none());
    assert!(matches!(state.interchange_text(), Err(TelopError::Input(_))));
    assert!(matches!(
        state.save_path(std::env::temp_dir().join("telop_never_written.json")),
        Err(TelopError::Input(_))
    ));
    assert!(matches!(
        state.generate_script(&ExportOpts::new(std::env::temp_dir())),
        Err(TelopError::Input(_))
    ));
    let gateway = RecordingGateway::default();
    assert!(matches!(state.export(&gateway), Err(TelopError::Input(_))));
    assert!(gateway.calls.borrow().is_empty());
}

#[test]
fn open_images_infers_and_previews() {
    let mut c = compositor();
    let state = AppState::new()
        .open_images(&[ImageSource::Bytes(png_bytes(64, 32))], &mut c)
        .unwrap();
    let style = state.style().unwrap();
    assert_eq!((style.comp.width, style.comp.height), (64, 32));
    let preview = state.preview().unwrap();
    assert_eq!((preview.width, preview.height), (64, 32));
}

#[test]
fn failed_edit_keeps_previous_state() {
    let mut c = compositor();
    let state = AppState::new()
        .open_images(&[ImageSource::Bytes(png_bytes(64, 32))], &mut c)
        .unwrap();
    assert!(matches!(
        state.apply_edit("{ not json", &mut c),
        Err(TelopError::Format(_))
    ));
    assert!(state.style().is_some());
}

#[test]
fn apply_edit_replaces_style() {
    let mut c = compositor();
    let state = AppState::new()
        .open_images(&[ImageSource::Bytes(png_bytes(64, 32))], &mut c)
        .unwrap();
    let edited = state
        .interchange_text()
        .unwrap()
        .replace("\"text\": null", "\"text\": \"Live\"");
    let next = state.apply_edit(&edited, &mut c).unwrap();
    assert_eq!(next.style().unwrap().text.as_deref(), Some("Live"));
    assert_eq!(state.style().unwrap().text, None);
}

#[test]
fn save_then_load_restores_style() {
    let mut c = compositor();
    let state = AppState::new()
        .open_images(&[ImageSource::Bytes(png_bytes(48, 48))], &mut c)
        .unwrap();
    let path = std::env::temp_dir().join(format!("telop_state_{}.json", std::process::id()));
    state.save_path(&path).unwrap();
    let loaded = AppState::new().load_path(&path, &mut c).unwrap();
    assert_eq!(loaded.style(), state.style());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn export_passes_sanitized_base_and_propagates_errors() {
    let mut c = compositor();
    let state = AppState::new()
        .open_images(&[ImageSource::Bytes(png_bytes(32, 32))], &mut c)
        .unwrap();
    let gateway = RecordingGateway::default();
    assert!(matches!(
        state.export(&gateway),
        Err(TelopError::ToolNotFound(_))
    ));
    assert_eq!(*gateway.calls.borrow(), ["ImageDerivedTelop_01"]);
}
