use std::path::Path;

use crate::export::runner::{ExportGateway, ExportOpts, ExportReport, write_control_script};
use crate::export::script::{ArtifactPaths, BaseName};
use crate::foundation::error::{TelopError, TelopResult};
use crate::infer::heuristics::{ImageSource, infer_style};
use crate::render::cpu::Compositor;
use crate::render::frame::FrameRGBA;
use crate::style::model::TelopStyle;

/// Editing session: the current style and the preview derived from it.
///
/// Operations that change the style return a new state with a freshly rendered preview and
/// leave `self` untouched, so a failed edit keeps the previous state intact.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    style: Option<TelopStyle>,
    preview: Option<FrameRGBA>,
}

impl AppState {
    /// Empty session with no style loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current style, if any.
    pub fn style(&self) -> Option<&TelopStyle> {
        self.style.as_ref()
    }

    /// Preview rendered for the current style.
    pub fn preview(&self) -> Option<&FrameRGBA> {
        self.preview.as_ref()
    }

    /// Interchange text of the current style, as shown to an editor.
    pub fn interchange_text(&self) -> TelopResult<String> {
        self.require_style()?.to_json()
    }

    /// Infer a fresh style from `sources` and preview it.
    pub fn open_images(
        &self,
        sources: &[ImageSource],
        compositor: &mut Compositor,
    ) -> TelopResult<Self> {
        let style = infer_style(sources)?;
        Self::with_style(style, compositor)
    }

    /// Replace the style with edited interchange text.
    pub fn apply_edit(&self, text: &str, compositor: &mut Compositor) -> TelopResult<Self> {
        let style = TelopStyle::from_json(text)?;
        Self::with_style(style, compositor)
    }

    /// Load a style saved earlier.
    pub fn load_path(
        &self,
        path: impl AsRef<Path>,
        compositor: &mut Compositor,
    ) -> TelopResult<Self> {
        let style = TelopStyle::from_path(path)?;
        Self::with_style(style, compositor)
    }

    /// Save the current style.
    pub fn save_path(&self, path: impl AsRef<Path>) -> TelopResult<()> {
        self.require_style()?.save_to_path(path)
    }

    /// Write the control script for the current style without running the export tool.
    pub fn generate_script(&self, opts: &ExportOpts) -> TelopResult<ArtifactPaths> {
        write_control_script(self.require_style()?, opts)
    }

    /// Hand the current style to `gateway`. Errors propagate unchanged.
    pub fn export(&self, gateway: &dyn ExportGateway) -> TelopResult<ExportReport> {
        let style = self.require_style()?;
        let base = BaseName::from_template_name(&style.template_name);
        gateway.export(style, &base)
    }

    fn with_style(style: TelopStyle, compositor: &mut Compositor) -> TelopResult<Self> {
        let preview = compositor.render(&style)?;
        Ok(Self {
            style: Some(style),
            preview: Some(preview),
        })
    }

    fn require_style(&self) -> TelopResult<&TelopStyle> {
        self.style
            .as_ref()
            .ok_or_else(|| TelopError::input("no style loaded; open an image or load a style first"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/app_state.rs"]
mod tests;
