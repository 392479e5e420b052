//! Telop derives a text-overlay ("telop") style from a source image, previews it on the CPU and
//! hands the finalized style to an external production tool.
//!
//! The pieces line up as a small pipeline:
//!
//! - [`infer_style`] turns image dimensions into a complete default [`TelopStyle`]
//! - [`serialize`] / [`deserialize`] move a style to and from its stable interchange text
//! - [`Compositor`] paints plate, shadow, strokes and fill into a [`FrameRGBA`]
//! - an [`ExportGateway`] writes a control script and runs the tool that produces the template
//!
//! [`AppState`] strings these together for front ends.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod export;
mod foundation;
mod infer;
mod render;
mod session;
mod style;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{TelopError, TelopResult};

pub use crate::assets::decode::ImageDims;
pub use crate::export::runner::{
    AFTERFX_ENV, AfterEffectsGateway, DEFAULT_OUT_DIR, EXPORT_TIMEOUT_ENV, ExportGateway,
    ExportOpts, ExportReport, find_tool, write_control_script,
};
pub use crate::export::script::{ArtifactPaths, BaseName, PLACEHOLDER_TEXT, build_control_script};
pub use crate::infer::heuristics::{
    DEFAULT_FONT_NAME, DEFAULT_TEMPLATE_NAME, ImageSource, infer_style, style_for_dims,
};
pub use crate::render::cpu::{Compositor, CompositorOpts, FONT_DIR_ENV, render};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::plan::{
    FillLayer, Layer, LayerPlan, PlateLayer, ShadowLayer, StrokeLayer, TextRun, compile_layers,
    compile_layers_for_canvas,
};
pub use crate::session::app_state::AppState;
pub use crate::style::color::Color;
pub use crate::style::interchange::{deserialize, serialize};
pub use crate::style::model::{
    Comp, Fill, Plate, PlateShape, PlateSize, Position, Shadow, Stroke, TelopStyle,
};
