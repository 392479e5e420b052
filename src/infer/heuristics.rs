//! Image-derived default style.
//!
//! Only the pixel dimensions of the first image are consulted. Pixel content is never read, so
//! the same `(width, height)` always yields the same style.

use std::path::PathBuf;

use crate::assets::decode::{ImageDims, decode_image_dims, read_image_dims};
use crate::foundation::error::{TelopError, TelopResult};
use crate::style::color::Color;
use crate::style::model::{
    Comp, Fill, Plate, PlateShape, PlateSize, Position, Shadow, Stroke, TelopStyle,
};

/// Template identifier given to every inferred style.
pub const DEFAULT_TEMPLATE_NAME: &str = "ImageDerivedTelop_01";
/// Font family requested by every inferred style.
pub const DEFAULT_FONT_NAME: &str = "Noto Sans JP Black";

const DEFAULT_FONT_SIZE: u32 = 100;
const DEFAULT_TRACKING: i32 = -25;
const DEFAULT_STROKE_WIDTH: u32 = 20;
const DEFAULT_FPS: u32 = 30;
const DEFAULT_DURATION_SECS: f64 = 10.0;
const BASELINE_FRACTION: f64 = 0.9;

/// A source image for inference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Image file on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
}

impl ImageSource {
    fn dims(&self) -> TelopResult<ImageDims> {
        match self {
            Self::Path(p) => read_image_dims(p),
            Self::Bytes(b) => decode_image_dims(b),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<&std::path::Path> for ImageSource {
    fn from(p: &std::path::Path) -> Self {
        Self::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

/// Derive a default style from `images`.
///
/// Later entries are accepted but not read; only the first image is decoded.
#[tracing::instrument(skip(images), fields(count = images.len()))]
pub fn infer_style(images: &[ImageSource]) -> TelopResult<TelopStyle> {
    let first = images
        .first()
        .ok_or_else(|| TelopError::input("no images provided"))?;
    let dims = first.dims()?;
    if images.len() > 1 {
        tracing::debug!(ignored = images.len() - 1, "only the first image is consulted");
    }
    let style = style_for_dims(dims);
    tracing::info!(
        width = dims.width,
        height = dims.height,
        "inferred default style"
    );
    Ok(style)
}

/// The default style for an image of the given dimensions.
pub fn style_for_dims(dims: ImageDims) -> TelopStyle {
    let ImageDims { width, height } = dims;
    TelopStyle {
        text: None,
        font_name: DEFAULT_FONT_NAME.to_string(),
        font_size: DEFAULT_FONT_SIZE,
        tracking: DEFAULT_TRACKING,
        position: Position {
            x: clamp_i32(u64::from(width / 2)),
            y: clamp_i32((f64::from(height) * BASELINE_FRACTION).floor() as u64),
        },
        fill: Fill {
            enabled: true,
            color: Color::WHITE,
        },
        strokes: vec![Stroke {
            color: Color::BLACK,
            width: DEFAULT_STROKE_WIDTH,
        }],
        shadow: Shadow::disabled(),
        plate: Plate {
            enabled: false,
            shape: PlateShape::Rect,
            size: PlateSize {
                w: width,
                h: height,
            },
            radius: 0,
            color: Color::BLACK,
            opacity: 0,
            stroke_width: 0,
            stroke_color: Color::BLACK,
        },
        comp: Comp {
            width,
            height,
            fps: DEFAULT_FPS,
            duration: DEFAULT_DURATION_SECS,
        },
        template_name: DEFAULT_TEMPLATE_NAME.to_string(),
    }
}

fn clamp_i32(v: u64) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/infer/heuristics.rs"]
mod tests;
