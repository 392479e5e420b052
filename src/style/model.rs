use serde::Deserialize as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TelopError, TelopResult};
use crate::style::color::Color;

/// Complete telop style: the value produced by inference, edited by operators and consumed by
/// the compositor and the export gateway.
///
/// Field order is the canonical interchange order. Every field is required on the wire;
/// `text` may be `null` but must be present.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelopStyle {
    /// Overlay text, supplied by the operator after inference.
    #[serde(deserialize_with = "Option::deserialize")]
    pub text: Option<String>,
    /// Requested font family name.
    pub font_name: String,
    /// Font size in pixels, `> 0`.
    pub font_size: u32,
    /// Extra spacing between glyphs in pixels (negative tightens).
    pub tracking: i32,
    /// Text anchor: left end of the first baseline.
    pub position: Position,
    /// Glyph body fill.
    pub fill: Fill,
    /// Outlines, listed outer-to-inner by convention. Order is preserved verbatim.
    pub strokes: Vec<Stroke>,
    /// Drop shadow under the text.
    pub shadow: Shadow,
    /// Background plate behind the text.
    pub plate: Plate,
    /// Target composition settings.
    pub comp: Comp,
    /// Template identifier, also used to derive export file names.
    pub template_name: String,
}

/// Integer anchor point in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

/// Text body fill.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fill {
    /// Whether the glyph body is painted.
    pub enabled: bool,
    /// Fill color.
    pub color: Color,
}

/// One text outline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stroke {
    /// Outline color.
    pub color: Color,
    /// Outline width in pixels, centered on the glyph outline.
    pub width: u32,
}

/// Drop shadow settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shadow {
    /// Whether the shadow is painted.
    pub enabled: bool,
    /// Shadow tint.
    pub color: Color,
    /// Offset length in pixels.
    pub distance: i32,
    /// Blur radius in pixels.
    pub softness: u32,
    /// Opacity percentage, `0..=100`.
    pub opacity: u32,
    /// Offset angle in degrees; 0 points up, clockwise positive.
    pub direction: i32,
}

impl Shadow {
    /// A disabled shadow with every parameter zeroed.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            color: Color::BLACK,
            distance: 0,
            softness: 0,
            opacity: 0,
            direction: 0,
        }
    }
}

/// Background plate outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlateShape {
    /// Axis-aligned rectangle.
    Rect,
    /// Rectangle with circular corners of `Plate::radius`.
    RoundedRect,
}

/// Plate extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlateSize {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// Background plate settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plate {
    /// Whether the plate is painted.
    pub enabled: bool,
    /// Plate outline shape.
    pub shape: PlateShape,
    /// Plate extent.
    pub size: PlateSize,
    /// Corner radius for [`PlateShape::RoundedRect`].
    pub radius: u32,
    /// Plate fill color.
    pub color: Color,
    /// Opacity percentage, `0..=100`, applied to fill and outline together.
    pub opacity: u32,
    /// Outline width in pixels; `0` disables the outline.
    pub stroke_width: u32,
    /// Outline color.
    pub stroke_color: Color,
}

/// Target composition settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Comp {
    /// Width in pixels, `> 0`.
    pub width: u32,
    /// Height in pixels, `> 0`.
    pub height: u32,
    /// Frames per second, `> 0`.
    pub fps: u32,
    /// Duration in seconds, finite and `> 0`.
    pub duration: f64,
}

impl Comp {
    /// Canvas matching the composition size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

impl TelopStyle {
    /// Check the value-level invariants that the wire types alone cannot express.
    ///
    /// Color ranges are enforced by [`Color`] itself.
    pub fn validate(&self) -> TelopResult<()> {
        if self.font_size == 0 {
            return Err(TelopError::format("font_size must be > 0"));
        }
        if self.comp.width == 0 || self.comp.height == 0 {
            return Err(TelopError::format("comp width/height must be > 0"));
        }
        if self.comp.fps == 0 {
            return Err(TelopError::format("comp fps must be > 0"));
        }
        if !self.comp.duration.is_finite() || self.comp.duration <= 0.0 {
            return Err(TelopError::format(
                "comp duration must be a finite number > 0",
            ));
        }
        if self.shadow.opacity > 100 {
            return Err(TelopError::format("shadow opacity must be within 0..=100"));
        }
        if self.plate.opacity > 100 {
            return Err(TelopError::format("plate opacity must be within 0..=100"));
        }
        validate_template_name(&self.template_name)
    }

    /// Text to lay out, or `None` when there is nothing to draw.
    pub fn visible_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

fn validate_template_name(name: &str) -> TelopResult<()> {
    if name.trim().is_empty() {
        return Err(TelopError::format("template_name must be non-empty"));
    }
    if name == "." || name == ".." {
        return Err(TelopError::format(format!(
            "template_name '{name}' is not a valid file name"
        )));
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(TelopError::format(format!(
            "template_name must not contain path separators (found {c:?})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/style/model.rs"]
mod tests;
