//! Lowering of a [`TelopStyle`] into an ordered, back-to-front list of layers.
//!
//! The plan carries every decision that depends on the style alone (which layers exist, their
//! order, geometry and colors), so the executor only has to paint.

use crate::foundation::core::{Canvas, Point, Rect, Vec2};
use crate::foundation::math::percent_to_u8;
use crate::style::color::Color;
use crate::style::model::{PlateShape, TelopStyle};

/// Back-to-front layer list for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerPlan {
    /// Output raster size.
    pub canvas: Canvas,
    /// Text to shape, when any text layer is present.
    pub text: Option<TextRun>,
    /// Layers in paint order; later entries are painted on top.
    pub layers: Vec<Layer>,
}

/// Text shared by the shadow, stroke and fill layers.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Text content, never empty.
    pub text: String,
    /// Requested font family.
    pub font_name: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Extra inter-glyph spacing in pixels.
    pub tracking: f32,
    /// Left end of the first baseline.
    pub origin: Point,
}

/// One paint step.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    /// Background plate.
    Plate(PlateLayer),
    /// Blurred, offset glyph silhouette.
    Shadow(ShadowLayer),
    /// Glyph outline for `style.strokes[index]`.
    Stroke(StrokeLayer),
    /// Glyph body.
    Fill(FillLayer),
}

/// Plate geometry and paint.
#[derive(Clone, Debug, PartialEq)]
pub struct PlateLayer {
    /// Plate bounds in canvas pixels.
    pub rect: Rect,
    /// Corner radius; `0` for a plain rectangle.
    pub corner_radius: f64,
    /// Fill color.
    pub color: Color,
    /// Outline width and color, when the outline is enabled.
    pub outline: Option<(f64, Color)>,
    /// Group opacity applied to fill and outline.
    pub alpha: u8,
}

/// Shadow paint parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowLayer {
    /// Offset of the silhouette relative to the text origin.
    pub offset: Vec2,
    /// Gaussian blur radius in pixels.
    pub blur_radius: u32,
    /// Tint.
    pub color: Color,
    /// Opacity applied after blurring.
    pub alpha: u8,
}

/// Stroke paint parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeLayer {
    /// Position of the stroke in `style.strokes`.
    pub index: usize,
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

/// Fill paint parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct FillLayer {
    /// Fill color.
    pub color: Color,
}

/// Compile `style` for its own composition size.
pub fn compile_layers(style: &TelopStyle) -> LayerPlan {
    compile_layers_for_canvas(style, style.comp.canvas())
}

/// Compile `style` for an explicit output size.
///
/// Order: plate, shadow, strokes from the last-listed to the first-listed, fill. Text layers
/// are omitted when the text is absent or empty; zero-width strokes paint nothing and are
/// omitted too.
pub fn compile_layers_for_canvas(style: &TelopStyle, canvas: Canvas) -> LayerPlan {
    let origin = Point::new(f64::from(style.position.x), f64::from(style.position.y));
    let mut layers = Vec::with_capacity(style.strokes.len() + 3);

    if style.plate.enabled {
        layers.push(Layer::Plate(plate_layer(style, origin)));
    }

    let text = style.visible_text().map(|t| TextRun {
        text: t.to_string(),
        font_name: style.font_name.clone(),
        font_size: style.font_size as f32,
        tracking: style.tracking as f32,
        origin,
    });

    if text.is_some() {
        if style.shadow.enabled {
            layers.push(Layer::Shadow(ShadowLayer {
                offset: shadow_offset(style.shadow.distance, style.shadow.direction),
                blur_radius: style.shadow.softness,
                color: style.shadow.color,
                alpha: percent_to_u8(style.shadow.opacity),
            }));
        }

        for (index, stroke) in style.strokes.iter().enumerate().rev() {
            if stroke.width == 0 {
                continue;
            }
            layers.push(Layer::Stroke(StrokeLayer {
                index,
                width: f64::from(stroke.width),
                color: stroke.color,
            }));
        }

        if style.fill.enabled {
            layers.push(Layer::Fill(FillLayer {
                color: style.fill.color,
            }));
        }
    }

    LayerPlan {
        canvas,
        text,
        layers,
    }
}

/// The plate grows up and to the right from the anchor, mirroring a left-baseline text anchor.
fn plate_layer(style: &TelopStyle, anchor: Point) -> PlateLayer {
    let plate = &style.plate;
    let w = f64::from(plate.size.w);
    let h = f64::from(plate.size.h);
    let rect = Rect::new(anchor.x, anchor.y - h, anchor.x + w, anchor.y);
    let corner_radius = match plate.shape {
        PlateShape::Rect => 0.0,
        PlateShape::RoundedRect => f64::from(plate.radius).min(w.min(h) / 2.0),
    };
    PlateLayer {
        rect,
        corner_radius,
        color: plate.color,
        outline: (plate.stroke_width > 0).then(|| (f64::from(plate.stroke_width), plate.stroke_color)),
        alpha: percent_to_u8(plate.opacity),
    }
}

/// Offset for a shadow `distance` pixels away at `direction` degrees (0 = up, clockwise).
pub(crate) fn shadow_offset(distance: i32, direction: i32) -> Vec2 {
    let theta = f64::from(direction).to_radians();
    let d = f64::from(distance);
    Vec2::new(d * theta.sin(), -d * theta.cos())
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
