use std::borrow::Cow;

use crate::assets::fonts::ResolvedFont;
use crate::foundation::error::{TelopError, TelopResult};

/// Single-line text shaped into positioned glyphs, ready to paint.
#[derive(Clone)]
pub(crate) struct ShapedText {
    pub glyphs: Vec<vello_cpu::Glyph>,
    pub font: vello_cpu::peniko::FontData,
    pub font_size: f32,
    /// Distance from the layout top to the first baseline.
    pub baseline: f32,
}

/// Stateful helper for shaping text with Parley from resolved font data.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: std::collections::HashMap<String, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: std::collections::HashMap::new(),
        }
    }

    fn family_name_for(&mut self, font: &ResolvedFont) -> TelopResult<String> {
        if let Some(name) = self.registered.get(&font.family) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(font.shaping_blob.clone(), None);
        // Collections register every face; prefer the family that was actually resolved.
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in &families {
            if let Some(name) = self.font_ctx.collection.family_name(*id) {
                names.push(name.to_string());
            }
        }
        let name = names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&font.family))
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| TelopError::format("no font families registered from font data"))?;
        self.registered.insert(font.family.clone(), name.clone());
        Ok(name)
    }

    /// Shape `text` on one line at `size_px`, adding `tracking_px` between glyphs.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        tracking_px: f32,
    ) -> TelopResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TelopError::format("font size must be finite and > 0"));
        }
        let family_name = self.family_name_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(tracking_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(size_px);
        let mut glyphs = Vec::new();
        let mut run_size = size_px;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                run_size = run.run().font_size();
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedText {
            glyphs,
            font: font.paint_font.clone(),
            font_size: run_size,
            baseline,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
