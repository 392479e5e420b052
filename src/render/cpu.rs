use std::path::PathBuf;

use kurbo::Shape as _;

use crate::assets::fonts::FontBook;
use crate::assets::text::{ShapedText, TextLayoutEngine};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8Premul, Vec2};
use crate::foundation::error::{TelopError, TelopResult};
use crate::render::blur::blur_rgba8_premul;
use crate::render::composite::{fill_rgba8, premul_over_in_place, scale_premul_in_place};
use crate::render::frame::FrameRGBA;
use crate::render::plan::{
    FillLayer, Layer, LayerPlan, PlateLayer, ShadowLayer, StrokeLayer, TextRun, compile_layers,
    compile_layers_for_canvas,
};
use crate::style::model::TelopStyle;

/// Environment variable holding extra font directories (platform path-list syntax).
pub const FONT_DIR_ENV: &str = "TELOP_FONT_DIR";

const PATH_TOLERANCE: f64 = 0.1;

/// Options for the CPU [`Compositor`].
#[derive(Debug, Clone)]
pub struct CompositorOpts {
    pub(crate) font_dirs: Vec<PathBuf>,
    pub(crate) load_system_fonts: bool,
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl Default for CompositorOpts {
    /// System fonts plus any directories listed in `TELOP_FONT_DIR`, transparent background.
    fn default() -> Self {
        let font_dirs = std::env::var_os(FONT_DIR_ENV)
            .map(|v| std::env::split_paths(&v).collect())
            .unwrap_or_default();
        Self {
            font_dirs,
            load_system_fonts: true,
            clear_rgba: None,
        }
    }
}

impl CompositorOpts {
    /// Add a directory scanned for `ttf`/`otf`/`ttc` files.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// Enable or disable loading the platform's installed fonts.
    pub fn with_system_fonts(mut self, enabled: bool) -> Self {
        self.load_system_fonts = enabled;
        self
    }

    /// Return options with a straight-alpha background color instead of transparency.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

/// CPU compositor turning a style into a preview raster.
///
/// Each render allocates its output buffer and scratch surfaces afresh; nothing from a previous
/// render is reused except the font book and shaping contexts.
pub struct Compositor {
    opts: CompositorOpts,
    fonts: FontBook,
    text_engine: TextLayoutEngine,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("opts", &self.opts)
            .field("font_faces", &self.fonts.face_count())
            .finish()
    }
}

impl Compositor {
    /// Build a compositor, loading fonts according to `opts`.
    pub fn new(opts: CompositorOpts) -> Self {
        let fonts = FontBook::new(opts.load_system_fonts, &opts.font_dirs);
        Self {
            opts,
            fonts,
            text_engine: TextLayoutEngine::new(),
        }
    }

    /// Number of font faces available for text layers.
    pub fn font_face_count(&self) -> usize {
        self.fonts.face_count()
    }

    /// Render `style` at its composition size.
    #[tracing::instrument(skip(self, style), fields(template = %style.template_name))]
    pub fn render(&mut self, style: &TelopStyle) -> TelopResult<FrameRGBA> {
        self.render_plan(&compile_layers(style))
    }

    /// Render `style` at an explicit canvas size.
    pub fn render_with_canvas(
        &mut self,
        style: &TelopStyle,
        canvas: Canvas,
    ) -> TelopResult<FrameRGBA> {
        self.render_plan(&compile_layers_for_canvas(style, canvas))
    }

    /// Execute a compiled plan.
    pub fn render_plan(&mut self, plan: &LayerPlan) -> TelopResult<FrameRGBA> {
        let (w, h) = surface_dims(plan.canvas)?;
        let mut out = vec![0u8; plan.canvas.rgba8_len()];
        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            fill_rgba8(&mut out, Rgba8Premul::from_straight_rgba(r, g, b, a).to_array());
        }

        let shaped = match &plan.text {
            Some(run) => self.shape(run),
            None => None,
        };
        let origin = plan.text.as_ref().map(|t| t.origin).unwrap_or(Point::ORIGIN);

        let mut surface = Surface::new(w, h);
        for layer in &plan.layers {
            match layer {
                Layer::Plate(p) => draw_plate(&mut surface.ctx, p),
                Layer::Shadow(s) => {
                    let Some(t) = &shaped else { continue };
                    surface.composite_into(&mut out)?;
                    draw_shadow(&mut surface, t, origin, s, &mut out)?;
                }
                Layer::Stroke(s) => {
                    if let Some(t) = &shaped {
                        draw_text_stroke(&mut surface.ctx, t, origin, s);
                    }
                }
                Layer::Fill(f) => {
                    if let Some(t) = &shaped {
                        draw_text_fill(&mut surface.ctx, t, origin, f);
                    }
                }
            }
        }
        surface.composite_into(&mut out)?;

        tracing::debug!(
            width = plan.canvas.width,
            height = plan.canvas.height,
            layers = plan.layers.len(),
            "rendered preview"
        );
        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: out,
            premultiplied: true,
        })
    }

    /// Shape the text run; `None` means text layers paint nothing.
    fn shape(&mut self, run: &TextRun) -> Option<ShapedText> {
        let font = self.fonts.resolve(&run.font_name)?;
        match self
            .text_engine
            .shape_line(&run.text, &font, run.font_size, run.tracking)
        {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(error = %e, font = %font.family, "text shaping failed, text skipped");
                None
            }
        }
    }
}

/// Render `style` at its composition size with default compositor options.
///
/// Fonts are loaded on every call; keep a [`Compositor`] around to render repeatedly.
pub fn render(style: &TelopStyle) -> TelopResult<FrameRGBA> {
    Compositor::new(CompositorOpts::default()).render(style)
}

/// Render context plus its readback pixmap.
struct Surface {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    width: u32,
    height: u32,
}

impl Surface {
    fn new(w: u16, h: u16) -> Self {
        Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            width: u32::from(w),
            height: u32::from(h),
        }
    }

    /// Rasterize everything recorded so far and return the premultiplied bytes.
    fn rasterize(&mut self) -> &[u8] {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();
        self.pixmap.data_as_u8_slice()
    }

    /// Composite pending draws over `out` and start a fresh recording.
    fn composite_into(&mut self, out: &mut [u8]) -> TelopResult<()> {
        let bytes = self.rasterize();
        premul_over_in_place(out, bytes)
    }
}

fn surface_dims(canvas: Canvas) -> TelopResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TelopError::format("canvas width exceeds 65535"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TelopError::format("canvas height exceeds 65535"))?;
    if w == 0 || h == 0 {
        return Err(TelopError::format("canvas width/height must be > 0"));
    }
    Ok((w, h))
}

fn text_transform(t: &ShapedText, origin: Point, offset: Vec2) -> vello_cpu::kurbo::Affine {
    affine_to_cpu(Affine::translate(Vec2::new(
        origin.x + offset.x,
        origin.y + offset.y - f64::from(t.baseline),
    )))
}

fn draw_plate(ctx: &mut vello_cpu::RenderContext, p: &PlateLayer) {
    if p.alpha == 0 {
        return;
    }
    let path: BezPath = if p.corner_radius > 0.0 {
        kurbo::RoundedRect::from_rect(p.rect, p.corner_radius).to_path(PATH_TOLERANCE)
    } else {
        p.rect.to_path(PATH_TOLERANCE)
    };
    let cpu_path = bezpath_to_cpu(&path);

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    let grouped = p.alpha < 255;
    if grouped {
        ctx.push_opacity_layer(f32::from(p.alpha) / 255.0);
    }
    ctx.set_paint(p.color.to_paint(255));
    ctx.fill_path(&cpu_path);
    if let Some((width, color)) = p.outline {
        ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width).with_join(vello_cpu::kurbo::Join::Miter),
        );
        ctx.set_paint(color.to_paint(255));
        ctx.stroke_path(&cpu_path);
    }
    if grouped {
        ctx.pop_layer();
    }
}

fn draw_shadow(
    surface: &mut Surface,
    t: &ShapedText,
    origin: Point,
    s: &ShadowLayer,
    out: &mut [u8],
) -> TelopResult<()> {
    if s.alpha == 0 {
        return Ok(());
    }
    let (w, h) = (surface.width, surface.height);
    surface.ctx.set_transform(text_transform(t, origin, s.offset));
    surface.ctx.set_paint(s.color.to_paint(255));
    surface
        .ctx
        .glyph_run(&t.font)
        .font_size(t.font_size)
        .fill_glyphs(t.glyphs.iter().copied());

    let silhouette = surface.rasterize();
    let mut blurred = blur_rgba8_premul(silhouette, w, h, s.blur_radius)?;
    scale_premul_in_place(&mut blurred, s.alpha);
    premul_over_in_place(out, &blurred)
}

fn draw_text_stroke(
    ctx: &mut vello_cpu::RenderContext,
    t: &ShapedText,
    origin: Point,
    s: &StrokeLayer,
) {
    ctx.set_transform(text_transform(t, origin, Vec2::ZERO));
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(s.width)
            .with_join(vello_cpu::kurbo::Join::Round)
            .with_caps(vello_cpu::kurbo::Cap::Round),
    );
    ctx.set_paint(s.color.to_paint(255));
    ctx.glyph_run(&t.font)
        .font_size(t.font_size)
        .stroke_glyphs(t.glyphs.iter().copied());
}

fn draw_text_fill(ctx: &mut vello_cpu::RenderContext, t: &ShapedText, origin: Point, f: &FillLayer) {
    ctx.set_transform(text_transform(t, origin, Vec2::ZERO));
    ctx.set_paint(f.color.to_paint(255));
    ctx.glyph_run(&t.font)
        .font_size(t.font_size)
        .fill_glyphs(t.glyphs.iter().copied());
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
