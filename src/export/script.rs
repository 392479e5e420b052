use std::path::{Path, PathBuf};

use crate::render::plan::shadow_offset;
use crate::style::color::Color;
use crate::style::model::{PlateShape, TelopStyle};

const FALLBACK_BASE_NAME: &str = "telop";

/// Source text written into the template when the style carries none.
pub const PLACEHOLDER_TEXT: &str = "Telop Text";

const FILL_LAYER_NAME: &str = "Text Fill";

/// File-system safe stem used for every export artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseName(String);

impl BaseName {
    /// Keep `[A-Za-z0-9_.-]`, replace everything else with `_`, and drop leading dots.
    ///
    /// Falls back to `telop` when nothing usable remains.
    pub fn from_template_name(name: &str) -> Self {
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let trimmed = cleaned.trim_start_matches('.');
        if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
            Self(FALLBACK_BASE_NAME.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The sanitized stem.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locations of the control script and the artifact the external tool must produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<out_dir>/<base>.jsx`
    pub script: PathBuf,
    /// `<out_dir>/<base>.mogrt`
    pub artifact: PathBuf,
}

impl ArtifactPaths {
    /// Derive both paths from a working directory and a sanitized base name.
    pub fn new(out_dir: impl AsRef<Path>, base: &BaseName) -> Self {
        let dir = out_dir.as_ref();
        Self {
            script: dir.join(format!("{base}.jsx")),
            artifact: dir.join(format!("{base}.mogrt")),
        }
    }
}

/// Build the ExtendScript program that recreates `style` as a composition and exports it as a
/// motion graphics template to `paths.artifact`.
///
/// Layers are created bottom to top in preview paint order: plate, shadow, one stroke-only
/// text layer per stroke (last-listed first), fill. Every text copy follows the fill layer's
/// source text, which is the single property exposed in the template.
pub fn build_control_script(style: &TelopStyle, paths: &ArtifactPaths) -> String {
    let text = style.visible_text().unwrap_or(PLACEHOLDER_TEXT);
    let x = f64::from(style.position.x);
    let y = f64::from(style.position.y);
    let font_size = f64::from(style.font_size);
    let tracking = (f64::from(style.tracking) * 1000.0 / font_size).round();

    let mut s = Vec::new();
    s.push("(function () {".to_string());
    s.push("  app.beginUndoGroup(\"telop\");".to_string());
    s.push("  var proj = app.project || app.newProject();".to_string());
    s.push(format!(
        "  var comp = proj.items.addComp({}, {}, {}, 1, {}, {});",
        js_str(&style.template_name),
        style.comp.width,
        style.comp.height,
        style.comp.duration,
        style.comp.fps
    ));
    s.push(format!("  var SOURCE = {};", js_str(text)));
    s.push(format!("  var FONT = {};", js_str(&style.font_name)));
    s.push(format!("  var SIZE = {font_size};"));
    s.push(format!("  var TRACKING = {tracking};"));
    s.push(String::new());
    s.extend(TEXT_LAYER_HELPER.lines().map(str::to_string));

    if style.plate.enabled {
        let p = &style.plate;
        let (w, h) = (f64::from(p.size.w), f64::from(p.size.h));
        let roundness = match p.shape {
            PlateShape::Rect => 0.0,
            PlateShape::RoundedRect => f64::from(p.radius).min(w.min(h) / 2.0),
        };
        s.push(String::new());
        s.push("  var plate = comp.layers.addShape();".to_string());
        s.push("  plate.name = \"Plate\";".to_string());
        s.push(
            "  var plateGroup = plate.property(\"ADBE Root Vectors Group\").addProperty(\"ADBE Vector Group\");"
                .to_string(),
        );
        s.push("  var plateShapes = plateGroup.property(\"ADBE Vectors Group\");".to_string());
        s.push(
            "  var plateRect = plateShapes.addProperty(\"ADBE Vector Shape - Rect\");".to_string(),
        );
        s.push(format!(
            "  plateRect.property(\"ADBE Vector Rect Size\").setValue([{w}, {h}]);"
        ));
        s.push(format!(
            "  plateRect.property(\"ADBE Vector Rect Roundness\").setValue({roundness});"
        ));
        s.push(
            "  var plateFill = plateShapes.addProperty(\"ADBE Vector Graphic - Fill\");".to_string(),
        );
        s.push(format!(
            "  plateFill.property(\"ADBE Vector Fill Color\").setValue({});",
            js_color(p.color)
        ));
        if p.stroke_width > 0 {
            s.push(
                "  var plateStroke = plateShapes.addProperty(\"ADBE Vector Graphic - Stroke\");"
                    .to_string(),
            );
            s.push(format!(
                "  plateStroke.property(\"ADBE Vector Stroke Color\").setValue({});",
                js_color(p.stroke_color)
            ));
            s.push(format!(
                "  plateStroke.property(\"ADBE Vector Stroke Width\").setValue({});",
                p.stroke_width
            ));
        }
        s.push(format!(
            "  plate.property(\"ADBE Transform Group\").property(\"ADBE Position\").setValue([{}, {}]);",
            x + w / 2.0,
            y - h / 2.0
        ));
        s.push(format!(
            "  plate.property(\"ADBE Transform Group\").property(\"ADBE Opacity\").setValue({});",
            p.opacity
        ));
    }

    if style.shadow.enabled {
        let sh = &style.shadow;
        let offset = shadow_offset(sh.distance, sh.direction);
        s.push(String::new());
        s.push(format!(
            "  var shadow = addTextLayer(\"Text Shadow\", {}, null, 0, [{}, {}]);",
            js_color(sh.color),
            x + offset.x,
            y + offset.y
        ));
        s.push(
            "  var blur = shadow.property(\"ADBE Effect Parade\").addProperty(\"ADBE Gaussian Blur 2\");"
                .to_string(),
        );
        s.push(format!(
            "  blur.property(\"ADBE Gaussian Blur 2-0001\").setValue({});",
            sh.softness
        ));
        s.push(format!(
            "  shadow.property(\"ADBE Transform Group\").property(\"ADBE Opacity\").setValue({});",
            sh.opacity
        ));
        s.push("  followSource(shadow);".to_string());
    }

    for (index, stroke) in style.strokes.iter().enumerate().rev() {
        if stroke.width == 0 {
            continue;
        }
        s.push(String::new());
        s.push(format!(
            "  followSource(addTextLayer(\"Text Stroke {}\", null, {}, {}, [{x}, {y}]));",
            index + 1,
            js_color(stroke.color),
            stroke.width
        ));
    }

    let fill_color = if style.fill.enabled {
        js_color(style.fill.color)
    } else {
        "null".to_string()
    };
    s.push(String::new());
    s.push(format!(
        "  var fill = addTextLayer({}, {fill_color}, null, 0, [{x}, {y}]);",
        js_str(FILL_LAYER_NAME)
    ));
    s.push(
        "  fill.property(\"ADBE Text Properties\").property(\"ADBE Text Document\").addToMotionGraphicsTemplate(comp);"
            .to_string(),
    );
    s.push(String::new());
    s.push(format!(
        "  comp.exportAsMotionGraphicsTemplate(true, {});",
        js_str(&paths.artifact.to_string_lossy())
    ));
    s.push("  app.endUndoGroup();".to_string());
    s.push("  app.project.close(CloseOptions.DO_NOT_SAVE_CHANGES);".to_string());
    s.push("  app.quit();".to_string());
    s.push("})();".to_string());

    let mut out = s.join("\n");
    out.push('\n');
    out
}

const TEXT_LAYER_HELPER: &str = r#"  function addTextLayer(name, fillColor, strokeColor, strokeWidth, position) {
    var layer = comp.layers.addText(SOURCE);
    layer.name = name;
    var prop = layer.property("ADBE Text Properties").property("ADBE Text Document");
    var doc = prop.value;
    doc.resetCharStyle();
    doc.font = FONT;
    doc.fontSize = SIZE;
    doc.tracking = TRACKING;
    doc.justification = ParagraphJustification.LEFT_JUSTIFY;
    doc.applyFill = fillColor !== null;
    if (fillColor !== null) {
      doc.fillColor = fillColor;
    }
    doc.applyStroke = strokeColor !== null;
    if (strokeColor !== null) {
      doc.strokeColor = strokeColor;
      doc.strokeWidth = strokeWidth;
      doc.strokeOverFill = true;
    }
    prop.setValue(doc);
    layer.property("ADBE Transform Group").property("ADBE Position").setValue(position);
    return layer;
  }

  function followSource(layer) {
    layer.property("ADBE Text Properties").property("ADBE Text Document").expression =
      'thisComp.layer("Text Fill").text.sourceText + ""';
  }"#;

/// Quote `s` as a string literal that ES3 interpreters accept.
fn js_str(s: &str) -> String {
    serde_json::Value::from(s)
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn js_color(c: Color) -> String {
    let [r, g, b] = c.to_array();
    format!("[{r}, {g}, {b}]")
}

#[cfg(test)]
#[path = "../../tests/unit/export/script.rs"]
mod tests;
