use std::collections::HashMap;
use std::path::{Path, PathBuf};

use usvg::fontdb;

/// A font face resolved for a requested family name.
#[derive(Clone)]
pub(crate) struct ResolvedFont {
    /// Family name of the face that was actually selected.
    pub family: String,
    /// Face data for shaping.
    pub shaping_blob: parley::fontique::Blob<u8>,
    /// Face data for painting glyph runs.
    pub paint_font: vello_cpu::peniko::FontData,
    /// `true` when the requested family was unavailable and a substitute was chosen.
    pub fallback: bool,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family", &self.family)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Font lookup by family name over system fonts plus configured font directories.
///
/// Unknown families fall back to a generic sans-serif, then serif, then the face whose family
/// name sorts first. When the platform's generic families are not installed, the generic
/// sans-serif and serif are taken from the loaded faces so the choice does not depend on
/// directory order.
pub(crate) struct FontBook {
    db: fontdb::Database,
    resolved: HashMap<String, Option<ResolvedFont>>,
}

impl FontBook {
    pub(crate) fn new(load_system_fonts: bool, font_dirs: &[PathBuf]) -> Self {
        let mut db = fontdb::Database::new();
        if load_system_fonts {
            db.load_system_fonts();
        }
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        let mut book = Self {
            db,
            resolved: HashMap::new(),
        };
        book.settle_generic_families();
        tracing::debug!(faces = book.db.len(), "font book ready");
        book
    }

    fn settle_generic_families(&mut self) {
        let mut names: Vec<&str> = self.db.faces().filter_map(primary_family).collect();
        names.sort_unstable();
        names.dedup();
        let (sans, serif) = generic_candidates(&names);
        let (sans, serif) = (sans.map(str::to_owned), serif.map(str::to_owned));

        if self.query(&[fontdb::Family::SansSerif]).is_none()
            && let Some(name) = sans
        {
            tracing::debug!(family = %name, "using installed sans-serif as generic");
            self.db.set_sans_serif_family(name);
        }
        if self.query(&[fontdb::Family::Serif]).is_none()
            && let Some(name) = serif
        {
            tracing::debug!(family = %name, "using installed serif as generic");
            self.db.set_serif_family(name);
        }
    }

    pub(crate) fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Resolve `family`, or `None` when the book holds no faces at all.
    pub(crate) fn resolve(&mut self, family: &str) -> Option<ResolvedFont> {
        if let Some(hit) = self.resolved.get(family) {
            return hit.clone();
        }
        let out = self.lookup(family);
        match &out {
            Some(f) if f.fallback => tracing::warn!(
                requested = family,
                substitute = %f.family,
                "font family not available, using fallback"
            ),
            Some(_) => {}
            None => tracing::warn!(requested = family, "no font faces available"),
        }
        self.resolved.insert(family.to_string(), out.clone());
        out
    }

    fn lookup(&self, family: &str) -> Option<ResolvedFont> {
        let exact = self.query(&[fontdb::Family::Name(family)]);
        let (id, fallback) = match exact {
            Some(id) => (id, false),
            None => {
                let id = self
                    .query(&[fontdb::Family::SansSerif])
                    .or_else(|| self.query(&[fontdb::Family::Serif]))
                    .or_else(|| self.first_face())?;
                (id, true)
            }
        };

        let face_family = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| family.to_string());
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;

        Some(ResolvedFont {
            family: face_family,
            shaping_blob: parley::fontique::Blob::from(bytes.clone()),
            paint_font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(bytes),
                index,
            ),
            fallback,
        })
    }

    fn first_face(&self) -> Option<fontdb::ID> {
        self.db
            .faces()
            .min_by(|a, b| {
                (primary_family(a), &a.post_script_name)
                    .cmp(&(primary_family(b), &b.post_script_name))
            })
            .map(|f| f.id)
    }

    fn query(&self, families: &[fontdb::Family<'_>]) -> Option<fontdb::ID> {
        self.db.query(&fontdb::Query {
            families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })
    }
}

fn primary_family(face: &fontdb::FaceInfo) -> Option<&str> {
    face.families.first().map(|(name, _)| name.as_str())
}

/// Generic sans-serif and serif picks from sorted, deduplicated family `names`.
///
/// Sans-serif prefers a proportional "Sans" family over a monospaced one; serif takes the
/// first family naming "Serif" without "Sans".
fn generic_candidates<'a>(names: &[&'a str]) -> (Option<&'a str>, Option<&'a str>) {
    fn has(name: &str, word: &str) -> bool {
        name.to_ascii_lowercase().contains(word)
    }
    let sans = names
        .iter()
        .find(|n| has(n, "sans") && !has(n, "mono"))
        .or_else(|| names.iter().find(|n| has(n, "sans")))
        .copied();
    let serif = names
        .iter()
        .find(|n| has(n, "serif") && !has(n, "sans"))
        .copied();
    (sans, serif)
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory not readable, skipped");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
