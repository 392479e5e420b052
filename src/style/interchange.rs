//! Save/load contract for [`TelopStyle`].
//!
//! The interchange text is pretty-printed JSON with the canonical field order of the model.
//! Loading is all-or-nothing: either the whole record parses and validates, or a
//! [`TelopError::Format`] is returned and no value is produced.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TelopError, TelopResult};
use crate::style::model::TelopStyle;

/// Serialize a style into interchange text.
///
/// The style is validated first, so any text produced here loads back through
/// [`deserialize`] to an equal value. An invalid style (for example a NaN `comp.duration`,
/// which `serde_json` would silently write as `null`) is a [`TelopError::Format`]. Styles
/// from [`deserialize`] or inference always serialize.
pub fn serialize(style: &TelopStyle) -> TelopResult<String> {
    style.validate()?;
    serde_json::to_string_pretty(style)
        .map_err(|e| TelopError::format(format!("serialize style: {e}")))
}

/// Parse and validate interchange text.
pub fn deserialize(text: &str) -> TelopResult<TelopStyle> {
    let style: TelopStyle = serde_json::from_str(text)
        .map_err(|e| TelopError::format(format!("parse style JSON: {e}")))?;
    style.validate()?;
    Ok(style)
}

impl TelopStyle {
    /// Parse and validate interchange text. Same as [`deserialize`].
    pub fn from_json(text: &str) -> TelopResult<Self> {
        deserialize(text)
    }

    /// Serialize into interchange text. Same as [`serialize`].
    pub fn to_json(&self) -> TelopResult<String> {
        serialize(self)
    }

    /// Parse and validate interchange JSON from a reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TelopResult<Self> {
        let style: Self = serde_json::from_reader(r)
            .map_err(|e| TelopError::format(format!("parse style JSON: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    /// Load a style file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> TelopResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open style JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Write the interchange text to `path`, creating parent directories as needed.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> TelopResult<()> {
        let path = path.as_ref();
        let text = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        std::fs::write(path, text)
            .with_context(|| format!("write style JSON '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "saved style");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/interchange.rs"]
mod tests;
