use std::path::Path;

use crate::foundation::error::{TelopError, TelopResult};

/// Pixel dimensions of a decoded source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDims {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Fully decode `bytes` and report the image dimensions.
///
/// The whole image is decoded (not only the header) so truncated or corrupt bodies are caught.
pub fn decode_image_dims(bytes: &[u8]) -> TelopResult<ImageDims> {
    if bytes.is_empty() {
        return Err(TelopError::input("image data is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TelopError::input(format!("decode image from memory: {e}")))?;
    let (width, height) = (dyn_img.width(), dyn_img.height());
    if width == 0 || height == 0 {
        return Err(TelopError::input("decoded image has zero width or height"));
    }
    Ok(ImageDims { width, height })
}

/// Read `path` and decode it with [`decode_image_dims`].
pub fn read_image_dims(path: &Path) -> TelopResult<ImageDims> {
    let bytes = std::fs::read(path).map_err(|e| {
        TelopError::input(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_image_dims(&bytes)
        .map_err(|e| TelopError::input(format!("image '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
