use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TelopError, TelopResult};

/// A rendered preview as RGBA8 pixels.
///
/// Frames are premultiplied alpha; the `premultiplied` flag makes that explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Iterate `(x, y, rgba)` over every pixel.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [u8; 4])> + '_ {
        let w = self.width.max(1);
        self.data.chunks_exact(4).enumerate().map(move |(i, px)| {
            let i = i as u32;
            (i % w, i / w, [px[0], px[1], px[2], px[3]])
        })
    }

    /// `true` when every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Convert into a straight-alpha image.
    pub fn to_rgba_image(&self) -> TelopResult<image::RgbaImage> {
        let mut bytes = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut bytes);
        }
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| TelopError::format("frame data does not match width*height*4"))
    }

    /// Write the frame as a PNG, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> TelopResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write PNG '{}'", path.display()))?;
        Ok(())
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
