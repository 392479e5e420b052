use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TelopError, TelopResult};
use crate::foundation::math::unit_to_u8;

/// Straight RGB color with every channel in `[0, 1]`.
///
/// On the wire a color is a three-element array `[r, g, b]`; anything else (wrong length,
/// non-numeric entries, a channel outside the unit interval) is rejected while deserializing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a validated color.
    pub fn new(r: f64, g: f64, b: f64) -> TelopResult<Self> {
        for (name, v) in [("r", r), ("g", g), ("b", b)] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(TelopError::format(format!(
                    "color channel {name}={v} is outside [0, 1]"
                )));
            }
        }
        Ok(Self { r, g, b })
    }

    /// Red channel.
    pub fn r(self) -> f64 {
        self.r
    }

    /// Green channel.
    pub fn g(self) -> f64 {
        self.g
    }

    /// Blue channel.
    pub fn b(self) -> f64 {
        self.b
    }

    /// Channels as `[r, g, b]`.
    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize to premultiplied RGBA8 with the given straight alpha.
    pub fn to_premul_rgba8(self, alpha: u8) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(
            unit_to_u8(self.r),
            unit_to_u8(self.g),
            unit_to_u8(self.b),
            alpha,
        )
    }

    /// Quantize to a straight-alpha `vello_cpu` paint color.
    pub(crate) fn to_paint(self, alpha: u8) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(
            unit_to_u8(self.r),
            unit_to_u8(self.g),
            unit_to_u8(self.b),
            alpha,
        )
    }
}

impl TryFrom<[f64; 3]> for Color {
    type Error = TelopError;

    fn try_from(v: [f64; 3]) -> Result<Self, Self::Error> {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Color> for [f64; 3] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
