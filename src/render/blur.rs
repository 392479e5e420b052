use crate::foundation::error::{TelopError, TelopResult};

/// Separable Gaussian kernel with Q16 fixed-point weights summing to exactly `1 << 16`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GaussianKernel {
    weights: Vec<u32>,
}

impl GaussianKernel {
    const ONE: i64 = 1 << 16;

    /// Kernel for a blur of `radius` pixels; sigma is `max(radius / 2, 0.5)`.
    pub(crate) fn for_radius(radius: u32) -> Self {
        if radius == 0 {
            return Self {
                weights: vec![1 << 16],
            };
        }
        let sigma = (f64::from(radius) / 2.0).max(0.5);
        let denom = 2.0 * sigma * sigma;
        let r = radius as i64;
        let raw: Vec<f64> = (-r..=r)
            .map(|i| {
                let x = i as f64;
                (-x * x / denom).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();

        let mut weights: Vec<u32> = raw
            .iter()
            .map(|w| ((w / sum) * Self::ONE as f64).round().clamp(0.0, Self::ONE as f64) as u32)
            .collect();
        let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        let mid = weights.len() / 2;
        let fixed = (i64::from(weights[mid]) + Self::ONE - acc).clamp(0, Self::ONE);
        weights[mid] = fixed as u32;
        Self { weights }
    }

    fn radius(&self) -> i64 {
        (self.weights.len() / 2) as i64
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Blur a premultiplied RGBA8 buffer into a new buffer. Edges clamp to the border pixel.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
) -> TelopResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| TelopError::format("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(TelopError::format(
            "blur expects a buffer of width*height*4 bytes",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = GaussianKernel::for_radius(radius);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    convolve(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &GaussianKernel, axis: Axis) {
    let (w, h) = (i64::from(width), i64::from(height));
    let r = k.radius();
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.weights.iter().enumerate() {
                let d = ki as i64 - r;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                    Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = (((a + 32768) >> 16).min(255)) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
