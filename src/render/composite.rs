use crate::foundation::error::{TelopError, TelopResult};
use crate::foundation::math::mul_div255_u8;

/// Composite premultiplied `src` over premultiplied `dst` (Porter-Duff source-over).
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> TelopResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TelopError::format(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - sa;
        for (dc, &sc) in d.iter_mut().zip(s) {
            *dc = sc.saturating_add(mul_div255_u8(u16::from(*dc), inv));
        }
    }
    Ok(())
}

/// Multiply every channel of a premultiplied buffer by `alpha / 255`.
pub(crate) fn scale_premul_in_place(buf: &mut [u8], alpha: u8) {
    if alpha == 255 {
        return;
    }
    let a = u16::from(alpha);
    for v in buf.iter_mut() {
        *v = mul_div255_u8(u16::from(*v), a);
    }
}

/// Fill a buffer with one premultiplied pixel value.
pub(crate) fn fill_rgba8(buf: &mut [u8], px: [u8; 4]) {
    for d in buf.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
