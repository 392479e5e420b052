use super::*;

#[test]
fn kernel_weights_sum_to_one_q16() {
    for r in [1u32, 2, 5, 12] {
        let k = GaussianKernel::for_radius(r);
        let sum: u64 = k.weights.iter().map(|&w| u64::from(w)).sum();
        assert_eq!(sum, 1 << 16, "radius {r}");
        assert_eq!(k.weights.len(), (2 * r + 1) as usize);
    }
}

#[test]
fn radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 1, 2, 0).unwrap(), src);
}

#[test]
fn constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    assert_eq!(blur_rgba8_premul(&src, w, h, 3).unwrap(), src);
}

#[test]
fn single_pixel_energy_spreads_and_is_conserved() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: i64 = out.chunks_exact(4).map(|px| i64::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 8);
}

#[test]
fn size_mismatch_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1).is_err());
}
