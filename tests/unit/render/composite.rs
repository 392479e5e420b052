use super::*;

#[test]
fn over_transparent_src_keeps_dst() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn over_opaque_src_replaces_dst() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_in_place(&mut dst, &[200, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![200, 0, 0, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let mut dst = vec![0u8, 0, 255, 255];
    premul_over_in_place(&mut dst, &[128, 0, 0, 128]).unwrap();
    assert_eq!(dst, vec![128, 0, 127, 255]);
}

#[test]
fn over_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn scale_halves_premul_pixels() {
    let mut buf = vec![255u8, 128, 0, 255];
    scale_premul_in_place(&mut buf, 128);
    assert_eq!(buf, vec![128, 64, 0, 128]);

    let mut buf = vec![1u8, 2, 3, 4];
    scale_premul_in_place(&mut buf, 255);
    assert_eq!(buf, vec![1, 2, 3, 4]);
}

#[test]
fn fill_sets_every_pixel() {
    let mut buf = vec![0u8; 12];
    fill_rgba8(&mut buf, [1, 2, 3, 4]);
    assert_eq!(buf, [1u8, 2, 3, 4].repeat(3));
}
