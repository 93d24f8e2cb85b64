use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_coverage_on_white_mixes() {
    let dst = [255, 255, 255, 255];
    let src = [0, 0, 0, 128];
    let out = over(dst, src);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 127);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_pixels() {
    let mut px = vec![12, 34, 56, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[12, 34, 56, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[12, 34, 56, 255]);
}

#[test]
fn unpremultiply_restores_half_alpha_approximately() {
    let mut px = vec![100, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 100).abs() <= 1);
    assert!((i32::from(px[1]) - 50).abs() <= 1);
    assert!((i32::from(px[2]) - 200).abs() <= 1);
    assert_eq!(px[3], 128);
}

#[test]
fn premultiply_zeroes_fully_transparent_pixels() {
    let mut px = [200u8, 100, 50, 0, 10, 20, 30, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [0, 0, 0, 0, 10, 20, 30, 255]);
}
