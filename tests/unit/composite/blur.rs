use super::*;

#[test]
fn boxes_cover_requested_sigma() {
    assert_eq!(boxes_for_gauss(0.0, 3), vec![1, 1, 1]);
    let sizes = boxes_for_gauss(6.0, 3);
    assert_eq!(sizes.len(), 3);
    assert!(sizes.iter().all(|s| s % 2 == 1));
    // Variance of n boxes of width w is sum((w^2 - 1) / 12).
    let var: f64 = sizes.iter().map(|&s| ((s * s - 1) as f64) / 12.0).sum();
    assert!((var.sqrt() - 6.0).abs() < 1.0, "sigma ~ {}", var.sqrt());
}

#[test]
fn box_blur_constant_image_is_identity() {
    let (w, h) = (7u32, 5u32);
    let src = [50u8, 60, 70, 255].repeat((w * h) as usize);
    let out = box_blur_rgba8_premul(&src, w, h, 4.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn box_blur_zero_sigma_is_identity() {
    let src: Vec<u8> = (0..64).collect();
    let out = box_blur_rgba8_premul(&src, 4, 4, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn box_blur_softens_an_edge() {
    let (w, h) = (9u32, 1u32);
    let mut src = Vec::new();
    for x in 0..w {
        let v = if x < 4 { 0u8 } else { 255u8 };
        src.extend_from_slice(&[v, v, v, 255]);
    }
    let out = box_blur_rgba8_premul(&src, w, h, 1.5).unwrap();
    let mid = out[4 * 4];
    assert!(mid > 0 && mid < 255, "edge pixel {mid}");
    assert_eq!(out[0], 0);
    assert_eq!(out[8 * 4], 255);
}

#[test]
fn light_blur_is_one_radius_one_pass() {
    assert_eq!(boxes_for_gauss(0.6, 3), vec![1, 1, 3]);

    // A single bright column spreads exactly one pixel to each side per axis.
    let (w, h) = (5u32, 1u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    src[8..12].copy_from_slice(&[255, 255, 255, 255]);
    let out = box_blur_rgba8_premul(&src, w, h, 0.6).unwrap();
    let alphas: Vec<u8> = out.chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alphas, vec![0, 85, 85, 85, 0]);
}

#[test]
fn columns_blur_like_rows() {
    let mut row = Vec::new();
    for x in 0..6u8 {
        row.extend_from_slice(&[x * 40, x * 40, x * 40, 255]);
    }
    let horizontal = box_blur_rgba8_premul(&row, 6, 1, 1.0).unwrap();
    let vertical = box_blur_rgba8_premul(&row, 1, 6, 1.0).unwrap();
    assert_eq!(horizontal, vertical);
}

#[test]
fn rejects_bad_sigma_and_size() {
    let src = vec![0u8; 16];
    assert!(box_blur_rgba8_premul(&src, 2, 2, f32::NAN).is_err());
    assert!(box_blur_rgba8_premul(&src, 2, 2, -1.0).is_err());
    assert!(box_blur_rgba8_premul(&src, 3, 2, 1.0).is_err());
}
