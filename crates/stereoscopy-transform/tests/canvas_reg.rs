//! Canvas resolution regression test
//!
//! Checks the shared-canvas guarantees for rotated and shifted stereo pairs:
//!   1. Expand: the canvas contains every transformed picture
//!   2. Shrink: the canvas fits inside every transformed picture, so no
//!      fill is visible after resampling
//!   3. Both outputs of a pair always share one size
//!   4. Warping by a matrix and then by its inverse restores the image

use stereoscopy_core::{ColorType, Image};
use stereoscopy_test::{RegParams, gradient_image};
use stereoscopy_transform::{
    AffineMatrix, CanvasMode, TransformError, WarpOptions, affine_warp, resolve_canvas,
    stereo_adjustments, transform_images,
};

fn count_non_opaque(img: &Image) -> usize {
    img.data().chunks_exact(4).filter(|p| p[3] != 255).count()
}

#[test]
fn canvas_reg_expand() {
    let mut rp = RegParams::new("canvas_expand");

    let size = (120u32, 80u32);
    for angle in [5.0, 20.0, -35.0, 90.0, 180.0] {
        let mats = stereo_adjustments((6.0, -3.0), [angle, -angle / 2.0], [size; 2]);
        let canvas = resolve_canvas(&[size; 2], &mats, CanvasMode::Expand).unwrap();
        for m in &mats {
            let b = m.linear_bounds((size.0 as f64, size.1 as f64));
            if canvas.width as f64 + 1e-9 < b.width() || canvas.height as f64 + 1e-9 < b.height() {
                eprintln!(
                    "angle {angle}: canvas {}x{} smaller than bounds {}x{}",
                    canvas.width,
                    canvas.height,
                    b.width(),
                    b.height()
                );
                rp.compare_values(1.0, 0.0, 0.0);
            }
        }
        // Aspect ratio of the input is kept (up to rounding)
        rp.compare_values(
            1.5,
            canvas.width as f64 / canvas.height as f64,
            0.05,
        );
    }

    assert!(rp.cleanup(), "canvas_expand regression test failed");
}

#[test]
fn canvas_reg_shrink() {
    let mut rp = RegParams::new("canvas_shrink");

    let img = gradient_image(120, 80, ColorType::Rgba).unwrap();
    let pair = [img.clone(), img.clone()];
    for angle in [3.0, 10.0, -12.0] {
        let mats = stereo_adjustments((0.0, 0.0), [angle, -angle], [img.dimensions(); 2]);
        let out = transform_images(&pair, &mats, CanvasMode::Shrink, &WarpOptions::default())
            .unwrap();
        rp.compare_values(2.0, out.len() as f64, 0.0);
        rp.compare_values(
            1.0,
            if out[0].dimensions() == out[1].dimensions() { 1.0 } else { 0.0 },
            0.0,
        );
        rp.compare_values(1.0, if out[0].width() <= 120 { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, if out[0].height() <= 80 { 1.0 } else { 0.0 }, 0.0);
        for o in &out {
            rp.compare_values(0.0, count_non_opaque(o) as f64, 0.0);
        }
    }

    // A shift as wide as the image leaves nothing
    let mats = stereo_adjustments((70.0, 0.0), [0.0, 0.0], [img.dimensions(); 2]);
    let result = transform_images(&pair, &mats, CanvasMode::Shrink, &WarpOptions::default());
    rp.compare_values(
        1.0,
        if matches!(result, Err(TransformError::DegenerateCanvas { .. })) {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    assert!(rp.cleanup(), "canvas_shrink regression test failed");
}

#[test]
fn canvas_reg_expand_pair() {
    let mut rp = RegParams::new("canvas_expand_pair");

    let img = gradient_image(90, 60, ColorType::Rgba).unwrap();
    let mats = stereo_adjustments((4.0, 2.0), [8.0, 0.0], [img.dimensions(); 2]);
    let out = transform_images(
        &[img.clone(), img.clone()],
        &mats,
        CanvasMode::Expand,
        &WarpOptions::default(),
    )
    .unwrap();
    rp.compare_values(out[0].width() as f64, out[1].width() as f64, 0.0);
    rp.compare_values(out[0].height() as f64, out[1].height() as f64, 0.0);
    // The rotated left image leaves transparent corners on the larger canvas
    rp.compare_values(1.0, if count_non_opaque(&out[0]) > 0 { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "canvas_expand_pair regression test failed");
}

#[test]
fn canvas_reg_inverse() {
    let mut rp = RegParams::new("canvas_inverse");

    let img = gradient_image(64, 64, ColorType::Rgb).unwrap();
    let size = img.dimensions();
    let m = AffineMatrix::from_shift_and_rotation((2.0, -1.0), 7.0, (64.0, 64.0));
    let inv = m.inverse().unwrap();
    let opts = WarpOptions::default();

    let forward = affine_warp(&img, &m, size, &opts).unwrap();
    let back = affine_warp(&forward, &inv, size, &opts).unwrap();
    rp.compare_values(64.0, back.width() as f64, 0.0);
    rp.compare_values(64.0, back.height() as f64, 0.0);

    // Interior pixels survive the round trip up to interpolation error
    let centre = back.clip_rectangle(24, 24, 16, 16).unwrap();
    let expected = img.clip_rectangle(24, 24, 16, 16).unwrap();
    rp.compare_images_tolerant(&expected, &centre, 4);

    // Integer shifts are exact
    let t = AffineMatrix::translation(5.0, 3.0);
    let shifted = affine_warp(&img, &t, size, &opts).unwrap();
    let restored = affine_warp(&shifted, &t.inverse().unwrap(), size, &opts).unwrap();
    rp.compare_images(
        &img.clip_rectangle(5, 3, 59, 61).unwrap(),
        &restored.clip_rectangle(5, 3, 59, 61).unwrap(),
    );

    assert!(rp.cleanup(), "canvas_inverse regression test failed");
}
