//! Auto alignment regression test
//!
//! Builds stereo pairs with a known displacement from the synthetic texture
//! and checks that the built-in estimator recovers it, that the recovered
//! motion is split evenly between the two images, and that feeding the
//! result through the canvas transformer brings the pair into register.

use stereoscopy_core::Image;
use stereoscopy_test::{RegParams, textured_image};
use stereoscopy_transform::{
    AlignmentEstimator, CanvasMode, EccEstimator, LumaPlane, TermCriteria, WarpOptions,
    find_alignments, transform_images,
};

fn mean_abs_diff(a: &Image, b: &Image) -> f64 {
    let total: u64 = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| x.abs_diff(*y) as u64)
        .sum();
    total as f64 / a.data().len() as f64
}

#[test]
fn align_reg_estimator() {
    let mut rp = RegParams::new("align_estimator");

    let left = textured_image(160, 120, 0.0, 0.0).unwrap();
    for (dx, dy) in [(3.0, 2.0), (-2.0, 1.5), (0.0, 0.0)] {
        let right = textured_image(160, 120, dx, dy).unwrap();
        let m = EccEstimator
            .estimate(
                &LumaPlane::from_image(&left),
                &LumaPlane::from_image(&right),
                &TermCriteria::default(),
            )
            .unwrap();
        let [a, b, tx, _, _, ty] = *m.coeffs();
        eprintln!("shift ({dx}, {dy}) -> {:?}", m.coeffs());
        rp.compare_values(-dx, tx, 0.25);
        rp.compare_values(-dy, ty, 0.25);
        rp.compare_values(1.0, a, 1e-3);
        rp.compare_values(0.0, b, 1e-3);
    }

    assert!(rp.cleanup(), "align_estimator regression test failed");
}

#[test]
fn align_reg_pair() {
    let mut rp = RegParams::new("align_pair");

    let left = textured_image(200, 140, 0.0, 0.0).unwrap();
    let right = textured_image(200, 140, 4.0, -2.0).unwrap();
    let criteria = TermCriteria::default();
    let [ml, mr] = find_alignments(&left, &right, &EccEstimator, &criteria).unwrap();

    // Each image moves half way
    rp.compare_values(-2.0, mr.translation_part().0, 0.2);
    rp.compare_values(1.0, mr.translation_part().1, 0.2);
    rp.compare_values(2.0, ml.translation_part().0, 0.2);
    rp.compare_values(-1.0, ml.translation_part().1, 0.2);

    let before = mean_abs_diff(&left, &right);
    let out = transform_images(
        &[left, right],
        &[ml, mr],
        CanvasMode::Shrink,
        &WarpOptions::default(),
    )
    .unwrap();
    let after = mean_abs_diff(&out[0], &out[1]);
    eprintln!("mean difference before {before:.2}, after {after:.2}");
    rp.compare_values(1.0, if after < before / 4.0 { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "align_pair regression test failed");
}
