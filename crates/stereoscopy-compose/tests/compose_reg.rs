//! Composition regression test
//!
//! Lays out gradient pairs in every format and checks sizes, color types
//! and that each output pixel comes from the expected input.

use stereoscopy_compose::{Layout, Pattern, Wiggle, patterned, side_by_side};
use stereoscopy_core::{ColorType, Rgba};
use stereoscopy_test::{RegParams, gradient_image, solid_image, two_tone_image};

#[test]
fn compose_reg_side_by_side() {
    let mut rp = RegParams::new("compose_sbs");

    let left = gradient_image(10, 10, ColorType::Rgb).unwrap();
    let right = two_tone_image(10, 10, ColorType::Rgb, Rgba::BLACK, Rgba::WHITE).unwrap();
    let out = side_by_side(&left, &right, Layout::Horizontal, 0, Rgba::TRANSPARENT).unwrap();
    rp.compare_values(20.0, out.width() as f64, 0.0);
    rp.compare_values(10.0, out.height() as f64, 0.0);
    rp.compare_images(&left, &out.clip_rectangle(0, 0, 10, 10).unwrap());
    rp.compare_images(&right, &out.clip_rectangle(10, 0, 10, 10).unwrap());

    let out = side_by_side(&left, &right, Layout::Vertical, 3, Rgba::WHITE).unwrap();
    rp.compare_values(10.0, out.width() as f64, 0.0);
    rp.compare_values(23.0, out.height() as f64, 0.0);
    rp.compare_values(4.0, out.channels() as f64, 0.0);
    rp.compare_images(&right.to_rgba(), &out.clip_rectangle(0, 13, 10, 10).unwrap());

    assert!(rp.cleanup(), "compose_sbs regression test failed");
}

#[test]
fn compose_reg_patterns() {
    let mut rp = RegParams::new("compose_patterns");

    let white = solid_image(12, 8, ColorType::Rgb, Rgba::WHITE).unwrap();
    let black = solid_image(12, 8, ColorType::Rgb, Rgba::BLACK).unwrap();
    for pattern in [
        Pattern::InterlacedHorizontal,
        Pattern::InterlacedVertical,
        Pattern::Checkerboard,
    ] {
        for width in [1, 2, 3] {
            for left_is_even in [true, false] {
                let out = patterned(&white, &black, pattern, width, left_is_even).unwrap();
                let mut wrong = 0;
                for y in 0..out.height() {
                    for x in 0..out.width() {
                        let from_left = pattern.is_even(x, y, width) == left_is_even;
                        let expected = if from_left { Rgba::WHITE } else { Rgba::BLACK };
                        if out.get_rgba(x, y).unwrap() != expected {
                            wrong += 1;
                        }
                    }
                }
                rp.compare_values(0.0, wrong as f64, 0.0);
            }
        }
    }

    assert!(rp.cleanup(), "compose_patterns regression test failed");
}

#[test]
fn compose_reg_wiggle() {
    let mut rp = RegParams::new("compose_wiggle");

    let a = gradient_image(8, 8, ColorType::Rgb).unwrap();
    let b = solid_image(8, 8, ColorType::Rgb, Rgba::BLACK).unwrap();
    let w = Wiggle::new(vec![a.clone(), b.clone(), a.clone()], 300).unwrap();
    rp.compare_values(4.0, w.frames().len() as f64, 0.0);
    rp.compare_values(75.0, w.delay_ms() as f64, 0.0);
    rp.compare_images(&b, &w.frames()[3]);

    assert!(rp.cleanup(), "compose_wiggle regression test failed");
}
