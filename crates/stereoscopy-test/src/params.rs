//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use stereoscopy_core::Image;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results and record failures (default)
    #[default]
    Compare,
    /// Also keep intermediate outputs in the regout directory for
    /// visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "canvas")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "canvas")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN never satisfies `diff <= delta`
        if diff <= delta {
            return true;
        }
        let msg = format!(
            "Failure in {}_reg: value comparison for index {}\n\
             difference = {} but allowed delta = {}\n\
             expected = {}, actual = {}",
            self.test_name, self.index, diff, delta, expected, actual
        );
        self.fail(msg)
    }

    /// Compare two images for exact equality
    ///
    /// Dimensions, color type and every sample must match.
    pub fn compare_images(&mut self, img1: &Image, img2: &Image) -> bool {
        self.compare_images_tolerant(img1, img2, 0)
    }

    /// Compare two images allowing each sample to differ by `max_diff`
    ///
    /// # Returns
    ///
    /// `true` if the images have the same geometry and no sample differs
    /// by more than `max_diff`.
    pub fn compare_images_tolerant(&mut self, img1: &Image, img2: &Image, max_diff: u8) -> bool {
        self.index += 1;

        if img1.dimensions() != img2.dimensions() || img1.color_type() != img2.color_type() {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - geometry mismatch \
                 ({}x{} {:?} vs {}x{} {:?})",
                self.test_name,
                self.index,
                img1.width(),
                img1.height(),
                img1.color_type(),
                img2.width(),
                img2.height(),
                img2.color_type()
            );
            return self.fail(msg);
        }

        let ch = img1.channels();
        let mismatch = img1
            .data()
            .iter()
            .zip(img2.data())
            .position(|(a, b)| a.abs_diff(*b) > max_diff);
        if let Some(pos) = mismatch {
            let px = pos / ch;
            let x = px % img1.width() as usize;
            let y = px / img1.width() as usize;
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - sample mismatch at ({}, {}) \
                 channel {}: {} vs {}",
                self.test_name,
                self.index,
                x,
                y,
                pos % ch,
                img1.data()[pos],
                img2.data()[pos]
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two byte arrays
    ///
    /// # Returns
    ///
    /// `true` if data is identical, `false` otherwise.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 == data2 {
            return true;
        }
        let msg = format!(
            "Failure in {}_reg: string comparison for index {}\n\
             sizes: {} vs {}",
            self.test_name,
            self.index,
            data1.len(),
            data2.len()
        );
        self.fail(msg)
    }

    /// Path of a regression output file for the current test
    ///
    /// The file is named `<test_name>.<index>.<ext>` inside the regout
    /// directory, which is created on demand. Each call advances the index.
    pub fn output_path(&mut self, ext: &str) -> TestResult<String> {
        self.index += 1;
        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::OutputWrite {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        Ok(format!(
            "{}/{}.{:02}.{}",
            dir, self.test_name, self.index, ext
        ))
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
