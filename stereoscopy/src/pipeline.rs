//! The stereo pipeline
//!
//! Turns a decoded stereo pair into the requested output in fixed stages:
//!
//! 1. Orientation correction of each image
//! 2. Size check: both images must match
//! 3. Alignment, shift and rotation on a shared canvas (only when
//!    requested)
//! 4. Cropping and resizing of both images
//! 5. Composition into the output format
//! 6. Border and background compositing of every output image
//!
//! The pipeline never touches the file system; decoding and encoding are
//! up to the caller.

use crate::{PipelineError, PipelineResult};
use log::info;
use stereoscopy_color::{AnaglyphMethod, ColorScheme, LumaCoding, create_anaglyph};
use stereoscopy_compose::{
    DEFAULT_WIGGLE_DURATION_MS, Layout, Pattern, Wiggle, patterned, side_by_side,
};
use stereoscopy_core::{Image, Rgba, composite_over};
use stereoscopy_io::WriteOptions;
use stereoscopy_transform::{
    AffineMatrix, AlignmentEstimator, CanvasMode, CropBox, EccEstimator, Length, Orientation,
    TermCriteria, WarpOptions, apply_adjustments, apply_orientation, crop, find_alignments,
    resize, squash, transform_images,
};

/// Side-by-side viewing method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SideBySideMode {
    /// Right image on the left, for cross-eyed viewing
    #[default]
    CrossEye,
    /// Left image on the left, for parallel viewing
    Parallel,
    /// Left image on top
    OverUnder,
    /// Left image at the bottom
    UnderOver,
}

impl SideBySideMode {
    /// Join direction
    pub fn layout(self) -> Layout {
        match self {
            SideBySideMode::CrossEye | SideBySideMode::Parallel => Layout::Horizontal,
            SideBySideMode::OverUnder | SideBySideMode::UnderOver => Layout::Vertical,
        }
    }

    /// Whether the right image comes first
    pub fn reversed(self) -> bool {
        matches!(self, SideBySideMode::CrossEye | SideBySideMode::UnderOver)
    }
}

/// What the pipeline produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputKind {
    /// Both images next to each other, or written separately with `split`
    SideBySide {
        mode: SideBySideMode,
        /// Halve each image along the join direction
        squash: bool,
        /// Divider width in pixels
        divider: u32,
        /// Return the two prepared images instead of joining them
        split: bool,
    },
    /// Color anaglyph
    Anaglyph {
        method: AnaglyphMethod,
        scheme: ColorScheme,
        luma: LumaCoding,
    },
    /// Interlaced or checkerboard image
    Pattern {
        pattern: Pattern,
        /// Cell width in pixels
        width: u32,
        /// Whether the left image owns the even cells
        left_is_even: bool,
    },
    /// Looping animation
    Wiggle {
        /// Duration of one full loop in milliseconds
        duration_ms: u32,
    },
}

impl Default for OutputKind {
    fn default() -> Self {
        OutputKind::SideBySide {
            mode: SideBySideMode::CrossEye,
            squash: false,
            divider: 0,
            split: false,
        }
    }
}

impl OutputKind {
    /// Anaglyph with the default wimmer method, red-cyan glasses and
    /// Rec. 709 luma
    pub fn anaglyph() -> Self {
        OutputKind::Anaglyph {
            method: AnaglyphMethod::default(),
            scheme: ColorScheme::default(),
            luma: LumaCoding::default(),
        }
    }

    /// Pattern with 1 pixel cells, left image on the even cells
    pub fn pattern(pattern: Pattern) -> Self {
        OutputKind::Pattern {
            pattern,
            width: 1,
            left_is_even: true,
        }
    }

    /// Wiggle with the default loop duration
    pub fn wiggle() -> Self {
        OutputKind::Wiggle {
            duration_ms: DEFAULT_WIGGLE_DURATION_MS,
        }
    }
}

/// Stereo pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StereoOptions {
    /// EXIF-derived correction for the left and right image
    pub orientation: [Orientation; 2],
    /// Shift of the right image relative to the left, split between both
    pub shift: (f64, f64),
    /// Counter-clockwise rotation of the left and right image, in degrees
    pub rotate: [f64; 2],
    /// Estimate the alignment of the right image to the left
    pub auto_align: bool,
    /// Estimator stopping rule
    pub criteria: TermCriteria,
    /// Expand the canvas around the transformed pictures instead of
    /// shrinking it into their overlap
    pub expand: bool,
    /// Crop applied to both images
    pub crop: CropBox,
    /// Target size; a zero side keeps the aspect ratio
    pub resize: (u32, u32),
    /// Offset of the resize crop window from the top or left
    pub offset: Length,
    /// Output format
    pub output: OutputKind,
    /// Border width around every output image
    pub border: u32,
    /// Background for transparent areas, also used for the divider and
    /// border
    pub background: Option<Rgba>,
    /// Encoder quality, 1 to 100
    pub quality: u8,
}

impl Default for StereoOptions {
    fn default() -> Self {
        Self {
            orientation: [Orientation::Normal; 2],
            shift: (0.0, 0.0),
            rotate: [0.0; 2],
            auto_align: false,
            criteria: TermCriteria::default(),
            expand: false,
            crop: CropBox::default(),
            resize: (0, 0),
            offset: Length::Percent(50.0),
            output: OutputKind::default(),
            border: 0,
            background: None,
            quality: WriteOptions::default().quality,
        }
    }
}

impl StereoOptions {
    /// Whether stage 3 (shared canvas) runs
    pub fn needs_transform(&self) -> bool {
        self.auto_align || self.shift != (0.0, 0.0) || self.rotate.iter().any(|&a| a != 0.0)
    }

    /// Canvas mode for stage 3
    pub fn canvas_mode(&self) -> CanvasMode {
        if self.expand {
            CanvasMode::Expand
        } else {
            CanvasMode::Shrink
        }
    }

    /// Color for the divider and border
    pub fn frame_color(&self) -> Rgba {
        self.background.unwrap_or(Rgba::TRANSPARENT)
    }

    /// Encoder settings
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            quality: self.quality,
        }
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub enum PipelineOutput {
    /// A single image
    Still(Image),
    /// Two separate images, in output order
    Pair([Image; 2]),
    /// A looping animation
    Animation(Wiggle),
}

/// The stereo pipeline: options plus the alignment estimator.
pub struct Pipeline {
    options: StereoOptions,
    estimator: Box<dyn AlignmentEstimator>,
}

impl Pipeline {
    /// Create a pipeline with the built-in estimator.
    pub fn new(options: StereoOptions) -> Self {
        Self::with_estimator(options, Box::new(EccEstimator))
    }

    /// Create a pipeline with a custom alignment estimator.
    pub fn with_estimator(options: StereoOptions, estimator: Box<dyn AlignmentEstimator>) -> Self {
        Self { options, estimator }
    }

    /// The pipeline configuration
    pub fn options(&self) -> &StereoOptions {
        &self.options
    }

    /// Run every stage on a `[left, right]` pair.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Core`] if the oriented images differ in
    /// size, and the error of the first failing stage otherwise.
    pub fn run(&self, images: [Image; 2]) -> PipelineResult<PipelineOutput> {
        let opts = &self.options;
        let [left, right] = images;
        let left = apply_orientation(&left, opts.orientation[0])?;
        let right = apply_orientation(&right, opts.orientation[1])?;
        left.check_same_size(&right)?;
        info!("stereo pair {}x{}", left.width(), left.height());

        let [left, right] = self.align([left, right])?;
        let [left, right] = self.crop_and_resize([left, right])?;
        self.compose(left, right)
    }

    fn align(&self, pair: [Image; 2]) -> PipelineResult<[Image; 2]> {
        let opts = &self.options;
        if !opts.needs_transform() {
            return Ok(pair);
        }
        let base = if opts.auto_align {
            info!("auto aligning");
            find_alignments(&pair[0], &pair[1], self.estimator.as_ref(), &opts.criteria)?
        } else {
            [AffineMatrix::identity(); 2]
        };
        let sizes = [pair[0].dimensions(), pair[1].dimensions()];
        let matrices = apply_adjustments(&base, opts.shift, opts.rotate, sizes);
        info!(
            "transforming: shift {:?}, rotation {:?}, {:?} canvas",
            opts.shift,
            opts.rotate,
            opts.canvas_mode()
        );
        let out = transform_images(
            &pair,
            &matrices,
            opts.canvas_mode(),
            &WarpOptions::default(),
        )?;
        <[Image; 2]>::try_from(out)
            .map_err(|v| PipelineError::Config(format!("expected 2 images, got {}", v.len())))
    }

    fn crop_and_resize(&self, pair: [Image; 2]) -> PipelineResult<[Image; 2]> {
        let opts = &self.options;
        let [mut left, mut right] = pair;
        if !opts.crop.is_empty() {
            info!("cropping {:?}", opts.crop);
            left = crop(&left, &opts.crop)?;
            right = crop(&right, &opts.crop)?;
        }
        if opts.resize != (0, 0) {
            info!("resizing to {:?}, offset {}", opts.resize, opts.offset);
            left = resize(&left, opts.resize, &opts.offset)?;
            right = resize(&right, opts.resize, &opts.offset)?;
        }
        Ok([left, right])
    }

    fn compose(&self, left: Image, right: Image) -> PipelineResult<PipelineOutput> {
        let opts = &self.options;
        match opts.output {
            OutputKind::Anaglyph {
                method,
                scheme,
                luma,
            } => {
                info!("anaglyph: {} / {} / {}", method, scheme, luma);
                let out = create_anaglyph(&left, &right, method, scheme, luma)?;
                Ok(PipelineOutput::Still(self.finish(out)?))
            }
            OutputKind::Pattern {
                pattern,
                width,
                left_is_even,
            } => {
                info!("pattern: {:?}, width {}", pattern, width);
                let out = patterned(&left, &right, pattern, width, left_is_even)?;
                Ok(PipelineOutput::Still(self.finish(out)?))
            }
            OutputKind::Wiggle { duration_ms } => {
                info!("wiggle: {} ms loop", duration_ms);
                let frames = vec![self.finish(left)?, self.finish(right)?];
                Ok(PipelineOutput::Animation(Wiggle::new(frames, duration_ms)?))
            }
            OutputKind::SideBySide {
                mode,
                squash: squashed,
                divider,
                split,
            } => {
                info!("side by side: {:?}", mode);
                let layout = mode.layout();
                let (mut first, mut second) = if mode.reversed() {
                    (right, left)
                } else {
                    (left, right)
                };
                if squashed {
                    let horizontal = layout == Layout::Horizontal;
                    first = squash(&first, horizontal)?;
                    second = squash(&second, horizontal)?;
                }
                if split {
                    return Ok(PipelineOutput::Pair([
                        self.finish(first)?,
                        self.finish(second)?,
                    ]));
                }
                let out = side_by_side(&first, &second, layout, divider, opts.frame_color())?;
                Ok(PipelineOutput::Still(self.finish(out)?))
            }
        }
    }

    /// Border, then background compositing of transparent results.
    fn finish(&self, image: Image) -> PipelineResult<Image> {
        let opts = &self.options;
        let image = if opts.border > 0 {
            image.add_border(opts.border, opts.frame_color())?
        } else {
            image
        };
        Ok(match opts.background {
            Some(bg) if image.has_alpha() => composite_over(&image, bg),
            _ => image,
        })
    }
}
