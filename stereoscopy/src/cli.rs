//! Command line interface
//!
//! `stereoscopy [OPTIONS] LEFT RIGHT [OUT] [OUT2]`
//!
//! Without `OUT` the result is written to standard output, in which case
//! `--format` is required (wiggle output is always GIF). With `OUT2` a
//! side-by-side run writes the two prepared images separately.

use crate::pipeline::{OutputKind, Pipeline, PipelineOutput, SideBySideMode, StereoOptions};
use crate::{PipelineError, PipelineResult};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::{Level, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use stereoscopy_color::{AnaglyphMethod, ColorScheme, LumaCoding};
use stereoscopy_compose::{DEFAULT_WIGGLE_DURATION_MS, Pattern};
use stereoscopy_core::Rgba;
use stereoscopy_io::{
    ImageFormat, WriteOptions, format_from_extension, read_image, write_image, write_image_to,
    write_wiggle_gif, write_wiggle_gif_to,
};
use stereoscopy_transform::{CropBox, Length, Orientation};

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("stereoscopy")
        .about("Convert 2 images into a stereoscopic 3D image")
        .arg(Arg::new("left")
            .value_name("LEFT")
            .help("Left input image")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("right")
            .value_name("RIGHT")
            .help("Right input image")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("out")
            .value_name("OUT")
            .help("Output file. If omitted, output to STDOUT and --format is required")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("out2")
            .value_name("OUT2")
            .help("Second output file for split left and right side-by-side images")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("quality")
            .short('q')
            .long("quality")
            .value_name("VALUE")
            .help("Output image quality: 1-100")
            .value_parser(value_parser!(u8).range(1..=100))
            .default_value("95"))
        .arg(Arg::new("format")
            .short('f')
            .long("format")
            .value_name("FORMAT")
            .help("Output image format: jpg, png, gif. If omitted, taken from the file extension")
            .value_parser(|s: &str| s.parse::<ImageFormat>()))
        .arg(Arg::new("bg")
            .long("bg")
            .value_names(["RED", "GREEN", "BLUE", "ALPHA"])
            .num_args(4)
            .help("Background color and transparency, 0-255 each. Also the divider and border color")
            .value_parser(value_parser!(u8)))
        .arg(Arg::new("border")
            .long("border")
            .value_name("WIDTH")
            .help("Surround the output image with a border of a given width")
            .value_parser(value_parser!(u32))
            .default_value("0"))
        // Side-by-side
        .arg(Arg::new("cross-eye")
            .short('x')
            .long("cross-eye")
            .action(ArgAction::SetTrue)
            .help_heading("SIDE-BY-SIDE")
            .help("Output an image for cross-eyed viewing, right/left (default)"))
        .arg(Arg::new("parallel")
            .short('p')
            .long("parallel")
            .action(ArgAction::SetTrue)
            .help_heading("SIDE-BY-SIDE")
            .help("Output an image for parallel viewing, left/right"))
        .arg(Arg::new("over-under")
            .short('o')
            .long("over-under")
            .action(ArgAction::SetTrue)
            .help_heading("SIDE-BY-SIDE")
            .help("Output an over/under image, left is over"))
        .arg(Arg::new("under-over")
            .short('u')
            .long("under-over")
            .action(ArgAction::SetTrue)
            .help_heading("SIDE-BY-SIDE")
            .help("Output an under/over image, left is under"))
        .arg(Arg::new("squash")
            .short('s')
            .long("squash")
            .action(ArgAction::SetTrue)
            .help_heading("SIDE-BY-SIDE")
            .help("Squash the sides to half their width (cross-eye, parallel) or height (over/under, under/over)"))
        .arg(Arg::new("divider")
            .long("div")
            .value_name("WIDTH")
            .help_heading("SIDE-BY-SIDE")
            .help("Separate the two sides with a divider of a given width")
            .value_parser(value_parser!(u32))
            .default_value("0"))
        // Anaglyph
        .arg(Arg::new("anaglyph")
            .short('a')
            .long("anaglyph")
            .action(ArgAction::SetTrue)
            .help_heading("ANAGLYPH")
            .help("Output an anaglyph image"))
        .arg(Arg::new("anaglyph-method")
            .short('m')
            .long("anaglyph-method")
            .value_name("METHOD")
            .help_heading("ANAGLYPH")
            .help("Anaglyph method: gray, color, half-color, wimmer, dubois. Dubois needs red-cyan, green-magenta or amber-blue")
            .value_parser(|s: &str| s.parse::<AnaglyphMethod>())
            .default_value("wimmer"))
        .arg(Arg::new("color-scheme")
            .long("cs")
            .alias("color-scheme")
            .value_name("SCHEME")
            .help_heading("ANAGLYPH")
            .help("Glasses color scheme: red-green, red-blue, red-cyan, green-magenta, amber-blue, magenta-cyan")
            .value_parser(|s: &str| s.parse::<ColorScheme>())
            .default_value("red-cyan"))
        .arg(Arg::new("luma-coding")
            .long("lc")
            .alias("luma-coding")
            .value_name("CODING")
            .help_heading("ANAGLYPH")
            .help("Luma coding for the gray and half-color methods: rgb, rec601 (PAL/NTSC), rec709 (HDTV)")
            .value_parser(|s: &str| s.parse::<LumaCoding>())
            .default_value("rec709"))
        // Animated
        .arg(Arg::new("wiggle")
            .short('w')
            .long("wiggle")
            .action(ArgAction::SetTrue)
            .help_heading("ANIMATED")
            .help("Output a wiggle GIF image"))
        .arg(Arg::new("duration")
            .short('t')
            .long("duration")
            .value_name("DURATION")
            .help_heading("ANIMATED")
            .help("Total duration of the wiggle animation in milliseconds")
            .value_parser(value_parser!(u32))
            .default_value("300"))
        // Patterned
        .arg(Arg::new("interlaced-h")
            .long("ih")
            .alias("interlaced-h")
            .action(ArgAction::SetTrue)
            .help_heading("PATTERNED")
            .help("Output a horizontally interlaced image"))
        .arg(Arg::new("interlaced-v")
            .long("iv")
            .alias("interlaced-v")
            .action(ArgAction::SetTrue)
            .help_heading("PATTERNED")
            .help("Output a vertically interlaced image"))
        .arg(Arg::new("checkerboard")
            .long("cb")
            .alias("checkerboard")
            .action(ArgAction::SetTrue)
            .help_heading("PATTERNED")
            .help("Output a checkerboard patterned image"))
        .arg(Arg::new("odd")
            .long("odd")
            .action(ArgAction::SetTrue)
            .help_heading("PATTERNED")
            .help("Put the left image on the odd lines/squares instead of the even ones"))
        .arg(Arg::new("pattern-width")
            .long("pw")
            .alias("pattern-width")
            .value_name("WIDTH")
            .help_heading("PATTERNED")
            .help("Width of a line/square of the pattern")
            .value_parser(value_parser!(u32).range(1..))
            .default_value("1"))
        // Preprocessing
        .arg(Arg::new("auto-align")
            .short('A')
            .long("auto-align")
            .action(ArgAction::SetTrue)
            .help_heading("PREPROCESSING")
            .help("Auto align the right image to the left image"))
        .arg(Arg::new("rotate")
            .short('T')
            .long("rotate")
            .value_names(["LEFT", "RIGHT"])
            .num_args(2)
            .allow_negative_numbers(true)
            .help_heading("PREPROCESSING")
            .help("Rotate both images in degrees counter clockwise")
            .value_parser(value_parser!(f64)))
        .arg(Arg::new("shift")
            .short('S')
            .long("shift")
            .value_names(["X", "Y"])
            .num_args(2)
            .allow_negative_numbers(true)
            .help_heading("PREPROCESSING")
            .help("Shift the right image in relation to the left image")
            .value_parser(value_parser!(f64)))
        .arg(Arg::new("expand")
            .short('X')
            .long("expand")
            .action(ArgAction::SetTrue)
            .help_heading("PREPROCESSING")
            .help("Expand the images around the aligned/rotated pictures instead of shrinking them into the overlap"))
        .arg(Arg::new("crop")
            .short('C')
            .long("crop")
            .value_names(["LEFT", "TOP", "RIGHT", "BOTTOM"])
            .num_args(4)
            .help_heading("PREPROCESSING")
            .help("Crop both images in either pixels or percentage")
            .value_parser(|s: &str| s.parse::<Length>()))
        .arg(Arg::new("resize")
            .short('R')
            .long("resize")
            .value_names(["WIDTH", "HEIGHT"])
            .num_args(2)
            .help_heading("PREPROCESSING")
            .help("Resize both images to WIDTHxHEIGHT. A 0 side keeps the aspect ratio")
            .value_parser(value_parser!(u32)))
        .arg(Arg::new("offset")
            .short('O')
            .long("offset")
            .value_name("OFFSET")
            .help_heading("PREPROCESSING")
            .help("Resize offset from top or left in either pixels or percentage")
            .value_parser(|s: &str| s.parse::<Length>())
            .default_value("50%"))
        .arg(Arg::new("orientation")
            .long("orientation")
            .value_names(["LEFT", "RIGHT"])
            .num_args(2)
            .help_heading("PREPROCESSING")
            .help("EXIF orientation values of the left and right image")
            .value_parser(value_parser!(u16)))
        // Logging
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors only"))
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("warn") {
        Level::Warn
    } else {
        Level::Info
    };
    if let Err(e) = simple_logger::init_with_level(log_level) {
        eprintln!("could not set up logging: {e}");
    }
}

/// Where and how the result is written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    /// First output file, `None` for standard output
    pub path: Option<PathBuf>,
    /// Second output file for split side-by-side output
    pub path2: Option<PathBuf>,
    /// Explicit output format
    pub format: Option<ImageFormat>,
}

impl OutputTarget {
    /// Resolve the encoder for one output destination.
    fn format_for(&self, path: Option<&Path>) -> PipelineResult<ImageFormat> {
        self.format
            .or_else(|| path.and_then(format_from_extension))
            .ok_or_else(|| {
                PipelineError::Config(
                    "the output format is required when it cannot be taken from the file name"
                        .to_string(),
                )
            })
    }
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    pub target: OutputTarget,
    pub options: StereoOptions,
}

fn pair<T: Copy + Send + Sync + 'static>(options: &ArgMatches, id: &str) -> Option<[T; 2]> {
    let values: Vec<T> = options.get_many::<T>(id)?.copied().collect();
    <[T; 2]>::try_from(values).ok()
}

fn output_kind(options: &ArgMatches, split: bool) -> OutputKind {
    let left_is_even = !options.get_flag("odd");
    let width = options.get_one::<u32>("pattern-width").copied().unwrap_or(1);
    let pattern = |pattern| OutputKind::Pattern {
        pattern,
        width,
        left_is_even,
    };

    if options.get_flag("anaglyph") {
        OutputKind::Anaglyph {
            method: options
                .get_one::<AnaglyphMethod>("anaglyph-method")
                .copied()
                .unwrap_or_default(),
            scheme: options
                .get_one::<ColorScheme>("color-scheme")
                .copied()
                .unwrap_or_default(),
            luma: options
                .get_one::<LumaCoding>("luma-coding")
                .copied()
                .unwrap_or_default(),
        }
    } else if options.get_flag("interlaced-h") {
        pattern(Pattern::InterlacedHorizontal)
    } else if options.get_flag("interlaced-v") {
        pattern(Pattern::InterlacedVertical)
    } else if options.get_flag("checkerboard") {
        pattern(Pattern::Checkerboard)
    } else if options.get_flag("wiggle") {
        OutputKind::Wiggle {
            duration_ms: options
                .get_one::<u32>("duration")
                .copied()
                .unwrap_or(DEFAULT_WIGGLE_DURATION_MS),
        }
    } else {
        let mode = if options.get_flag("parallel") {
            SideBySideMode::Parallel
        } else if options.get_flag("over-under") {
            SideBySideMode::OverUnder
        } else if options.get_flag("under-over") {
            SideBySideMode::UnderOver
        } else {
            SideBySideMode::CrossEye
        };
        OutputKind::SideBySide {
            mode,
            squash: options.get_flag("squash"),
            divider: options.get_one::<u32>("divider").copied().unwrap_or(0),
            split,
        }
    }
}

/// Turn parsed matches into pipeline options and output targets.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] if a required argument is missing.
pub fn parse_options(options: &ArgMatches) -> PipelineResult<CliArgs> {
    let path = |id: &str| options.get_one::<PathBuf>(id).cloned();
    let left = path("left").ok_or_else(|| PipelineError::Config("missing LEFT".into()))?;
    let right = path("right").ok_or_else(|| PipelineError::Config("missing RIGHT".into()))?;
    let target = OutputTarget {
        path: path("out"),
        path2: path("out2"),
        format: options.get_one::<ImageFormat>("format").copied(),
    };

    let mut stereo = StereoOptions {
        auto_align: options.get_flag("auto-align"),
        expand: options.get_flag("expand"),
        output: output_kind(options, target.path2.is_some()),
        border: options.get_one::<u32>("border").copied().unwrap_or(0),
        quality: options
            .get_one::<u8>("quality")
            .copied()
            .unwrap_or(WriteOptions::default().quality),
        ..Default::default()
    };
    if let Some([x, y]) = pair::<f64>(options, "shift") {
        stereo.shift = (x, y);
    }
    if let Some(angles) = pair::<f64>(options, "rotate") {
        stereo.rotate = angles;
    }
    if let Some(sides) = options.get_many::<Length>("crop") {
        let sides: Vec<Length> = sides.copied().collect();
        if let [left, top, right, bottom] = sides[..] {
            stereo.crop = CropBox::new(left, top, right, bottom);
        }
    }
    if let Some([w, h]) = pair::<u32>(options, "resize") {
        stereo.resize = (w, h);
    }
    if let Some(offset) = options.get_one::<Length>("offset") {
        stereo.offset = *offset;
    }
    if let Some(values) = pair::<u16>(options, "orientation") {
        stereo.orientation = values.map(Orientation::from_exif);
    }
    if let Some(rgba) = options.get_many::<u8>("bg") {
        let rgba: Vec<u8> = rgba.copied().collect();
        if let [r, g, b, a] = rgba[..] {
            stereo.background = Some(Rgba::new(r, g, b, a));
        }
    }

    let needs_format = target.path.is_none() && !matches!(stereo.output, OutputKind::Wiggle { .. });
    if needs_format && target.format.is_none() {
        return Err(PipelineError::Config(
            "either specify the output file name or the format to be used for STDOUT".into(),
        ));
    }

    Ok(CliArgs {
        left,
        right,
        target,
        options: stereo,
    })
}

fn write_still(
    image: &stereoscopy_core::Image,
    path: Option<&Path>,
    target: &OutputTarget,
    options: &WriteOptions,
) -> PipelineResult<()> {
    let format = target.format_for(path)?;
    match path {
        Some(p) => {
            info!("writing {}", p.display());
            write_image(image, p, format, options)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_image_to(image, &mut lock, format, options)?;
            lock.flush().map_err(stereoscopy_io::IoError::from)?;
        }
    }
    Ok(())
}

/// Write a pipeline result to its targets.
pub fn write_output(
    output: &PipelineOutput,
    target: &OutputTarget,
    options: &WriteOptions,
) -> PipelineResult<()> {
    match output {
        PipelineOutput::Still(image) => write_still(image, target.path.as_deref(), target, options),
        PipelineOutput::Pair([first, second]) => {
            write_still(first, target.path.as_deref(), target, options)?;
            write_still(second, target.path2.as_deref(), target, options)
        }
        PipelineOutput::Animation(wiggle) => {
            match target.path.as_deref() {
                Some(p) => {
                    info!("writing {}", p.display());
                    write_wiggle_gif(wiggle, p)?;
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    write_wiggle_gif_to(wiggle, &mut lock)?;
                    lock.flush().map_err(stereoscopy_io::IoError::from)?;
                }
            }
            Ok(())
        }
    }
}

/// Read, process and write according to the command line.
pub fn run(options: &ArgMatches) -> PipelineResult<()> {
    let args = parse_options(options)?;
    info!(
        "reading {} and {}",
        args.left.display(),
        args.right.display()
    );
    let images = [read_image(&args.left)?, read_image(&args.right)?];
    let write_options = args.options.write_options();
    let output = Pipeline::new(args.options).run(images)?;
    write_output(&output, &args.target, &write_options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PipelineResult<CliArgs> {
        let matches = create_cmd_args()
            .try_get_matches_from(std::iter::once("stereoscopy").chain(args.iter().copied()))
            .unwrap();
        parse_options(&matches)
    }

    #[test]
    fn test_command_is_consistent() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["l.jpg", "r.jpg", "out.png"]).unwrap();
        assert_eq!(args.options, StereoOptions::default());
        assert_eq!(args.target.path.as_deref(), Some(Path::new("out.png")));
        assert_eq!(args.target.format_for(Some(Path::new("out.png"))).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_anaglyph_options() {
        let args = parse(&[
            "-a", "-m", "dubois", "--cs", "amber-blue", "l.jpg", "r.jpg", "out.jpg",
        ])
        .unwrap();
        assert_eq!(
            args.options.output,
            OutputKind::Anaglyph {
                method: AnaglyphMethod::Dubois,
                scheme: ColorScheme::AmberBlue,
                luma: LumaCoding::Rec709,
            }
        );
    }

    #[test]
    fn test_preprocessing_options() {
        let args = parse(&[
            "-S", "-4", "2.5", "-T", "1", "-1", "-X", "-C", "10", "5%", "0", "0", "-R", "640",
            "0", "--orientation", "1", "6", "--bg", "255", "255", "255", "128", "l.png",
            "r.png", "o.png",
        ])
        .unwrap();
        let o = &args.options;
        assert_eq!(o.shift, (-4.0, 2.5));
        assert_eq!(o.rotate, [1.0, -1.0]);
        assert!(o.expand);
        assert!(o.needs_transform());
        assert_eq!(o.crop.left, Length::Pixels(10));
        assert_eq!(o.crop.top, Length::Percent(5.0));
        assert_eq!(o.resize, (640, 0));
        assert_eq!(o.orientation, [Orientation::Normal, Orientation::Rotate90Cw]);
        assert_eq!(o.background, Some(Rgba::new(255, 255, 255, 128)));
    }

    #[test]
    fn test_split_and_pattern() {
        let args = parse(&["-p", "--div", "4", "l.png", "r.png", "a.png", "b.png"]).unwrap();
        assert_eq!(
            args.options.output,
            OutputKind::SideBySide {
                mode: SideBySideMode::Parallel,
                squash: false,
                divider: 4,
                split: true,
            }
        );
        let args = parse(&["--cb", "--odd", "--pw", "3", "l.png", "r.png", "o.png"]).unwrap();
        assert_eq!(
            args.options.output,
            OutputKind::Pattern {
                pattern: Pattern::Checkerboard,
                width: 3,
                left_is_even: false,
            }
        );
    }

    #[test]
    fn test_stdout_needs_format() {
        assert!(matches!(
            parse(&["l.png", "r.png"]),
            Err(PipelineError::Config(_))
        ));
        assert!(parse(&["-f", "png", "l.png", "r.png"]).is_ok());
        assert!(parse(&["-w", "l.png", "r.png"]).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cmd = create_cmd_args();
        assert!(cmd.clone().try_get_matches_from(["s", "-m", "sepia", "l", "r", "o"]).is_err());
        assert!(cmd.clone().try_get_matches_from(["s", "-q", "0", "l", "r", "o"]).is_err());
        assert!(cmd.try_get_matches_from(["s", "--pw", "0", "l", "r", "o"]).is_err());
    }
}
