// ============================================================================
// PIXELVIEW CLI — headless image → pixel grid conversion
// ============================================================================
//
// Usage examples:
//   pixelview --input sprite.png --output sprite.json
//   pixelview -i photo.jpg --width 32 --square -o thumb.png --cell-size 8
//   pixelview -i "art/*.png" --width 16 --output-dir grids/
//   pixelview -i https://example.com/sprite.png --width 24 -o sprite.json
//
// No window is opened in CLI mode; every file is processed synchronously on
// the calling thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::io::{ImageSource, is_url, load_pixels_sync};
use crate::ops::{encode_png, fit_square, grid_to_image};

/// Largest `--width` accepted.
const MAX_WIDTH: i64 = 4096;

/// Convert images to pixel grids without opening the viewer.
#[derive(Parser, Debug)]
#[command(
    name = "pixelview",
    about = "Convert images into pixel-art grids",
    long_about = "Decode images, optionally box-downscale them to a target width and\n\
                  square them, then write the result as a JSON grid of\n\
                  \"rgba(r, g, b, a)\" cells or as a PNG.\n\n\
                  Example:\n  \
                  pixelview -i photo.png --width 32 --square -o photo.json"
)]
pub struct CliArgs {
    /// Input file(s) or image URL(s). Glob patterns accepted (e.g. "*.png", "art/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Resample to this many columns (aspect ratio preserved, 1-4096).
    #[arg(short, long, value_name = "COLUMNS", value_parser = clap::value_parser!(u32).range(1..=MAX_WIDTH))]
    pub width: Option<u32>,

    /// Pad or crop the grid toward a square.
    #[arg(long)]
    pub square: bool,

    /// Output file path. Only valid for single-file input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format: json or png. Inferred from --output's extension, defaulting to json.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Pixels per cell for PNG output.
    #[arg(long, default_value_t = 1, value_name = "PX")]
    pub cell_size: u32,

    /// Print per-file progress and timing.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process arguments.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--input" || a == "-i")
    }
}

/// Output encoding for converted grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Png => "png",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let format = match parse_format(args.format.as_deref(), args.output.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &args.output_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!(
            "error: could not create output directory '{}': {}",
            dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, source) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, source.describe());
        }
        let file_start = Instant::now();

        let output_path = match build_output_path(
            &output_base(source),
            args.output.as_deref(),
            args.output_dir.as_deref(),
            format,
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    source.describe()
                );
                any_failure = true;
                continue;
            }
        };

        match run_one(source, &output_path, &args, format) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-file pipeline
// ============================================================================

fn run_one(
    source: &ImageSource,
    output: &Path,
    args: &CliArgs,
    format: OutputFormat,
) -> Result<(), String> {
    let mut grid = load_pixels_sync(source, args.width)
        .map_err(|e| format!("load failed: {}", e))?;

    if args.square {
        grid = fit_square(&grid).map_err(|e| format!("square failed: {}", e))?;
    }

    let bytes = match format {
        OutputFormat::Json => serde_json::to_vec(&grid)
            .map_err(|e| format!("save failed: {}", e))?,
        OutputFormat::Png => grid_to_image(&grid, args.cell_size)
            .and_then(|img| encode_png(&img))
            .map_err(|e| format!("save failed: {}", e))?,
    };

    std::fs::write(output, bytes).map_err(|e| format!("save failed: {}", e))
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
/// URLs are passed through untouched.
fn resolve_inputs(patterns: &[String]) -> Vec<ImageSource> {
    let mut urls: Vec<String> = Vec::new();
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut result: Vec<ImageSource> = Vec::new();

    for pattern in patterns {
        if is_url(pattern) {
            if !urls.contains(pattern) {
                urls.push(pattern.clone());
                result.push(ImageSource::from_input(pattern));
            }
            continue;
        }

        let as_path = Path::new(pattern);
        if as_path.exists() {
            if !paths.iter().any(|p| p.as_path() == as_path) {
                paths.push(as_path.to_path_buf());
                result.push(ImageSource::Path(as_path.to_path_buf()));
            }
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !paths.contains(&entry) {
                        paths.push(entry.clone());
                        result.push(ImageSource::Path(entry));
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => eprintln!("warning: invalid glob '{}': {}", pattern, e),
        }
    }

    result
}

/// Path the output name is derived from: the file itself, or a URL's last
/// path segment (relative, so it lands in the working directory).
fn output_base(source: &ImageSource) -> PathBuf {
    match source {
        ImageSource::Path(p) => p.clone(),
        ImageSource::Url(url) => {
            let name = url
                .split(['?', '#'])
                .next()
                .and_then(|u| u.trim_end_matches('/').rsplit('/').next())
                .filter(|seg| !seg.is_empty() && !seg.contains(':'))
                .unwrap_or("download");
            PathBuf::from(name)
        }
        ImageSource::Bytes(_) => PathBuf::from("pixels"),
    }
}

/// Pick the output format from `--format`, else the output extension, else JSON.
fn parse_format(format_arg: Option<&str>, output: Option<&Path>) -> Result<OutputFormat, String> {
    if let Some(f) = format_arg {
        return OutputFormat::from_name(f)
            .ok_or_else(|| format!("unknown format '{}' (expected json or png)", f));
    }
    let inferred = output
        .and_then(|out| out.extension())
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_name);
    Ok(inferred.unwrap_or(OutputFormat::Json))
}

/// Compute the output path for a single input file.
///
/// Priority: `--output`, then `--output-dir/<stem>.<ext>`, then
/// `<stem>.<ext>` next to the input (`<stem>_out.<ext>` if that is the input).
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let ext = format.extension();
    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("{}.{}", stem, ext)));
    }

    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("{}.{}", stem, ext));
    if candidate == input {
        Some(parent.join(format!("{}_out.{}", stem, ext)))
    } else {
        Some(candidate)
    }
}
