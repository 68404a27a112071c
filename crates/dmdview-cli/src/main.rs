use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dmdview_core::{LedMatrix, LedShape, ReplayOptions, Report};
use glob::glob;
use tracing::Level;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("DMDVIEW_BUILD_COMMIT"),
    ", ",
    env!("DMDVIEW_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  dmdview replay capture/*.bin -o report.json\n  dmdview replay 0001.bin 0002.bin --stdout --pretty\n  dmdview replay 'capture/*.bin' --stdout --no-led --pixels";

#[derive(Parser, Debug)]
#[command(name = "dmdview")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Replays recorded dmdext messages through a virtual dot-matrix display.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode and render message files in order, then write a JSON report.
    #[command(after_help = EXAMPLES)]
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Message files (one dmdext message per file) or glob patterns
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every state change and dropped frame
    #[arg(short, long)]
    verbose: bool,

    /// LED block size in raster pixels, as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", default_value = "2x2", value_parser = parse_led_size)]
    led_size: (u32, u32),

    /// Raster pixels between LED blocks
    #[arg(long, value_name = "N", default_value_t = 1)]
    led_margin: u32,

    /// Draw one raster pixel per dot
    #[arg(long, conflicts_with_all = ["led_size", "round"])]
    no_led: bool,

    /// Leave the corners of each LED block dark
    #[arg(long)]
    round: bool,

    /// Background colour as RRGGBB
    #[arg(long, value_name = "RRGGBB", default_value = "000000", value_parser = parse_colour)]
    background: u32,

    /// BGR image (128x32) to show before the first message
    #[arg(long, value_name = "FILE")]
    opening: Option<PathBuf>,

    /// Include every raster row as hex in the report
    #[arg(long)]
    pixels: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay(args) => {
            init_logging(args.quiet, args.verbose);
            cmd_replay(args)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_replay(args: ReplayArgs) -> Result<(), CliError> {
    let inputs = resolve_inputs(&args.inputs)?;
    if let Some(report_path) = args.report.as_ref() {
        ensure_report_differs(report_path, &inputs)?;
    }

    let options = replay_options(&args)?;
    let rep = dmdview_core::replay_files(&inputs, &options).context("replay failed")?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    if args.stdout {
        print!("{}", json);
        return Ok(());
    }

    let report = args.report.ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--report or --stdout".to_string()),
        )
    })?;
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !args.quiet {
        eprintln!(
            "OK: {} messages, {} frames rendered; report written -> {}",
            rep.messages.len(),
            rep.session.frames_rendered,
            report.display()
        );
    }
    Ok(())
}

fn replay_options(args: &ReplayArgs) -> Result<ReplayOptions, CliError> {
    let led = if args.no_led {
        LedMatrix::disabled()
    } else {
        let (width, height) = args.led_size;
        let shape = if args.round {
            LedShape::Round
        } else {
            LedShape::Square
        };
        LedMatrix::new(width, height, args.led_margin, true).with_shape(shape)
    };

    let opening_frame = args
        .opening
        .as_ref()
        .map(|path| {
            fs::read(path).map_err(|err| {
                CliError::new(
                    format!("failed to read opening frame {}: {}", path.display(), err),
                    Some("pass a raw BGR file of 128x32 pixels (12288 bytes)".to_string()),
                )
            })
        })
        .transpose()?;

    Ok(ReplayOptions {
        led,
        background: args.background,
        opening_frame,
        include_pixels: args.pixels,
    })
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn parse_led_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid LED width '{}'", width))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid LED height '{}'", height))?;
    if width == 0 || height == 0 {
        return Err("LED size must be at least 1x1".to_string());
    }
    Ok((width, height))
}

fn parse_colour(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches('#');
    if digits.len() != 6 {
        return Err(format!("expected six hex digits, got '{}'", value));
    }
    u32::from_str_radix(digits, 16).map_err(|_| format!("invalid colour '{}'", value))
}

fn ensure_report_differs(report_path: &Path, inputs: &[PathBuf]) -> Result<(), CliError> {
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // A missing output directory is created later and cannot hold an input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| CliError::new(format!("invalid report path: {}", report_path.display()), None))?;
    let report_target = report_dir.join(file_name);

    for input in inputs {
        let input_abs = fs::canonicalize(input)
            .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
        if report_target == input_abs {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(())
}

fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut resolved = Vec::new();
    for input in inputs {
        let pattern = input.to_string_lossy();
        if is_glob_pattern(&pattern) {
            resolved.extend(expand_pattern(&pattern)?);
        } else {
            validate_input_file(input)?;
            resolved.push(input.clone());
        }
    }
    Ok(resolved)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    let paths = glob(pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    matches.sort();
    Ok(matches)
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass recorded message files, one dmdext message per file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass message files, or a quoted glob such as 'capture/*.bin'".to_string()),
        ));
    }
    Ok(())
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::{parse_colour, parse_led_size};

    #[test]
    fn led_size_parses_both_separators() {
        assert_eq!(parse_led_size("2x2"), Ok((2, 2)));
        assert_eq!(parse_led_size("4X3"), Ok((4, 3)));
        assert!(parse_led_size("4").is_err());
        assert!(parse_led_size("0x2").is_err());
    }

    #[test]
    fn colour_accepts_optional_hash() {
        assert_eq!(parse_colour("ff4500"), Ok(0xFF4500));
        assert_eq!(parse_colour("#000000"), Ok(0));
        assert!(parse_colour("fff").is_err());
        assert!(parse_colour("zzzzzz").is_err());
    }
}
