use crate::{
    mmvz::{
        params::{Layout, Margins, DEFAULT_DURATION, DEFAULT_HEIGHT, DEFAULT_WIDTH, PLOT_FOOTER},
        view_state::{ViewMode, ViewState},
    },
    utils::Result,
};
use chrono::Datelike;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use owo_colors::{
    colors::{Blue, Green, Magenta, Red, Yellow},
    OwoColorize, Stream, Style,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub const FULL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name="mmvz",
          version=FULL_VERSION,
          about="Primer mismatch histogram viewer",
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) {}. This program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Enable or disable color output in logging
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true, help_heading = "Advanced")]
    color: Color,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Render one settled frame to SVG")]
    Plot(PlotArgs),
    #[clap(about = "Replay a script of interaction events, writing a frame per event")]
    Replay(ReplayArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Plot(_) => "plot",
            Command::Replay(_) => "replay",
        }
    }
}

/// The three tables loaded at startup
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Table of mismatches per genome position
    #[arg(
        short = 'm',
        long = "mismatches",
        value_name = "CSV",
        value_parser = check_file_exists,
        required = true
    )]
    pub mismatches: PathBuf,

    /// Table of forward primers
    #[arg(
        short = 'f',
        long = "forwards",
        value_name = "CSV",
        value_parser = check_file_exists,
        required = true
    )]
    pub forwards: PathBuf,

    /// Table of reverse primers
    #[arg(
        short = 'r',
        long = "reverses",
        value_name = "CSV",
        value_parser = check_file_exists,
        required = true
    )]
    pub reverses: PathBuf,
}

/// Initial selection; unset primers default to the first row of their table
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Forward primer name
    #[arg(long = "forward", value_name = "NAME")]
    pub forward: Option<String>,

    /// Reverse primer name
    #[arg(long = "reverse", value_name = "NAME")]
    pub reverse: Option<String>,

    /// View mode (Default, Forward, Reverse or Full Genome)
    #[arg(
        long = "view",
        value_name = "VIEW",
        default_value = "Default",
        value_parser = parse_view_mode
    )]
    pub view: ViewMode,
}

impl SelectionArgs {
    /// Overrides the defaults of `initial` with whatever was given on the command line
    pub fn apply(&self, initial: ViewState) -> ViewState {
        ViewState {
            forward: self.forward.clone().or(initial.forward),
            reverse: self.reverse.clone().or(initial.reverse),
            mode: self.view,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Organism named in the title
    #[arg(
        long = "organism",
        value_name = "ORGANISM",
        default_value = "SARS-CoV-2",
        help_heading = "Plotting"
    )]
    pub organism: String,

    /// Font family to use for text elements
    #[arg(long = "font-family", value_name = "FONT", help_heading = "Plotting")]
    pub font_family: Option<String>,

    /// Viewport width in pixels
    #[arg(
        long = "width",
        value_name = "PIXELS",
        default_value_t = DEFAULT_WIDTH,
        value_parser = positive_float,
        help_heading = "Advanced"
    )]
    pub width: f64,

    /// Viewport height in pixels
    #[arg(
        long = "height",
        value_name = "PIXELS",
        default_value_t = DEFAULT_HEIGHT,
        value_parser = positive_float,
        help_heading = "Advanced"
    )]
    pub height: f64,

    /// Transition duration in milliseconds
    #[arg(
        long = "duration",
        value_name = "MS",
        default_value_t = DEFAULT_DURATION,
        value_parser = non_negative_float,
        help_heading = "Advanced"
    )]
    pub duration: f64,
}

impl StyleArgs {
    pub fn layout(&self) -> Layout {
        Layout {
            width: self.width,
            height: self.height,
            margins: Margins::default(),
            duration: self.duration,
        }
    }

    pub fn preflight(&self) -> Result<()> {
        check_layout(&self.layout())
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct PlotArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output image path
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    #[command(flatten)]
    pub style: StyleArgs,
}

impl PlotArgs {
    pub fn preflight(&self) -> Result<()> {
        self.style.preflight()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct ReplayArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Event script, one event per line (forward NAME, reverse NAME, view MODE, hover POSITION, leave, wait MS)
    #[arg(
        short = 's',
        long = "script",
        value_name = "SCRIPT",
        value_parser = check_file_exists,
        required = true
    )]
    pub script: PathBuf,

    /// Prefix for the output frames (PREFIX.000.svg, PREFIX.001.svg, ...)
    #[arg(
        short = 'o',
        long = "output-prefix",
        value_name = "OUTPUT_PREFIX",
        value_parser = check_prefix_path,
        required = true
    )]
    pub output_prefix: PathBuf,

    /// Let transitions run to completion before each frame is written
    #[arg(long = "settle", help_heading = "Plotting")]
    pub settle: bool,

    #[command(flatten)]
    pub style: StyleArgs,
}

impl ReplayArgs {
    pub fn preflight(&self) -> Result<()> {
        self.style.preflight()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Color {
    Always,
    Auto,
    Never,
}

impl Color {
    fn apply(self) {
        match self {
            Color::Always => owo_colors::set_override(true),
            Color::Auto => {}
            Color::Never => owo_colors::set_override(false),
        }
    }
}

pub fn init_verbose(args: &Cli) {
    args.color.apply();

    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(format_log)
        .filter_level(filter_level)
        .init();
}

#[inline(always)]
fn level_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::Error => ("ERROR", Style::new().fg::<Red>().bold()),
        Level::Warn => ("WARN", Style::new().fg::<Yellow>()),
        Level::Info => ("INFO", Style::new().fg::<Green>()),
        Level::Debug => ("DEBUG", Style::new().fg::<Blue>()),
        Level::Trace => ("TRACE", Style::new().fg::<Magenta>()),
    }
}

fn format_log(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let (label, style) = level_style(record.level());
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let painted_label = label.if_supports_color(Stream::Stderr, |t| style.style(t));
    writeln!(buf, "{ts} [{}] - {}", painted_label, record.args())
}

fn check_layout(layout: &Layout) -> Result<()> {
    let margins = &layout.margins;
    if layout.width <= margins.left + margins.right {
        return Err(format!(
            "Width {} leaves no room between the left and right margins",
            layout.width
        ));
    }
    if layout.height <= margins.top + margins.bottom + PLOT_FOOTER {
        return Err(format!(
            "Height {} leaves no room for the histogram above the primer and sequence tracks",
            layout.height
        ));
    }
    Ok(())
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(PathBuf::from(s))
}

fn check_image_path(s: &str) -> Result<PathBuf> {
    let prefix_check = check_prefix_path(s)?;
    let path = Path::new(s);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") => Ok(prefix_check),
        _ => Err("Image must have an extension of .svg".to_string()),
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn parse_view_mode(s: &str) -> Result<ViewMode> {
    s.parse()
}

fn positive_float(s: &str) -> Result<f64> {
    let value = non_negative_float(s)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("The value must be greater than 0, got: {}", value))
    }
}

fn non_negative_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !value.is_finite() || value < 0.0 {
        Err(format!("The value must be a finite number >= 0, got: {}", value))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_arguments_parse() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("table.csv");
        std::fs::write(&table, "name\n").unwrap();
        let table = table.to_str().unwrap();
        let image = dir.path().join("out.svg");

        let cli = Cli::try_parse_from([
            "mmvz",
            "plot",
            "-m",
            table,
            "-f",
            table,
            "-r",
            table,
            "--reverse",
            "R2",
            "--view",
            "full genome",
            "-o",
            image.to_str().unwrap(),
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbosity, 2);
        match cli.command {
            Command::Plot(args) => {
                assert_eq!(args.selection.view, ViewMode::FullGenome);
                assert_eq!(args.style.layout(), Layout::default());
                let state = args.selection.apply(ViewState::new("F1", "R1", ViewMode::Default));
                assert_eq!(state, ViewState::new("F1", "R2", ViewMode::FullGenome));
                assert!(args.preflight().is_ok());
            }
            Command::Replay(_) => panic!("expected the plot command"),
        }
    }

    #[test]
    fn image_must_be_svg() {
        assert!(check_image_path("frame.svg").is_ok());
        assert_eq!(
            check_image_path("frame.png"),
            Err("Image must have an extension of .svg".to_string())
        );
    }

    #[test]
    fn missing_parent_directory_is_rejected() {
        assert!(check_prefix_path("frames").is_ok());
        assert!(check_prefix_path("/definitely/not/here/frames").is_err());
    }

    #[test]
    fn float_validation() {
        assert_eq!(positive_float("1200"), Ok(1200.0));
        assert!(positive_float("0").is_err());
        assert_eq!(non_negative_float("0"), Ok(0.0));
        assert!(non_negative_float("-5").is_err());
        assert!(non_negative_float("inf").is_err());
        assert!(non_negative_float("wide").is_err());
    }

    #[test]
    fn cramped_layout_is_rejected() {
        let layout = Layout {
            height: 120.0,
            ..Layout::default()
        };
        assert!(check_layout(&layout).is_err());
        assert!(check_layout(&Layout::default()).is_ok());
    }
}
