use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show the final verdict
    Quiet,
    /// Show issues and summary
    #[default]
    Normal,
    /// Also log progress through the checking phases
    Verbose,
    /// Show all available debugging information
    Debug,
}

impl VerbosityLevel {
    /// Log filter used when `RUST_LOG` is not set
    pub fn log_filter(&self) -> log::LevelFilter {
        match self {
            VerbosityLevel::Quiet => log::LevelFilter::Error,
            VerbosityLevel::Normal => log::LevelFilter::Warn,
            VerbosityLevel::Verbose => log::LevelFilter::Info,
            VerbosityLevel::Debug => log::LevelFilter::Debug,
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Issues with source context and correction tips
    #[default]
    Human,
    /// Machine-readable JSON report
    Json,
}

/// When to use ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Check XML documents for well-formedness and common authoring mistakes
#[derive(Parser, Debug, Clone)]
#[command(name = "xmlcheck")]
#[command(
    about = "Check an XML file or URL for well-formedness, broken CDATA sections, control characters, bad hex colors and SVG mistakes"
)]
#[command(version)]
pub struct Cli {
    /// Local path or http(s) URL of the XML document
    #[arg(help = "XML file or http(s) URL to check")]
    pub source: String,

    /// Maximum number of issues to report (0 for all)
    #[arg(short = 'm', long = "max-errors")]
    pub max_errors: Option<usize>,

    /// Enable debug output
    #[arg(long = "debug")]
    pub debug: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Only print the verdict
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with_all = ["verbose", "debug"]
    )]
    pub quiet: bool,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// When to use colors
    #[arg(long = "color", value_enum)]
    pub color: Option<ColorChoice>,

    /// Disable colors (same as --color never)
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Lines of context shown before and after each issue
    #[arg(long = "context-lines")]
    pub context_lines: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Do not print correction tips
    #[arg(long = "no-tips")]
    pub no_tips: bool,

    /// Accept CDATA sections whose closing ]]> is on a later line
    #[arg(long = "cdata-span-tracking")]
    pub cdata_span_tracking: bool,

    /// Do not report numeric character references like &#1234; as hex colors
    #[arg(long = "skip-char-references")]
    pub skip_char_references: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Color choice implied by `--color` / `--no-color`, if either was given
    pub fn color_choice(&self) -> Option<ColorChoice> {
        if self.no_color {
            Some(ColorChoice::Never)
        } else {
            self.color
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.debug {
            VerbosityLevel::Debug
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}
