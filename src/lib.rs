//! # xmlcheck Library
//!
//! Checks XML documents for well-formedness and for authoring mistakes common in
//! exported content: broken CDATA sections, stray control characters, invalid hex
//! colors and SVG markup problems.
//!
//! A well-formedness gate runs first; the remaining checkers only run on documents
//! that parse. Issues are collected in phase order up to a configurable budget.

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod http_client;
pub mod issue;
pub mod output;
pub mod pipeline;
pub mod position;
pub mod source;

pub use checks::{
    CdataChecker, Checker, ControlCharChecker, HexColorChecker, SvgChecker,
    WellFormednessChecker,
};
pub use cli::{Cli, ColorChoice, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager};
pub use error::XmlCheckError;
pub use http_client::{HttpClientConfig, HttpFetcher};
pub use issue::{Issue, IssueKind, Phase};
pub use output::{
    ContextLine, ContextRenderer, HumanReporter, JsonReporter, OutputStyle, Reporter,
    reporter_for,
};
pub use pipeline::{IssueCollector, PipelineResult, ValidationOptions, ValidationPipeline, validate};
pub use position::Position;
pub use source::{Document, DocumentSource};
