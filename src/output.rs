//! Output and Reporting
//!
//! Renders a [`PipelineResult`] either as a human-readable report with source context
//! or as JSON. Rendering never writes to the terminal itself; callers print the strings.

use serde::Serialize;

use crate::cli::{ColorChoice, OutputFormat, VerbosityLevel};
use crate::config::{Config, ConfigManager};
use crate::issue::{Issue, IssueKind, Phase};
use crate::pipeline::{PipelineResult, ValidationOptions};
use crate::position;
use crate::source::Document;

const RULE: &str = "----------------------------------------";

/// Presentation settings shared by the reporters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputStyle {
    pub colors: bool,
    pub context_lines: usize,
    pub show_tips: bool,
    pub verbosity: VerbosityLevel,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            colors: false,
            context_lines: 2,
            show_tips: true,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl OutputStyle {
    pub fn from_config(config: &Config) -> Self {
        let colors = match config.output.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stdout),
        };

        Self {
            colors,
            context_lines: config.output.context_lines,
            show_tips: config.output.show_tips,
            verbosity: ConfigManager::verbosity(config),
        }
    }
}

/// Turns validation results into printable text
pub trait Reporter {
    /// One issue; `index` is 1-based
    fn render_issue(&self, index: usize, issue: &Issue, document: &Document) -> String;

    /// Verdict, truncation note and trailing advice
    fn render_summary(&self, result: &PipelineResult, options: &ValidationOptions) -> String;

    /// Whole report for one document
    fn render_report(
        &self,
        document: &Document,
        result: &PipelineResult,
        options: &ValidationOptions,
    ) -> String {
        let mut output = String::new();
        for (i, issue) in result.issues.iter().enumerate() {
            output.push_str(&self.render_issue(i + 1, issue, document));
        }
        output.push_str(&self.render_summary(result, options));
        output
    }
}

/// Build the reporter selected by the configuration
pub fn reporter_for(config: &Config) -> Box<dyn Reporter> {
    match config.output.format {
        OutputFormat::Human => Box::new(HumanReporter::new(OutputStyle::from_config(config))),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// One rendered line of source context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    pub number: usize,
    pub text: String,
    /// Underline for the issue line, already aligned under the issue column
    pub pointer: Option<String>,
}

/// Cuts a window of source lines around an issue
#[derive(Debug, Clone, Copy)]
pub struct ContextRenderer {
    radius: usize,
}

impl ContextRenderer {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Lines `line - radius ..= line + radius` that exist in `content`
    pub fn window(&self, content: &[u8], issue: &Issue) -> Vec<ContextLine> {
        if !issue.has_position() {
            return Vec::new();
        }

        let first = issue.line.saturating_sub(self.radius).max(1);
        let last = issue.line + self.radius;

        position::lines(content)
            .enumerate()
            .map(|(i, text)| (i + 1, text))
            .skip(first - 1)
            .take_while(|(number, _)| *number <= last)
            .map(|(number, text)| ContextLine {
                number,
                text: String::from_utf8_lossy(text).into_owned(),
                pointer: (number == issue.line).then(|| pointer_for(text, issue)),
            })
            .collect()
    }
}

/// `^` under the issue column followed by `~` for the rest of the highlight
fn pointer_for(line: &[u8], issue: &Issue) -> String {
    let prefix_len = issue.column.saturating_sub(1).min(line.len());
    // Keep tabs so the marker lines up with tab-indented source
    let indent: String = String::from_utf8_lossy(&line[..prefix_len])
        .chars()
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    let tail = issue.highlight.chars().count().saturating_sub(1);

    format!("{}^{}", indent, "~".repeat(tail))
}

/// Human-readable report with context and correction tips
pub struct HumanReporter {
    style: OutputStyle,
    context: ContextRenderer,
}

impl HumanReporter {
    pub fn new(style: OutputStyle) -> Self {
        let context = ContextRenderer::new(style.context_lines);
        Self { style, context }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.style.colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn render_context(&self, issue: &Issue, document: &Document) -> String {
        let window = self.context.window(document.as_bytes(), issue);
        if window.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        output.push_str("\nContext:\n");
        output.push_str(RULE);
        output.push('\n');
        for line in window {
            let number = format!("{:4}:", line.number);
            if line.pointer.is_some() {
                output.push_str(&format!("{} {}\n", self.colorize(&number, "1"), line.text));
            } else {
                output.push_str(&format!("{} {}\n", self.colorize(&number, "2"), line.text));
            }
            if let Some(pointer) = line.pointer {
                // width of "%4d: "
                output.push_str(&format!("      {}\n", self.colorize(&pointer, "31")));
            }
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    fn render_tips(&self, issues: &[Issue]) -> String {
        let tips = correction_tips(issues);
        if tips.is_empty() {
            return String::new();
        }

        let mut output = String::from("\nCorrection tips:\n");
        for tip in tips {
            output.push_str(&format!("  - {}\n", tip));
        }
        if issues.iter().any(|issue| issue.phase() == Phase::Cdata) {
            output.push_str("\nCDATA problems usually break WordPress imports; fix those first.\n");
        }
        output
    }
}

impl Reporter for HumanReporter {
    fn render_issue(&self, index: usize, issue: &Issue, document: &Document) -> String {
        if self.style.verbosity == VerbosityLevel::Quiet {
            return String::new();
        }

        let mut output = format!("\nIssue #{}:\n", index);
        let kind = self.colorize(issue.kind.label(), "31");
        if issue.has_position() {
            output.push_str(&format!(
                "Line {}, Column {}: {}\n",
                issue.line, issue.column, kind
            ));
        } else {
            output.push_str(&format!("{}\n", kind));
        }
        output.push_str(&format!("Message: {}\n", issue.message));
        output.push_str(&self.render_context(issue, document));
        output
    }

    fn render_summary(&self, result: &PipelineResult, options: &ValidationOptions) -> String {
        if result.is_clean() {
            return format!("{}\n", self.colorize("✓ XML is well-formed!", "32"));
        }

        let mut output = String::new();
        let headline = if result.is_well_formed() {
            format!(
                "✗ Found {} XML issue{} (showing {})",
                result.total_found,
                if result.total_found == 1 { "" } else { "s" },
                result.issues.len()
            )
        } else {
            "✗ XML is not well-formed".to_string()
        };
        output.push('\n');
        output.push_str(&self.colorize(&headline, "31"));
        output.push('\n');

        if self.style.verbosity == VerbosityLevel::Quiet {
            return output;
        }

        if result.hidden() > 0 {
            output.push_str(&format!(
                "\nNote: {} more issue{} found than displayed (limit {}). Run with --max-errors=0 to see all.\n",
                result.hidden(),
                if result.hidden() == 1 { " was" } else { "s were" },
                options.max_issues
            ));
        }

        if self.style.show_tips {
            output.push_str(&self.render_tips(&result.issues));
        }

        output
    }

    fn render_report(
        &self,
        document: &Document,
        result: &PipelineResult,
        options: &ValidationOptions,
    ) -> String {
        let mut output = String::new();
        if self.style.verbosity > VerbosityLevel::Quiet {
            output.push_str(&format!("Validating XML: {}\n", document.name()));
            if options.max_issues > 0 {
                output.push_str(&format!("Will report up to {} issues\n", options.max_issues));
            }
            if !result.is_clean() {
                output.push_str(RULE);
                output.push('\n');
            }
        }
        for (i, issue) in result.issues.iter().enumerate() {
            output.push_str(&self.render_issue(i + 1, issue, document));
        }
        output.push_str(&self.render_summary(result, options));
        output
    }
}

/// Tips for the kinds of issue present, in first-seen order
pub fn correction_tips(issues: &[Issue]) -> Vec<&'static str> {
    let mut tips: Vec<&'static str> = Vec::new();
    for issue in issues {
        let tip = tip_for(issue.kind);
        if !tips.contains(&tip) {
            tips.push(tip);
        }
    }
    tips
}

fn tip_for(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::SyntaxError | IssueKind::XmlError => {
            "Fix the syntax error first; the remaining checks only run on well-formed XML"
        }
        IssueKind::CdataSpecialCharacter | IssueKind::CdataExclamation => {
            "Start CDATA content directly after <![CDATA[ without a leading special character"
        }
        IssueKind::CdataUnclosed => "Close every <![CDATA[ with ]]>",
        IssueKind::CdataNested => {
            "CDATA sections cannot nest; close the first section before opening another"
        }
        IssueKind::CdataMultipleClosings => {
            "A literal ]]> inside CDATA must be split: ]]]]><![CDATA[>"
        }
        IssueKind::CdataEmpty => "Remove empty <![CDATA[]]> sections",
        IssueKind::ControlCharacter => {
            "Strip control characters (0x00-0x1F other than tab, CR and LF); they are not allowed in XML 1.0"
        }
        IssueKind::InvalidHexColor => "Write colors as #RGB, #RRGGBB or #RRGGBBAA",
        IssueKind::SvgSelfClosing => "Close empty SVG shape elements with />, e.g. <path d=\"...\"/>",
        IssueKind::SvgUnquotedAttribute => "Quote SVG attribute values: width=\"100\"",
    }
}

/// Machine-readable report
#[derive(Debug, Default)]
pub struct JsonReporter;

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    well_formed: bool,
    total_found: usize,
    shown: usize,
    max_issues: usize,
    issues: &'a [Issue],
}

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                log::error!("failed to serialize report: {}", e);
                serde_json::json!({ "error": e.to_string() }).to_string()
            }
        }
    }
}

impl Reporter for JsonReporter {
    fn render_issue(&self, _index: usize, issue: &Issue, _document: &Document) -> String {
        Self::to_json(issue)
    }

    fn render_summary(&self, result: &PipelineResult, options: &ValidationOptions) -> String {
        Self::to_json(&serde_json::json!({
            "well_formed": result.is_well_formed(),
            "total_found": result.total_found,
            "shown": result.issues.len(),
            "max_issues": options.max_issues,
        }))
    }

    fn render_report(
        &self,
        document: &Document,
        result: &PipelineResult,
        options: &ValidationOptions,
    ) -> String {
        let report = JsonReport {
            source: document.name(),
            well_formed: result.is_well_formed(),
            total_found: result.total_found,
            shown: result.issues.len(),
            max_issues: options.max_issues,
            issues: &result.issues,
        };
        format!("{}\n", Self::to_json(&report))
    }
}
