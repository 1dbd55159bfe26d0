//! Validation issues
//!
//! An [`Issue`] is a single problem found in a document. Issues are plain values:
//! they are never errors and never abort a run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Checking phase that produced an issue, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    WellFormedness,
    Cdata,
    ControlCharacters,
    HexColors,
    Svg,
}

impl Phase {
    /// Progress text logged when the phase starts
    pub fn description(&self) -> &'static str {
        match self {
            Phase::WellFormedness => "Checking basic XML well-formedness...",
            Phase::Cdata => "Checking CDATA sections...",
            Phase::ControlCharacters => "Checking for control characters...",
            Phase::HexColors => "Checking hex color codes...",
            Phase::Svg => "Checking SVG syntax...",
        }
    }
}

/// Kind of issue, carrying the label shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SyntaxError,
    XmlError,
    CdataSpecialCharacter,
    CdataExclamation,
    CdataUnclosed,
    CdataNested,
    CdataMultipleClosings,
    CdataEmpty,
    ControlCharacter,
    InvalidHexColor,
    SvgSelfClosing,
    SvgUnquotedAttribute,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::SyntaxError => "Basic XML Syntax Error",
            IssueKind::XmlError => "XML Error",
            IssueKind::CdataSpecialCharacter => "Special character after CDATA opening",
            IssueKind::CdataExclamation => "Exclamation mark after CDATA opening",
            IssueKind::CdataUnclosed => "Unclosed CDATA section",
            IssueKind::CdataNested => "Nested CDATA sections",
            IssueKind::CdataMultipleClosings => "Multiple CDATA closing sequences",
            IssueKind::CdataEmpty => "Empty CDATA section",
            IssueKind::ControlCharacter => "Control character",
            IssueKind::InvalidHexColor => "Invalid hex color",
            IssueKind::SvgSelfClosing => "SVG self-closing tag issue",
            IssueKind::SvgUnquotedAttribute => "SVG unquoted attribute",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            IssueKind::SyntaxError | IssueKind::XmlError => Phase::WellFormedness,
            IssueKind::CdataSpecialCharacter
            | IssueKind::CdataExclamation
            | IssueKind::CdataUnclosed
            | IssueKind::CdataNested
            | IssueKind::CdataMultipleClosings
            | IssueKind::CdataEmpty => Phase::Cdata,
            IssueKind::ControlCharacter => Phase::ControlCharacters,
            IssueKind::InvalidHexColor => Phase::HexColors,
            IssueKind::SvgSelfClosing | IssueKind::SvgUnquotedAttribute => Phase::Svg,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single validation issue pinned to a source location
///
/// `line == 0` means the issue has no resolvable position. `column` is 1-based,
/// counted in bytes, and 0 when unknown. `highlight` is the exact text to underline
/// starting at `column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub line: usize,
    pub column: usize,
    pub line_text: String,
    pub kind: IssueKind,
    pub message: String,
    pub highlight: String,
}

impl Issue {
    /// Issue found while scanning line `line_index` (0-based) of the document
    pub fn on_line(
        line_index: usize,
        column: usize,
        line: &[u8],
        kind: IssueKind,
        message: impl Into<String>,
        highlight: impl Into<String>,
    ) -> Self {
        Self {
            line: line_index + 1,
            column,
            line_text: String::from_utf8_lossy(line).into_owned(),
            kind,
            message: message.into(),
            highlight: highlight.into(),
        }
    }

    /// Issue with no known source position
    pub fn unpositioned(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            line: 0,
            column: 0,
            line_text: String::new(),
            kind,
            message: message.into(),
            highlight: String::new(),
        }
    }

    pub fn has_position(&self) -> bool {
        self.line > 0
    }

    pub fn phase(&self) -> Phase {
        self.kind.phase()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_position() {
            write!(
                f,
                "line {}, column {}: {}: {}",
                self.line, self.column, self.kind, self.message
            )
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

/// Split content into physical lines on `\n`
///
/// Matches the line model every line-oriented checker uses: the terminator is
/// dropped, a trailing `\r` is kept, and content without a final newline still yields
/// its last line.
pub(crate) fn split_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    content.split(|&b| b == b'\n')
}
