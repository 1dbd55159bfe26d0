//! CDATA section heuristics
//!
//! Six independent rules evaluated against every physical line. A line can produce
//! one issue per matching rule. The rules only see a single line, so constructs that
//! span lines are invisible to them; see [`CdataChecker::with_span_tracking`].

use super::{Checker, budget_reached, find, find_all};
use crate::issue::{Issue, IssueKind, Phase, split_lines};

const OPEN: &[u8] = b"<![CDATA[";
const CLOSE: &[u8] = b"]]>";
const EMPTY: &[u8] = b"<![CDATA[]]>";

/// Checks CDATA sections for the mistakes typical of exported feeds
#[derive(Debug, Default, Clone, Copy)]
pub struct CdataChecker {
    track_spans: bool,
}

impl CdataChecker {
    /// Line-scoped checker: an opening without `]]>` on the same line is reported
    pub fn new() -> Self {
        Self { track_spans: false }
    }

    /// When enabled, an opening whose `]]>` appears on a later line is not reported
    /// as unclosed.
    pub fn with_span_tracking(track_spans: bool) -> Self {
        Self { track_spans }
    }

    fn check_line(&self, index: usize, line: &[u8], rest: &[u8], issues: &mut Vec<Issue>) {
        if let Some(issue) = special_character(index, line) {
            issues.push(issue);
        }
        if let Some(issue) = exclamation(index, line) {
            issues.push(issue);
        }
        if let Some(issue) = unclosed(index, line)
            && !(self.track_spans && find(rest, CLOSE).is_some())
        {
            issues.push(issue);
        }
        if let Some(issue) = nested(index, line) {
            issues.push(issue);
        }
        if let Some(issue) = multiple_closings(index, line) {
            issues.push(issue);
        }
        if let Some(issue) = empty(index, line) {
            issues.push(issue);
        }
    }
}

impl Checker for CdataChecker {
    fn phase(&self) -> Phase {
        Phase::Cdata
    }

    fn check(&self, content: &[u8], budget: usize) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut consumed = 0;

        for (index, line) in split_lines(content).enumerate() {
            consumed = (consumed + line.len() + 1).min(content.len());
            self.check_line(index, line, &content[consumed..], &mut issues);

            if budget_reached(issues.len(), budget) {
                break;
            }
        }

        issues
    }
}

/// Character right after the marker that is not ASCII alphanumeric or a space
fn special_character(index: usize, line: &[u8]) -> Option<Issue> {
    find_all(line, OPEN).find_map(|start| {
        let after = start + OPEN.len();
        let &byte = line.get(after)?;
        if byte.is_ascii_alphanumeric() || byte == b' ' {
            return None;
        }
        let bad = first_char(&line[after..]);
        // control characters are shown escaped in the message
        let shown = if bad.chars().any(char::is_control) {
            bad.escape_debug().to_string()
        } else {
            bad.clone()
        };
        Some(Issue::on_line(
            index,
            after + 1,
            line,
            IssueKind::CdataSpecialCharacter,
            format!(
                "Special character '{}' found immediately after CDATA opening",
                shown
            ),
            bad,
        ))
    })
}

/// `<![CDATA[!`, typically HTML comment markup pasted into a CDATA block
fn exclamation(index: usize, line: &[u8]) -> Option<Issue> {
    find_all(line, OPEN)
        .find(|&start| line.get(start + OPEN.len()) == Some(&b'!'))
        .map(|start| {
            Issue::on_line(
                index,
                start + OPEN.len() + 1,
                line,
                IssueKind::CdataExclamation,
                "Exclamation mark found immediately after CDATA opening",
                "!",
            )
        })
}

/// An opening with no `]]>` after it on the same line
fn unclosed(index: usize, line: &[u8]) -> Option<Issue> {
    find_all(line, OPEN)
        .find(|&start| find(&line[start + OPEN.len()..], CLOSE).is_none())
        .map(|start| {
            Issue::on_line(
                index,
                start + 1,
                line,
                IssueKind::CdataUnclosed,
                "CDATA section is not properly closed with ]]>",
                lossy(&line[start..]),
            )
        })
}

/// Two openings on one line
fn nested(index: usize, line: &[u8]) -> Option<Issue> {
    let mut openings = find_all(line, OPEN);
    let first = openings.next()?;
    let second = openings.find(|&start| start >= first + OPEN.len())?;
    Some(Issue::on_line(
        index,
        first + 1,
        line,
        IssueKind::CdataNested,
        "CDATA sections cannot be nested",
        lossy(&line[first..second + OPEN.len()]),
    ))
}

/// An opening followed by more than one `]]>` on the same line
fn multiple_closings(index: usize, line: &[u8]) -> Option<Issue> {
    let start = find(line, OPEN)?;
    let body = start + OPEN.len();
    let first_close = body + find(&line[body..], CLOSE)?;
    let after_first = first_close + CLOSE.len();
    let last_close = find_all(&line[after_first..], CLOSE).last()?;
    let end = after_first + last_close + CLOSE.len();
    Some(Issue::on_line(
        index,
        start + 1,
        line,
        IssueKind::CdataMultipleClosings,
        "Found multiple ']]>' sequences in a single CDATA block",
        lossy(&line[start..end]),
    ))
}

/// `<![CDATA[]]>`
fn empty(index: usize, line: &[u8]) -> Option<Issue> {
    let start = find(line, EMPTY)?;
    Some(Issue::on_line(
        index,
        start + 1,
        line,
        IssueKind::CdataEmpty,
        "CDATA section is empty",
        "<![CDATA[]]>",
    ))
}

/// First character of `bytes`, decoding UTF-8 where possible
fn first_char(bytes: &[u8]) -> String {
    let width = match bytes.first() {
        Some(b) if *b >= 0xF0 => 4,
        Some(b) if *b >= 0xE0 => 3,
        Some(b) if *b >= 0xC0 => 2,
        _ => 1,
    };
    lossy(&bytes[..width.min(bytes.len())])
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
