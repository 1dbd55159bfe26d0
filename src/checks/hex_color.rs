//! Hex color literal scan
//!
//! Valid colors are `#RGB`, `#RRGGBB` and `#RRGGBBAA`. Any other `#`-prefixed run of
//! hex digits is reported, including the digits of numeric character references such
//! as `&#1234;` unless the checker is built with [`HexColorChecker::with_char_reference_skip`].

use regex::bytes::Regex;
use std::sync::OnceLock;

use super::{Checker, budget_reached};
use crate::issue::{Issue, IssueKind, Phase, split_lines};

/// Cached regex for `#` followed by a maximal run of hex digits
static HEX_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_hex_run_regex() -> &'static Regex {
    HEX_RUN_REGEX
        .get_or_init(|| Regex::new(r"#[0-9a-fA-F]+").expect("Failed to compile hex run regex"))
}

fn is_valid_length(digits: usize) -> bool {
    matches!(digits, 3 | 6 | 8)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HexColorChecker {
    skip_char_references: bool,
}

impl HexColorChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `skip` is set, runs preceded by `&` (`&#1234;`) are not treated as colors
    pub fn with_char_reference_skip(skip: bool) -> Self {
        Self {
            skip_char_references: skip,
        }
    }

    fn check_line(&self, index: usize, line: &[u8], issues: &mut Vec<Issue>) {
        for m in get_hex_run_regex().find_iter(line) {
            if self.skip_char_references && m.start() > 0 && line[m.start() - 1] == b'&' {
                continue;
            }
            if is_valid_length(m.len() - 1) {
                continue;
            }
            let hex = String::from_utf8_lossy(m.as_bytes()).into_owned();
            issues.push(Issue::on_line(
                index,
                m.start() + 1,
                line,
                IssueKind::InvalidHexColor,
                format!(
                    "Invalid hex color code: {} (should be #RGB, #RRGGBB, or #RRGGBBAA)",
                    hex
                ),
                hex,
            ));
        }
    }
}

impl Checker for HexColorChecker {
    fn phase(&self) -> Phase {
        Phase::HexColors
    }

    fn check(&self, content: &[u8], budget: usize) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (index, line) in split_lines(content).enumerate() {
            self.check_line(index, line, &mut issues);

            if budget_reached(issues.len(), budget) {
                break;
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(line: &str) -> Vec<Issue> {
        HexColorChecker::new().check(line.as_bytes(), 0)
    }

    #[test]
    fn test_length_boundaries() {
        assert_eq!(check("color: #12;").len(), 1);
        assert!(check("color: #123;").is_empty());
        assert_eq!(check("color: #1234;").len(), 1);
        assert!(check("color: #123456;").is_empty());
        assert_eq!(check("color: #1234567;").len(), 1);
        assert!(check("color: #12345678;").is_empty());
        assert_eq!(check("color: #123456789;").len(), 1);
    }

    #[test]
    fn test_reports_hex_run_and_column() {
        let issues = check("<p style=\"color:#abcd\">");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].highlight, "#abcd");
        assert_eq!(issues[0].column, 17);
        assert!(issues[0].message.starts_with("Invalid hex color code: #abcd"));
    }

    #[test]
    fn test_run_at_end_of_line() {
        let issues = check("fill #a");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].highlight, "#a");
    }

    #[test]
    fn test_adjacent_runs() {
        let issues = check("#12#34 #fff");
        let found: Vec<&str> = issues.iter().map(|i| i.highlight.as_str()).collect();
        assert_eq!(found, vec!["#12", "#34"]);
    }

    #[test]
    fn test_character_references_reported_by_default() {
        let issues = check("it&#8217;s &#38; &#1234;");
        let found: Vec<&str> = issues.iter().map(|i| i.highlight.as_str()).collect();
        assert_eq!(found, vec!["#8217", "#38", "#1234"]);
        assert_eq!(issues[0].column, 4);
    }

    #[test]
    fn test_character_reference_skip() {
        let checker = HexColorChecker::with_char_reference_skip(true);
        assert!(checker.check(b"it&#8217;s &#38; &#1234;", 0).is_empty());

        // only runs directly after `&` are skipped
        let issues = checker.check(b"&#12; x#1234;", 0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].highlight, "#1234");
    }

    #[test]
    fn test_multiple_lines_and_budget() {
        let content = "#1\n#22\n#4444\n";
        let all = HexColorChecker::new().check(content.as_bytes(), 0);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].line, 3);

        let limited = HexColorChecker::new().check(content.as_bytes(), 1);
        assert_eq!(limited.len(), 1);
    }
}
