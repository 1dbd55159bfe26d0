//! Control character scan
//!
//! Flags the first C0 control character (other than tab, CR and LF) on each line.

use super::{Checker, budget_reached};
use crate::issue::{Issue, IssueKind, Phase, split_lines};

#[derive(Debug, Default, Clone, Copy)]
pub struct ControlCharChecker;

impl ControlCharChecker {
    pub fn new() -> Self {
        Self
    }
}

fn is_forbidden(byte: u8) -> bool {
    byte < 0x20 && !matches!(byte, b'\t' | b'\r' | b'\n')
}

impl Checker for ControlCharChecker {
    fn phase(&self) -> Phase {
        Phase::ControlCharacters
    }

    fn check(&self, content: &[u8], budget: usize) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (index, line) in split_lines(content).enumerate() {
            // control bytes never occur inside a multi-byte UTF-8 sequence
            if let Some(pos) = line.iter().position(|&b| is_forbidden(b)) {
                let byte = line[pos];
                issues.push(Issue::on_line(
                    index,
                    pos + 1,
                    line,
                    IssueKind::ControlCharacter,
                    format!("Control character (hex 0x{:02X}) found", byte),
                    char::from(byte).to_string(),
                ));
            }

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

    #[test]
    fn test_clean_content() {
        let content = b"<a>\ttabbed\r\n</a>\n";
        assert!(ControlCharChecker::new().check(content, 0).is_empty());
    }

    #[test]
    fn test_only_first_control_character_per_line() {
        let content = b"ab\x01defg\x02hi";
        let issues = ControlCharChecker::new().check(content, 0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column, 3);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].message, "Control character (hex 0x01) found");
        assert_eq!(issues[0].highlight, "\u{1}");
    }

    #[test]
    fn test_one_issue_per_line() {
        let content = b"\x0b\n<ok/>\n\x1fx\x1f\n";
        let issues = ControlCharChecker::new().check(content, 0);
        assert_eq!(issues.len(), 2);
        assert_eq!((issues[0].line, issues[0].column), (1, 1));
        assert_eq!((issues[1].line, issues[1].column), (3, 1));
        assert!(issues[1].message.contains("0x1F"));
    }

    #[test]
    fn test_budget() {
        let content = b"\x01\n\x02\n\x03\n";
        let issues = ControlCharChecker::new().check(content, 2);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_column_counts_bytes_after_multibyte_text() {
        let content = "é\u{8}".as_bytes();
        let issues = ControlCharChecker::new().check(content, 0);
        assert_eq!(issues[0].column, 3);
    }
}
