//! SVG syntax heuristics
//!
//! Two per-line rules: void SVG shapes that are neither self-closed nor closed later on
//! the same line, and unquoted sizing attributes on `<svg>` tags.

use regex::bytes::Regex;
use std::sync::OnceLock;

use super::{Checker, budget_reached, find};
use crate::issue::{Issue, IssueKind, Phase, split_lines};

/// Cached regex for open SVG shape tags that do not end in `/>`
static SHAPE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for an `<svg` tag up to its `>` or the end of the line
static SVG_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for an unquoted width/height/viewBox attribute
static UNQUOTED_ATTR_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_shape_tag_regex() -> &'static Regex {
    SHAPE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"<(path|rect|circle|ellipse|line|polyline|polygon|image|use)\b(?:[^>]*[^/])?>")
            .expect("Failed to compile SVG shape regex")
    })
}

fn get_svg_tag_regex() -> &'static Regex {
    SVG_TAG_REGEX
        .get_or_init(|| Regex::new(r"<svg\b[^>]*").expect("Failed to compile SVG tag regex"))
}

fn get_unquoted_attr_regex() -> &'static Regex {
    UNQUOTED_ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"\s(width|height|viewBox)=([^"'\s/>][^\s/>]*)"#)
            .expect("Failed to compile SVG attribute regex")
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgChecker;

impl SvgChecker {
    pub fn new() -> Self {
        Self
    }

    fn check_shapes(index: usize, line: &[u8], issues: &mut Vec<Issue>) {
        for caps in get_shape_tag_regex().captures_iter(line) {
            let (Some(tag), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = String::from_utf8_lossy(name.as_bytes());
            let closing = format!("</{}>", name);
            if find(&line[tag.end()..], closing.as_bytes()).is_some() {
                continue;
            }
            issues.push(Issue::on_line(
                index,
                tag.start() + 1,
                line,
                IssueKind::SvgSelfClosing,
                format!("SVG <{}> tag should be self-closing with />", name),
                String::from_utf8_lossy(tag.as_bytes()),
            ));
        }
    }

    fn check_svg_attributes(index: usize, line: &[u8], issues: &mut Vec<Issue>) {
        for tag in get_svg_tag_regex().find_iter(line) {
            for caps in get_unquoted_attr_regex().captures_iter(tag.as_bytes()) {
                let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let name_text = String::from_utf8_lossy(name.as_bytes());
                let value_text = String::from_utf8_lossy(value.as_bytes());
                issues.push(Issue::on_line(
                    index,
                    tag.start() + name.start() + 1,
                    line,
                    IssueKind::SvgUnquotedAttribute,
                    format!(
                        "SVG attribute {}={} should use quotes: {}=\"{}\"",
                        name_text, value_text, name_text, value_text
                    ),
                    format!("{}={}", name_text, value_text),
                ));
            }
        }
    }
}

impl Checker for SvgChecker {
    fn phase(&self) -> Phase {
        Phase::Svg
    }

    fn check(&self, content: &[u8], budget: usize) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (index, line) in split_lines(content).enumerate() {
            Self::check_shapes(index, line, &mut issues);
            Self::check_svg_attributes(index, line, &mut issues);

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

    fn check(content: &str) -> Vec<Issue> {
        SvgChecker::new().check(content.as_bytes(), 0)
    }

    #[test]
    fn test_unclosed_rect() {
        let issues = check(r#"<rect x="1" width="2">"#);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::SvgSelfClosing);
        assert_eq!(issues[0].column, 1);
        assert_eq!(issues[0].highlight, r#"<rect x="1" width="2">"#);
        assert_eq!(issues[0].message, "SVG <rect> tag should be self-closing with />");
    }

    #[test]
    fn test_rect_closed_later_on_line() {
        assert!(check(r#"<rect x="1" width="2"><title>t</title></rect>"#).is_empty());
    }

    #[test]
    fn test_self_closed_shapes_are_fine() {
        assert!(check(r#"<svg width="10" height="10"><path d="M0 0"/><circle r="2" /></svg>"#).is_empty());
    }

    #[test]
    fn test_bare_shape_tags() {
        for tag in ["rect", "use", "path", "line"] {
            let issues = check(&format!("<{}>", tag));
            assert_eq!(issues.len(), 1, "<{}>", tag);
            assert_eq!(issues[0].highlight, format!("<{}>", tag));
            assert_eq!(issues[0].message, format!("SVG <{}> tag should be self-closing with />", tag));
        }
        assert!(check("<rect/>").is_empty());
        assert!(check("<rect></rect>").is_empty());
    }

    #[test]
    fn test_longer_tag_names_are_not_shapes() {
        assert!(check(r#"<linearGradient id="g">"#).is_empty());
        assert!(check(r#"<user name="x">"#).is_empty());
    }

    #[test]
    fn test_closing_on_next_line_is_not_seen() {
        let issues = check("<path d=\"M0 0\">\n</path>");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn test_unquoted_svg_attributes() {
        let issues = check(r#"<svg width=100 height="50" viewBox=0>"#);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::SvgUnquotedAttribute);
        assert_eq!(issues[0].highlight, "width=100");
        assert_eq!(issues[0].column, 6);
        assert_eq!(
            issues[0].message,
            "SVG attribute width=100 should use quotes: width=\"100\""
        );
        assert_eq!(issues[1].highlight, "viewBox=0");
    }

    #[test]
    fn test_unquoted_attributes_only_on_svg_tags() {
        assert!(check("<div width=100>").is_empty());
        assert!(check(r#"<svg data-width=5 width="5">"#).is_empty());
    }

    #[test]
    fn test_budget() {
        let content = "<rect x=\"0\">\n<rect x=\"1\">\n<rect x=\"2\">\n";
        assert_eq!(SvgChecker::new().check(content.as_bytes(), 2).len(), 2);
        assert_eq!(SvgChecker::new().check(content.as_bytes(), 0).len(), 3);
    }
}
