//! Validation pipeline
//!
//! Runs the well-formedness gate, then (only for well-formed documents) the secondary
//! checkers in fixed order:
//!
//! 1. CDATA sections
//! 2. Control characters
//! 3. Hex colors
//! 4. SVG syntax
//!
//! Issues are kept in discovery order. Once the issue budget is used up the current
//! phase stops at the end of its line and no later phase runs.

use serde::{Deserialize, Serialize};

use crate::checks::{
    CdataChecker, Checker, ControlCharChecker, HexColorChecker, SvgChecker,
    WellFormednessChecker,
};
use crate::issue::{Issue, IssueKind, Phase};

/// Options for one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Maximum number of issues to report; 0 means unbounded
    pub max_issues: usize,
    /// Debug output requested (affects logging only)
    pub debug: bool,
    /// Let the unclosed-CDATA rule look past the end of the line for `]]>`
    pub cdata_span_tracking: bool,
    /// Treat `&#NNN;` character references as text rather than hex colors
    pub skip_char_references: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_issues: 5,
            debug: false,
            cdata_span_tracking: false,
            skip_char_references: false,
        }
    }
}

/// Bounded, order-preserving issue accumulator
///
/// Every issue offered is counted, but only the first `limit` are kept.
#[derive(Debug, Clone)]
pub struct IssueCollector {
    limit: usize,
    issues: Vec<Issue>,
    found: usize,
}

impl IssueCollector {
    /// Create a collector keeping at most `limit` issues (0 keeps everything)
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            issues: Vec::new(),
            found: 0,
        }
    }

    pub fn push(&mut self, issue: Issue) {
        self.found += 1;
        if !self.is_full() {
            self.issues.push(issue);
        }
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    pub fn is_full(&self) -> bool {
        self.limit > 0 && self.issues.len() >= self.limit
    }

    /// Budget to hand to the next checker; 0 when unbounded
    pub fn remaining(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            // a full collector never runs another checker, so this stays positive
            self.limit.saturating_sub(self.issues.len()).max(1)
        }
    }

    /// Number of issues offered so far, kept or not
    pub fn found(&self) -> usize {
        self.found
    }

    pub fn finish(self) -> PipelineResult {
        PipelineResult {
            issues: self.issues,
            total_found: self.found,
        }
    }
}

/// Outcome of a validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Issues in discovery order, capped at the issue budget
    pub issues: Vec<Issue>,
    /// Issues found before truncation
    pub total_found: usize,
}

impl PipelineResult {
    pub fn is_clean(&self) -> bool {
        self.total_found == 0
    }

    pub fn is_well_formed(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| matches!(issue.kind, IssueKind::SyntaxError | IssueKind::XmlError))
    }

    /// Issues found but not kept
    pub fn hidden(&self) -> usize {
        self.total_found.saturating_sub(self.issues.len())
    }
}

/// Ordered set of checkers behind a well-formedness gate
pub struct ValidationPipeline {
    gate: Box<dyn Checker>,
    checkers: Vec<Box<dyn Checker>>,
}

impl ValidationPipeline {
    /// Standard pipeline configured from `options`
    pub fn new(options: &ValidationOptions) -> Self {
        Self::with_checkers(
            Box::new(WellFormednessChecker::new()),
            vec![
                Box::new(CdataChecker::with_span_tracking(options.cdata_span_tracking)),
                Box::new(ControlCharChecker::new()),
                Box::new(HexColorChecker::with_char_reference_skip(
                    options.skip_char_references,
                )),
                Box::new(SvgChecker::new()),
            ],
        )
    }

    /// Pipeline from explicit checkers; `checkers` run in the given order
    pub fn with_checkers(gate: Box<dyn Checker>, checkers: Vec<Box<dyn Checker>>) -> Self {
        Self { gate, checkers }
    }

    /// Phases in execution order
    pub fn phases(&self) -> Vec<Phase> {
        std::iter::once(self.gate.phase())
            .chain(self.checkers.iter().map(|c| c.phase()))
            .collect()
    }

    pub fn run(&self, content: &[u8], options: &ValidationOptions) -> PipelineResult {
        let mut collector = IssueCollector::new(options.max_issues);

        log::info!("{}", self.gate.phase().description());
        collector.extend(self.gate.check(content, collector.remaining()));
        if collector.found() > 0 {
            log::debug!("document is not well-formed; skipping additional checks");
            return collector.finish();
        }

        log::info!("Basic XML validation passed. Performing additional checks...");
        for checker in &self.checkers {
            let phase = checker.phase();
            log::info!("{}", phase.description());

            let issues = checker.check(content, collector.remaining());
            log::debug!("{:?}: {} issue(s)", phase, issues.len());
            collector.extend(issues);

            if collector.is_full() {
                log::debug!(
                    "issue limit of {} reached after {:?}; stopping",
                    options.max_issues,
                    phase
                );
                break;
            }
        }

        collector.finish()
    }
}

/// Run the standard pipeline over `content`
pub fn validate(content: &[u8], options: &ValidationOptions) -> PipelineResult {
    ValidationPipeline::new(options).run(content, options)
}
