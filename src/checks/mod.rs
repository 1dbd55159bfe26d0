//! Document checkers
//!
//! Each checker is a pure scan over the raw document bytes. Checkers share no state;
//! the pipeline owns ordering and the issue budget.

pub mod cdata;
pub mod control_chars;
pub mod hex_color;
pub mod svg;
pub mod well_formed;

use crate::issue::{Issue, Phase};

pub use cdata::CdataChecker;
pub use control_chars::ControlCharChecker;
pub use hex_color::HexColorChecker;
pub use svg::SvgChecker;
pub use well_formed::WellFormednessChecker;

/// A single checking phase
pub trait Checker {
    /// Phase this checker implements
    fn phase(&self) -> Phase;

    /// Scan `content` and return issues in discovery order.
    ///
    /// A `budget` greater than zero lets the checker stop after the first line on
    /// which its issue count reaches the budget; zero means unbounded.
    fn check(&self, content: &[u8], budget: usize) -> Vec<Issue>;
}

/// True once `found` issues exhaust a non-zero budget
pub(crate) fn budget_reached(found: usize, budget: usize) -> bool {
    budget > 0 && found >= budget
}

/// Byte offsets of every occurrence of `needle` in `haystack`, left to right
pub(crate) fn find_all<'a>(haystack: &'a [u8], needle: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(move |(_, window)| *window == needle)
        .map(|(i, _)| i)
}

/// Offset of the first occurrence of `needle` in `haystack`
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
