//! Shared helpers for the integration tests
//!
//! Each test binary only uses part of this module.
#![allow(dead_code)]

pub mod mocks;
pub mod test_helpers;
