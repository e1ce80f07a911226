//! End-to-end scenario tests for the log viewer.
//!
//! This crate has no runtime code; see `tests/`.
