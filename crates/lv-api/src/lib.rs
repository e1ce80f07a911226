//! Log viewer HTTP API, library crate.
//!
//! Exposes the router and state so the binary (`main.rs`) and
//! `lv-e2e-tests` can build the same app.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
