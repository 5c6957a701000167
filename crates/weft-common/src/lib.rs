//! Common utilities for the Weft layout engine.
//!
//! This crate provides shared infrastructure used by the layout crates:
//! - **Warning System** - de-duplicated, colored diagnostics for malformed
//!   properties and recoverable layout conditions

pub mod warning;
