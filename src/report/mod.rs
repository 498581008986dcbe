//! Result reporting.
//!
//! Renders the single outcome of a race for the caller. Pure: produces a
//! string, never prints.

pub mod render;

pub use render::{render, report, to_json, OutputFormat};
