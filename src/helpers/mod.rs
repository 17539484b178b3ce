//! Helper functions for templates
//!
//! These back the filters registered on the template renderer.

mod date;

pub use date::*;
