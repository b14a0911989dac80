//! String utilities for emitting JSON text.

mod as_string;

pub use as_string::{as_string, write_quoted};
