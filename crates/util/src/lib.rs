//! json-lens-util - leaf helpers shared by the json-lens engine.
//!
//! Nothing in here knows about paths or contexts: these are the small
//! collaborators the engine leans on when it has to write JSON string
//! literals or test a key against a glob pattern.

pub mod strings;
pub mod wildcard;

pub use strings::{as_string, write_quoted};
pub use wildcard::{is_pattern, matches as wildcard_match};
