//! Query and reshape raw JSON text with dot paths.
//!
//! Paths are resolved by scanning the input text directly; nothing is decoded
//! into a tree. A plain lookup returns a [`Context`] that borrows the input, so
//! reading `user.name` out of a large document costs one forward scan and no
//! copies. Projections, collections and transformer output are synthesized
//! into owned text.
//!
//! # Example
//!
//! ```
//! let json = r#"{"stock":[{"sym":"MMM","price":1},{"sym":"AAA","price":2}]}"#;
//!
//! assert_eq!(json_lens::get(json, "stock.#").i64(), 2);
//! assert_eq!(json_lens::get(json, "stock.#.sym").raw(), r#"["MMM","AAA"]"#);
//! assert_eq!(json_lens::get(json, r#"stock.#(sym=="AAA").price"#).f64(), 2.0);
//! assert_eq!(json_lens::get(json, "stock.0|@keys").raw(), r#"["sym","price"]"#);
//! assert!(!json_lens::get(json, "stock.9").exists());
//! ```
//!
//! # Path syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `a.b`, `a\|b` | member `b` of member `a` |
//! | `a.0` | first element |
//! | `a.#` | element (or member) count |
//! | `a.#.b` | `b` of every element, as an array |
//! | `a.#(b>1)` / `a.#(b>1)#` | first / every element matching a predicate |
//! | `a.b*`, `a.b?` | first member matching a glob |
//! | `{a,"x":b.c}` / `[a,b]` | new object / array from several paths |
//! | `!true`, `!{"k":1}` | literal value |
//! | `@name`, `@name:arg` | transformer |
//! | `a..b` | every `b` member at any depth below `a` |
//! | `..a` | `a` of every line of a JSON Lines stream |

mod context;
mod eval;
mod multi;
mod options;
mod parser;
mod query;
mod scanner;
mod types;
mod util;
mod walk;

pub mod aggregate;
pub mod cli;
pub mod coerce;
pub mod pretty;
pub mod search;
pub mod transform;

pub use context::Context;
pub use eval::Evaluator;
pub use options::{set_transformers_enabled, transformers_enabled, Options, DEFAULT_MAX_DEPTH};
pub use parser::{ParseError, PathParser, MAX_NESTING};
pub use pretty::PrettyOptions;
pub use scanner::Kind;
pub use transform::{add_transformer, Transformer, TransformerRegistry};
pub use types::*;
pub use util::escape_component;

/// View of the whole document. Leading whitespace is skipped; text that does
/// not start with a JSON value gives the empty context.
pub fn parse(json: &str) -> Context<'_> {
    match scanner::locate_after_whitespace(json.as_bytes(), 0) {
        Some(span) => Context::from_span(json, Some(0), span),
        None => Context::default(),
    }
}

/// [`parse`] over bytes. Input that is not UTF-8 gives the empty context.
pub fn parse_bytes(json: &[u8]) -> Context<'_> {
    std::str::from_utf8(json).map(parse).unwrap_or_default()
}

/// Evaluate `path` against `json` with the process-wide transformer registry.
///
/// A path that does not compile, or that leads nowhere, gives the empty
/// context; check [`Context::exists`]. Use [`compile`] to see path errors.
pub fn get<'a>(json: &'a str, path: &str) -> Context<'a> {
    Evaluator::global().get(json, path)
}

pub fn get_bytes<'a>(json: &'a [u8], path: &str) -> Context<'a> {
    std::str::from_utf8(json).map(|json| get(json, path)).unwrap_or_default()
}

/// Evaluate several paths in one pass over the document; one result per
/// path, in order.
pub fn get_many<'a>(json: &'a str, paths: &[&str]) -> Vec<Context<'a>> {
    Evaluator::global().get_many(json, paths)
}

pub fn get_many_bytes<'a>(json: &'a [u8], paths: &[&str]) -> Vec<Context<'a>> {
    match std::str::from_utf8(json) {
        Ok(json) => get_many(json, paths),
        Err(_) => vec![Context::default(); paths.len()],
    }
}

/// Every match of `path` as its own context. Matches of `#.key`,
/// `#(..)#`, `a..key` and `..key` that are plain sub-values borrow `json`
/// instead of being copied into one synthesized array.
///
/// ```
/// let json = r#"{"a":[{"b":1},{"b":0},{"b":2}]}"#;
/// let found = json_lens::get_all(json, "a.#(b>0)#");
/// assert_eq!(found.len(), 2);
/// assert!(found.iter().all(|c| c.is_borrowed()));
/// ```
pub fn get_all<'a>(json: &'a str, path: &str) -> Vec<Context<'a>> {
    Evaluator::global().get_all(json, path)
}

/// Evaluate a path compiled ahead of time with [`compile`].
pub fn get_path<'a>(json: &'a str, path: &Path) -> Context<'a> {
    Evaluator::global().eval(json, path)
}

/// Compile a path for repeated use.
pub fn compile(path: &str) -> Result<Path, ParseError> {
    PathParser::parse(path)
}

/// Whether `json` is exactly one well-formed JSON value, optionally
/// surrounded by whitespace.
pub fn valid(json: &str) -> bool {
    scanner::validate(json.as_bytes(), DEFAULT_MAX_DEPTH)
}

pub fn valid_bytes(json: &[u8]) -> bool {
    std::str::from_utf8(json).is_ok_and(valid)
}
