//! Whole-document scans: find values by content or by key name, and list
//! the paths that lead to them.
//!
//! Every scan is one pre-order pass over the raw text, bounded by the
//! evaluator's `max_depth`. Results borrow the input and come back in
//! document order.

use json_lens_util::wildcard;

use crate::context::Context;
use crate::eval::Evaluator;
use crate::scanner::Kind;
use crate::types::Path;
use crate::walk::{self, trail_path, Step};

impl Evaluator<'_> {
    fn scan<'a, F>(&self, json: &'a str, mut keep: F) -> Vec<(Vec<Step>, Context<'a>)>
    where
        F: FnMut(&[Step], &Context<'a>) -> bool,
    {
        let mut found = Vec::new();
        walk::walk(json, self.options().max_depth, |trail, span| {
            let ctx = Context::from_span(json, Some(0), span);
            if keep(trail, &ctx) {
                found.push((trail.to_vec(), ctx));
            }
            true
        });
        found
    }

    fn scan_values<'a, F>(&self, json: &'a str, keep: F) -> Vec<Context<'a>>
    where
        F: FnMut(&[Step], &Context<'a>) -> bool,
    {
        self.scan(json, keep).into_iter().map(|(_, ctx)| ctx).collect()
    }

    /// Scalars whose string form contains `needle`.
    pub fn search<'a>(&self, json: &'a str, needle: &str) -> Vec<Context<'a>> {
        if needle.is_empty() {
            return Vec::new();
        }
        self.scan_values(json, |_, ctx| is_leaf(ctx) && ctx.str().contains(needle))
    }

    /// Scalars whose string form matches the glob `pattern`.
    pub fn search_match<'a>(&self, json: &'a str, pattern: &str) -> Vec<Context<'a>> {
        self.scan_values(json, |_, ctx| is_leaf(ctx) && wildcard::matches(pattern, &ctx.str()))
    }

    /// Values of every member named exactly `key`, at any depth.
    pub fn search_keys<'a>(&self, json: &'a str, key: &str) -> Vec<Context<'a>> {
        self.scan_values(json, |trail, _| matches!(trail.last(), Some(Step::Key(k)) if k == key))
    }

    /// Values of every member whose name matches the glob `pattern`.
    pub fn search_keys_match<'a>(&self, json: &'a str, pattern: &str) -> Vec<Context<'a>> {
        self.scan_values(json, |trail, _| {
            matches!(trail.last(), Some(Step::Key(k)) if wildcard::matches(pattern, k))
        })
    }

    /// Paths of the scalars whose string form equals `value`. Values under
    /// an empty key have no path and are left out.
    pub fn find_paths(&self, json: &str, value: &str) -> Vec<String> {
        self.scan(json, |trail, ctx| addressable(trail) && is_leaf(ctx) && ctx.str() == value)
            .into_iter()
            .map(|(trail, _)| trail_path(&trail))
            .collect()
    }

    /// Paths of every scalar below the root, except those under an empty key.
    pub fn leaf_paths(&self, json: &str) -> Vec<String> {
        self.scan(json, |trail, ctx| addressable(trail) && is_leaf(ctx))
            .into_iter()
            .map(|(trail, _)| trail_path(&trail))
            .collect()
    }
}

/// A non-empty trail that a dot path can spell; `""` keys cannot be.
fn addressable(trail: &[Step]) -> bool {
    !trail.is_empty() && !trail.iter().any(|step| matches!(step, Step::Key(k) if k.is_empty()))
}

fn is_leaf(ctx: &Context<'_>) -> bool {
    ctx.kind() != Kind::Json
}

pub fn search<'a>(json: &'a str, needle: &str) -> Vec<Context<'a>> {
    Evaluator::global().search(json, needle)
}

pub fn search_match<'a>(json: &'a str, pattern: &str) -> Vec<Context<'a>> {
    Evaluator::global().search_match(json, pattern)
}

pub fn search_keys<'a>(json: &'a str, key: &str) -> Vec<Context<'a>> {
    Evaluator::global().search_keys(json, key)
}

pub fn search_keys_match<'a>(json: &'a str, pattern: &str) -> Vec<Context<'a>> {
    Evaluator::global().search_keys_match(json, pattern)
}

pub fn find_paths(json: &str, value: &str) -> Vec<String> {
    Evaluator::global().find_paths(json, value)
}

pub fn leaf_paths(json: &str) -> Vec<String> {
    Evaluator::global().leaf_paths(json)
}

/// Recursive descent from the document root: every member matching `key`
/// (exact name or glob), collected into an array. Same as the path
/// `@this..key`.
pub fn descend<'a>(json: &'a str, key: &str) -> Context<'a> {
    Evaluator::global().descend(json, Some(0), key, &Path::default())
}
