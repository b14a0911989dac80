//! Pre-order traversal of raw JSON text.

use std::fmt;

use tracing::warn;

use crate::scanner::{self, Elements, Members, Span};

/// One step of the location of a visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => f.write_str(&crate::util::escape_component(key)),
            Step::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Dot-joined path for a trail, usable with [`get`](crate::get).
pub fn trail_path(trail: &[Step]) -> String {
    let mut out = String::new();
    for (i, step) in trail.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&step.to_string());
    }
    out
}

enum Frame<'s> {
    Object(Members<'s>),
    Array(Elements<'s>, usize),
}

impl<'s> Frame<'s> {
    fn open(data: &'s [u8], span: Span) -> Option<Self> {
        match data.get(span.start)? {
            b'{' => Some(Frame::Object(Members::new(data, span.start))),
            b'[' => Some(Frame::Array(Elements::new(data, span.start), 0)),
            _ => None,
        }
    }

    fn next(&mut self, src: &str) -> Option<(Step, Span)> {
        match self {
            Frame::Object(members) => members.next().map(|(key, value)| {
                let key = scanner::unescape(scanner::string_body(key.slice(src))).into_owned();
                (Step::Key(key), value)
            }),
            Frame::Array(elements, i) => elements.next().map(|value| {
                let step = Step::Index(*i);
                *i += 1;
                (step, value)
            }),
        }
    }
}

/// Visit every value of the document in `src`, root first, in document
/// order. `visit` receives the trail from the root and the value's span in
/// `src`; returning `false` stops the walk.
///
/// Containers nested deeper than `max_depth` are visited but not entered.
pub fn walk<F>(src: &str, max_depth: usize, mut visit: F)
where
    F: FnMut(&[Step], Span) -> bool,
{
    let data = src.as_bytes();
    let Some(root) = scanner::locate_after_whitespace(data, 0) else {
        return;
    };
    let mut trail = Vec::new();
    if !visit(&trail, root) {
        return;
    }
    let mut stack: Vec<Frame<'_>> = Frame::open(data, root).into_iter().collect();
    let mut truncated = false;

    while let Some(frame) = stack.last_mut() {
        let Some((step, value)) = frame.next(src) else {
            stack.pop();
            trail.pop();
            continue;
        };
        trail.push(step);
        if !visit(&trail, value) {
            return;
        }
        match Frame::open(data, value) {
            Some(_) if stack.len() >= max_depth => {
                if !truncated {
                    warn!(max_depth, "traversal depth limit reached, skipping deeper values");
                    truncated = true;
                }
                trail.pop();
            }
            Some(child) => stack.push(child),
            None => {
                trail.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_all(src: &str, max_depth: usize) -> Vec<(String, String)> {
        let mut seen = Vec::new();
        walk(src, max_depth, |trail, span| {
            seen.push((trail_path(trail), span.slice(src).to_owned()));
            true
        });
        seen
    }

    #[test]
    fn visits_in_pre_order() {
        let seen = visit_all(r#"{"a":{"b":1},"c":[2,{"d":3}]}"#, 16);
        let paths: Vec<_> = seen.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["", "a", "a.b", "c", "c.0", "c.1", "c.1.d"]);
        assert_eq!(seen[6].1, "3");
    }

    #[test]
    fn escapes_keys_in_trails() {
        let seen = visit_all(r#"{"x.y":true}"#, 16);
        assert_eq!(seen[1].0, "x\\.y");
    }

    #[test]
    fn depth_limit_skips_deeper_values() {
        let seen = visit_all("[[[1]]]", 2);
        let paths: Vec<_> = seen.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["", "0", "0.0"]);
    }

    #[test]
    fn stops_when_asked() {
        let mut count = 0;
        walk("[1,2,3]", 16, |_, _| {
            count += 1;
            count < 2
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn malformed_root_is_not_walked() {
        assert!(visit_all("[1,2,", 16).is_empty());
        assert!(visit_all("nope", 16).is_empty());
        assert!(visit_all("", 16).is_empty());
    }
}
