//! Text-level JSON formatting.
//!
//! Both formatters copy scalars and keys verbatim from the input, so numbers
//! keep their original spelling and strings their original escapes.

use serde::Deserialize;

use crate::options::DEFAULT_MAX_DEPTH;
use crate::scanner::{self, Elements, Kind, Members, Span};

/// Layout for [`pretty`], decoded from the `@pretty` argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrettyOptions {
    /// Per-level indentation.
    pub indent: String,
    /// Written at the start of every line.
    pub prefix: String,
    /// Order object members by key.
    pub sort_keys: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self { indent: "  ".to_owned(), prefix: String::new(), sort_keys: false }
    }
}

/// Multi-line layout of a single JSON value. Input that is not one
/// well-formed value is returned unchanged.
pub fn pretty(json: &str, options: &PrettyOptions) -> String {
    pretty_with_depth(json, options, DEFAULT_MAX_DEPTH)
}

/// Like [`pretty`], with containers deeper than `max_depth` written on one
/// line.
pub fn pretty_with_depth(json: &str, options: &PrettyOptions, max_depth: usize) -> String {
    let data = json.as_bytes();
    let Some(span) = whole_value(json) else {
        return json.to_owned();
    };
    let mut out = String::with_capacity(json.len() * 2);
    out.push_str(&options.prefix);
    Printer { src: json, data, options, max_depth }.value(&mut out, span, 0);
    out
}

/// The value spanning all of `json` (surrounding whitespace allowed), if it
/// is well-formed.
fn whole_value(json: &str) -> Option<Span> {
    if !scanner::validate(json.as_bytes(), usize::MAX) {
        return None;
    }
    scanner::locate_after_whitespace(json.as_bytes(), 0)
}

struct Printer<'s> {
    src: &'s str,
    data: &'s [u8],
    options: &'s PrettyOptions,
    max_depth: usize,
}

impl Printer<'_> {
    fn value(&self, out: &mut String, span: Span, level: usize) {
        if span.kind != Kind::Json {
            out.push_str(span.slice(self.src));
            return;
        }
        if level >= self.max_depth {
            minify_into(out, span.slice(self.src));
            return;
        }
        if self.data[span.start] == b'{' {
            let mut members: Vec<(Span, Span)> = Members::new(self.data, span.start).collect();
            if self.options.sort_keys {
                members.sort_by_cached_key(|(key, _)| {
                    scanner::unescape(scanner::string_body(key.slice(self.src))).into_owned()
                });
            }
            self.container(out, b'{', members.len(), level, |out, i| {
                let (key, value) = members[i];
                out.push_str(key.slice(self.src));
                out.push_str(": ");
                self.value(out, value, level + 1);
            });
        } else {
            let elements: Vec<Span> = Elements::new(self.data, span.start).collect();
            self.container(out, b'[', elements.len(), level, |out, i| {
                self.value(out, elements[i], level + 1);
            });
        }
    }

    fn container<F>(&self, out: &mut String, open: u8, len: usize, level: usize, mut item: F)
    where
        F: FnMut(&mut String, usize),
    {
        let close = if open == b'{' { '}' } else { ']' };
        out.push(open as char);
        if len == 0 {
            out.push(close);
            return;
        }
        for i in 0..len {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, level + 1);
            item(out, i);
        }
        self.newline(out, level);
        out.push(close);
    }

    fn newline(&self, out: &mut String, level: usize) {
        out.push('\n');
        out.push_str(&self.options.prefix);
        for _ in 0..level {
            out.push_str(&self.options.indent);
        }
    }
}

/// Strip all insignificant whitespace. Non-JSON input is returned unchanged.
pub fn minify(json: &str) -> String {
    let Some(span) = whole_value(json) else {
        return json.to_owned();
    };
    let mut out = String::with_capacity(span.end - span.start);
    minify_into(&mut out, span.slice(json));
    out
}

fn minify_into(out: &mut String, src: &str) {
    let data = src.as_bytes();
    let mut x = 0;
    let mut copied = 0;
    while x < data.len() {
        match data[x] {
            b'"' => x = scanner::scan_string(data, x).unwrap_or(data.len()),
            b' ' | b'\t' | b'\n' | b'\r' => {
                out.push_str(&src[copied..x]);
                x = scanner::skip_whitespace(data, x);
                copied = x;
            }
            _ => x += 1,
        }
    }
    out.push_str(&src[copied..]);
}
