//! The result handle returned by every query.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::eval::Evaluator;
use crate::scanner::{self, Elements, Kind, Members, Span};

/// A located (or synthesized) JSON value.
///
/// A context borrowed from a source buffer is a zero-copy view: `raw` points
/// into the buffer and the lifetime `'a` keeps the buffer alive and immutable
/// for as long as the context exists. Multi-selectors, `#` collections and
/// transformers produce owned contexts instead.
///
/// The empty (default) context represents "not found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context<'a> {
    pub(crate) kind: Kind,
    pub(crate) raw: Cow<'a, str>,
    pub(crate) index: Option<usize>,
    pub(crate) indexes: Vec<usize>,
}

impl<'a> Context<'a> {
    pub(crate) fn borrowed(kind: Kind, raw: &'a str, index: Option<usize>) -> Self {
        Self { kind, raw: Cow::Borrowed(raw), index, indexes: Vec::new() }
    }

    /// A context viewing `span` of `src`, where `src` itself starts at
    /// `base` in the original buffer (if known).
    pub(crate) fn from_span(src: &'a str, base: Option<usize>, span: Span) -> Self {
        Self::borrowed(span.kind, span.slice(src), base.map(|b| b + span.start))
    }

    /// Wrap freshly produced JSON text. Text that does not start with a
    /// complete value yields the empty context.
    pub(crate) fn synthesized(raw: String) -> Context<'static> {
        let data = raw.as_bytes();
        let Some(span) = scanner::locate_after_whitespace(data, 0) else {
            return Context::default();
        };
        let raw = if span.start == 0 && span.end == raw.len() {
            raw
        } else {
            span.slice(&raw).to_owned()
        };
        Context { kind: span.kind, raw: Cow::Owned(raw), index: None, indexes: Vec::new() }
    }

    pub(crate) fn number(n: usize) -> Context<'static> {
        Context { kind: Kind::Number, raw: Cow::Owned(n.to_string()), index: None, indexes: Vec::new() }
    }

    /// Detach from the source buffer.
    pub fn into_owned(self) -> Context<'static> {
        Context {
            kind: self.kind,
            raw: Cow::Owned(self.raw.into_owned()),
            index: self.index,
            indexes: self.indexes,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The raw JSON text of the value, exactly as it appears in the source.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `true` when the raw text still borrows the source buffer.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.raw, Cow::Borrowed(_))
    }

    /// Byte offset of [`raw`](Self::raw) in the source buffer, when the
    /// context is a view of it.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Byte offsets of the elements that make up a `#.key` or `#(..)#`
    /// result, for those that are views of the source buffer.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn exists(&self) -> bool {
        !self.raw.is_empty()
    }

    pub fn is_object(&self) -> bool {
        self.kind == Kind::Json && self.raw.starts_with('{')
    }

    pub fn is_array(&self) -> bool {
        self.kind == Kind::Json && self.raw.starts_with('[')
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, Kind::True | Kind::False)
    }

    /// String form of the value: decoded text for strings, raw text for
    /// numbers, booleans and containers, empty for null and missing values.
    pub fn str(&self) -> Cow<'_, str> {
        match self.kind {
            Kind::Null => Cow::Borrowed(""),
            Kind::String => scanner::unescape(scanner::string_body(&self.raw)),
            _ => Cow::Borrowed(&self.raw),
        }
    }

    pub fn bool(&self) -> bool {
        match self.kind {
            Kind::True => true,
            Kind::String => matches!(
                self.str().as_ref(),
                "1" | "t" | "T" | "true" | "TRUE" | "True"
            ),
            Kind::Number => self.f64() != 0.0,
            _ => false,
        }
    }

    pub fn f64(&self) -> f64 {
        match self.kind {
            Kind::True => 1.0,
            Kind::Number => self.raw.parse().unwrap_or(0.0),
            Kind::String => self.str().trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn i64(&self) -> i64 {
        match self.kind {
            Kind::True => 1,
            Kind::Number => self.raw.parse().unwrap_or_else(|_| self.f64() as i64),
            Kind::String => {
                let s = self.str();
                let s = s.trim();
                s.parse().unwrap_or_else(|_| s.parse::<f64>().map(|f| f as i64).unwrap_or(0))
            }
            _ => 0,
        }
    }

    pub fn u64(&self) -> u64 {
        match self.kind {
            Kind::True => 1,
            Kind::Number => self.raw.parse().unwrap_or_else(|_| self.f64().max(0.0) as u64),
            _ => self.i64().max(0) as u64,
        }
    }

    /// Truthiness as used by `~true` / `~false` query tokens: the `true`
    /// literal, non-zero numbers, non-empty strings other than `"false"` and
    /// `"0"`, and non-empty containers.
    pub fn truthy(&self) -> bool {
        match self.kind {
            Kind::True => true,
            Kind::Number => self.f64() != 0.0,
            Kind::String => !matches!(self.str().as_ref(), "" | "false" | "0"),
            Kind::Json => {
                let inner = &self.raw[1..self.raw.len().saturating_sub(1).max(1)];
                !inner.trim().is_empty()
            }
            Kind::Null | Kind::False => false,
        }
    }

    /// Elements of an array. A scalar yields itself, a missing value nothing.
    pub fn array(&self) -> Vec<Context<'a>> {
        if !self.exists() {
            return Vec::new();
        }
        if !self.is_array() {
            return vec![self.clone()];
        }
        match &self.raw {
            Cow::Borrowed(src) => elements(src, self.index),
            Cow::Owned(src) => elements(src, None).into_iter().map(Context::into_owned).collect(),
        }
    }

    /// Members of an object, in document order. For duplicate keys the first
    /// occurrence wins, matching path lookup.
    pub fn map(&self) -> IndexMap<String, Context<'a>> {
        if !self.is_object() {
            return IndexMap::new();
        }
        let pairs = match &self.raw {
            Cow::Borrowed(src) => members(src, self.index),
            Cow::Owned(src) => members(src, None)
                .into_iter()
                .map(|(k, v)| (k, v.into_owned()))
                .collect(),
        };
        let mut map = IndexMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            map.entry(key).or_insert(value);
        }
        map
    }

    /// Visit every member (objects) or element (arrays) until `f` returns
    /// `false`. For arrays the key is the empty context; a scalar is visited
    /// once as its own value.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Context<'_>, Context<'_>) -> bool,
    {
        if !self.exists() {
            return;
        }
        let src: &str = &self.raw;
        let data = src.as_bytes();
        if self.is_object() {
            for (key, value) in Members::new(data, 0) {
                if !f(Context::from_span(src, self.index, key), Context::from_span(src, self.index, value)) {
                    return;
                }
            }
        } else if self.is_array() {
            for value in Elements::new(data, 0) {
                if !f(Context::default(), Context::from_span(src, self.index, value)) {
                    return;
                }
            }
        } else {
            f(Context::default(), self.clone());
        }
    }

    /// Evaluate `path` against this value with the process-wide transformer
    /// registry. Results keep borrowing the original buffer when `self` does.
    pub fn get(&self, path: &str) -> Context<'a> {
        Evaluator::global().get_from(self.clone(), path)
    }

    /// Decode into a `serde_json::Value`; missing or undecodable values
    /// become `Value::Null`.
    pub fn value(&self) -> Value {
        if !self.exists() {
            return Value::Null;
        }
        serde_json::from_str(&self.raw).unwrap_or(Value::Null)
    }

    /// Ordering used by sorting helpers: values of different kinds order by
    /// kind, strings lexically (optionally ignoring ASCII case), numbers
    /// numerically, everything else by raw text.
    pub fn less(&self, other: &Context<'_>, case_sensitive: bool) -> bool {
        if self.kind != other.kind {
            return self.kind < other.kind;
        }
        match self.kind {
            Kind::String if case_sensitive => self.str() < other.str(),
            Kind::String => self.str().to_lowercase() < other.str().to_lowercase(),
            Kind::Number => self.f64().partial_cmp(&other.f64()) == Some(Ordering::Less),
            _ => self.raw < other.raw,
        }
    }
}

impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str())
    }
}

fn elements(src: &str, base: Option<usize>) -> Vec<Context<'_>> {
    Elements::new(src.as_bytes(), 0)
        .map(|span| Context::from_span(src, base, span))
        .collect()
}

fn members(src: &str, base: Option<usize>) -> Vec<(String, Context<'_>)> {
    Members::new(src.as_bytes(), 0)
        .map(|(key, value)| {
            let name = scanner::unescape(scanner::string_body(key.slice(src))).into_owned();
            (name, Context::from_span(src, base, value))
        })
        .collect()
}
