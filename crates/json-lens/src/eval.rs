//! Path evaluation over raw JSON text.

use std::borrow::Cow;

use json_lens_util::wildcard;
use tracing::warn;

use crate::context::Context;
use crate::multi;
use crate::options::Options;
use crate::parser::{ParseError, PathParser};
use crate::query;
use crate::scanner::{self, Elements, Kind, Members, Span};
use crate::transform::{self, TransformerRegistry};
use crate::types::*;
use crate::util::json_array;
use crate::walk::{self, Step};

/// Resolves compiled paths against JSON text.
///
/// Each segment narrows the current value by scanning its raw text; nothing
/// is decoded into a tree. Results that are plain sub-values borrow the input,
/// synthesized results (collections, projections, transformer output) own
/// their text.
#[derive(Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r TransformerRegistry,
    options: Options,
}

impl<'r> Evaluator<'r> {
    /// Evaluator over an explicit registry.
    ///
    /// `registry` and `options` govern the path being evaluated. Built-in
    /// transformers that evaluate paths of their own (`@search`, `@filter`,
    /// `@pluck`) and [`Context::get`] run those paths with
    /// [`Evaluator::global`], so transformers registered only in `registry`
    /// are not visible inside them.
    pub fn new(registry: &'r TransformerRegistry, options: Options) -> Self {
        Self { registry, options }
    }

    /// Evaluator over the process-wide registry with default options.
    pub fn global() -> Evaluator<'static> {
        Evaluator::new(transform::global(), Options::default())
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &'r TransformerRegistry {
        self.registry
    }

    /// Evaluate `path` against `json`. Malformed paths yield the empty
    /// context; use [`try_get`](Self::try_get) to see the parse error.
    pub fn get<'a>(&self, json: &'a str, path: &str) -> Context<'a> {
        self.try_get(json, path).unwrap_or_default()
    }

    pub fn try_get<'a>(&self, json: &'a str, path: &str) -> Result<Context<'a>, ParseError> {
        let path = PathParser::parse(path)?;
        Ok(self.eval(json, &path))
    }

    /// Evaluate a compiled path against `json`.
    pub fn eval<'a>(&self, json: &'a str, path: &Path) -> Context<'a> {
        self.eval_segments(json, &path.segments)
    }

    fn eval_segments<'a>(&self, json: &'a str, segments: &[Segment]) -> Context<'a> {
        match segments.split_first() {
            Some((Segment::Lines(each), rest)) => {
                let lines = self.lines(json, Some(0), each);
                self.resolve_segments(lines, rest)
            }
            _ => self.resolve_segments(crate::parse(json), segments),
        }
    }

    /// Every match of `path` as its own context.
    ///
    /// When the path ends in a collecting segment (`#.key`, `#(..)#`,
    /// `a..key`, `..key`) the per-match results are returned as they are,
    /// before they would be joined into one synthesized array, so matches
    /// that are plain sub-values keep borrowing `json`. Any other path yields
    /// its single result, or nothing when it does not resolve.
    pub fn get_all<'a>(&self, json: &'a str, path: &str) -> Vec<Context<'a>> {
        match PathParser::parse(path) {
            Ok(path) => self.eval_all(json, &path),
            Err(_) => Vec::new(),
        }
    }

    /// [`get_all`](Self::get_all) for a compiled path.
    pub fn eval_all<'a>(&self, json: &'a str, path: &Path) -> Vec<Context<'a>> {
        let (last, init) = match path.segments.split_last() {
            Some((last, init)) if collects(last) => (last, init),
            _ => {
                let ctx = self.eval(json, path);
                return if ctx.exists() { vec![ctx] } else { Vec::new() };
            }
        };
        if let (true, Segment::Lines(each)) = (init.is_empty(), last) {
            return self.line_items(json, Some(0), each);
        }
        let cur = self.eval_segments(json, init);
        if !cur.exists() {
            return Vec::new();
        }
        if let Segment::CollectAll(each) = last {
            return self.collect_all_items(&cur, each);
        }
        match &cur.raw {
            Cow::Borrowed(src) => self.narrow_items(*src, cur.index, last),
            Cow::Owned(src) => self
                .narrow_items(src, None, last)
                .into_iter()
                .map(Context::into_owned)
                .collect(),
        }
    }

    fn narrow_items<'s>(&self, src: &'s str, base: Option<usize>, segment: &Segment) -> Vec<Context<'s>> {
        match segment {
            Segment::Query(q) => self.query_items(src, base, q),
            Segment::Descent(d) => self.descent_items(src, base, &d.key, &d.each),
            Segment::Lines(each) => self.line_items(src, base, each),
            _ => Vec::new(),
        }
    }

    pub(crate) fn get_from<'a>(&self, cur: Context<'a>, path: &str) -> Context<'a> {
        match PathParser::parse(path) {
            Ok(path) => self.resolve(cur, &path),
            Err(_) => Context::default(),
        }
    }

    /// Evaluate a compiled path relative to an existing context.
    pub fn resolve<'a>(&self, cur: Context<'a>, path: &Path) -> Context<'a> {
        self.resolve_segments(cur, &path.segments)
    }

    fn resolve_segments<'a>(&self, mut cur: Context<'a>, segments: &[Segment]) -> Context<'a> {
        for segment in segments {
            if !cur.exists() && !matches!(segment, Segment::Literal(_)) {
                return Context::default();
            }
            cur = self.step(cur, segment);
        }
        cur
    }

    /// Evaluate several paths against one document.
    ///
    /// Paths starting with a plain key are answered from a single pass over
    /// the top-level object; the rest are evaluated one by one. Paths that do
    /// not compile yield the empty context.
    pub fn get_many<'a>(&self, json: &'a str, paths: &[&str]) -> Vec<Context<'a>> {
        let compiled: Vec<Option<Path>> = paths.iter().map(|p| PathParser::parse(p).ok()).collect();
        let mut results = vec![Context::default(); paths.len()];
        let mut pending = Vec::new();

        for (i, path) in compiled.iter().enumerate() {
            match path {
                Some(path) if matches!(path.segments.first(), Some(Segment::Field(_))) => pending.push(i),
                Some(path) => results[i] = self.eval(json, path),
                None => {}
            }
        }
        if pending.is_empty() {
            return results;
        }

        let data = json.as_bytes();
        let Some(root) = scanner::locate_after_whitespace(data, 0) else {
            return results;
        };
        for (key, value) in Members::new(data, root.start) {
            if pending.is_empty() {
                break;
            }
            let key = key.slice(json);
            pending.retain(|&i| {
                let Some(path) = &compiled[i] else {
                    return false;
                };
                let Some((Segment::Field(name), rest)) = path.segments.split_first() else {
                    return false;
                };
                if !scanner::key_equals(key, name) {
                    return true;
                }
                results[i] = self.resolve_segments(Context::from_span(json, Some(0), value), rest);
                false
            });
        }
        results
    }

    fn step<'a>(&self, cur: Context<'a>, segment: &Segment) -> Context<'a> {
        match segment {
            Segment::Literal(json) => return Context::synthesized(json.clone()),
            Segment::MultiSelect(multi) => return multi::build(self, &cur, multi),
            Segment::CollectAll(each) => return self.collect_all(&cur, each),
            _ => {}
        }
        // Owned text lives only as long as `cur`, so results derived from it
        // are detached before `cur` goes away.
        match &cur.raw {
            Cow::Borrowed(src) => self.narrow(&cur, *src, cur.index, segment),
            Cow::Owned(src) => self.narrow(&cur, src, None, segment).into_owned(),
        }
    }

    /// Segments that select within the current value's text.
    fn narrow<'s>(&self, cur: &Context<'_>, src: &'s str, base: Option<usize>, segment: &Segment) -> Context<'s> {
        let data = src.as_bytes();
        match segment {
            Segment::Field(name) => field(src, base, name),
            Segment::Index(n) => match data.first() {
                Some(b'[') => Elements::new(data, 0)
                    .nth(*n)
                    .map(|span| Context::from_span(src, base, span))
                    .unwrap_or_default(),
                Some(b'{') => field(src, base, &n.to_string()),
                _ => Context::default(),
            },
            Segment::Wildcard(pattern) => match data.first() {
                Some(b'{') => Members::new(data, 0)
                    .find(|(key, _)| {
                        wildcard::matches(pattern, &scanner::unescape(scanner::string_body(key.slice(src))))
                    })
                    .map(|(_, value)| Context::from_span(src, base, value))
                    .unwrap_or_default(),
                Some(b'[') => Elements::new(data, 0)
                    .map(|span| Context::from_span(src, base, span))
                    .find(|elem| wildcard::matches(pattern, &elem.str()))
                    .unwrap_or_default(),
                _ => Context::default(),
            },
            Segment::Length => match data.first() {
                Some(b'[') => Context::number(Elements::new(data, 0).count()),
                Some(b'{') => Context::number(Members::new(data, 0).count()),
                _ => Context::default(),
            },
            Segment::Query(q) => self.query(src, base, q),
            Segment::Transform(t) => self.transform(cur, src, base, t),
            Segment::Descent(d) => self.descend(src, base, &d.key, &d.each),
            Segment::Lines(each) => self.lines(src, base, each),
            Segment::Literal(_) | Segment::MultiSelect(_) | Segment::CollectAll(_) => Context::default(),
        }
    }

    fn collect_all<'a>(&self, cur: &Context<'a>, each: &Path) -> Context<'a> {
        if !cur.is_array() {
            return Context::default();
        }
        collect(self.collect_all_items(cur, each))
    }

    fn collect_all_items<'a>(&self, cur: &Context<'a>, each: &Path) -> Vec<Context<'a>> {
        if !cur.is_array() {
            return Vec::new();
        }
        cur.array()
            .into_iter()
            .map(|elem| self.resolve(elem, each))
            .filter(Context::exists)
            .collect()
    }

    fn query<'s>(&self, src: &'s str, base: Option<usize>, q: &Query) -> Context<'s> {
        if src.as_bytes().first() != Some(&b'[') {
            return Context::default();
        }
        if !q.all {
            return Elements::new(src.as_bytes(), 0)
                .map(|span| Context::from_span(src, base, span))
                .find(|elem| query::matches(self, elem, &q.expr))
                .unwrap_or_default();
        }
        collect(self.query_items(src, base, q))
    }

    /// Matches of `#(..)#`, with the per-match sub-path applied.
    fn query_items<'s>(&self, src: &'s str, base: Option<usize>, q: &Query) -> Vec<Context<'s>> {
        let data = src.as_bytes();
        if data.first() != Some(&b'[') {
            return Vec::new();
        }
        Elements::new(data, 0)
            .map(|span| Context::from_span(src, base, span))
            .filter(|elem| query::matches(self, elem, &q.expr))
            .map(|elem| self.resolve(elem, &q.each))
            .filter(Context::exists)
            .collect()
    }

    fn transform<'s>(&self, cur: &Context<'_>, src: &'s str, base: Option<usize>, t: &Transform) -> Context<'s> {
        if !self.options.transformers {
            return field(src, base, &t.source);
        }
        match self.registry.resolve(&t.name) {
            Some(transformer) => Context::synthesized(transformer.transform(src, t.arg.as_deref().unwrap_or(""))),
            None => {
                warn!(name = %t.name, "unknown transformer, passing value through");
                Context::borrowed(cur.kind, src, base)
            }
        }
    }

    /// Every member at any depth below the root of `src` whose key matches
    /// `pattern`, in document order, with `each` applied.
    pub(crate) fn descend<'s>(&self, src: &'s str, base: Option<usize>, pattern: &str, each: &Path) -> Context<'s> {
        collect(self.descent_items(src, base, pattern, each))
    }

    fn descent_items<'s>(&self, src: &'s str, base: Option<usize>, pattern: &str, each: &Path) -> Vec<Context<'s>> {
        let mut spans: Vec<Span> = Vec::new();
        walk::walk(src, self.options.max_depth, |trail, span| {
            if let Some(Step::Key(key)) = trail.last() {
                if wildcard::matches(pattern, key) {
                    spans.push(span);
                }
            }
            true
        });
        spans
            .into_iter()
            .map(|span| self.resolve(Context::from_span(src, base, span), each))
            .filter(Context::exists)
            .collect()
    }

    /// Apply `each` to every whitespace-separated top-level value of `src`.
    /// A malformed line is skipped up to the next newline.
    fn lines<'s>(&self, src: &'s str, base: Option<usize>, each: &Path) -> Context<'s> {
        collect(self.line_items(src, base, each))
    }

    fn line_items<'s>(&self, src: &'s str, base: Option<usize>, each: &Path) -> Vec<Context<'s>> {
        let data = src.as_bytes();
        let mut results = Vec::new();
        let mut x = scanner::skip_whitespace(data, 0);
        while x < data.len() {
            match scanner::locate(data, x) {
                Some(span) => {
                    let line = self.resolve(Context::from_span(src, base, span), each);
                    if line.exists() {
                        results.push(line);
                    }
                    x = span.end;
                }
                None => match memchr::memchr(b'\n', &data[x..]) {
                    Some(nl) => x += nl + 1,
                    None => break,
                },
            }
            x = scanner::skip_whitespace(data, x);
        }
        results
    }
}

/// Segments whose result is an array synthesized from several matches.
fn collects(segment: &Segment) -> bool {
    match segment {
        Segment::CollectAll(_) | Segment::Descent(_) | Segment::Lines(_) => true,
        Segment::Query(q) => q.all,
        _ => false,
    }
}

fn field<'s>(src: &'s str, base: Option<usize>, name: &str) -> Context<'s> {
    let data = src.as_bytes();
    if data.first() != Some(&b'{') {
        return Context::default();
    }
    Members::new(data, 0)
        .find(|(key, _)| scanner::key_equals(key.slice(src), name))
        .map(|(_, value)| Context::from_span(src, base, value))
        .unwrap_or_default()
}

/// Synthesize an array from existing results, keeping the source offsets of
/// those that borrow the buffer.
fn collect(results: Vec<Context<'_>>) -> Context<'static> {
    let indexes = results.iter().filter_map(Context::index).collect();
    let raw = json_array(results.iter().map(Context::raw));
    Context { kind: Kind::Json, raw: Cow::Owned(raw), index: None, indexes }
}
