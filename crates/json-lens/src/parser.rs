//! Path expression compiler.
//!
//! The parser works on byte ranges of the input rather than a token stream:
//! grouped constructs (`#(..)`, `{..}`, `[..]`, JSON arguments) are first
//! delimited with a balanced scan and then parsed as sub-ranges. Every nested
//! sub-range costs one level of [`MAX_NESTING`].

use json_lens_util::wildcard;
use thiserror::Error;

use crate::scanner;
use crate::types::*;

/// Maximum nesting of sub-paths (multi-selectors, queries, per-element paths).
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty path")]
    Empty,
    #[error("Empty path segment at {0}")]
    EmptySegment(usize),
    #[error("Unclosed string starting at {0}")]
    UnclosedString(usize),
    #[error("Unbalanced group opened at {open}, mismatch at {pos}")]
    Unbalanced { open: usize, pos: usize },
    #[error("Empty selector at {0}")]
    EmptySelector(usize),
    #[error("Invalid literal at {0}")]
    InvalidLiteral(usize),
    #[error("Invalid query expression at {0}")]
    InvalidQuery(usize),
    #[error("Unexpected character {0:?} at {1}")]
    UnexpectedChar(char, usize),
    #[error("Path nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// Path compiler.
pub struct PathParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
}

impl<'a> PathParser<'a> {
    /// Compile a path expression.
    pub fn parse(input: &'a str) -> Result<Path, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        let parser = Self { input, bytes: input.as_bytes() };
        parser.parse_range(0, input.len(), 0, true)
    }

    fn byte(&self, x: usize, end: usize) -> Option<u8> {
        (x < end).then(|| self.bytes[x])
    }

    fn char_at(&self, x: usize) -> char {
        self.input[x..].chars().next().unwrap_or('\0')
    }

    fn parse_range(&self, start: usize, end: usize, depth: usize, top: bool) -> Result<Path, ParseError> {
        if depth > MAX_NESTING {
            return Err(ParseError::TooDeep(MAX_NESTING));
        }
        let mut segments = Vec::new();
        if start >= end {
            return Ok(Path::new(segments));
        }

        let mut pos = start;
        if self.bytes[start..end].starts_with(b"..") {
            let (segment, stop) = if top {
                self.parse_lines(start + 2, end, depth)?
            } else {
                self.parse_descent(start + 2, end, depth)?
            };
            segments.push(segment);
            match self.advance(stop, end, depth, &mut segments)? {
                Some(next) => pos = next,
                None => return Ok(Path::new(segments)),
            }
        }

        loop {
            let (segment, stop) = self.parse_component(pos, end, depth)?;
            segments.push(segment);
            match self.advance(stop, end, depth, &mut segments)? {
                Some(next) => pos = next,
                None => return Ok(Path::new(segments)),
            }
        }
    }

    /// Consume the separator at `stop`. Returns where the next component
    /// starts, or `None` at the end of the range. `a..key` descents are
    /// pushed here since they hang off the separator.
    fn advance(
        &self,
        mut stop: usize,
        end: usize,
        depth: usize,
        segments: &mut Vec<Segment>,
    ) -> Result<Option<usize>, ParseError> {
        loop {
            match self.byte(stop, end) {
                None => return Ok(None),
                Some(b'.' | b'|') if stop + 1 == end => return Err(ParseError::EmptySegment(end)),
                Some(b'|') => return Ok(Some(stop + 1)),
                Some(b'.') if self.byte(stop + 1, end) == Some(b'.') => {
                    let (segment, next) = self.parse_descent(stop + 2, end, depth)?;
                    segments.push(segment);
                    stop = next;
                }
                Some(b'.') => return Ok(Some(stop + 1)),
                Some(_) => return Err(ParseError::UnexpectedChar(self.char_at(stop), stop)),
            }
        }
    }

    fn parse_component(&self, pos: usize, end: usize, depth: usize) -> Result<(Segment, usize), ParseError> {
        match self.byte(pos, end) {
            None | Some(b'.' | b'|') => Err(ParseError::EmptySegment(pos)),
            Some(b'@') => self.parse_transform(pos, end),
            Some(b'!') => self.parse_literal(pos, end),
            Some(b'{' | b'[') => self.parse_multi(pos, end, depth),
            Some(b'#') => match self.byte(pos + 1, end) {
                None | Some(b'|') => Ok((Segment::Length, pos + 1)),
                Some(b'.') => {
                    let (each, stop) = self.each_path(pos + 1, end, depth)?;
                    Ok((Segment::CollectAll(each), stop))
                }
                Some(b'(') => self.parse_query(pos, end, depth),
                _ => self.parse_plain(pos, end),
            },
            _ => self.parse_plain(pos, end),
        }
    }

    /// End of a plain component: the next unescaped `.` or `|`.
    fn scan_plain(&self, mut x: usize, end: usize) -> usize {
        while x < end {
            match self.bytes[x] {
                b'\\' => x += 2,
                b'.' | b'|' => break,
                _ => x += 1,
            }
        }
        x.min(end)
    }

    fn parse_plain(&self, pos: usize, end: usize) -> Result<(Segment, usize), ParseError> {
        let stop = self.scan_plain(pos, end);
        let raw = &self.input[pos..stop];
        if raw.is_empty() {
            return Err(ParseError::EmptySegment(pos));
        }
        let segment = if raw.bytes().all(|b| b.is_ascii_digit()) {
            match raw.parse() {
                Ok(n) => Segment::Index(n),
                Err(_) => Segment::Field(raw.to_owned()),
            }
        } else if wildcard::is_pattern(raw) {
            Segment::Wildcard(raw.to_owned())
        } else {
            Segment::Field(unescape_component(raw))
        };
        Ok((segment, stop))
    }

    /// The per-element path after the `.` at `dot`, up to the next top-level
    /// pipe. A second dot starts it with a recursive descent.
    fn each_path(&self, dot: usize, end: usize, depth: usize) -> Result<(Path, usize), ParseError> {
        let from = if self.byte(dot + 1, end) == Some(b'.') { dot } else { dot + 1 };
        let stop = self.find_pipe(from, end)?;
        if from >= stop {
            return Err(ParseError::EmptySegment(stop));
        }
        Ok((self.parse_range(from, stop, depth + 1, false)?, stop))
    }

    fn parse_lines(&self, from: usize, end: usize, depth: usize) -> Result<(Segment, usize), ParseError> {
        let stop = self.find_pipe(from, end)?;
        let each = self.parse_range(from, stop, depth + 1, false)?;
        Ok((Segment::Lines(each), stop))
    }

    fn parse_descent(&self, from: usize, end: usize, depth: usize) -> Result<(Segment, usize), ParseError> {
        let key_end = self.scan_plain(from, end);
        if key_end == from {
            return Err(ParseError::EmptySegment(from));
        }
        let key = self.input[from..key_end].to_owned();
        let (each, stop) = match self.byte(key_end, end) {
            Some(b'.') => self.each_path(key_end, end, depth)?,
            _ => (Path::default(), key_end),
        };
        Ok((Segment::Descent(Descent { key, each }), stop))
    }

    fn parse_transform(&self, pos: usize, end: usize) -> Result<(Segment, usize), ParseError> {
        let mut name_end = pos + 1;
        while name_end < end && !matches!(self.bytes[name_end], b':' | b'.' | b'|') {
            name_end += 1;
        }
        if name_end == pos + 1 {
            return Err(ParseError::EmptySegment(pos));
        }
        let name = self.input[pos + 1..name_end].to_owned();
        let (arg, stop) = if self.byte(name_end, end) == Some(b':') {
            let (arg, stop) = self.parse_arg(name_end + 1, end)?;
            (Some(arg), stop)
        } else {
            (None, name_end)
        };
        let source = self.input[pos..stop].to_owned();
        Ok((Segment::Transform(Transform { name, arg, source }), stop))
    }

    fn parse_arg(&self, start: usize, end: usize) -> Result<(String, usize), ParseError> {
        let bounded = &self.bytes[..end];
        match self.byte(start, end) {
            None => Ok((String::new(), start)),
            Some(b @ (b'{' | b'[' | b'"')) => {
                let stop = match scanner::locate(bounded, start) {
                    Some(span) => span.end,
                    None if b == b'"' => return Err(ParseError::UnclosedString(start)),
                    None => return Err(ParseError::Unbalanced { open: start, pos: end }),
                };
                self.expect_separator(stop, end)?;
                Ok((self.input[start..stop].to_owned(), stop))
            }
            Some(_) => {
                if let Some(span) = scanner::locate(bounded, start) {
                    if matches!(self.byte(span.end, end), None | Some(b'.' | b'|')) {
                        return Ok((self.input[start..span.end].to_owned(), span.end));
                    }
                }
                let stop = self.scan_plain(start, end);
                Ok((unescape_component(&self.input[start..stop]), stop))
            }
        }
    }

    fn expect_separator(&self, stop: usize, end: usize) -> Result<(), ParseError> {
        match self.byte(stop, end) {
            None | Some(b'.' | b'|') => Ok(()),
            Some(_) => Err(ParseError::UnexpectedChar(self.char_at(stop), stop)),
        }
    }

    fn parse_literal(&self, pos: usize, end: usize) -> Result<(Segment, usize), ParseError> {
        let span = scanner::locate(&self.bytes[..end], pos + 1).ok_or(ParseError::InvalidLiteral(pos))?;
        if !matches!(self.byte(span.end, end), None | Some(b'.' | b'|')) {
            return Err(ParseError::InvalidLiteral(pos));
        }
        Ok((Segment::Literal(span.slice(self.input).to_owned()), span.end))
    }

    fn parse_multi(&self, pos: usize, end: usize, depth: usize) -> Result<(Segment, usize), ParseError> {
        let close = self.find_close(pos, end)?;
        let as_array = self.bytes[pos] == b'[';
        let (body_start, body_end) = self.trim(pos + 1, close);
        if body_start == body_end {
            return Err(ParseError::EmptySelector(pos));
        }
        let mut entries = Vec::new();
        for (s, e) in self.split_top(body_start, body_end, b",")? {
            let (s, e) = self.trim(s, e);
            if s == e {
                return Err(ParseError::EmptySegment(s));
            }
            entries.push(self.parse_entry(s, e, depth)?);
        }
        Ok((Segment::MultiSelect(MultiSelect { entries, as_array }), close + 1))
    }

    fn parse_entry(&self, s: usize, e: usize, depth: usize) -> Result<SelectEntry, ParseError> {
        if self.bytes[s] != b'"' {
            let path = self.parse_range(s, e, depth + 1, false)?;
            let key = default_key(&path, &self.input[s..e]);
            return Ok(SelectEntry { key, path });
        }
        let key_end = scanner::scan_string(&self.bytes[..e], s).ok_or(ParseError::UnclosedString(s))?;
        let key = scanner::unescape(scanner::string_body(&self.input[s..key_end])).into_owned();
        let colon = self.skip_spaces(key_end, e);
        match self.byte(colon, e) {
            Some(b':') => {}
            Some(_) => return Err(ParseError::UnexpectedChar(self.char_at(colon), colon)),
            None => return Err(ParseError::EmptySegment(colon)),
        }
        let from = self.skip_spaces(colon + 1, e);
        if from == e {
            return Err(ParseError::EmptySegment(from));
        }
        let path = self.parse_range(from, e, depth + 1, false)?;
        Ok(SelectEntry { key, path })
    }

    fn parse_query(&self, pos: usize, end: usize, depth: usize) -> Result<(Segment, usize), ParseError> {
        let close = self.find_close(pos + 1, end)?;
        let expr = self.parse_expr(pos + 2, close, depth + 1)?;
        let mut stop = close + 1;
        let all = self.byte(stop, end) == Some(b'#');
        if all {
            stop += 1;
        }
        let each = if all && self.byte(stop, end) == Some(b'.') {
            let (each, next) = self.each_path(stop, end, depth)?;
            stop = next;
            each
        } else {
            Path::default()
        };
        Ok((Segment::Query(Query { expr, all, each }), stop))
    }

    fn parse_expr(&self, start: usize, end: usize, depth: usize) -> Result<QueryExpr, ParseError> {
        if depth > MAX_NESTING {
            return Err(ParseError::TooDeep(MAX_NESTING));
        }
        let mut alternatives = Vec::new();
        for (os, oe) in self.split_top(start, end, b"||")? {
            let mut terms = Vec::new();
            for (s, e) in self.split_top(os, oe, b"&&")? {
                terms.push(QueryExpr::Compare(self.parse_comparison(s, e, depth)?));
            }
            alternatives.push(fold(terms, QueryExpr::And).ok_or(ParseError::InvalidQuery(os))?);
        }
        fold(alternatives, QueryExpr::Or).ok_or(ParseError::InvalidQuery(start))
    }

    fn parse_comparison(&self, start: usize, end: usize, depth: usize) -> Result<Comparison, ParseError> {
        let (s, e) = self.trim(start, end);
        if s == e {
            return Err(ParseError::InvalidQuery(s));
        }
        let Some((at, op, len)) = self.find_operator(s, e)? else {
            let field = self.parse_range(s, e, depth + 1, false)?;
            return Ok(Comparison { field, op: None, value: QueryValue::None });
        };
        let (fs, fe) = self.trim(s, at);
        let field = self.parse_range(fs, fe, depth + 1, false)?;
        let (vs, ve) = self.trim(at + len, e);
        if vs == ve {
            return Err(ParseError::InvalidQuery(at));
        }
        let value = self.parse_value(vs, ve)?;
        Ok(Comparison { field, op: Some(op), value })
    }

    fn find_operator(&self, start: usize, end: usize) -> Result<Option<(usize, QueryOp, usize)>, ParseError> {
        let mut depth = 0usize;
        let mut x = start;
        while x < end {
            let next = self.byte(x + 1, end);
            let found = match self.bytes[x] {
                b'\\' => {
                    x += 2;
                    continue;
                }
                b'"' => {
                    x = self.skip_string(x, end)?;
                    continue;
                }
                b'(' | b'[' | b'{' => {
                    depth += 1;
                    None
                }
                b')' | b']' | b'}' => {
                    depth = depth.saturating_sub(1);
                    None
                }
                _ if depth > 0 => None,
                b'=' if next == Some(b'=') => Some((QueryOp::Eq, 2)),
                b'=' => Some((QueryOp::Eq, 1)),
                b'!' if next == Some(b'=') => Some((QueryOp::Ne, 2)),
                b'!' if next == Some(b'%') => Some((QueryOp::NotLike, 2)),
                b'<' if next == Some(b'=') => Some((QueryOp::Le, 2)),
                b'<' => Some((QueryOp::Lt, 1)),
                b'>' if next == Some(b'=') => Some((QueryOp::Ge, 2)),
                b'>' => Some((QueryOp::Gt, 1)),
                b'%' => Some((QueryOp::Like, 1)),
                _ => None,
            };
            if let Some((op, len)) = found {
                return Ok(Some((x, op, len)));
            }
            x += 1;
        }
        Ok(None)
    }

    fn parse_value(&self, start: usize, end: usize) -> Result<QueryValue, ParseError> {
        let text = &self.input[start..end];
        let value = match text {
            "~true" => QueryValue::Tilde(Tilde::True),
            "~false" => QueryValue::Tilde(Tilde::False),
            "~null" => QueryValue::Tilde(Tilde::Null),
            "~*" => QueryValue::Tilde(Tilde::Any),
            "true" => QueryValue::Bool(true),
            "false" => QueryValue::Bool(false),
            "null" => QueryValue::Null,
            _ if text.starts_with('~') => return Err(ParseError::InvalidQuery(start)),
            _ if text.starts_with('"') => {
                let stop = scanner::scan_string(text.as_bytes(), 0).ok_or(ParseError::UnclosedString(start))?;
                if stop != text.len() {
                    return Err(ParseError::InvalidQuery(start));
                }
                QueryValue::Str(scanner::unescape(scanner::string_body(text)).into_owned())
            }
            _ => match scanner::scan_number(text.as_bytes(), 0) {
                Some(n) if n == text.len() => match text.parse() {
                    Ok(num) => QueryValue::Num(num),
                    Err(_) => QueryValue::Str(text.to_owned()),
                },
                _ => QueryValue::Str(text.to_owned()),
            },
        };
        Ok(value)
    }

    fn skip_string(&self, x: usize, end: usize) -> Result<usize, ParseError> {
        scanner::scan_string(&self.bytes[..end], x).ok_or(ParseError::UnclosedString(x))
    }

    /// Position of the bracket closing the group opened at `open`.
    fn find_close(&self, open: usize, end: usize) -> Result<usize, ParseError> {
        let mut stack = Vec::new();
        let mut x = open;
        while x < end {
            match self.bytes[x] {
                b'\\' => {
                    x += 2;
                    continue;
                }
                b'"' => {
                    x = self.skip_string(x, end)?;
                    continue;
                }
                b'(' => stack.push(b')'),
                b'[' => stack.push(b']'),
                b'{' => stack.push(b'}'),
                c @ (b')' | b']' | b'}') => {
                    if stack.pop() != Some(c) {
                        return Err(ParseError::Unbalanced { open, pos: x });
                    }
                    if stack.is_empty() {
                        return Ok(x);
                    }
                }
                _ => {}
            }
            x += 1;
        }
        Err(ParseError::Unbalanced { open, pos: end })
    }

    /// First `|` outside groups and strings, or `end`.
    fn find_pipe(&self, start: usize, end: usize) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut x = start;
        while x < end {
            match self.bytes[x] {
                b'\\' => x += 1,
                b'"' => {
                    x = self.skip_string(x, end)?;
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b'|' if depth == 0 => return Ok(x),
                _ => {}
            }
            x += 1;
        }
        Ok(end)
    }

    /// Split `[start, end)` on `sep` outside groups and strings.
    fn split_top(&self, start: usize, end: usize, sep: &[u8]) -> Result<Vec<(usize, usize)>, ParseError> {
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut from = start;
        let mut x = start;
        while x < end {
            match self.bytes[x] {
                b'\\' => x += 1,
                b'"' => {
                    x = self.skip_string(x, end)?;
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                _ if depth == 0 && self.bytes[x..end].starts_with(sep) => {
                    parts.push((from, x));
                    x += sep.len();
                    from = x;
                    continue;
                }
                _ => {}
            }
            x += 1;
        }
        parts.push((from, end));
        Ok(parts)
    }

    fn skip_spaces(&self, mut x: usize, end: usize) -> usize {
        while x < end && self.bytes[x].is_ascii_whitespace() {
            x += 1;
        }
        x
    }

    fn trim(&self, start: usize, mut end: usize) -> (usize, usize) {
        let start = self.skip_spaces(start, end);
        while end > start && self.bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        (start, end)
    }
}

fn fold(items: Vec<QueryExpr>, join: fn(Box<QueryExpr>, Box<QueryExpr>) -> QueryExpr) -> Option<QueryExpr> {
    items.into_iter().reduce(|left, right| join(Box::new(left), Box::new(right)))
}

/// Fold `\x` escapes into the character they protect.
fn unescape_component(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_owned();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            c => out.push(c),
        }
    }
    out
}

/// Key used for a multi-select entry without an alias: the last named step
/// of its path, ignoring trailing transformers.
fn default_key(path: &Path, source: &str) -> String {
    for segment in path.segments.iter().rev() {
        match segment {
            Segment::Transform(_) => continue,
            Segment::Field(name) => return name.clone(),
            Segment::Index(n) => return n.to_string(),
            Segment::Wildcard(pattern) => return pattern.clone(),
            _ => break,
        }
    }
    source.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Path {
        PathParser::parse(input).unwrap()
    }

    fn field(name: &str) -> Segment {
        Segment::Field(name.to_owned())
    }

    fn path(segments: Vec<Segment>) -> Path {
        Path::new(segments)
    }

    #[test]
    fn test_parse_fields_and_indexes() {
        assert_eq!(parse("a.b|0"), path(vec![field("a"), field("b"), Segment::Index(0)]));
        assert_eq!(parse("a\\.b"), path(vec![field("a.b")]));
        assert_eq!(parse("99999999999999999999999"), path(vec![field("99999999999999999999999")]));
    }

    #[test]
    fn test_parse_wildcards_keep_escapes() {
        assert_eq!(parse("a*.b\\*?"), path(vec![Segment::Wildcard("a*".into()), Segment::Wildcard("b\\*?".into())]));
        assert_eq!(parse("b\\*"), path(vec![field("b*")]));
    }

    #[test]
    fn test_parse_length_and_collect() {
        assert_eq!(parse("a.#"), path(vec![field("a"), Segment::Length]));
        assert_eq!(
            parse("a.#.b.c|#"),
            path(vec![
                field("a"),
                Segment::CollectAll(path(vec![field("b"), field("c")])),
                Segment::Length,
            ])
        );
        assert_eq!(parse("#x"), path(vec![field("#x")]));
    }

    #[test]
    fn test_parse_query_first_and_all() {
        let parsed = parse(r#"friends.#(last=="Murphy")#.first"#);
        let Segment::Query(query) = &parsed.segments[1] else {
            panic!("expected query, got {parsed:?}");
        };
        assert!(query.all);
        assert_eq!(query.each, path(vec![field("first")]));
        assert_eq!(
            query.expr,
            QueryExpr::Compare(Comparison {
                field: path(vec![field("last")]),
                op: Some(QueryOp::Eq),
                value: QueryValue::Str("Murphy".into()),
            })
        );

        let parsed = parse("a.#(age>40).name");
        let Segment::Query(query) = &parsed.segments[1] else {
            panic!("expected query");
        };
        assert!(!query.all);
        assert!(query.each.is_empty());
        assert_eq!(parsed.segments[2], field("name"));
    }

    #[test]
    fn test_parse_query_operators_and_values() {
        let cases = [
            ("#(a=1)", QueryOp::Eq, QueryValue::Num(1.0)),
            ("#(a != true)", QueryOp::Ne, QueryValue::Bool(true)),
            ("#(a<=-2.5)", QueryOp::Le, QueryValue::Num(-2.5)),
            ("#(a>=null)", QueryOp::Ge, QueryValue::Null),
            ("#(a<x)", QueryOp::Lt, QueryValue::Str("x".into())),
            ("#(a>\"b|c\")", QueryOp::Gt, QueryValue::Str("b|c".into())),
            ("#(a%\"D*\")", QueryOp::Like, QueryValue::Str("D*".into())),
            ("#(a!%\"D*\")", QueryOp::NotLike, QueryValue::Str("D*".into())),
            ("#(a==~true)", QueryOp::Eq, QueryValue::Tilde(Tilde::True)),
            ("#(a!=~*)", QueryOp::Ne, QueryValue::Tilde(Tilde::Any)),
        ];
        for (input, op, value) in cases {
            let parsed = parse(input);
            let Segment::Query(Query { expr: QueryExpr::Compare(cmp), .. }) = &parsed.segments[0] else {
                panic!("{input}: {parsed:?}");
            };
            assert_eq!(cmp.op, Some(op), "{input}");
            assert_eq!(cmp.value, value, "{input}");
        }
    }

    #[test]
    fn test_parse_query_logic_and_existence() {
        let parsed = parse("#(a&&b==1||c)");
        let Segment::Query(query) = &parsed.segments[0] else {
            panic!("expected query");
        };
        let QueryExpr::Or(left, right) = &query.expr else {
            panic!("expected or: {:?}", query.expr);
        };
        assert!(matches!(**left, QueryExpr::And(_, _)));
        assert!(matches!(&**right, QueryExpr::Compare(Comparison { op: None, .. })));
    }

    #[test]
    fn test_parse_query_on_element_itself() {
        let parsed = parse(r#"#(=="fb")"#);
        let Segment::Query(Query { expr: QueryExpr::Compare(cmp), .. }) = &parsed.segments[0] else {
            panic!("expected query");
        };
        assert!(cmp.field.is_empty());
    }

    #[test]
    fn test_parse_nested_query() {
        let parsed = parse(r#"friends.#(nets.#(=="fb"))#.first"#);
        let Segment::Query(query) = &parsed.segments[1] else {
            panic!("expected query");
        };
        let QueryExpr::Compare(cmp) = &query.expr else {
            panic!("expected comparison");
        };
        assert!(cmp.op.is_none());
        assert!(matches!(cmp.field.segments[1], Segment::Query(_)));
    }

    #[test]
    fn test_parse_multi_select() {
        let parsed = parse(r#"{name.first,"years":age,!true,[a,b]}"#);
        let Segment::MultiSelect(multi) = &parsed.segments[0] else {
            panic!("expected multi-select");
        };
        assert!(!multi.as_array);
        let keys: Vec<_> = multi.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["first", "years", "!true", "[a,b]"]);
        assert!(matches!(multi.entries[3].path.segments[0], Segment::MultiSelect(MultiSelect { as_array: true, .. })));
    }

    #[test]
    fn test_parse_transformers() {
        assert_eq!(
            parse(r#"a|@pretty:{"indent":"\t"}.@reverse"#).segments[1..],
            [
                Segment::Transform(Transform {
                    name: "pretty".into(),
                    arg: Some(r#"{"indent":"\t"}"#.into()),
                    source: r#"@pretty:{"indent":"\t"}"#.into(),
                }),
                Segment::Transform(Transform { name: "reverse".into(), arg: None, source: "@reverse".into() }),
            ]
        );
        let Segment::Transform(t) = &parse("@search:name.x").segments[0] else {
            panic!("expected transform");
        };
        assert_eq!(t.arg.as_deref(), Some("name"));
        let Segment::Transform(t) = &parse("@padLeft:1.5").segments[0] else {
            panic!("expected transform");
        };
        assert_eq!(t.arg.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse("!true").segments, vec![Segment::Literal("true".into())]);
        assert_eq!(parse(r#"!{"a":[1]}|a"#).segments, vec![Segment::Literal(r#"{"a":[1]}"#.into()), field("a")]);
        assert_eq!(PathParser::parse("!nope"), Err(ParseError::InvalidLiteral(0)));
        assert_eq!(PathParser::parse("!1x"), Err(ParseError::InvalidLiteral(0)));
    }

    #[test]
    fn test_parse_lines_and_descent() {
        assert_eq!(parse(".."), path(vec![Segment::Lines(Path::default())]));
        assert_eq!(
            parse("..name|#"),
            path(vec![Segment::Lines(path(vec![field("name")])), Segment::Length])
        );
        assert_eq!(
            parse("store..price"),
            path(vec![field("store"), Segment::Descent(Descent { key: "price".into(), each: Path::default() })])
        );
        assert_eq!(
            parse("a..b*.c"),
            path(vec![
                field("a"),
                Segment::Descent(Descent { key: "b*".into(), each: path(vec![field("c")]) }),
            ])
        );
        assert_eq!(
            parse("a.#..b"),
            path(vec![
                field("a"),
                Segment::CollectAll(path(vec![Segment::Descent(Descent { key: "b".into(), each: Path::default() })])),
            ])
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PathParser::parse(""), Err(ParseError::Empty));
        assert_eq!(PathParser::parse("a..").unwrap_err(), ParseError::EmptySegment(3));
        assert_eq!(PathParser::parse("a.").unwrap_err(), ParseError::EmptySegment(2));
        assert_eq!(PathParser::parse("a||b").unwrap_err(), ParseError::EmptySegment(2));
        assert_eq!(PathParser::parse("{}").unwrap_err(), ParseError::EmptySelector(0));
        assert_eq!(PathParser::parse("[ ]").unwrap_err(), ParseError::EmptySelector(0));
        assert_eq!(PathParser::parse("{a,}").unwrap_err(), ParseError::EmptySegment(3));
        assert!(matches!(PathParser::parse("#(a==1"), Err(ParseError::Unbalanced { open: 1, .. })));
        assert!(matches!(PathParser::parse("{a,[b}"), Err(ParseError::Unbalanced { .. })));
        assert_eq!(PathParser::parse(r#"#(a=="x)"#).unwrap_err(), ParseError::UnclosedString(5));
        assert_eq!(PathParser::parse("#()").unwrap_err(), ParseError::InvalidQuery(2));
        assert_eq!(PathParser::parse("#(a==)").unwrap_err(), ParseError::InvalidQuery(3));
        assert_eq!(PathParser::parse("#(a==~x)").unwrap_err(), ParseError::InvalidQuery(5));
        assert_eq!(PathParser::parse("{a}b").unwrap_err(), ParseError::UnexpectedChar('b', 3));
        assert!(matches!(PathParser::parse(r#"@x:{"a":1"#), Err(ParseError::Unbalanced { open: 3, .. })));
    }

    #[test]
    fn test_parse_rejects_deep_nesting() {
        let deep = format!("{}a{}", "{".repeat(100), "}".repeat(100));
        assert_eq!(PathParser::parse(&deep), Err(ParseError::TooDeep(MAX_NESTING)));
        let shallow = format!("{}a{}", "{".repeat(10), "}".repeat(10));
        assert!(PathParser::parse(&shallow).is_ok());
    }
}
