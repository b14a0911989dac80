//! Byte-level JSON value scanner.
//!
//! Classifies a value by its leading byte and finds where it ends without
//! decoding it. Nothing here allocates on the skip path, and nothing fails:
//! malformed input at the scanned position yields `None`, which callers treat
//! exactly like "no match".

use std::borrow::Cow;

/// The kind of a located JSON value.
///
/// The declaration order doubles as the cross-kind sort order used by
/// [`Context::less`](crate::Context::less).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Kind {
    #[default]
    Null,
    False,
    Number,
    String,
    True,
    /// An object or an array.
    Json,
}

/// A located value: its kind and its `[start, end)` byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: Kind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn slice<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

#[inline]
pub fn skip_whitespace(data: &[u8], mut x: usize) -> usize {
    while x < data.len() && matches!(data[x], b' ' | b'\t' | b'\n' | b'\r') {
        x += 1;
    }
    x
}

/// Locate the value starting exactly at `x`.
pub fn locate(data: &[u8], x: usize) -> Option<Span> {
    let (kind, end) = match *data.get(x)? {
        b'{' | b'[' => (Kind::Json, scan_container(data, x)?),
        b'"' => (Kind::String, scan_string(data, x)?),
        b't' => (Kind::True, scan_keyword(data, x, b"true")?),
        b'f' => (Kind::False, scan_keyword(data, x, b"false")?),
        b'n' => (Kind::Null, scan_keyword(data, x, b"null")?),
        b'-' | b'0'..=b'9' => (Kind::Number, scan_number(data, x)?),
        _ => return None,
    };
    Some(Span { kind, start: x, end })
}

/// Locate the first value at or after `x`, skipping leading whitespace.
pub fn locate_after_whitespace(data: &[u8], x: usize) -> Option<Span> {
    locate(data, skip_whitespace(data, x))
}

/// `data[x]` must be the opening quote. Returns the offset just past the
/// closing quote.
pub fn scan_string(data: &[u8], x: usize) -> Option<usize> {
    let mut i = x + 1;
    while i < data.len() {
        i += memchr::memchr2(b'"', b'\\', &data[i..])?;
        if data[i] == b'"' {
            return Some(i + 1);
        }
        i += 2;
    }
    None
}

/// `data[x]` must be `{` or `[`. Nested strings are skipped verbatim and only
/// the nesting depth is tracked, so arbitrarily deep input costs no stack.
pub fn scan_container(data: &[u8], x: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = x;
    while i < data.len() {
        match data[i] {
            b'"' => {
                i = scan_string(data, i)?;
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Maximal token matching `-? digits (. digits)? ([eE] [+-]? digits)?`.
pub fn scan_number(data: &[u8], x: usize) -> Option<usize> {
    let digits = |mut i: usize| {
        let from = i;
        while i < data.len() && data[i].is_ascii_digit() {
            i += 1;
        }
        (i > from).then_some(i)
    };
    let mut i = x;
    if data.get(i) == Some(&b'-') {
        i += 1;
    }
    i = digits(i)?;
    if data.get(i) == Some(&b'.') {
        i = digits(i + 1)?;
    }
    if matches!(data.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(data.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        i = digits(i)?;
    }
    Some(i)
}

pub fn scan_keyword(data: &[u8], x: usize, word: &[u8]) -> Option<usize> {
    data[x..].starts_with(word).then_some(x + word.len())
}

/// Iterates the elements of the array starting at `start`.
///
/// Iteration ends quietly at the closing bracket or at the first malformed
/// position.
pub struct Elements<'a> {
    data: &'a [u8],
    pos: usize,
    first: bool,
    done: bool,
}

impl<'a> Elements<'a> {
    pub fn new(data: &'a [u8], start: usize) -> Self {
        let done = data.get(start) != Some(&b'[');
        Self { data, pos: start + 1, first: true, done }
    }
}

impl Iterator for Elements<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if self.done {
            return None;
        }
        let data = self.data;
        let mut x = skip_whitespace(data, self.pos);
        match data.get(x) {
            None | Some(b']') => {
                self.done = true;
                return None;
            }
            Some(b',') if !self.first => x = skip_whitespace(data, x + 1),
            _ if !self.first => {
                self.done = true;
                return None;
            }
            _ => {}
        }
        match locate(data, x) {
            Some(span) => {
                self.pos = span.end;
                self.first = false;
                Some(span)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Iterates the `(key, value)` members of the object starting at `start`.
///
/// The key span covers the quoted key, quotes included.
pub struct Members<'a> {
    data: &'a [u8],
    pos: usize,
    first: bool,
    done: bool,
}

impl<'a> Members<'a> {
    pub fn new(data: &'a [u8], start: usize) -> Self {
        let done = data.get(start) != Some(&b'{');
        Self { data, pos: start + 1, first: true, done }
    }

    fn read(&mut self) -> Option<(Span, Span)> {
        let data = self.data;
        let mut x = skip_whitespace(data, self.pos);
        match data.get(x)? {
            b'}' => return None,
            b',' if !self.first => x = skip_whitespace(data, x + 1),
            _ if !self.first => return None,
            _ => {}
        }
        if data.get(x) != Some(&b'"') {
            return None;
        }
        let key_end = scan_string(data, x)?;
        let key = Span { kind: Kind::String, start: x, end: key_end };
        let colon = skip_whitespace(data, key_end);
        if data.get(colon) != Some(&b':') {
            return None;
        }
        let value = locate_after_whitespace(data, colon + 1)?;
        self.pos = value.end;
        self.first = false;
        Some((key, value))
    }
}

impl Iterator for Members<'_> {
    type Item = (Span, Span);

    fn next(&mut self) -> Option<(Span, Span)> {
        if self.done {
            return None;
        }
        let member = self.read();
        if member.is_none() {
            self.done = true;
        }
        member
    }
}

/// Decode the body of a JSON string (the text between its quotes).
///
/// Bodies without escapes are returned borrowed. Escaped bodies are decoded
/// with serde_json; a body serde_json rejects is returned as-is.
pub fn unescape(body: &str) -> Cow<'_, str> {
    if !body.contains('\\') {
        return Cow::Borrowed(body);
    }
    let mut quoted = String::with_capacity(body.len() + 2);
    quoted.push('"');
    quoted.push_str(body);
    quoted.push('"');
    match serde_json::from_str::<String>(&quoted) {
        Ok(s) => Cow::Owned(s),
        Err(_) => Cow::Borrowed(body),
    }
}

/// The body of a quoted string slice, without its surrounding quotes.
pub fn string_body(quoted: &str) -> &str {
    if quoted.len() >= 2 {
        &quoted[1..quoted.len() - 1]
    } else {
        ""
    }
}

/// Compare a raw quoted key against a plain name without allocating when
/// the key carries no escapes.
pub fn key_equals(quoted: &str, name: &str) -> bool {
    let body = string_body(quoted);
    if body.contains('\\') {
        unescape(body) == name
    } else {
        body == name
    }
}

/// Strict well-formedness check of a complete document.
///
/// Runs on an explicit container stack bounded by `max_depth`; deeper input
/// is reported as invalid rather than risking the call stack.
pub fn validate(data: &[u8], max_depth: usize) -> bool {
    validate_document(data, max_depth).is_some()
}

fn validate_document(data: &[u8], max_depth: usize) -> Option<()> {
    let mut stack: Vec<u8> = Vec::new();
    let mut x = 0usize;
    loop {
        // A value is expected at `x`.
        x = skip_whitespace(data, x);
        match *data.get(x)? {
            open @ (b'{' | b'[') => {
                let close = if open == b'{' { b'}' } else { b']' };
                x = skip_whitespace(data, x + 1);
                if data.get(x) == Some(&close) {
                    x += 1;
                } else {
                    if stack.len() >= max_depth {
                        return None;
                    }
                    stack.push(open);
                    if open == b'{' {
                        x = validate_key(data, x)?;
                    }
                    continue;
                }
            }
            b'"' => x = validate_string(data, x)?,
            b't' => x = scan_keyword(data, x, b"true")?,
            b'f' => x = scan_keyword(data, x, b"false")?,
            b'n' => x = scan_keyword(data, x, b"null")?,
            b'-' | b'0'..=b'9' => x = validate_number(data, x)?,
            _ => return None,
        }
        // A value just ended: close finished containers or find the next slot.
        loop {
            x = skip_whitespace(data, x);
            let Some(&open) = stack.last() else {
                return (x == data.len()).then_some(());
            };
            match (*data.get(x)?, open) {
                (b',', b'{') => {
                    x = validate_key(data, skip_whitespace(data, x + 1))?;
                    break;
                }
                (b',', _) => {
                    x += 1;
                    break;
                }
                (b'}', b'{') | (b']', b'[') => {
                    stack.pop();
                    x += 1;
                }
                _ => return None,
            }
        }
    }
}

fn validate_key(data: &[u8], x: usize) -> Option<usize> {
    if data.get(x) != Some(&b'"') {
        return None;
    }
    let x = skip_whitespace(data, validate_string(data, x)?);
    (data.get(x) == Some(&b':')).then_some(x + 1)
}

fn validate_string(data: &[u8], x: usize) -> Option<usize> {
    let mut i = x + 1;
    loop {
        match *data.get(i)? {
            b'"' => break,
            b'\\' => {
                match *data.get(i + 1)? {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => i += 2,
                    b'u' => {
                        let hex = data.get(i + 2..i + 6)?;
                        if !hex.iter().all(u8::is_ascii_hexdigit) {
                            return None;
                        }
                        i += 6;
                    }
                    _ => return None,
                }
            }
            c if c < 0x20 => return None,
            _ => i += 1,
        }
    }
    std::str::from_utf8(&data[x + 1..i]).ok()?;
    Some(i + 1)
}

fn validate_number(data: &[u8], x: usize) -> Option<usize> {
    let end = scan_number(data, x)?;
    let int_start = if data[x] == b'-' { x + 1 } else { x };
    // No leading zeros: "0" is fine, "01" is not.
    if data[int_start] == b'0' && data.get(int_start + 1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_and_text(src: &str, x: usize) -> Option<(Kind, &str)> {
        locate(src.as_bytes(), x).map(|s| (s.kind, s.slice(src)))
    }

    #[test]
    fn locates_each_kind_by_leading_byte() {
        assert_eq!(kind_and_text("true,", 0), Some((Kind::True, "true")));
        assert_eq!(kind_and_text("false]", 0), Some((Kind::False, "false")));
        assert_eq!(kind_and_text("null", 0), Some((Kind::Null, "null")));
        assert_eq!(kind_and_text("-12.5e+3,", 0), Some((Kind::Number, "-12.5e+3")));
        assert_eq!(kind_and_text(r#""a\"b" x"#, 0), Some((Kind::String, r#""a\"b""#)));
        assert_eq!(kind_and_text(r#"{"a":"}"} tail"#, 0), Some((Kind::Json, r#"{"a":"}"}"#)));
        assert_eq!(kind_and_text("[1,[2,[3]]]x", 0), Some((Kind::Json, "[1,[2,[3]]]")));
    }

    #[test]
    fn malformed_positions_yield_none() {
        assert_eq!(locate(b"{not json", 0), None);
        assert_eq!(locate(b"\"unterminated", 0), None);
        assert_eq!(locate(b"tru", 0), None);
        assert_eq!(locate(b"-", 0), None);
        assert_eq!(locate(b"1.", 0), None);
        assert_eq!(locate(b"@", 0), None);
        assert_eq!(locate(b"", 0), None);
    }

    #[test]
    fn deep_nesting_is_skipped_without_recursion() {
        let depth = 100_000;
        let doc = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let span = locate(doc.as_bytes(), 0).unwrap();
        assert_eq!(span.end, doc.len());
    }

    #[test]
    fn iterates_array_elements() {
        let src = r#"[ 1, "two" , {"three":3}, [4] ]"#;
        let items: Vec<&str> = Elements::new(src.as_bytes(), 0).map(|s| s.slice(src)).collect();
        assert_eq!(items, vec!["1", "\"two\"", r#"{"three":3}"#, "[4]"]);
        assert_eq!(Elements::new(b"[]", 0).count(), 0);
        assert_eq!(Elements::new(b"[1 2]", 0).count(), 1);
        assert_eq!(Elements::new(b"{}", 0).count(), 0);
    }

    #[test]
    fn iterates_object_members() {
        let src = r#"{"a" : 1, "b\"c":[true] }"#;
        let members: Vec<(&str, &str)> = Members::new(src.as_bytes(), 0)
            .map(|(k, v)| (k.slice(src), v.slice(src)))
            .collect();
        assert_eq!(members, vec![("\"a\"", "1"), (r#""b\"c""#, "[true]")]);
        assert_eq!(Members::new(b"{\"a\" 1}", 0).count(), 0);
    }

    #[test]
    fn unescape_borrows_plain_bodies() {
        assert!(matches!(unescape("plain"), Cow::Borrowed("plain")));
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"\u00e9"), "é");
        assert!(key_equals(r#""ab""#, "ab"));
        assert!(!key_equals(r#""ab""#, "a"));
    }

    #[test]
    fn validates_documents() {
        for ok in ["{}", "[]", " 1 ", r#"{"a":[1,2,{"b":null}]}"#, r#""é""#, "-0.5e10"] {
            assert!(validate(ok.as_bytes(), 64), "{ok}");
        }
        for bad in ["", "{", "[1,]", r#"{"a"}"#, "01", "[1 2]", "{} {}", "\"\x01\"", r#"{"a":1,}"#] {
            assert!(!validate(bad.as_bytes(), 64), "{bad:?}");
        }
    }

    #[test]
    fn validation_honours_depth_cap() {
        let doc = format!("{}1{}", "[".repeat(10), "]".repeat(10));
        assert!(validate(doc.as_bytes(), 10));
        assert!(!validate(doc.as_bytes(), 9));
    }
}
