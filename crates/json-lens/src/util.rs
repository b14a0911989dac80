//! Helpers for building JSON text and path components.

use json_lens_util::write_quoted;

/// Escape `key` so it is read back as a single plain key by the path parser.
///
/// ```
/// use json_lens::{escape_component, get};
///
/// let path = escape_component("a.b");
/// assert_eq!(path, "a\\.b");
/// assert_eq!(get(r#"{"a.b":1}"#, &path).raw(), "1");
/// ```
pub fn escape_component(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if matches!(
            c,
            '.' | '|' | '*' | '?' | '\\' | '#' | '@' | '!' | '{' | '}' | '[' | ']' | '(' | ')' | '"' | ','
                | '=' | '<' | '>' | '%' | '&' | '~' | ':'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `[a,b,..]` from raw JSON fragments.
pub(crate) fn json_array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("[");
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(item.as_ref());
    }
    out.push(']');
    out
}

/// `{"k":v,..}` from keys and raw JSON fragments.
pub(crate) fn json_object<I, K, V>(members: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::from("{");
    for (i, (key, value)) in members.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_quoted(&mut out, key.as_ref());
        out.push(':');
        out.push_str(value.as_ref());
    }
    out.push('}');
    out
}

/// JSON text for a number. Whole values print without a fraction and
/// non-finite values become `null`.
pub(crate) fn format_number(n: f64) -> String {
    if !n.is_finite() {
        "null".to_owned()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
