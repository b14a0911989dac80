/// Serialize text as a JSON string literal, quotes included.
///
/// # Examples
///
/// ```
/// use json_lens_util::strings::as_string;
///
/// assert_eq!(as_string("hello"), "\"hello\"");
/// assert_eq!(as_string("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn as_string(s: &str) -> String {
    // Serializing a str into a String cannot fail.
    serde_json::to_string(s).expect("string serialization is infallible")
}

/// Append `s` to `out` as a quoted JSON string literal.
pub fn write_quoted(out: &mut String, s: &str) {
    out.push_str(&as_string(s));
}
