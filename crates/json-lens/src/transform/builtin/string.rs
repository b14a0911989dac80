//! String transformers. Non-string input passes through unchanged.

use std::sync::Arc;

use serde::Deserialize;

use super::{decode_arg, map_string};
use crate::transform::TransformerDefinition;

/// Split into words on non-alphanumeric characters and case changes, so
/// `"userID"`, `"user_id"` and `"User Id"` all give `["user", "ID"|"id"|"Id"]`.
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = c.is_uppercase()
                && ((prev.is_lowercase() || prev.is_numeric()) || (prev.is_uppercase() && next_lower));
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn upper_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| s.to_uppercase())
}

fn lower_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| s.to_lowercase())
}

fn title_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| {
        let mut out = String::with_capacity(s.len());
        let mut start = true;
        for c in s.chars() {
            if c.is_whitespace() {
                start = true;
                out.push(c);
            } else if start {
                out.extend(c.to_uppercase());
                start = false;
            } else {
                out.extend(c.to_lowercase());
            }
        }
        out
    })
}

fn snake_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| words(s).iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("_"))
}

fn kebab_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| words(s).iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("-"))
}

fn camel_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| {
        words(s)
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
            .collect()
    })
}

fn trim_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| s.trim().to_owned())
}

fn flip_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| s.chars().rev().collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplaceArg {
    target: String,
    replacement: String,
}

fn replace_with(json: &str, name: &str, arg: &str, all: bool) -> String {
    let Some(ReplaceArg { target, replacement }) = decode_arg(name, arg) else {
        return json.to_owned();
    };
    if target.is_empty() {
        return json.to_owned();
    }
    map_string(json, |s| {
        if all {
            s.replace(&target, &replacement)
        } else {
            s.replacen(&target, &replacement, 1)
        }
    })
}

fn replace_fn(json: &str, arg: &str) -> String {
    replace_with(json, "replace", arg, false)
}

fn replace_all_fn(json: &str, arg: &str) -> String {
    replace_with(json, "replaceAll", arg, true)
}

fn hex_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| s.bytes().map(|b| format!("{b:02x}")).collect())
}

fn bin_fn(json: &str, _arg: &str) -> String {
    map_string(json, |s| s.bytes().map(|b| format!("{b:08b}")).collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InsertArg {
    index: usize,
    insert: String,
}

fn insert_at_fn(json: &str, arg: &str) -> String {
    let Some(InsertArg { index, insert }) = decode_arg("insertAt", arg) else {
        return json.to_owned();
    };
    map_string(json, |s| {
        let at = s.char_indices().nth(index).map_or(s.len(), |(i, _)| i);
        let mut out = String::with_capacity(s.len() + insert.len());
        out.push_str(&s[..at]);
        out.push_str(&insert);
        out.push_str(&s[at..]);
        out
    })
}

fn wc_fn(json: &str, _arg: &str) -> String {
    let ctx = crate::parse(json);
    if ctx.kind() != crate::Kind::String {
        return json.to_owned();
    }
    ctx.str().split_whitespace().count().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PadArg {
    length: usize,
    padding: String,
}

impl Default for PadArg {
    fn default() -> Self {
        Self { length: 0, padding: " ".to_owned() }
    }
}

fn pad(json: &str, name: &str, arg: &str, left: bool) -> String {
    let Some(PadArg { length, padding }) = decode_arg(name, arg) else {
        return json.to_owned();
    };
    if padding.is_empty() {
        return json.to_owned();
    }
    map_string(json, |s| {
        let missing = length.saturating_sub(s.chars().count());
        let fill: String = padding.chars().cycle().take(missing).collect();
        if left {
            fill + s
        } else {
            format!("{s}{fill}")
        }
    })
}

fn pad_left_fn(json: &str, arg: &str) -> String {
    pad(json, "padLeft", arg, true)
}

fn pad_right_fn(json: &str, arg: &str) -> String {
    pad(json, "padRight", arg, false)
}

pub fn transformers() -> Vec<Arc<TransformerDefinition>> {
    vec![
        Arc::new(TransformerDefinition { name: "upper", aliases: &[], transform_fn: upper_fn }),
        Arc::new(TransformerDefinition { name: "lower", aliases: &[], transform_fn: lower_fn }),
        Arc::new(TransformerDefinition { name: "title", aliases: &[], transform_fn: title_fn }),
        Arc::new(TransformerDefinition { name: "snake", aliases: &[], transform_fn: snake_fn }),
        Arc::new(TransformerDefinition { name: "camel", aliases: &[], transform_fn: camel_fn }),
        Arc::new(TransformerDefinition { name: "kebab", aliases: &[], transform_fn: kebab_fn }),
        Arc::new(TransformerDefinition { name: "trim", aliases: &[], transform_fn: trim_fn }),
        Arc::new(TransformerDefinition { name: "flip", aliases: &[], transform_fn: flip_fn }),
        Arc::new(TransformerDefinition { name: "replace", aliases: &[], transform_fn: replace_fn }),
        Arc::new(TransformerDefinition { name: "replaceAll", aliases: &[], transform_fn: replace_all_fn }),
        Arc::new(TransformerDefinition { name: "hex", aliases: &[], transform_fn: hex_fn }),
        Arc::new(TransformerDefinition { name: "bin", aliases: &[], transform_fn: bin_fn }),
        Arc::new(TransformerDefinition { name: "insertAt", aliases: &[], transform_fn: insert_at_fn }),
        Arc::new(TransformerDefinition { name: "wc", aliases: &[], transform_fn: wc_fn }),
        Arc::new(TransformerDefinition { name: "padLeft", aliases: &[], transform_fn: pad_left_fn }),
        Arc::new(TransformerDefinition { name: "padRight", aliases: &[], transform_fn: pad_right_fn }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words() {
        assert_eq!(words("userID"), vec!["user", "ID"]);
        assert_eq!(words("HTTPServer error_code"), vec!["HTTP", "Server", "error", "code"]);
        assert_eq!(words("  --  "), Vec::<String>::new());
        assert_eq!(words("v2Api"), vec!["v2", "Api"]);
    }

    #[test]
    fn case_conversions() {
        assert_eq!(upper_fn("\"abc\"", ""), "\"ABC\"");
        assert_eq!(lower_fn("\"ÀB\"", ""), "\"àb\"");
        assert_eq!(title_fn("\"hello wORLD\"", ""), "\"Hello World\"");
        assert_eq!(snake_fn("\"helloWorld Foo\"", ""), "\"hello_world_foo\"");
        assert_eq!(kebab_fn("\"HelloWorld\"", ""), "\"hello-world\"");
        assert_eq!(camel_fn("\"hello_world-foo\"", ""), "\"helloWorldFoo\"");
        assert_eq!(upper_fn("[\"abc\"]", ""), "[\"abc\"]");
    }

    #[test]
    fn trim_and_flip() {
        assert_eq!(trim_fn("\"  a b \"", ""), "\"a b\"");
        assert_eq!(flip_fn("\"abc\"", ""), "\"cba\"");
    }

    #[test]
    fn replace_first_or_all() {
        let arg = r#"{"target":"a","replacement":"o"}"#;
        assert_eq!(replace_fn("\"banana\"", arg), "\"bonana\"");
        assert_eq!(replace_all_fn("\"banana\"", arg), "\"bonono\"");
        assert_eq!(replace_fn("\"banana\"", "{bad"), "\"banana\"");
    }

    #[test]
    fn encodings() {
        assert_eq!(hex_fn("\"hi\"", ""), "\"6869\"");
        assert_eq!(bin_fn("\"A\"", ""), "\"01000001\"");
    }

    #[test]
    fn insert_at() {
        assert_eq!(insert_at_fn("\"héllo\"", r#"{"index":2,"insert":"-"}"#), "\"hé-llo\"");
        assert_eq!(insert_at_fn("\"ab\"", r#"{"index":9,"insert":"!"}"#), "\"ab!\"");
    }

    #[test]
    fn word_count_is_a_number() {
        assert_eq!(wc_fn("\"one two  three\"", ""), "3");
        assert_eq!(wc_fn("5", ""), "5");
    }

    #[test]
    fn padding() {
        assert_eq!(pad_left_fn("\"7\"", r#"{"length":3,"padding":"0"}"#), "\"007\"");
        assert_eq!(pad_right_fn("\"ab\"", r#"{"length":5,"padding":"xy"}"#), "\"abxyx\"");
        assert_eq!(pad_left_fn("\"long\"", r#"{"length":2}"#), "\"long\"");
        assert_eq!(pad_left_fn("\"a\"", r#"{"length":2}"#), "\" a\"");
    }
}
