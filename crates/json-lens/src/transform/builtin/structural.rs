//! Structural transformers: layout, shape and traversal.

use std::sync::Arc;

use indexmap::IndexMap;
use json_lens_util::as_string;
use serde::Deserialize;
use tracing::warn;

use super::decode_arg;
use crate::options::DEFAULT_MAX_DEPTH;
use crate::parser::PathParser;
use crate::pretty::{self, PrettyOptions};
use crate::scanner::{self, Elements, Kind, Members};
use crate::transform::TransformerDefinition;
use crate::util::{json_array, json_object};
use crate::walk;
use crate::{Context, Evaluator};

fn pretty_fn(json: &str, arg: &str) -> String {
    match decode_arg::<PrettyOptions>("pretty", arg) {
        Some(options) => pretty::pretty(json, &options),
        None => json.to_owned(),
    }
}

fn minify_fn(json: &str, _arg: &str) -> String {
    pretty::minify(json)
}

fn valid_fn(json: &str, _arg: &str) -> String {
    scanner::validate(json.as_bytes(), DEFAULT_MAX_DEPTH).to_string()
}

fn this_fn(json: &str, _arg: &str) -> String {
    json.to_owned()
}

/// Raw `(key, value)` text of every member, duplicates included.
fn raw_members(json: &str) -> Vec<(&str, &str)> {
    let data = json.as_bytes();
    let Some(root) = scanner::locate_after_whitespace(data, 0) else {
        return Vec::new();
    };
    Members::new(data, root.start)
        .map(|(key, value)| (key.slice(json), value.slice(json)))
        .collect()
}

fn raw_object<'s>(members: impl IntoIterator<Item = (&'s str, &'s str)>) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in members.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push(':');
        out.push_str(value);
    }
    out.push('}');
    out
}

fn reverse_fn(json: &str, _arg: &str) -> String {
    let ctx = crate::parse(json);
    if ctx.is_array() {
        json_array(ctx.array().iter().rev().map(Context::raw))
    } else if ctx.is_object() {
        raw_object(raw_members(json).into_iter().rev())
    } else {
        json.to_owned()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FlattenArg {
    deep: bool,
}

fn flatten_fn(json: &str, arg: &str) -> String {
    let Some(FlattenArg { deep }) = decode_arg("flatten", arg) else {
        return json.to_owned();
    };
    let data = json.as_bytes();
    let root = match scanner::locate_after_whitespace(data, 0) {
        Some(span) if data[span.start] == b'[' => span,
        _ => return json.to_owned(),
    };
    let mut items = Vec::new();
    let mut stack = vec![Elements::new(data, root.start)];
    while let Some(top) = stack.last_mut() {
        let Some(span) = top.next() else {
            stack.pop();
            continue;
        };
        let nested = span.kind == Kind::Json && data[span.start] == b'[';
        if nested && (deep || stack.len() == 1) && stack.len() < DEFAULT_MAX_DEPTH {
            stack.push(Elements::new(data, span.start));
        } else {
            items.push(span.slice(json));
        }
    }
    json_array(items)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JoinArg {
    preserve: bool,
}

fn join_fn(json: &str, arg: &str) -> String {
    let Some(JoinArg { preserve }) = decode_arg("join", arg) else {
        return json.to_owned();
    };
    let ctx = crate::parse(json);
    if !ctx.is_array() {
        return json.to_owned();
    }
    let objects: Vec<Context<'_>> = ctx.array().into_iter().filter(Context::is_object).collect();
    if preserve {
        return raw_object(objects.iter().flat_map(|obj| raw_members(obj.raw())));
    }
    let mut merged: IndexMap<String, String> = IndexMap::new();
    for obj in &objects {
        for (key, value) in raw_members(obj.raw()) {
            let key = scanner::unescape(scanner::string_body(key)).into_owned();
            merged.insert(key, value.to_owned());
        }
    }
    json_object(merged)
}

fn keys_fn(json: &str, _arg: &str) -> String {
    json_array(raw_members(json).into_iter().map(|(key, _)| key))
}

fn values_fn(json: &str, _arg: &str) -> String {
    let ctx = crate::parse(json);
    if ctx.is_array() {
        return ctx.raw().to_owned();
    }
    json_array(raw_members(json).into_iter().map(|(_, value)| value))
}

fn group_fn(json: &str, _arg: &str) -> String {
    if !crate::parse(json).is_object() {
        return json.to_owned();
    }
    let mut rows: Vec<Vec<(&str, &str)>> = Vec::new();
    for (key, value) in raw_members(json) {
        let data = value.as_bytes();
        if data.first() != Some(&b'[') {
            continue;
        }
        for (i, elem) in Elements::new(data, 0).enumerate() {
            if rows.len() <= i {
                rows.push(Vec::new());
            }
            rows[i].push((key, elem.slice(value)));
        }
    }
    json_array(rows.into_iter().map(|row| raw_object(row)))
}

fn search_fn(json: &str, arg: &str) -> String {
    let path_text = if arg.starts_with('"') {
        match serde_json::from_str::<String>(arg) {
            Ok(path) => path,
            Err(err) => {
                warn!(arg, error = %err, "invalid @search argument");
                return json.to_owned();
            }
        }
    } else {
        arg.to_owned()
    };
    let path = match PathParser::parse(&path_text) {
        Ok(path) => path,
        Err(err) => {
            warn!(path = %path_text, error = %err, "invalid @search path");
            return json.to_owned();
        }
    };
    let ev = Evaluator::global();
    let mut found = Vec::new();
    walk::walk(json, DEFAULT_MAX_DEPTH, |_, span| {
        let node = Context::from_span(json, None, span);
        let result = ev.resolve(node, &path);
        if result.exists() {
            found.push(result.raw().to_owned());
        }
        true
    });
    json_array(found)
}

fn tostr_fn(json: &str, _arg: &str) -> String {
    as_string(json.trim())
}

fn fromstr_fn(json: &str, _arg: &str) -> String {
    let ctx = crate::parse(json);
    if ctx.kind() != Kind::String {
        return json.to_owned();
    }
    let inner = ctx.str();
    if scanner::validate(inner.as_bytes(), DEFAULT_MAX_DEPTH) {
        inner.trim().to_owned()
    } else {
        json.to_owned()
    }
}

pub fn transformers() -> Vec<Arc<TransformerDefinition>> {
    vec![
        Arc::new(TransformerDefinition { name: "pretty", aliases: &[], transform_fn: pretty_fn }),
        Arc::new(TransformerDefinition { name: "minify", aliases: &["ugly"], transform_fn: minify_fn }),
        Arc::new(TransformerDefinition { name: "valid", aliases: &[], transform_fn: valid_fn }),
        Arc::new(TransformerDefinition { name: "this", aliases: &[], transform_fn: this_fn }),
        Arc::new(TransformerDefinition { name: "reverse", aliases: &[], transform_fn: reverse_fn }),
        Arc::new(TransformerDefinition { name: "flatten", aliases: &[], transform_fn: flatten_fn }),
        Arc::new(TransformerDefinition { name: "join", aliases: &[], transform_fn: join_fn }),
        Arc::new(TransformerDefinition { name: "keys", aliases: &[], transform_fn: keys_fn }),
        Arc::new(TransformerDefinition { name: "values", aliases: &[], transform_fn: values_fn }),
        Arc::new(TransformerDefinition { name: "group", aliases: &[], transform_fn: group_fn }),
        Arc::new(TransformerDefinition { name: "search", aliases: &[], transform_fn: search_fn }),
        Arc::new(TransformerDefinition { name: "tostr", aliases: &[], transform_fn: tostr_fn }),
        Arc::new(TransformerDefinition { name: "fromstr", aliases: &[], transform_fn: fromstr_fn }),
    ]
}
