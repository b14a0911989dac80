//! Array filtering, extraction and numeric aggregation.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::decode_arg;
use crate::coerce::to_f64;
use crate::transform::TransformerDefinition;
use crate::util::{format_number, json_array};
use crate::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

impl FilterOp {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "contains" => Self::Contains,
            _ => return None,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilterArg {
    key: String,
    op: Option<String>,
    value: Value,
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn test(op: FilterOp, field: Option<&Value>, target: &Value) -> bool {
    let Some(field) = field else {
        return op == FilterOp::Ne;
    };
    match op {
        FilterOp::Eq => loose_eq(field, target),
        FilterOp::Ne => !loose_eq(field, target),
        FilterOp::Gt => order(field, target) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(order(field, target), Some(Ordering::Greater | Ordering::Equal)),
        FilterOp::Lt => order(field, target) == Some(Ordering::Less),
        FilterOp::Lte => matches!(order(field, target), Some(Ordering::Less | Ordering::Equal)),
        FilterOp::Contains => match (field, target) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(items), needle) => items.iter().any(|item| loose_eq(item, needle)),
            _ => false,
        },
    }
}

/// Keep the elements whose `key` field satisfies `op` against `value`. An
/// empty key tests the element itself.
fn filter_fn(json: &str, arg: &str) -> String {
    let Some(FilterArg { key, op, value }) = decode_arg("filter", arg) else {
        return json.to_owned();
    };
    let op_name = op.as_deref().unwrap_or("eq");
    let Some(op) = FilterOp::from_name(op_name) else {
        warn!(op = op_name, "unsupported @filter operator");
        return json.to_owned();
    };
    let ctx = crate::parse(json);
    if !ctx.is_array() {
        return json.to_owned();
    }
    let kept = ctx.array().into_iter().filter(|elem| {
        let field = if key.is_empty() { elem.clone() } else { elem.get(&key) };
        let field = field.exists().then(|| field.value());
        test(op, field.as_ref(), &value)
    });
    json_array(kept.map(|elem| elem.raw().to_owned()))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PluckArg {
    Path(String),
    Object { path: String },
}

fn pluck_path(arg: &str) -> Option<String> {
    let arg = arg.trim();
    if !arg.starts_with('"') && !arg.starts_with('{') {
        return Some(arg.to_owned());
    }
    match serde_json::from_str(arg) {
        Ok(PluckArg::Path(path) | PluckArg::Object { path }) => Some(path),
        Err(err) => {
            warn!(arg, error = %err, "invalid @pluck argument");
            None
        }
    }
}

fn pluck_fn(json: &str, arg: &str) -> String {
    let Some(path) = pluck_path(arg).filter(|p| !p.is_empty()) else {
        return json.to_owned();
    };
    let ctx = crate::parse(json);
    if !ctx.is_array() {
        return json.to_owned();
    }
    let values = ctx.array().into_iter().map(|elem| elem.get(&path)).filter(Context::exists);
    json_array(values.map(|value| value.raw().to_owned()))
}

fn first_fn(json: &str, _arg: &str) -> String {
    let ctx = crate::parse(json);
    if !ctx.is_array() {
        return json.to_owned();
    }
    ctx.array().first().map_or_else(|| "null".to_owned(), |v| v.raw().to_owned())
}

fn last_fn(json: &str, _arg: &str) -> String {
    let ctx = crate::parse(json);
    if !ctx.is_array() {
        return json.to_owned();
    }
    ctx.array().last().map_or_else(|| "null".to_owned(), |v| v.raw().to_owned())
}

fn count_fn(json: &str, _arg: &str) -> String {
    crate::parse(json).array().len().to_string()
}

/// Numeric values of the elements, skipping anything non-numeric. A scalar
/// counts as a one-element array.
fn numbers(json: &str) -> Vec<f64> {
    crate::parse(json).array().iter().filter_map(to_f64).collect()
}

fn sum_fn(json: &str, _arg: &str) -> String {
    format_number(numbers(json).iter().sum())
}

fn min_fn(json: &str, _arg: &str) -> String {
    numbers(json).into_iter().reduce(f64::min).map_or_else(|| "null".to_owned(), format_number)
}

fn max_fn(json: &str, _arg: &str) -> String {
    numbers(json).into_iter().reduce(f64::max).map_or_else(|| "null".to_owned(), format_number)
}

fn avg_fn(json: &str, _arg: &str) -> String {
    let values = numbers(json);
    if values.is_empty() {
        return "null".to_owned();
    }
    format_number(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn transformers() -> Vec<Arc<TransformerDefinition>> {
    vec![
        Arc::new(TransformerDefinition { name: "filter", aliases: &[], transform_fn: filter_fn }),
        Arc::new(TransformerDefinition { name: "pluck", aliases: &[], transform_fn: pluck_fn }),
        Arc::new(TransformerDefinition { name: "first", aliases: &[], transform_fn: first_fn }),
        Arc::new(TransformerDefinition { name: "last", aliases: &[], transform_fn: last_fn }),
        Arc::new(TransformerDefinition { name: "count", aliases: &[], transform_fn: count_fn }),
        Arc::new(TransformerDefinition { name: "sum", aliases: &[], transform_fn: sum_fn }),
        Arc::new(TransformerDefinition { name: "min", aliases: &[], transform_fn: min_fn }),
        Arc::new(TransformerDefinition { name: "max", aliases: &[], transform_fn: max_fn }),
        Arc::new(TransformerDefinition { name: "avg", aliases: &[], transform_fn: avg_fn }),
    ]
}
