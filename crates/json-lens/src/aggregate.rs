//! Array helpers over a path result.
//!
//! Each helper resolves `path` against `json` (an empty path means the whole
//! document) and works on the elements of the result. A scalar result counts
//! as a one-element array, a missing one as an empty array.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::coerce::{to_f64, to_string};
use crate::context::Context;
use crate::pretty::minify;

fn elements<'a>(json: &'a str, path: &str) -> Vec<Context<'a>> {
    let target = if path.is_empty() { crate::parse(json) } else { crate::get(json, path) };
    target.array()
}

fn numbers(json: &str, path: &str) -> Vec<f64> {
    elements(json, path).iter().filter_map(to_f64).collect()
}

/// Number of elements: the array length, `1` for a scalar, `0` when the
/// path resolves to nothing.
pub fn count(json: &str, path: &str) -> usize {
    elements(json, path).len()
}

/// Sum of the numeric elements; `0` when there are none.
pub fn sum(json: &str, path: &str) -> f64 {
    numbers(json, path).iter().sum()
}

pub fn min(json: &str, path: &str) -> Option<f64> {
    numbers(json, path).into_iter().reduce(f64::min)
}

pub fn max(json: &str, path: &str) -> Option<f64> {
    numbers(json, path).into_iter().reduce(f64::max)
}

/// Mean of the numeric elements.
pub fn avg(json: &str, path: &str) -> Option<f64> {
    let values = numbers(json, path);
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

pub fn filter<'a, F>(json: &'a str, path: &str, mut keep: F) -> Vec<Context<'a>>
where
    F: FnMut(&Context<'a>) -> bool,
{
    elements(json, path).into_iter().filter(|elem| keep(elem)).collect()
}

/// First element accepted by `keep`, or the empty context.
pub fn first<'a, F>(json: &'a str, path: &str, mut keep: F) -> Context<'a>
where
    F: FnMut(&Context<'a>) -> bool,
{
    elements(json, path).into_iter().find(|elem| keep(elem)).unwrap_or_default()
}

/// Elements with duplicates removed, keeping the first occurrence. Two
/// elements are duplicates when their minified text is identical.
pub fn distinct<'a>(json: &'a str, path: &str) -> Vec<Context<'a>> {
    let mut seen = HashSet::new();
    elements(json, path)
        .into_iter()
        .filter(|elem| seen.insert(minify(elem.raw())))
        .collect()
}

/// The `field` path of every element, skipping elements where it is missing.
pub fn pluck<'a>(json: &'a str, path: &str, field: &str) -> Vec<Context<'a>> {
    elements(json, path)
        .into_iter()
        .map(|elem| elem.get(field))
        .filter(Context::exists)
        .collect()
}

/// Buckets keyed by the string form of `field`, in order of first
/// appearance. Elements without the field go to the `""` bucket.
pub fn group_by<'a>(json: &'a str, path: &str, field: &str) -> IndexMap<String, Vec<Context<'a>>> {
    let mut groups: IndexMap<String, Vec<Context<'a>>> = IndexMap::new();
    for elem in elements(json, path) {
        let key = to_string(&elem.get(field));
        groups.entry(key).or_default().push(elem);
    }
    groups
}

/// Elements ordered by `field` (by the element itself when `field` is
/// empty). Keys compare numerically when both parse as numbers and as
/// strings otherwise; ties keep their original order.
pub fn sort_by<'a>(json: &'a str, path: &str, field: &str) -> Vec<Context<'a>> {
    let mut keyed: Vec<(Context<'a>, Context<'a>)> = elements(json, path)
        .into_iter()
        .map(|elem| {
            let key = if field.is_empty() { elem.clone() } else { elem.get(field) };
            (key, elem)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    keyed.into_iter().map(|(_, elem)| elem).collect()
}

fn compare_keys(a: &Context<'_>, b: &Context<'_>) -> Ordering {
    match (to_f64(a), to_f64(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.str().cmp(&b.str()),
    }
}
