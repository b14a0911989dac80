//! Built-in transformers.

pub mod array;
pub mod coerce;
pub mod object;
pub mod string;
pub mod structural;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use json_lens_util::as_string;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::TransformerDefinition;
use crate::context::Context;
use crate::scanner::Kind;

/// Every built-in definition.
pub fn all_transformers() -> Vec<Arc<TransformerDefinition>> {
    let mut defs = Vec::new();
    defs.extend(structural::transformers());
    defs.extend(string::transformers());
    defs.extend(object::transformers());
    defs.extend(array::transformers());
    defs.extend(coerce::transformers());
    defs
}

fn definitions_to_map(defs: Vec<Arc<TransformerDefinition>>) -> HashMap<&'static str, Arc<TransformerDefinition>> {
    let mut map = HashMap::new();
    for def in defs {
        map.insert(def.name, Arc::clone(&def));
        for alias in def.aliases {
            map.insert(*alias, Arc::clone(&def));
        }
    }
    map
}

fn table() -> &'static HashMap<&'static str, Arc<TransformerDefinition>> {
    static TABLE: OnceLock<HashMap<&'static str, Arc<TransformerDefinition>>> = OnceLock::new();
    TABLE.get_or_init(|| definitions_to_map(all_transformers()))
}

/// Built-in by name or alias.
pub fn lookup(name: &str) -> Option<Arc<TransformerDefinition>> {
    table().get(name).cloned()
}

/// Names and aliases of all built-ins, in no particular order.
pub fn names() -> impl Iterator<Item = &'static str> {
    table().keys().copied()
}

/// Decode a transformer argument. An empty argument decodes to the default;
/// a malformed one is logged and yields `None`, in which case the caller
/// returns its input unchanged.
pub(crate) fn decode_arg<T>(name: &str, arg: &str) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    if arg.trim().is_empty() {
        return Some(T::default());
    }
    match serde_json::from_str(arg) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(name, arg, error = %err, "invalid transformer argument");
            None
        }
    }
}

/// Apply `f` to the decoded text of a JSON string; any other input is
/// returned unchanged.
pub(crate) fn map_string<F>(json: &str, f: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let ctx = crate::parse(json);
    if ctx.kind() != Kind::String {
        return json.to_owned();
    }
    as_string(&f(&ctx.str()))
}

/// Apply `f` to an object, or to every object element of an array. Anything
/// else passes through.
pub(crate) fn map_objects<F>(json: &str, f: F) -> String
where
    F: Fn(&Context<'_>) -> String,
{
    let ctx = crate::parse(json);
    if ctx.is_object() {
        return f(&ctx);
    }
    if !ctx.is_array() {
        return json.to_owned();
    }
    crate::util::json_array(ctx.array().iter().map(|elem| {
        if elem.is_object() {
            f(elem)
        } else {
            elem.raw().to_owned()
        }
    }))
}
