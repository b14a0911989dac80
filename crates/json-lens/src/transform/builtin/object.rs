//! Object reshaping. Both transformers also apply to every object element of
//! an array.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{decode_arg, map_objects};
use crate::transform::TransformerDefinition;
use crate::util::json_object;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectArg {
    pick: Option<Vec<String>>,
    rename: HashMap<String, String>,
}

/// Keep the `pick` fields (in `pick` order; all fields when omitted), then
/// apply `rename`.
fn project_fn(json: &str, arg: &str) -> String {
    let Some(ProjectArg { pick, rename }) = decode_arg("project", arg) else {
        return json.to_owned();
    };
    map_objects(json, |obj| {
        let members = obj.map();
        let kept: Vec<(&str, &str)> = match &pick {
            Some(pick) => pick
                .iter()
                .filter_map(|key| members.get(key).map(|value| (key.as_str(), value.raw())))
                .collect(),
            None => members.iter().map(|(key, value)| (key.as_str(), value.raw())).collect(),
        };
        json_object(
            kept.into_iter()
                .map(|(key, value)| (rename.get(key).map_or(key, String::as_str), value)),
        )
    })
}

/// Fill fields that are absent or `null`; present values are never replaced.
fn default_fn(json: &str, arg: &str) -> String {
    let Some(defaults) = decode_arg::<Map<String, Value>>("default", arg) else {
        return json.to_owned();
    };
    map_objects(json, |obj| {
        let members = obj.map();
        let mut out: Vec<(String, String)> = members
            .iter()
            .map(|(key, value)| match defaults.get(key) {
                Some(default) if value.kind() == crate::Kind::Null => (key.clone(), default.to_string()),
                _ => (key.clone(), value.raw().to_owned()),
            })
            .collect();
        for (key, default) in &defaults {
            if !members.contains_key(key) {
                out.push((key.clone(), default.to_string()));
            }
        }
        json_object(out)
    })
}

pub fn transformers() -> Vec<Arc<TransformerDefinition>> {
    vec![
        Arc::new(TransformerDefinition { name: "project", aliases: &[], transform_fn: project_fn }),
        Arc::new(TransformerDefinition { name: "default", aliases: &[], transform_fn: default_fn }),
    ]
}
