//! `@coerce`: convert a scalar to a string, number or boolean.

use std::sync::Arc;

use json_lens_util::as_string;
use serde::Deserialize;
use tracing::warn;

use super::decode_arg;
use crate::coerce::to_f64;
use crate::transform::TransformerDefinition;
use crate::util::format_number;
use crate::Kind;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CoerceArg {
    to: String,
}

fn coerce_fn(json: &str, arg: &str) -> String {
    let Some(CoerceArg { to }) = decode_arg("coerce", arg) else {
        return json.to_owned();
    };
    let ctx = crate::parse(json);
    if !ctx.exists() || ctx.kind() == Kind::Json {
        return json.to_owned();
    }
    match to.as_str() {
        "string" if ctx.kind() == Kind::String => ctx.raw().to_owned(),
        "string" => as_string(ctx.raw()),
        "number" => match ctx.kind() {
            Kind::True => "1".to_owned(),
            Kind::False => "0".to_owned(),
            _ => to_f64(&ctx).map_or_else(|| "null".to_owned(), format_number),
        },
        "bool" => ctx.bool().to_string(),
        other => {
            warn!(to = other, "unsupported @coerce target");
            json.to_owned()
        }
    }
}

pub fn transformers() -> Vec<Arc<TransformerDefinition>> {
    vec![Arc::new(TransformerDefinition { name: "coerce", aliases: &[], transform_fn: coerce_fn })]
}
