//! Loose conversions used by the sort, group and numeric helpers.

use crate::{Context, Kind};

/// String form of a value: decoded text for strings, raw JSON otherwise, and
/// `""` for null or missing values.
pub fn to_string(ctx: &Context<'_>) -> String {
    ctx.str().into_owned()
}

/// Numeric value of a number, or of a string holding a number. Booleans,
/// null, containers and non-finite results are not numeric.
pub fn to_f64(ctx: &Context<'_>) -> Option<f64> {
    let parsed = match ctx.kind() {
        Kind::Number => ctx.raw().parse::<f64>().ok(),
        Kind::String => ctx.str().trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}
