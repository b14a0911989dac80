//! `#(..)` predicate evaluation.

use std::cmp::Ordering;

use json_lens_util::wildcard;

use crate::context::Context;
use crate::eval::Evaluator;
use crate::scanner::Kind;
use crate::types::{Comparison, QueryExpr, QueryOp, QueryValue, Tilde};

/// Test one array element against a predicate.
pub(crate) fn matches(ev: &Evaluator<'_>, elem: &Context<'_>, expr: &QueryExpr) -> bool {
    match expr {
        QueryExpr::Compare(cmp) => compare(ev, elem, cmp),
        QueryExpr::And(left, right) => matches(ev, elem, left) && matches(ev, elem, right),
        QueryExpr::Or(left, right) => matches(ev, elem, left) || matches(ev, elem, right),
    }
}

fn compare(ev: &Evaluator<'_>, elem: &Context<'_>, cmp: &Comparison) -> bool {
    let value = if cmp.field.is_empty() {
        elem.clone()
    } else {
        ev.resolve(elem.clone(), &cmp.field)
    };
    let Some(op) = cmp.op else {
        return value.exists();
    };

    if let QueryValue::Tilde(tilde) = cmp.value {
        let hit = match tilde {
            Tilde::True => value.exists() && value.truthy(),
            Tilde::False => !value.exists() || !value.truthy(),
            Tilde::Null => !value.exists() || value.kind() == Kind::Null,
            Tilde::Any => value.exists(),
        };
        return match op {
            QueryOp::Eq | QueryOp::Like => hit,
            QueryOp::Ne | QueryOp::NotLike => !hit,
            _ => false,
        };
    }
    if !value.exists() {
        return false;
    }

    match op {
        QueryOp::Like => like(&value, &cmp.value),
        QueryOp::NotLike => !like(&value, &cmp.value),
        _ => match (op, order(&value, &cmp.value)) {
            (QueryOp::Ne, None) => true,
            (_, None) => false,
            (QueryOp::Eq, Some(o)) => o == Ordering::Equal,
            (QueryOp::Ne, Some(o)) => o != Ordering::Equal,
            (QueryOp::Lt, Some(o)) => o == Ordering::Less,
            (QueryOp::Le, Some(o)) => o != Ordering::Greater,
            (QueryOp::Gt, Some(o)) => o == Ordering::Greater,
            (QueryOp::Ge, Some(o)) => o != Ordering::Less,
            (QueryOp::Like | QueryOp::NotLike, Some(_)) => false,
        },
    }
}

/// Ordering of a field against a query value of the same JSON type; `None`
/// for mismatched types.
fn order(value: &Context<'_>, target: &QueryValue) -> Option<Ordering> {
    match (value.kind(), target) {
        (Kind::Number, QueryValue::Num(n)) => value.f64().partial_cmp(n),
        (Kind::String, QueryValue::Str(s)) => Some(value.str().as_ref().cmp(s.as_str())),
        (Kind::True | Kind::False, QueryValue::Bool(b)) => Some(value.bool().cmp(b)),
        (Kind::Null, QueryValue::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn like(value: &Context<'_>, pattern: &QueryValue) -> bool {
    match pattern {
        QueryValue::Str(pattern) => wildcard::matches(pattern, &value.str()),
        _ => false,
    }
}
