//! `{..}` / `[..]` projections.

use crate::context::Context;
use crate::eval::Evaluator;
use crate::types::MultiSelect;
use crate::util::{json_array, json_object};

/// Evaluate every entry against `cur` and serialize the results into a new
/// object (keyed by entry) or array (positional). Entries that resolve to
/// nothing are left out.
pub(crate) fn build(ev: &Evaluator<'_>, cur: &Context<'_>, select: &MultiSelect) -> Context<'static> {
    let results = select.entries.iter().filter_map(|entry| {
        let result = ev.resolve(cur.clone(), &entry.path);
        result.exists().then(|| (entry.key.as_str(), result))
    });
    let raw = if select.as_array {
        json_array(results.map(|(_, result)| result.raw().to_owned()))
    } else {
        json_object(results.map(|(key, result)| (key, result.raw().to_owned())))
    };
    Context::synthesized(raw)
}

#[cfg(test)]
mod tests {
    use crate::options::Options;
    use crate::transform::TransformerRegistry;
    use crate::Evaluator;

    fn select(json: &str, path: &str) -> String {
        let registry = TransformerRegistry::new();
        Evaluator::new(&registry, Options::default()).get(json, path).raw().to_owned()
    }

    const DOC: &str = r#"{"name":{"first":"Ann","last":"Lee"},"age":30,"tags":["a","b"]}"#;

    #[test]
    fn object_keys_come_from_the_last_step() {
        assert_eq!(select(DOC, "{name.first,age,tags.1}"), r#"{"first":"Ann","age":30,"1":"b"}"#);
    }

    #[test]
    fn aliases_and_literals() {
        assert_eq!(select(DOC, r#"{"who":name.last,"ok":!true}"#), r#"{"who":"Lee","ok":true}"#);
        assert_eq!(select(DOC, "[!1,age,![2]]"), "[1,30,[2]]");
    }

    #[test]
    fn missing_entries_are_omitted() {
        assert_eq!(select(DOC, "{age,nope}"), r#"{"age":30}"#);
        assert_eq!(select(DOC, "[nope]"), "[]");
    }

    #[test]
    fn nested_and_chained() {
        assert_eq!(select(DOC, "{name.first,\"x\":[age,tags.#]}"), r#"{"first":"Ann","x":[30,2]}"#);
        assert_eq!(select(DOC, "name.{last,first}|@values"), r#"["Lee","Ann"]"#);
        assert_eq!(select(DOC, "{tags|@reverse}"), r#"{"tags":["b","a"]}"#);
        assert_eq!(select(DOC, "{tags.#}"), r#"{"tags.#":2}"#);
    }
}
