use json_lens::{add_transformer, get, transform, Kind};
use serde_json::{json, Value};

const ORDERS: &str = r#"{
  "customer": {"first_name": "ada", "last_name": "lovelace", "email": null},
  "orders": [
    {"id": 1, "total": 12.5, "status": "shipped", "items": ["pen", "ink"]},
    {"id": 2, "total": "7", "status": "pending", "items": []},
    {"id": 3, "total": 30, "status": "shipped", "items": ["book"]}
  ],
  "columns": {"id": [1, 2], "label": ["a", "b"]}
}"#;

fn value(path: &str) -> Value {
    let ctx = get(ORDERS, path);
    assert!(ctx.exists(), "{path} did not resolve");
    serde_json::from_str(ctx.raw()).unwrap_or_else(|e| panic!("{path}: {e}: {}", ctx.raw()))
}

#[test]
fn structural_matrix() {
    assert_eq!(value("customer|@keys"), json!(["first_name", "last_name", "email"]));
    assert_eq!(value("customer|@values"), json!(["ada", "lovelace", null]));
    assert_eq!(value("orders.#.id|@reverse"), json!([3, 2, 1]));
    assert_eq!(value("orders.#.items|@flatten"), json!(["pen", "ink", "book"]));
    assert_eq!(value("columns|@group"), json!([{"id": 1, "label": "a"}, {"id": 2, "label": "b"}]));
    assert_eq!(value("[customer,{\"vip\":!true}]|@join"), json!({
        "first_name": "ada", "last_name": "lovelace", "email": null, "vip": true
    }));
    assert_eq!(value("@search:status"), json!(["shipped", "pending", "shipped"]));
    assert_eq!(get(ORDERS, "orders.0|@valid").raw(), "true");
    assert_eq!(get(ORDERS, "orders.0|@this").raw(), get(ORDERS, "orders.0").raw());
}

#[test]
fn layout_matrix() {
    assert_eq!(get(ORDERS, "orders.1.items|@pretty").raw(), "[]");
    assert_eq!(get(ORDERS, "columns.id|@pretty").raw(), "[\n  1,\n  2\n]");
    assert_eq!(
        get(ORDERS, r#"columns|@pretty:{"indent":"\t","sortKeys":true}|@minify"#).raw(),
        r#"{"id":[1,2],"label":["a","b"]}"#
    );
    assert_eq!(get(ORDERS, "columns|@ugly").raw(), r#"{"id":[1,2],"label":["a","b"]}"#);
    let wrapped = get(ORDERS, "columns.id|@tostr");
    assert_eq!(wrapped.kind(), Kind::String);
    assert_eq!(wrapped.str(), "[1, 2]");
    assert_eq!(get(ORDERS, "columns.id|@tostr|@fromstr|#").i64(), 2);
}

#[test]
fn string_matrix() {
    let cases = [
        ("customer.first_name|@upper", "ADA"),
        ("customer.last_name|@title", "Lovelace"),
        ("customer|@keys|0|@camel", "firstName"),
        ("customer|@keys|1|@kebab", "last-name"),
        ("customer.first_name|@flip", "ada"),
        (r#"customer.last_name|@replaceAll:{"target":"e","replacement":"3"}"#, "lov3lac3"),
        (r#"customer.first_name|@padLeft:{"length":5,"padding":"*"}"#, "**ada"),
        ("customer.first_name|@hex", "616461"),
    ];
    for (path, expected) in cases {
        assert_eq!(get(ORDERS, path).str(), expected, "{path}");
    }
    assert_eq!(get(ORDERS, "orders.0.id|@upper").raw(), "1");
}

#[test]
fn object_matrix() {
    assert_eq!(
        value(r#"customer|@project:{"pick":["last_name","first_name"],"rename":{"last_name":"surname"}}"#),
        json!({"surname": "lovelace", "first_name": "ada"})
    );
    assert_eq!(
        value(r#"customer|@default:{"email":"n/a","phone":"-"}"#),
        json!({"first_name": "ada", "last_name": "lovelace", "email": "n/a", "phone": "-"})
    );
    assert_eq!(
        value(r#"orders|@project:{"pick":["id"]}"#),
        json!([{"id": 1}, {"id": 2}, {"id": 3}])
    );
}

#[test]
fn array_matrix() {
    assert_eq!(value(r#"orders|@filter:{"key":"status","value":"shipped"}|#.id"#), json!([1, 3]));
    assert_eq!(value(r#"orders|@filter:{"key":"total","op":"gt","value":10}|#.id"#), json!([1, 3]));
    assert_eq!(value(r#"orders|@filter:{"key":"items","op":"contains","value":"ink"}|#.id"#), json!([1]));
    assert_eq!(value("orders|@pluck:status"), json!(["shipped", "pending", "shipped"]));
    assert_eq!(value("orders|@first|id"), json!(1));
    assert_eq!(value("orders|@last|id"), json!(3));
    assert_eq!(value("orders|@count"), json!(3));
    assert_eq!(value("orders.#.total|@sum"), json!(49.5));
    assert_eq!(value("orders.#.total|@min"), json!(7));
    assert_eq!(value("orders.#.total|@max"), json!(30));
    assert_eq!(value("orders.#.total|@avg"), json!(16.5));
    assert_eq!(value("orders.1.items|@max"), Value::Null);
    assert_eq!(value("orders.1.items|@sum"), json!(0));
}

#[test]
fn coercion_matrix() {
    assert_eq!(get(ORDERS, r#"orders.1.total|@coerce:{"to":"number"}"#).kind(), Kind::Number);
    assert_eq!(get(ORDERS, r#"orders.1.total|@coerce:{"to":"number"}"#).i64(), 7);
    assert_eq!(get(ORDERS, r#"orders.0.id|@coerce:{"to":"string"}"#).raw(), "\"1\"");
    assert_eq!(get(ORDERS, r#"orders.0.id|@coerce:{"to":"bool"}"#).raw(), "true");
    assert_eq!(get(ORDERS, r#"orders.0.items|@coerce:{"to":"string"}"#).raw(), r#"["pen", "ink"]"#);
}

#[test]
fn bad_arguments_and_unknown_names_pass_through() {
    assert_eq!(get(ORDERS, "columns.id|@flatten:{oops}").raw(), "[1, 2]");
    assert_eq!(get(ORDERS, "columns.id|@noSuchThing").raw(), "[1, 2]");
    assert_eq!(get(ORDERS, r#"orders|@filter:{"key":"id","op":"between"}|#"#).i64(), 3);
}

#[test]
fn global_registration_shadows_builtins() {
    add_transformer("shout", |json: &str, _arg: &str| {
        let ctx = json_lens::parse(json);
        quote(&format!("{}!", ctx.str().to_uppercase()))
    });
    assert_eq!(get(ORDERS, "customer.first_name|@shout").str(), "ADA!");
    assert!(transform::global().contains("shout"));
    assert!(transform::global().names().iter().any(|n| n == "shout"));

    add_transformer("wc", |_: &str, _: &str| "\"shadowed\"".to_owned());
    assert_eq!(get(ORDERS, "customer.first_name|@wc").str(), "shadowed");
    assert!(transform::global().unregister("wc"));
    assert_eq!(get(ORDERS, "customer.first_name|@wc").i64(), 1);
}

#[test]
fn transformers_may_evaluate_paths() {
    add_transformer("statusOf", |json: &str, arg: &str| {
        let path = format!(r#"#(id=={arg}).status"#);
        get(json, &path).raw().to_owned()
    });
    assert_eq!(get(ORDERS, "orders|@statusOf:2").str(), "pending");
    assert!(!get(ORDERS, "orders|@statusOf:9").exists());
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap()
}
