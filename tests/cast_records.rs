use chrono::NaiveDate;
use datacast::{
    cast_to_schema, CastError, Caster, Hooks, Kind, SchemaRegistry, Value,
};
use serde::Deserialize;
use serde_json::json;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_json_str(
        r#"[
            {"name": "Class1", "fields": [
                {"name": "foo", "type": "str"},
                {"name": "bar", "type": "int"},
                {"name": "biz", "type": "float"},
                {"name": "baz", "type": "bool"}
            ]},
            {"name": "Class2", "fields": [
                {"name": "foo", "type": "str"},
                {"name": "bar", "type": "int", "default": 2}
            ]},
            {"name": "Class3", "fields": [
                {"name": "foo", "type": "int"},
                {"name": "bar", "type": "List[int]"},
                {"name": "baz", "type": "Union[int, str]"}
            ]},
            {"name": "Class4", "fields": [
                {"name": "foo", "type": "Class2"},
                {"name": "bar", "type": "bool"}
            ]},
            {"name": "Class5", "fields": [
                {"name": "foo", "type": "datetime"}
            ]},
            {"name": "Class6", "fields": [
                {"name": "foo", "type": "Union[str, int]"}
            ]},
            {"name": "Event", "fields": [
                {"name": "title", "type": "str"},
                {"name": "when", "type": "Optional[datetime]", "default": null},
                {"name": "tags", "type": "Set[str]", "default": []},
                {"name": "meta", "type": "Optional[Class5]", "default": null}
            ]}
        ]"#,
    )
    .unwrap()
}

fn cast(schema: &str, input: serde_json::Value) -> Result<datacast::Record, CastError> {
    cast_to_schema(&registry(), schema, &Value::from(input), &Hooks::new())
}

fn datetime_hooks() -> Hooks {
    Hooks::new().with(Kind::DateTime, datacast::hooks::iso_datetime)
}

#[test]
fn simple_values_already_typed_are_kept() {
    let r = cast("Class1", json!({"foo": "string", "bar": 0, "biz": 0.1, "baz": true})).unwrap();
    assert_eq!(r.get("foo"), Some(&Value::from("string")));
    assert_eq!(r.get("bar"), Some(&Value::Int(0)));
    assert_eq!(r.get("biz"), Some(&Value::float(0.1)));
    assert_eq!(r.get("baz"), Some(&Value::Bool(true)));
}

#[test]
fn present_fields_are_cast_and_missing_fields_keep_defaults() {
    let r = cast("Class2", json!({"foo": 10, "bar": 10})).unwrap();
    assert_eq!(r.get("foo"), Some(&Value::from("10")));
    assert_eq!(r.get("bar"), Some(&Value::Int(10)));

    let r = cast("Class2", json!({"foo": 10})).unwrap();
    assert_eq!(r.get("foo"), Some(&Value::from("10")));
    assert_eq!(r.get("bar"), Some(&Value::Int(2)));
}

#[test]
fn union_keeps_matching_values_and_stringifies_the_rest() {
    let r = cast("Class3", json!({"foo": 1, "bar": [1, 2, 3], "baz": 10})).unwrap();
    assert_eq!(r.get("bar"), Some(&Value::from(json!([1, 2, 3]))));
    assert_eq!(r.get("baz"), Some(&Value::Int(10)));

    let r = cast("Class3", json!({"foo": 1, "bar": [1, 2, 3], "baz": [12]})).unwrap();
    assert_eq!(r.get("baz"), Some(&Value::from("[12]")));
}

#[test]
fn union_order_does_not_override_an_exact_match() {
    let r = cast("Class6", json!({"foo": 10})).unwrap();
    assert_eq!(r.get("foo"), Some(&Value::Int(10)));

    let r = cast("Class6", json!({"foo": 2.5})).unwrap();
    assert_eq!(r.get("foo"), Some(&Value::from("2.5")));
}

#[test]
fn nested_schemas_cast_recursively() {
    let r = cast("Class4", json!({"foo": {"foo": 10, "bar": 10}, "bar": false})).unwrap();
    let inner = r.get("foo").and_then(Value::as_record).unwrap();
    assert_eq!(inner.schema_name(), "Class2");
    assert_eq!(inner.get("foo"), Some(&Value::from("10")));
    assert_eq!(inner.get("bar"), Some(&Value::Int(10)));
    assert_eq!(r.get("bar"), Some(&Value::Bool(false)));
}

#[test]
fn datetime_hook_parses_iso_strings() {
    let reg = registry();
    let hooks = datetime_hooks();
    let r = Caster::new(&reg)
        .with_hooks(&hooks)
        .cast_to_schema("Class5", &Value::from(json!({"foo": "2023-10-11T00:00:00"})))
        .unwrap();
    let expected = NaiveDate::from_ymd_opt(2023, 10, 11).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(r.get("foo"), Some(&Value::DateTime(expected)));
}

#[test]
fn datetime_without_hook_is_a_conversion_error() {
    let err = cast("Class5", json!({"foo": "2023-10-11T00:00:00"})).unwrap_err();
    let conv = err.as_conversion().unwrap();
    assert_eq!(conv.attempted, vec![Kind::DateTime]);
    assert_eq!(conv.value, Value::from("2023-10-11T00:00:00"));
}

#[test]
fn hooks_apply_at_every_depth() {
    let reg = registry();
    let hooks = datetime_hooks();
    let input = Value::from(json!({
        "title": 42,
        "when": "2024-02-29",
        "tags": ["a", "b", "a"],
        "meta": {"foo": "2023-10-11T08:30:00.250"}
    }));
    let r = Caster::new(&reg).with_hooks(&hooks).cast_to_schema("Event", &input).unwrap();
    assert_eq!(r.get("title"), Some(&Value::from("42")));
    assert_eq!(
        r.get("when").and_then(Value::as_datetime).map(|d| d.to_string()),
        Some("2024-02-29 00:00:00".to_string())
    );
    assert_eq!(r.get("tags"), Some(&Value::set_from(["a".into(), "b".into()])));
    let meta = r.get("meta").and_then(Value::as_record).unwrap();
    assert_eq!(
        meta.get("foo").and_then(Value::as_datetime).map(|d| d.to_string()),
        Some("2023-10-11 08:30:00.250".to_string())
    );
}

#[test]
fn null_defaults_apply_when_fields_are_absent() {
    let r = cast("Event", json!({"title": "x"})).unwrap();
    assert_eq!(r.get("when"), Some(&Value::None));
    assert_eq!(r.get("tags"), Some(&Value::List(vec![])));
    assert_eq!(r.get("meta"), Some(&Value::None));
}

#[test]
fn casting_an_already_cast_record_is_idempotent() {
    let first = cast("Class4", json!({"foo": {"foo": "a"}, "bar": true})).unwrap();
    let again = cast_to_schema(
        &registry(),
        "Class4",
        &Value::Dict(first.fields().clone()),
        &Hooks::new(),
    )
    .unwrap();
    assert_eq!(first, again);
}

#[derive(Debug, Deserialize, PartialEq)]
struct Class2 {
    foo: String,
    bar: i64,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Class4 {
    foo: Class2,
    bar: bool,
}

#[test]
fn cast_into_native_structs() {
    let reg = registry();
    let out: Class4 = Caster::new(&reg)
        .cast_into("Class4", &Value::from(json!({"foo": {"foo": 10}, "bar": 1})))
        .unwrap();
    assert_eq!(out, Class4 { foo: Class2 { foo: "10".into(), bar: 2 }, bar: true });
}
