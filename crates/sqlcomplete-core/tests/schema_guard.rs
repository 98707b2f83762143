use schemars::generate::SchemaSettings;
use serde_json::Value;
use sqlcomplete_core::{CompleterSettings, CompletionEntry, CompletionRequest};

fn root_schema<T: schemars::JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07().into_generator();
    serde_json::to_value(generator.into_root_schema_for::<T>()).expect("serialize schema")
}

fn property_names(schema: &Value) -> Vec<&str> {
    let mut names: Vec<&str> = schema["properties"]
        .as_object()
        .expect("object schema")
        .keys()
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    names
}

#[test]
fn completion_request_schema_uses_camel_case() {
    let schema = root_schema::<CompletionRequest>();
    assert_eq!(
        property_names(&schema),
        vec!["cursorOffset", "smartCompletion", "sql"]
    );
}

#[test]
fn completion_entry_schema_uses_camel_case() {
    let schema = root_schema::<CompletionEntry>();
    assert_eq!(
        property_names(&schema),
        vec!["category", "replaceFromOffset", "schemaContext", "text"]
    );
}

#[test]
fn settings_schema_lists_both_options() {
    let schema = root_schema::<CompleterSettings>();
    assert_eq!(
        property_names(&schema),
        vec!["keywordCasing", "smartCompletion"]
    );
}
