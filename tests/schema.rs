use crate::helpers::{container_source, json_schema, sdl_schema, FIXTURE_ROOT_PATH};
use assert_fs::prelude::*;
use pretty_assertions::assert_eq;
use relay2ts::graphql::schema::{Error, Schema, TypeDefinition};
use relay2ts::graphql::{self, load_schema};
use std::fs;
use std::path::Path;

fn fixture_json() -> serde_json::Value {
    let contents = fs::read_to_string(Path::new(FIXTURE_ROOT_PATH).join("schema.json"))
        .expect("fixture read failure");
    serde_json::from_str(&contents).expect("fixture parse failure")
}

#[test]
fn json_and_sdl_schemas_generate_the_same_interface() {
    let source = container_source(
        "artwork: () => Relay.QL`fragment on Artwork { id title gene_ids artists { name } partner { ... on Partner { name } } related { __typename } created_at }`,",
    );
    let from_sdl = relay2ts::generate(&sdl_schema(), &source, None).unwrap();
    let from_json = relay2ts::generate(&json_schema(), &source, None).unwrap();
    assert!(from_sdl.is_some());
    assert_eq!(from_sdl, from_json);
}

#[test]
fn json_schema_without_data_envelope() {
    let bare = fixture_json()["data"].to_string();
    let schema = Schema::from_reader(bare.as_bytes()).unwrap();
    assert!(schema.get_type_for_name("Artwork").is_some());
}

#[test]
fn schema_marks_deprecated_fields() {
    for schema in [sdl_schema(), json_schema()] {
        let fields = schema
            .get_type_for_name("Artwork")
            .and_then(|artwork| artwork.definition.get_fields_lookup())
            .unwrap();
        assert!(fields["legacy_id"].deprecated);
        assert!(!fields["title"].deprecated);
    }
}

fn definition_of<'s>(schema: &'s Schema, name: &str) -> &'s TypeDefinition {
    &schema
        .get_type_for_name(name)
        .unwrap_or_else(|| panic!("missing type {name}"))
        .definition
}

#[test]
fn schema_classifies_type_kinds() {
    for schema in [sdl_schema(), json_schema()] {
        assert!(matches!(definition_of(&schema, "Artwork"), TypeDefinition::Object(_)));
        assert!(matches!(definition_of(&schema, "Node"), TypeDefinition::Interface(_)));
        assert!(matches!(definition_of(&schema, "Availability"), TypeDefinition::Enum));
        assert!(matches!(
            definition_of(&schema, "ArtworkFilter"),
            TypeDefinition::InputObject
        ));
        match definition_of(&schema, "Owner") {
            TypeDefinition::Union(fields) => {
                assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["__typename"]);
            }
            other => panic!("unexpected definition {other:?}"),
        }
    }
}

#[test]
fn sdl_schema_registers_built_in_scalars() {
    let schema = Schema::from_sdl("type Query { id: ID! }").unwrap();
    for name in ["ID", "String", "Boolean", "Float", "Int"] {
        assert!(matches!(
            schema.get_type_for_name(name).map(|found| &found.definition),
            Some(TypeDefinition::Scalar(_))
        ));
    }
}

#[test]
fn sdl_schema_applies_type_extensions() {
    let schema = Schema::from_sdl("type Query { id: ID! }\nextend type Query { name: String }")
        .unwrap();
    let fields = schema
        .get_type_for_name("Query")
        .and_then(|query| query.definition.get_fields_lookup())
        .unwrap();
    assert!(fields.contains_key("name"));
}

#[test]
fn schema_invalid_json_syntax() {
    assert!(matches!(
        Schema::from_reader("t".as_bytes()),
        Err(Error::JSONParseError(_))
    ));
}

#[test]
fn schema_invalid_sdl_syntax() {
    assert!(matches!(
        Schema::from_sdl("type Query {"),
        Err(Error::SDLParseError(_))
    ));
}

#[test]
fn schema_unknown_type_kind() {
    let mut json = fixture_json();
    json["data"]["__schema"]["types"][0]["kind"] = serde_json::json!("WIDGET");
    assert!(matches!(
        Schema::from_reader(json.to_string().as_bytes()),
        Err(Error::UnknownType { kind, .. }) if kind == "WIDGET"
    ));
}

#[test]
fn load_schema_missing_file() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let missing = temp_dir.child("schema.json");
    assert!(matches!(
        load_schema(missing.path()),
        Err(graphql::Error::Read { .. })
    ));
}

#[test]
fn load_schema_chooses_format_by_extension() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let sdl_file = temp_dir.child("schema.gql");
    sdl_file.write_str("type Query { id: ID! }").unwrap();
    assert!(load_schema(sdl_file.path()).is_ok());

    let json_file = temp_dir.child("schema.json");
    json_file.write_str("type Query { id: ID! }").unwrap();
    assert!(matches!(
        load_schema(json_file.path()),
        Err(graphql::Error::Schema {
            source: Error::JSONParseError(_),
            ..
        })
    ));
}
