//! Deserialzing introspection JSON
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize, Debug)]
pub struct FieldType {
    pub kind: String,
    pub name: Option<String>,
    #[serde(rename(deserialize = "ofType"))]
    pub of_type: Option<Box<FieldType>>,
}

#[derive(Deserialize, Debug)]
pub struct Field {
    pub name: String,
    #[serde(rename(deserialize = "type"))]
    pub type_information: FieldType,
    #[serde(rename(deserialize = "isDeprecated"))]
    pub deprecated: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct Type {
    pub kind: String,
    pub name: String,
    pub fields: Option<Vec<Field>>,
}

#[derive(Deserialize, Debug)]
pub struct Schema {
    pub types: Vec<Type>,
}

impl Schema {
    pub fn try_from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        let parsed: RawSchema = serde_json::from_reader(reader)?;
        let data = match parsed {
            RawSchema::Enveloped { data } => data,
            RawSchema::Bare(data) => data,
        };
        Ok(data.schema)
    }
}

#[derive(Deserialize)]
struct Data {
    #[serde(rename(deserialize = "__schema"))]
    schema: Schema,
}

/// Introspection results are accepted with or without the `data` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchema {
    Enveloped { data: Data },
    Bare(Data),
}
