//! Produce consumable schema from introspection JSON or SDL
pub use field::{Field, FieldType, ScalarType, TYPENAME_FIELD};
use std::collections::HashMap;
use std::convert::{TryFrom, TryInto};
use std::io::Read;

mod field;
mod json;
mod sdl;

pub type FieldsLookup = HashMap<String, Field>;

const BUILT_IN_SCALARS: [&str; 5] = ["ID", "String", "Boolean", "Float", "Int"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing `ofType` on a LIST type reference")]
    MissingTypeOfForList,
    #[error("missing `ofType` on a NON_NULL type reference")]
    MissingTypeOfForNonNull,
    #[error("missing `name` on a named type reference")]
    MissingNameForField,
    #[error("type `{name}` has unknown kind `{kind}`")]
    UnknownType { name: String, kind: String },
    #[error("unable to parse schema JSON: {0}")]
    JSONParseError(#[from] serde_json::Error),
    #[error("unable to parse schema SDL: {0}")]
    SDLParseError(#[from] graphql_parser::schema::ParseError),
}

/// Named types by kind. Leaf and input kinds carry nothing beyond their
/// name, which is the key they are stored under.
#[derive(Debug)]
pub enum TypeDefinition {
    Object(FieldsLookup),
    Interface(FieldsLookup),
    Union(FieldsLookup),
    Enum,
    Scalar(ScalarType),
    InputObject,
}

impl TypeDefinition {
    /// Fields that can be selected on this type, `None` for leaf and input types.
    pub fn get_fields_lookup(&self) -> Option<&FieldsLookup> {
        match self {
            TypeDefinition::Object(fields)
            | TypeDefinition::Interface(fields)
            | TypeDefinition::Union(fields) => Some(fields),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Type {
    pub definition: TypeDefinition,
}

fn fields_lookup_from_json(fields_json: Option<Vec<json::Field>>) -> Result<FieldsLookup, Error> {
    let fields_json = fields_json.unwrap_or_default();
    let mut fields = HashMap::with_capacity(fields_json.len() + 1);
    for field_json in fields_json {
        fields.insert(field_json.name.clone(), field_json.try_into()?);
    }
    fields.insert(TYPENAME_FIELD.to_string(), Field::new_type_name());
    Ok(fields)
}

impl TryFrom<json::Type> for Type {
    type Error = Error;
    fn try_from(json: json::Type) -> Result<Self, Error> {
        let json::Type { kind, name, fields } = json;
        let definition = match kind.as_ref() {
            "OBJECT" => TypeDefinition::Object(fields_lookup_from_json(fields)?),
            "INTERFACE" => TypeDefinition::Interface(fields_lookup_from_json(fields)?),
            "UNION" => TypeDefinition::Union(fields_lookup_from_json(None)?),
            "ENUM" => TypeDefinition::Enum,
            "SCALAR" => TypeDefinition::Scalar(ScalarType::from(name.as_ref())),
            "INPUT_OBJECT" => TypeDefinition::InputObject,
            _ => return Err(Error::UnknownType { name, kind }),
        };
        Ok(Type { definition })
    }
}

#[derive(Debug)]
pub struct Schema {
    types: HashMap<String, Type>,
}

impl Schema {
    /// Builds a schema from an introspection query result.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let schema_json = json::Schema::try_from_reader(reader)?;
        let mut types = HashMap::with_capacity(schema_json.types.len());
        for type_json in schema_json.types {
            let name = type_json.name.clone();
            types.insert(name, type_json.try_into()?);
        }
        tracing::debug!(types = types.len(), "loaded schema from introspection JSON");
        Ok(Schema { types })
    }

    /// Builds a schema from SDL text. Built-in scalars need not be declared.
    pub fn from_sdl(contents: &str) -> Result<Self, Error> {
        let document = graphql_parser::parse_schema::<String>(contents)?;
        let mut types = sdl::types_from_document(&document);
        for scalar_name in BUILT_IN_SCALARS {
            types.entry(scalar_name.to_string()).or_insert_with(|| Type {
                definition: TypeDefinition::Scalar(ScalarType::from(scalar_name)),
            });
        }
        tracing::debug!(types = types.len(), "loaded schema from SDL");
        Ok(Schema { types })
    }

    pub fn get_type_for_name(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
