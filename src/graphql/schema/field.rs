use super::{json, Error};
use graphql_parser::schema as sdl;
use std::convert::{TryFrom, TryInto};

pub const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    Custom(String),
    Boolean,
    String,
    Float,
    Int,
    ID,
}

impl From<&str> for ScalarType {
    fn from(name: &str) -> Self {
        match name {
            "Boolean" => ScalarType::Boolean,
            "String" => ScalarType::String,
            "Float" => ScalarType::Float,
            "Int" => ScalarType::Int,
            "ID" => ScalarType::ID,
            _ => ScalarType::Custom(name.to_string()),
        }
    }
}

/// Output type of a field exactly as the schema declares it, wrappers included.
///
/// Named types are kept by name only; what kind of type the name refers to is
/// looked up in the [`Schema`](super::Schema) when the field is projected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Named(String),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
}

impl FieldType {
    /// The innermost named type, with every list and non-null wrapper removed.
    pub fn named_type(&self) -> &str {
        match self {
            FieldType::Named(name) => name,
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.named_type(),
        }
    }

    fn non_null_named(name: &str) -> Self {
        FieldType::NonNull(Box::new(FieldType::Named(name.to_string())))
    }
}

impl TryFrom<json::FieldType> for FieldType {
    type Error = Error;
    fn try_from(json: json::FieldType) -> Result<Self, Self::Error> {
        match json.kind.as_ref() {
            "NON_NULL" => {
                let of_type = json.of_type.ok_or(Error::MissingTypeOfForNonNull)?;
                Ok(FieldType::NonNull(Box::new((*of_type).try_into()?)))
            }
            "LIST" => {
                let of_type = json.of_type.ok_or(Error::MissingTypeOfForList)?;
                Ok(FieldType::List(Box::new((*of_type).try_into()?)))
            }
            _ => json.name.map(FieldType::Named).ok_or(Error::MissingNameForField),
        }
    }
}

impl From<&sdl::Type<'_, String>> for FieldType {
    fn from(parsed: &sdl::Type<'_, String>) -> Self {
        match parsed {
            sdl::Type::NamedType(name) => FieldType::Named(name.clone()),
            sdl::Type::ListType(inner) => FieldType::List(Box::new(inner.as_ref().into())),
            sdl::Type::NonNullType(inner) => FieldType::NonNull(Box::new(inner.as_ref().into())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub deprecated: bool,
    pub type_description: FieldType,
}

impl Field {
    /// The `__typename` meta field every composite type implicitly carries.
    pub(super) fn new_type_name() -> Self {
        Field {
            deprecated: false,
            type_description: FieldType::non_null_named("String"),
        }
    }
}

impl TryFrom<json::Field> for Field {
    type Error = Error;
    fn try_from(json: json::Field) -> Result<Self, Error> {
        let json::Field {
            type_information,
            deprecated,
            ..
        } = json;
        Ok(Field {
            deprecated: deprecated.unwrap_or(false),
            type_description: type_information.try_into()?,
        })
    }
}

impl From<&sdl::Field<'_, String>> for Field {
    fn from(parsed: &sdl::Field<'_, String>) -> Self {
        Field {
            deprecated: parsed
                .directives
                .iter()
                .any(|directive| directive.name == "deprecated"),
            type_description: (&parsed.field_type).into(),
        }
    }
}
