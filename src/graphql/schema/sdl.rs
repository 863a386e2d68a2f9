//! Building the schema from SDL documents
use super::{Field, FieldsLookup, ScalarType, Type, TypeDefinition, TYPENAME_FIELD};
use graphql_parser::schema as sdl;
use std::collections::HashMap;

fn fields_lookup(fields: &[sdl::Field<'_, String>]) -> FieldsLookup {
    let mut lookup = fields
        .iter()
        .map(|field| (field.name.clone(), Field::from(field)))
        .collect::<FieldsLookup>();
    lookup.insert(TYPENAME_FIELD.to_string(), Field::new_type_name());
    lookup
}

fn type_from_definition(definition: &sdl::TypeDefinition<'_, String>) -> (String, Type) {
    let (name, definition) = match definition {
        sdl::TypeDefinition::Scalar(scalar) => (
            &scalar.name,
            TypeDefinition::Scalar(ScalarType::from(scalar.name.as_ref())),
        ),
        sdl::TypeDefinition::Object(object) => (
            &object.name,
            TypeDefinition::Object(fields_lookup(&object.fields)),
        ),
        sdl::TypeDefinition::Interface(interface) => (
            &interface.name,
            TypeDefinition::Interface(fields_lookup(&interface.fields)),
        ),
        sdl::TypeDefinition::Union(union) => {
            (&union.name, TypeDefinition::Union(fields_lookup(&[])))
        }
        sdl::TypeDefinition::Enum(enumeration) => (&enumeration.name, TypeDefinition::Enum),
        sdl::TypeDefinition::InputObject(input) => (&input.name, TypeDefinition::InputObject),
    };
    (name.clone(), Type { definition })
}

/// Fields added by `extend type` / `extend interface` land on the extended type.
fn apply_extension(types: &mut HashMap<String, Type>, extension: &sdl::TypeExtension<'_, String>) {
    let (name, extra_fields) = match extension {
        sdl::TypeExtension::Object(object) => (&object.name, &object.fields),
        sdl::TypeExtension::Interface(interface) => (&interface.name, &interface.fields),
        _ => return,
    };
    let fields = match types.get_mut(name).map(|extended| &mut extended.definition) {
        Some(TypeDefinition::Object(fields)) | Some(TypeDefinition::Interface(fields)) => fields,
        _ => return,
    };
    for field in extra_fields {
        fields.insert(field.name.clone(), Field::from(field));
    }
}

pub(super) fn types_from_document(document: &sdl::Document<'_, String>) -> HashMap<String, Type> {
    let mut types = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            sdl::Definition::TypeDefinition(type_definition) => {
                Some(type_from_definition(type_definition))
            }
            _ => None,
        })
        .collect::<HashMap<_, _>>();
    for definition in &document.definitions {
        if let sdl::Definition::TypeExtension(extension) = definition {
            apply_extension(&mut types, extension);
        }
    }
    types
}
