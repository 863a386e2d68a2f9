//! Rendering projected field trees as a TypeScript interface.
use crate::graphql::ir::{FieldNode, NamedType, TypeRef};
use crate::graphql::schema::ScalarType;

const INDENT: &str = "  ";

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("field `{field_name}` has {kind} type `{type_name}`, which cannot be typed")]
    UnsupportedSchemaKind {
        field_name: String,
        kind: &'static str,
        type_name: String,
    },
}

impl Error {
    pub fn help(&self) -> Option<String> {
        match self {
            Error::UnsupportedSchemaKind { .. } => Some(
                "Only scalars, lists and object selections are supported. Select this field in a nested fragment instead."
                    .to_string(),
            ),
        }
    }
}

fn compile_scalar(scalar: &ScalarType) -> &'static str {
    match scalar {
        ScalarType::Boolean => "boolean",
        ScalarType::String | ScalarType::ID => "string",
        ScalarType::Float | ScalarType::Int => "number",
        ScalarType::Custom(_) => "boolean | number | string",
    }
}

fn unsupported(field: &FieldNode, kind: &'static str, type_name: &str) -> Error {
    Error::UnsupportedSchemaKind {
        field_name: field.name.clone(),
        kind,
        type_name: type_name.to_string(),
    }
}

fn compile_named(field: &FieldNode, named: &NamedType, depth: usize) -> Result<String> {
    let output = match named {
        NamedType::Scalar(scalar) => compile_scalar(scalar).to_string(),
        NamedType::Any => "any".to_string(),
        NamedType::Object(_) => compile_object(&field.children, depth)?,
        NamedType::Interface(name) => return Err(unsupported(field, "interface", name)),
        NamedType::Union(name) => return Err(unsupported(field, "union", name)),
        NamedType::Enum(name) => return Err(unsupported(field, "enum", name)),
    };
    Ok(output)
}

/// Renders `field_type` as if it were wrapped in `NonNull`.
fn compile_non_null(field: &FieldNode, field_type: &TypeRef, depth: usize) -> Result<String> {
    match field_type {
        TypeRef::NonNull(inner) => compile_non_null(field, inner, depth),
        TypeRef::List(inner) => Ok(format!("Array<{}>", compile_field_type(field, inner, depth)?)),
        TypeRef::Named(named) => compile_named(field, named, depth),
    }
}

fn compile_field_type(field: &FieldNode, field_type: &TypeRef, depth: usize) -> Result<String> {
    match field_type {
        TypeRef::NonNull(inner) => compile_non_null(field, inner, depth),
        nullable => Ok(format!("{} | null", compile_non_null(field, nullable, depth)?)),
    }
}

fn compile_object(children: &[FieldNode], depth: usize) -> Result<String> {
    if children.is_empty() {
        return Ok(String::from("{}"));
    }
    Ok(format!(
        "{{\n{}\n{}}}",
        compile_fields(children, depth + 1)?,
        INDENT.repeat(depth)
    ))
}

fn compile_fields(fields: &[FieldNode], depth: usize) -> Result<String> {
    let indent = INDENT.repeat(depth);
    let lines = fields
        .iter()
        .map(|field| {
            let field_type = compile_field_type(field, &field.resolved_type, depth)?;
            Ok(format!("{indent}{}: {field_type},", field.name))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Renders `interface <interface_name> { ... }` with one line per field, in
/// the order given. Output depends only on the arguments.
pub fn print_interface(interface_name: &str, fields: &[FieldNode]) -> Result<String> {
    Ok(format!(
        "interface {interface_name} {}",
        compile_object(fields, 0)?
    ))
}
