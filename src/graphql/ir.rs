//! Projection of extracted fragments onto the schema, producing one typed field
//! tree per fragment.
use crate::graphql::schema::{FieldType, FieldsLookup, ScalarType, Schema, TypeDefinition};
use crate::typescript::container::{FragmentSpec, IGNORED_FIELD};
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use std::cmp::Ordering;

type ParsedTextType<'a> = &'a str;
type Result<T> = std::result::Result<T, Error>;

const PLURAL_DIRECTIVE: &str = "relay";
const PLURAL_ARGUMENT: &str = "plural";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fragment `{name}` is not a valid selection set: {source}")]
    FragmentSyntax {
        name: String,
        #[source]
        source: parsed_query::ParseError,
    },
    #[error("fragment `{name}` must hold exactly one fragment definition")]
    ExpectedSingleFragment { name: String },
    #[error("unknown type `{type_name}` at {position}")]
    UnknownType {
        type_name: String,
        position: Pos,
        possible_type_names: Vec<String>,
    },
    #[error("unknown field `{field_name}` on type `{parent_type_name}` at {position}")]
    UnknownField {
        parent_type_name: String,
        field_name: String,
        position: Pos,
        possible_field_names: Vec<String>,
    },
    #[error("unexpected selection on `{field_name}` of type `{type_name}` at {position}")]
    SelectionSetOnWrongType {
        field_name: String,
        type_name: String,
        position: Pos,
    },
    #[error("expected selection on `{field_name}` of type `{type_name}` at {position}")]
    MissingSelectionSet {
        field_name: String,
        type_name: String,
        position: Pos,
    },
    #[error("field `{field_name}` has input object type `{type_name}`")]
    InputObjectInOutput {
        field_name: String,
        type_name: String,
    },
}

impl Error {
    pub fn help(&self) -> Option<String> {
        match self {
            Error::ExpectedSingleFragment { .. } => Some(
                "Container fragments are written as a single `fragment on Type { ... }`."
                    .to_string(),
            ),
            Error::UnknownType {
                type_name,
                possible_type_names,
                ..
            } => similar_help_suggestions(type_name, possible_type_names),
            Error::UnknownField {
                parent_type_name,
                field_name,
                possible_field_names,
                ..
            } => {
                let extra = similar_help_suggestions(field_name, possible_field_names)
                    .unwrap_or_default();
                Some(format!("Check the fields of `{parent_type_name}`.{extra}"))
            }
            Error::SelectionSetOnWrongType { .. } => Some(
                "This field is not a complex type with selections. Did you accidentally place the curlies on this field?"
                    .to_string(),
            ),
            Error::MissingSelectionSet { .. } => Some(
                "This is a complex type, and it is improper GraphQL to not have at least one sub field selection."
                    .to_string(),
            ),
            Error::FragmentSyntax { .. } | Error::InputObjectInOutput { .. } => None,
        }
    }
}

fn similar_help_suggestions(name: &str, candidates: &[String]) -> Option<String> {
    let mut scored = candidates
        .iter()
        .filter(|candidate| !candidate.starts_with("__"))
        .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
        .filter(|(score, _)| *score > 0.8)
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });
    let names = scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.as_str())
        .collect::<Vec<_>>();
    match names.as_slice() {
        [] => None,
        [only] => Some(format!(" Did you mean `{only}`?")),
        many => Some(format!(" Did you mean one of `{}`?", many.join("`, `"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedType {
    Scalar(ScalarType),
    Object(String),
    Interface(String),
    Union(String),
    Enum(String),
    /// Shape that cannot be known from the fragment alone.
    Any,
}

impl NamedType {
    fn is_composite(&self) -> bool {
        matches!(
            self,
            NamedType::Object(_) | NamedType::Interface(_) | NamedType::Union(_)
        )
    }
}

/// A resolved output type. Anything not wrapped in `NonNull` may be null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(NamedType),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Nullable list of nullable `any`, used for selections whose shape is unknown.
    pub fn opaque() -> Self {
        TypeRef::list(TypeRef::Named(NamedType::Any))
    }

    pub fn named(&self) -> &NamedType {
        match self {
            TypeRef::Named(named) => named,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub name: String,
    pub resolved_type: TypeRef,
    pub children: Vec<FieldNode>,
}

/// What a single selection contributes to the node being built.
enum Occupant<'q, 'a> {
    Field(&'q parsed_query::Field<'a, ParsedTextType<'a>>),
    Inline(&'q parsed_query::InlineFragment<'a, ParsedTextType<'a>>),
    /// A nested fragment interpolation or spread. Never becomes a node.
    Ignored,
}

impl<'q, 'a> From<&'q parsed_query::Selection<'a, ParsedTextType<'a>>> for Occupant<'q, 'a> {
    fn from(selection: &'q parsed_query::Selection<'a, ParsedTextType<'a>>) -> Self {
        match selection {
            parsed_query::Selection::Field(field) if field.name == IGNORED_FIELD => {
                Occupant::Ignored
            }
            parsed_query::Selection::Field(field) => Occupant::Field(field),
            parsed_query::Selection::InlineFragment(inline) => Occupant::Inline(inline),
            parsed_query::Selection::FragmentSpread(_) => Occupant::Ignored,
        }
    }
}

#[derive(Debug)]
struct Frame {
    name: String,
    children: Vec<FieldNode>,
}

/// Adds `node` under its property name. A name selected more than once, for
/// instance directly and again through an inline fragment, keeps one node with
/// the union of both selections.
fn merge_child(children: &mut Vec<FieldNode>, node: FieldNode) {
    match children.iter_mut().find(|child| child.name == node.name) {
        Some(existing) => {
            if existing.children.is_empty() && !node.children.is_empty() {
                existing.resolved_type = node.resolved_type;
            }
            for child in node.children {
                merge_child(&mut existing.children, child);
            }
        }
        None => children.push(node),
    }
}

/// Traversal state for one fragment. The bottom frame is the synthetic root.
#[derive(Debug)]
struct FieldTreeBuilder {
    stack: Vec<Frame>,
}

impl FieldTreeBuilder {
    fn new(interface_name: &str) -> Self {
        FieldTreeBuilder {
            stack: vec![Frame {
                name: interface_name.to_string(),
                children: Vec::new(),
            }],
        }
    }

    fn enter_field(&mut self, prop_name: &str) {
        self.stack.push(Frame {
            name: prop_name.to_string(),
            children: Vec::new(),
        });
    }

    fn leave_field(&mut self, declared_type: TypeRef, has_selection_set: bool) {
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return,
        };
        let resolved_type = if has_selection_set && frame.children.is_empty() {
            TypeRef::opaque()
        } else {
            declared_type
        };
        if let Some(parent) = self.stack.last_mut() {
            merge_child(
                &mut parent.children,
                FieldNode {
                    name: frame.name,
                    resolved_type,
                    children: frame.children,
                },
            );
        }
    }

    fn finish(mut self, fragment_name: &str, root_type: TypeRef) -> FieldNode {
        let children = self
            .stack
            .drain(..)
            .next()
            .map(|root| root.children)
            .unwrap_or_default();
        FieldNode {
            name: fragment_name.to_string(),
            resolved_type: root_type,
            children,
        }
    }
}

fn named_type_for(
    schema: &Schema,
    type_name: &str,
    field_name: &str,
    position: Pos,
) -> Result<NamedType> {
    let schema_type = schema
        .get_type_for_name(type_name)
        .ok_or_else(|| Error::UnknownType {
            type_name: type_name.to_string(),
            position,
            possible_type_names: schema.type_names().map(str::to_string).collect(),
        })?;
    let named = match &schema_type.definition {
        TypeDefinition::Object(_) => NamedType::Object(type_name.to_string()),
        TypeDefinition::Interface(_) => NamedType::Interface(type_name.to_string()),
        TypeDefinition::Union(_) => NamedType::Union(type_name.to_string()),
        TypeDefinition::Enum => NamedType::Enum(type_name.to_string()),
        TypeDefinition::Scalar(scalar) => NamedType::Scalar(scalar.clone()),
        TypeDefinition::InputObject => {
            return Err(Error::InputObjectInOutput {
                field_name: field_name.to_string(),
                type_name: type_name.to_string(),
            })
        }
    };
    Ok(named)
}

fn resolve_type_ref(
    schema: &Schema,
    field_type: &FieldType,
    field_name: &str,
    position: Pos,
) -> Result<TypeRef> {
    let resolved = match field_type {
        FieldType::Named(type_name) => {
            TypeRef::Named(named_type_for(schema, type_name, field_name, position)?)
        }
        FieldType::List(inner) => {
            TypeRef::list(resolve_type_ref(schema, inner, field_name, position)?)
        }
        FieldType::NonNull(inner) => {
            TypeRef::non_null(resolve_type_ref(schema, inner, field_name, position)?)
        }
    };
    Ok(resolved)
}

fn is_plural<'a>(directives: &[parsed_query::Directive<'a, ParsedTextType<'a>>]) -> bool {
    directives.iter().any(|directive| {
        directive.name == PLURAL_DIRECTIVE
            && directive.arguments.iter().any(|(name, value)| {
                *name == PLURAL_ARGUMENT && matches!(value, parsed_query::Value::Boolean(true))
            })
    })
}

struct Walker<'s> {
    schema: &'s Schema,
    builder: FieldTreeBuilder,
}

impl<'s> Walker<'s> {
    fn fields_of(
        &self,
        owner_name: &str,
        type_name: &str,
        position: Pos,
    ) -> Result<&'s FieldsLookup> {
        let schema_type =
            self.schema
                .get_type_for_name(type_name)
                .ok_or_else(|| Error::UnknownType {
                    type_name: type_name.to_string(),
                    position,
                    possible_type_names: self.schema.type_names().map(str::to_string).collect(),
                })?;
        schema_type
            .definition
            .get_fields_lookup()
            .ok_or_else(|| Error::SelectionSetOnWrongType {
                field_name: owner_name.to_string(),
                type_name: type_name.to_string(),
                position,
            })
    }

    /// `owner_name` is the field or fragment holding the selection set. Inline
    /// fragments report through their enclosing owner.
    fn walk_selection_set<'a>(
        &mut self,
        owner_name: &str,
        parent_type_name: &str,
        selection_set: &parsed_query::SelectionSet<'a, ParsedTextType<'a>>,
    ) -> Result<()> {
        let fields_lookup = self.fields_of(owner_name, parent_type_name, selection_set.span.0)?;
        for selection in &selection_set.items {
            match Occupant::from(selection) {
                Occupant::Ignored => continue,
                Occupant::Field(field) => self.walk_field(parent_type_name, fields_lookup, field)?,
                Occupant::Inline(inline) => {
                    let type_name = match &inline.type_condition {
                        Some(parsed_query::TypeCondition::On(type_name)) => *type_name,
                        None => parent_type_name,
                    };
                    self.walk_selection_set(owner_name, type_name, &inline.selection_set)?;
                }
            }
        }
        Ok(())
    }

    fn walk_field<'a>(
        &mut self,
        parent_type_name: &str,
        fields_lookup: &'s FieldsLookup,
        field: &parsed_query::Field<'a, ParsedTextType<'a>>,
    ) -> Result<()> {
        let name = field.name;
        let prop_name = field.alias.unwrap_or(name);
        let schema_field = fields_lookup
            .get(name)
            .ok_or_else(|| Error::UnknownField {
                parent_type_name: parent_type_name.to_string(),
                field_name: name.to_string(),
                position: field.position,
                possible_field_names: fields_lookup.keys().cloned().collect(),
            })?;
        if schema_field.deprecated {
            tracing::warn!(
                field = name,
                parent = parent_type_name,
                "use of deprecated field"
            );
        }
        let declared_type = resolve_type_ref(
            self.schema,
            &schema_field.type_description,
            name,
            field.position,
        )?;
        let field_type_name = schema_field.type_description.named_type();
        let has_selection_set = !field.selection_set.items.is_empty();
        match (declared_type.named().is_composite(), has_selection_set) {
            (true, false) => {
                return Err(Error::MissingSelectionSet {
                    field_name: name.to_string(),
                    type_name: field_type_name.to_string(),
                    position: field.position,
                })
            }
            (false, true) => {
                return Err(Error::SelectionSetOnWrongType {
                    field_name: name.to_string(),
                    type_name: field_type_name.to_string(),
                    position: field.position,
                })
            }
            _ => {}
        }

        self.builder.enter_field(prop_name);
        if has_selection_set {
            self.walk_selection_set(prop_name, field_type_name, &field.selection_set)?;
        }
        self.builder.leave_field(declared_type, has_selection_set);
        Ok(())
    }
}

fn parse_fragment(
    fragment: &FragmentSpec,
) -> Result<parsed_query::FragmentDefinition<'_, ParsedTextType<'_>>> {
    let document = graphql_parser::parse_query::<&str>(&fragment.query).map_err(|source| {
        Error::FragmentSyntax {
            name: fragment.name.clone(),
            source,
        }
    })?;
    let mut definitions = document.definitions.into_iter();
    match (definitions.next(), definitions.next()) {
        (Some(parsed_query::Definition::Fragment(definition)), None) => Ok(definition),
        _ => Err(Error::ExpectedSingleFragment {
            name: fragment.name.clone(),
        }),
    }
}

fn project_fragment(
    schema: &Schema,
    fragment: &FragmentSpec,
    interface_name: &str,
) -> Result<FieldNode> {
    let definition = parse_fragment(fragment)?;
    let parsed_query::TypeCondition::On(type_name) = definition.type_condition;
    let root_named = named_type_for(schema, type_name, definition.name, definition.position)?;
    if !root_named.is_composite() {
        return Err(Error::SelectionSetOnWrongType {
            field_name: definition.name.to_string(),
            type_name: type_name.to_string(),
            position: definition.position,
        });
    }

    let mut walker = Walker {
        schema,
        builder: FieldTreeBuilder::new(interface_name),
    };
    walker.walk_selection_set(definition.name, type_name, &definition.selection_set)?;

    let root_type = if is_plural(&definition.directives) {
        TypeRef::list(TypeRef::Named(root_named))
    } else {
        TypeRef::non_null(TypeRef::Named(root_named))
    };
    tracing::debug!(fragment = %fragment.name, on = type_name, "projected fragment");
    Ok(walker.builder.finish(&fragment.name, root_type))
}

/// Resolves every fragment against `schema`, one root node per fragment in
/// input order. Nothing is returned unless every fragment projects.
pub fn project(
    schema: &Schema,
    fragments: &[FragmentSpec],
    interface_name: &str,
) -> Result<Vec<FieldNode>> {
    fragments
        .iter()
        .map(|fragment| project_fragment(schema, fragment, interface_name))
        .collect()
}
