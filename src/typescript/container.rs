//! Locating the Relay container of a source file and pulling its fragments out.
use super::syntax::{self, descendants, named_children, SourceDocument};
use std::ops::Range;
use tree_sitter::Node;

/// Stands in for every `${...}` interpolation of a fragment template. Names
/// starting with `__` are reserved in GraphQL, so it never clashes with a
/// schema field.
pub const IGNORED_FIELD: &str = "__ignored_field";

const CONTAINER_OBJECT: &str = "Relay";
const CONTAINER_FACTORY: &str = "createContainer";
const FRAGMENTS_KEY: &str = "fragments";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("found {count} Relay containers, only one per file is supported")]
    MultipleContainers { count: usize },
    #[error("Relay container does not declare a `fragments` object")]
    MissingFragmentsConfig,
    #[error("unable to find the GraphQL template of fragment `{name}`")]
    MalformedFragment { name: String },
    #[error(transparent)]
    Syntax(#[from] syntax::Error),
}

impl Error {
    pub fn help(&self) -> Option<String> {
        match self {
            Error::MultipleContainers { .. } => {
                Some("Move each container into a file of its own.".to_string())
            }
            Error::MissingFragmentsConfig => Some(
                "The second argument of `Relay.createContainer` needs a `fragments: { ... }` entry."
                    .to_string(),
            ),
            Error::MalformedFragment { .. } => Some(
                "Fragments are written as `name: () => Relay.QL`fragment on Type { ... }``."
                    .to_string(),
            ),
            Error::Syntax(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSpec {
    /// Key of the entry in the `fragments` map, used as the property name.
    pub name: String,
    /// Template text with interpolations replaced by [`IGNORED_FIELD`] and the
    /// anonymous `fragment on` given the entry's name.
    pub query: String,
}

/// Byte range of an interface declaration already present in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingInterfaceRange {
    pub start: usize,
    pub end: usize,
}

impl ExistingInterfaceRange {
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub fragments: Vec<FragmentSpec>,
    pub existing_interface_range: Option<ExistingInterfaceRange>,
}

/// A `Relay.createContainer(...)` call, pointing at its argument list.
#[derive(Debug, Clone, Copy)]
pub struct ContainerCall<'t> {
    pub arguments: Node<'t>,
}

fn is_container_factory(document: &SourceDocument<'_>, callee: Node<'_>) -> bool {
    if callee.kind() != "member_expression" {
        return false;
    }
    let object = callee.child_by_field_name("object");
    let property = callee.child_by_field_name("property");
    match (object, property) {
        (Some(object), Some(property)) => {
            object.kind() == "identifier"
                && document.text(object) == CONTAINER_OBJECT
                && document.text(property) == CONTAINER_FACTORY
        }
        _ => false,
    }
}

/// Every container call in the file, type arguments or not.
fn find_container_calls<'t>(
    document: &SourceDocument<'_>,
    root: Node<'t>,
) -> Vec<ContainerCall<'t>> {
    descendants(root)
        .into_iter()
        .filter(|node| node.kind() == "call_expression")
        .filter_map(|call| {
            let callee = call.child_by_field_name("function")?;
            let arguments = call.child_by_field_name("arguments")?;
            (arguments.kind() == "arguments" && is_container_factory(document, callee))
                .then_some(ContainerCall { arguments })
        })
        .collect()
}

/// Identifier or quoted string used as an object literal key.
fn property_key(document: &SourceDocument<'_>, entry: Node<'_>) -> Option<String> {
    let key = match entry.kind() {
        "pair" => entry.child_by_field_name("key")?,
        "method_definition" => entry.child_by_field_name("name")?,
        "shorthand_property_identifier" => entry,
        _ => return None,
    };
    let text = document.text(key);
    match key.kind() {
        "property_identifier" | "shorthand_property_identifier" => Some(text.to_string()),
        "string" => {
            let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            text.strip_prefix(quote)?
                .strip_suffix(quote)
                .map(str::to_string)
        }
        _ => None,
    }
}

/// First template literal carrying a tag, such as `Relay.QL`, in `node`.
fn find_tagged_template(node: Node<'_>) -> Option<Node<'_>> {
    descendants(node)
        .into_iter()
        .filter(|candidate| candidate.kind() == "call_expression")
        .find_map(|call| {
            call.child_by_field_name("arguments")
                .filter(|arguments| arguments.kind() == "template_string")
        })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn template_text(document: &SourceDocument<'_>, template: Node<'_>) -> String {
    let substitutions = named_children(template)
        .into_iter()
        .filter(|child| child.kind() == "template_substitution")
        .collect::<Vec<_>>();
    let closing = template
        .child(template.child_count().saturating_sub(1))
        .filter(|last| template.child_count() > 1 && last.kind() == "`" && !last.is_missing());
    let body_end = closing.map_or(template.end_byte(), |closing| closing.start_byte());

    let mut quasis = Vec::with_capacity(substitutions.len() + 1);
    let mut quasi_start = template.start_byte() + 1;
    for substitution in &substitutions {
        quasis.push(document.slice(quasi_start, substitution.start_byte()));
        quasi_start = substitution.end_byte();
    }
    quasis.push(document.slice(quasi_start, body_end));

    let mut text = String::new();
    for (index, quasi_text) in quasis.iter().enumerate() {
        if index > 0 && quasi_text.starts_with(is_name_char) {
            text.push(' ');
        }
        text.push_str(quasi_text);
        if index < substitutions.len() {
            if text.ends_with(is_name_char) {
                text.push(' ');
            }
            text.push_str(IGNORED_FIELD);
        }
    }
    text
}

/// Turns the first anonymous `fragment on` into `fragment <name> on`.
fn name_fragment(query: &str, name: &str) -> String {
    const KEYWORD: &str = "fragment";
    for (index, _) in query.match_indices(KEYWORD) {
        if query[..index].ends_with(is_name_char) {
            continue;
        }
        let after = &query[index + KEYWORD.len()..];
        let rest = after.trim_start();
        let is_anonymous = rest.len() < after.len()
            && rest
                .strip_prefix("on")
                .map_or(false, |tail| tail.starts_with(char::is_whitespace));
        if is_anonymous {
            return format!("{} {name}{after}", &query[..index + KEYWORD.len()]);
        }
    }
    query.to_string()
}

fn fragments_of_call(
    document: &SourceDocument<'_>,
    call: &ContainerCall<'_>,
) -> Result<Vec<FragmentSpec>, Error> {
    let arguments = named_children(call.arguments);
    let options = match arguments.get(1) {
        Some(node) if node.kind() == "object" => *node,
        _ if document.is_cut_off(call.arguments) => {
            tracing::debug!("container call is cut off before its options");
            return Ok(Vec::new());
        }
        _ => return Err(Error::MissingFragmentsConfig),
    };

    let fragments_map = named_children(options).into_iter().find_map(|entry| {
        let value = entry.child_by_field_name("value")?;
        (entry.kind() == "pair"
            && property_key(document, entry).as_deref() == Some(FRAGMENTS_KEY)
            && value.kind() == "object")
            .then_some(value)
    });
    let fragments_map = match fragments_map {
        Some(map) => map,
        None if document.is_cut_off(options) => {
            tracing::debug!("container options are cut off before `fragments`");
            return Ok(Vec::new());
        }
        None => return Err(Error::MissingFragmentsConfig),
    };

    let entries = named_children(fragments_map);
    let last_index = entries.len().saturating_sub(1);
    let mut fragments = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let name = match property_key(document, *entry) {
            Some(name) => name,
            None => continue,
        };
        match find_tagged_template(*entry) {
            Some(template) => {
                let query = name_fragment(&template_text(document, template), &name);
                fragments.push(FragmentSpec { name, query });
            }
            None if index == last_index && document.is_cut_off(fragments_map) => {
                tracing::debug!(fragment = %name, "skipping fragment cut off by end of input");
            }
            None => return Err(Error::MalformedFragment { name }),
        }
    }
    Ok(fragments)
}

/// Whether `node` is a complete `interface <interface_name>` declaration,
/// possibly wrapped in `export` or `declare`.
fn declares_interface(
    document: &SourceDocument<'_>,
    node: Node<'_>,
    interface_name: &str,
) -> bool {
    match node.kind() {
        "interface_declaration" => {
            let named = node
                .child_by_field_name("name")
                .map_or(false, |name| document.text(name) == interface_name);
            let closed = node
                .child_by_field_name("body")
                .map_or(false, |body| !document.is_cut_off(body));
            named && closed
        }
        "export_statement" | "ambient_declaration" => named_children(node)
            .into_iter()
            .any(|child| declares_interface(document, child, interface_name)),
        _ => false,
    }
}

fn find_existing_interface(
    document: &SourceDocument<'_>,
    interface_name: &str,
) -> Option<ExistingInterfaceRange> {
    // Statements the parser could not place still sit at the top level.
    let mut statements = named_children(document.root())
        .into_iter()
        .flat_map(|statement| match statement.kind() {
            "ERROR" => named_children(statement),
            _ => vec![statement],
        });
    statements
        .find(|statement| declares_interface(document, *statement, interface_name))
        .map(|statement| ExistingInterfaceRange {
            start: statement.start_byte(),
            end: statement.end_byte(),
        })
}

/// Finds the container of `source` and its fragment texts, together with any
/// interface already declared under `interface_name`.
///
/// A file without a container yields no fragments. Input cut off anywhere is
/// accepted: whatever is complete is returned.
pub fn extract(source: &str, interface_name: &str) -> Result<Extraction, Error> {
    let document = SourceDocument::parse(source)?;
    let calls = find_container_calls(&document, document.root());
    let fragments = match calls.as_slice() {
        [] => Vec::new(),
        [call] => fragments_of_call(&document, call)?,
        many => return Err(Error::MultipleContainers { count: many.len() }),
    };
    let existing_interface_range = find_existing_interface(&document, interface_name);
    tracing::debug!(
        containers = calls.len(),
        fragments = fragments.len(),
        existing_interface = existing_interface_range.is_some(),
        "extracted container"
    );
    Ok(Extraction {
        fragments,
        existing_interface_range,
    })
}
