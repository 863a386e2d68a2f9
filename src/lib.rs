//! Generates the TypeScript props interface of a Relay container from the
//! GraphQL fragments it declares.
use graphql::schema::Schema;
use typescript::container::ExistingInterfaceRange;

pub mod config;
pub mod graphql;
pub mod typescript;

pub const DEFAULT_INTERFACE_NAME: &str = "IRelayProps";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Extract(#[from] typescript::container::Error),
    #[error(transparent)]
    Project(#[from] graphql::ir::Error),
    #[error(transparent)]
    Print(#[from] typescript::print::Error),
}

impl Error {
    pub fn help(&self) -> Option<String> {
        match self {
            Error::Extract(error) => error.help(),
            Error::Project(error) => error.help(),
            Error::Print(error) => error.help(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult<'a> {
    pub input: &'a str,
    pub props_interface: String,
    /// Where an interface of the same name already sits in `input`, if anywhere.
    pub existing_interface_range: Option<ExistingInterfaceRange>,
}

/// Builds the props interface for the container in `source`.
///
/// Returns `None` when the source declares no fragments. The interface is
/// named `interface_name`, or [`DEFAULT_INTERFACE_NAME`] when not given.
pub fn generate<'a>(
    schema: &Schema,
    source: &'a str,
    interface_name: Option<&str>,
) -> Result<Option<GenerationResult<'a>>, Error> {
    let interface_name = interface_name.unwrap_or(DEFAULT_INTERFACE_NAME);
    let extraction = typescript::container::extract(source, interface_name)?;
    if extraction.fragments.is_empty() {
        tracing::debug!("no fragments, nothing to generate");
        return Ok(None);
    }
    let fields = graphql::ir::project(schema, &extraction.fragments, interface_name)?;
    let props_interface = typescript::print::print_interface(interface_name, &fields)?;
    Ok(Some(GenerationResult {
        input: source,
        props_interface,
        existing_interface_range: extraction.existing_interface_range,
    }))
}
