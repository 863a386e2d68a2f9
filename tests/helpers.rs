use relay2ts::graphql::schema::Schema;
use std::path::Path;

pub mod cmd;
pub mod stdout_predicates;

pub const FIXTURE_ROOT_PATH: &str = "tests/fixtures";

pub fn sdl_schema() -> Schema {
    relay2ts::graphql::load_schema(&Path::new(FIXTURE_ROOT_PATH).join("schema.graphql"))
        .expect("fixture SDL schema failure")
}

pub fn json_schema() -> Schema {
    relay2ts::graphql::load_schema(&Path::new(FIXTURE_ROOT_PATH).join("schema.json"))
        .expect("fixture JSON schema failure")
}

/// Wraps fragment templates in a minimal container module.
pub fn container_source(fragments: &str) -> String {
    format!(
        "import * as Relay from \"react-relay\"\n\nexport default Relay.createContainer(Artwork, {{\n  fragments: {{\n{fragments}\n  }},\n}})\n"
    )
}
