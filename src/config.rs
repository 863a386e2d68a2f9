//! Project settings read from `package.json` and `.graphqlconfig`.
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const PACKAGE_JSON_PATH: &str = "package.json";
const GRAPHQL_CONFIG_PATH: &str = ".graphqlconfig";
const DEFAULT_SCHEMA_PATH: &str = "data/schema.json";

#[derive(Debug, Deserialize)]
struct PackageJson {
    relay2ts: Option<PackageSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageSettings {
    interface_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQLConfig {
    schema_path: Option<String>,
}

/// Settings found under a project root. Command line flags take precedence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub interface_name: Option<String>,
    pub schema_path: Option<PathBuf>,
}

/// Missing and malformed files count as absent.
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "ignoring unreadable config file");
            None
        }
    }
}

impl ProjectConfig {
    pub fn load(root_dir: &Path) -> Self {
        let interface_name = read_json::<PackageJson>(&root_dir.join(PACKAGE_JSON_PATH))
            .and_then(|package| package.relay2ts)
            .and_then(|settings| settings.interface_name);
        let schema_path = read_json::<GraphQLConfig>(&root_dir.join(GRAPHQL_CONFIG_PATH))
            .and_then(|config| config.schema_path)
            .map(|schema_path| root_dir.join(schema_path))
            .or_else(|| {
                let default_path = root_dir.join(DEFAULT_SCHEMA_PATH);
                default_path.is_file().then_some(default_path)
            });
        tracing::debug!(?interface_name, ?schema_path, "loaded project config");
        ProjectConfig {
            interface_name,
            schema_path,
        }
    }
}
