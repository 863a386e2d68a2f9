use schema::Schema;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod ir;
pub mod schema;

const SDL_EXTENSIONS: [&str; 3] = ["graphql", "graphqls", "gql"];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema `{}`: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: schema::Error,
    },
}

fn is_sdl_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map_or(false, |extension| SDL_EXTENSIONS.contains(&extension))
}

/// Loads SDL from `.graphql`, `.graphqls` and `.gql` files and introspection
/// JSON from anything else.
pub fn load_schema(path: &Path) -> Result<Schema, Error> {
    let read_error = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };
    let schema = if is_sdl_path(path) {
        let contents = std::fs::read_to_string(path).map_err(read_error)?;
        Schema::from_sdl(&contents)
    } else {
        let file = File::open(path).map_err(read_error)?;
        Schema::from_reader(BufReader::new(file))
    };
    schema.map_err(|source| Error::Schema {
        path: path.to_path_buf(),
        source,
    })
}
