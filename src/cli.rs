use clap::Parser;
use colored::Colorize;
use relay2ts::config::ProjectConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "RELAY2TS_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Generates TypeScript props interfaces from the GraphQL fragments of Relay containers.
#[derive(Debug, Parser)]
#[command(name = "relay2ts", version)]
struct Args {
    /// Schema as introspection JSON, or SDL for .graphql, .graphqls and .gql files
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Name of the generated props interface [default: IRelayProps]
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Print the props interface of every file with Relay fragments (the default)
    #[arg(short, long, conflicts_with = "update")]
    list: bool,

    /// Rewrite every file with Relay fragments to hold its props interface
    #[arg(short, long)]
    update: bool,

    /// Directory searched for package.json, .graphqlconfig and data/schema.json
    #[arg(long, value_name = "DIR", default_value = ".")]
    root_dir: PathBuf,

    /// Source files to inspect
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Update,
}

/// User configured runtime configuration
#[derive(Debug)]
pub struct RuntimeConfig {
    schema_path: PathBuf,
    interface_name: String,
    mode: Mode,
    files: Vec<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_cli() -> Result<Self, PrintableMessage> {
        let args = Args::parse();
        let project = ProjectConfig::load(&args.root_dir);
        let schema_path = args.schema.or(project.schema_path).ok_or_else(|| {
            let mut message = PrintableMessage::new_simple_program_error("no schema was found");
            message.with_help_text(
                "Pass --schema, set `schemaPath` in .graphqlconfig or add data/schema.json under the root directory.",
            );
            message
        })?;
        let interface_name = args
            .name
            .or(project.interface_name)
            .unwrap_or_else(|| relay2ts::DEFAULT_INTERFACE_NAME.to_string());
        let mode = match (args.list, args.update) {
            (false, true) => Mode::Update,
            _ => Mode::List,
        };
        Ok(RuntimeConfig {
            schema_path,
            interface_name,
            mode,
            files: args.files,
        })
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Diagnostics go to stderr and stay quiet unless `RELAY2TS_LOG` asks otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// A user facing error, optionally tied to a file and carrying help text.
#[derive(Debug)]
pub struct PrintableMessage {
    message: String,
    file_path: Option<PathBuf>,
    help_text: Option<String>,
}

impl PrintableMessage {
    pub fn new_simple_program_error(message: &str) -> Self {
        PrintableMessage {
            message: message.to_string(),
            file_path: None,
            help_text: None,
        }
    }

    pub fn new_compile_error_from_read_io_error(io_error: &std::io::Error, path: &Path) -> Self {
        Self::new_simple_program_error(&format!("could not read `{}`: {io_error}", path.display()))
    }

    pub fn new_compile_error_from_write_io_error(io_error: &std::io::Error, path: &Path) -> Self {
        Self::new_simple_program_error(&format!(
            "could not write `{}`: {io_error}",
            path.display()
        ))
    }

    pub fn with_source_information(&mut self, file_path: &Path) -> &mut Self {
        self.file_path = Some(file_path.to_path_buf());
        self
    }

    pub fn with_help_text(&mut self, help_text: &str) -> &mut Self {
        self.help_text = Some(help_text.to_string());
        self
    }
}

impl From<(&Path, relay2ts::Error)> for PrintableMessage {
    fn from((file_path, error): (&Path, relay2ts::Error)) -> Self {
        let mut message = PrintableMessage::new_simple_program_error(&error.to_string());
        message.with_source_information(file_path);
        if let Some(help_text) = error.help() {
            message.with_help_text(&help_text);
        }
        message
    }
}

impl From<relay2ts::graphql::Error> for PrintableMessage {
    fn from(error: relay2ts::graphql::Error) -> Self {
        PrintableMessage::new_simple_program_error(&error.to_string())
    }
}

impl fmt::Display for PrintableMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", "error".red().bold(), self.message)?;
        if let Some(file_path) = &self.file_path {
            write!(f, "\n {} {}", "-->".blue().bold(), file_path.display())?;
        }
        if let Some(help_text) = &self.help_text {
            write!(f, "\n {} {help_text}", "= help:".blue().bold())?;
        }
        Ok(())
    }
}

/// Prints the messages and exits with a failure status if there are any.
pub fn print_work_result(messages: Vec<PrintableMessage>) {
    if messages.is_empty() {
        return;
    }
    for message in messages {
        println!("{message}\n");
    }
    std::process::exit(1);
}
