use crate::cli::{Mode, PrintableMessage, RuntimeConfig};
use relay2ts::graphql::schema::Schema;
use relay2ts::GenerationResult;
use std::fs;
use std::path::Path;

/// The input with the interface replacing the existing one, or appended after
/// a blank line when there is none.
fn updated_source(result: &GenerationResult<'_>) -> String {
    let input = result.input;
    if let Some(range) = result.existing_interface_range {
        return format!(
            "{}{}{}",
            &input[..range.start],
            result.props_interface,
            &input[range.end..]
        );
    }
    let has_trailing_newline = input.ends_with('\n');
    let mut output = String::with_capacity(input.len() + result.props_interface.len() + 3);
    output.push_str(input);
    if !has_trailing_newline {
        output.push('\n');
    }
    output.push('\n');
    output.push_str(&result.props_interface);
    if has_trailing_newline {
        output.push('\n');
    }
    output
}

fn run_file(path: &Path, config: &RuntimeConfig, schema: &Schema) -> Result<(), PrintableMessage> {
    let contents = fs::read_to_string(path)
        .map_err(|io_error| PrintableMessage::new_compile_error_from_read_io_error(&io_error, path))?;
    let result = match relay2ts::generate(schema, &contents, Some(config.interface_name())) {
        Ok(Some(result)) => result,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "no Relay fragments");
            return Ok(());
        }
        Err(error) => return Err(PrintableMessage::from((path, error))),
    };

    println!("{}", path.display());
    match config.mode() {
        Mode::List => println!("{}\n", result.props_interface),
        Mode::Update => {
            let output = updated_source(&result);
            if output == contents {
                tracing::debug!(path = %path.display(), "props interface already up to date");
                return Ok(());
            }
            fs::write(path, output).map_err(|io_error| {
                PrintableMessage::new_compile_error_from_write_io_error(&io_error, path)
            })?;
        }
    }
    Ok(())
}

/// Processes every file in order. A failing file is reported and never
/// written, and the remaining files are still processed.
pub fn run(config: &RuntimeConfig, schema: &Schema) -> Vec<PrintableMessage> {
    config
        .files()
        .iter()
        .filter_map(|path| run_file(path, config, schema).err())
        .collect()
}
