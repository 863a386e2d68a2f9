mod cli;
mod work;

fn main() {
    cli::init_logging();
    let config = match cli::RuntimeConfig::from_cli() {
        Ok(config) => config,
        Err(message) => return cli::print_work_result(vec![message]),
    };
    let schema = match relay2ts::graphql::load_schema(config.schema_path()) {
        Ok(schema) => schema,
        Err(error) => return cli::print_work_result(vec![error.into()]),
    };
    let messages = work::run(&config, &schema);
    cli::print_work_result(messages);
}
