//! # CLI Layer
//!
//! One possible client of the slipgen library. This is the only place that
//! parses arguments, installs the log subscriber, writes to the terminal and
//! picks concrete row sources and converters.
//!
//! - `run()`: parse, set up logging, dispatch
//! - `build_api()`: config file + flags → `SlipApi`
//! - `handle_*()`: call the API and print the result

use super::print::{print_config, print_messages};
use super::setup::{Cli, Commands, GenerateArgs};
use clap::Parser;
use slipgen::api::{self, ConfigAction, SlipApi};
use slipgen::config::SlipConfig;
use slipgen::convert::office::OfficeConverter;
use slipgen::convert::{Converter, SkipConverter};
use slipgen::error::Result;
use slipgen::source::csv_file::CsvSource;
use slipgen::source::sheets::SheetsSource;
use slipgen::source::RowSource;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliApi = SlipApi<Box<dyn RowSource>, Box<dyn Converter>>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Generate(args)) => handle_generate(&cli.config, &args),
        Some(Commands::Init { force }) => handle_init(&cli.config, force),
        Some(Commands::Config { key, value }) => handle_config(&cli.config, key, value),
        None => handle_generate(&cli.config, &GenerateArgs::default()),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "slipgen=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_api(config_path: &Path, args: &GenerateArgs) -> Result<CliApi> {
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    let mut config = SlipConfig::load(config_path)?.resolved_against(base);
    args.apply(&mut config);
    config.validate()?;

    let source: Box<dyn RowSource> = match &config.csv_path {
        Some(path) => Box::new(CsvSource::new(path)),
        None => Box::new(SheetsSource::new(
            config.sheet_id.clone(),
            config.sheet_name.clone(),
            config.credentials_path.clone(),
        )),
    };
    let converter: Box<dyn Converter> = if args.no_pdf {
        Box::new(SkipConverter)
    } else {
        Box::new(OfficeConverter::new(config.converter.clone()))
    };
    debug!(source = %source.describe(), output = %config.output_dir.display(), "starting run");

    Ok(SlipApi::new(source, converter, config))
}

fn handle_generate(config_path: &Path, args: &GenerateArgs) -> Result<()> {
    let api = build_api(config_path, args)?;
    let result = api.generate()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(config_path: &Path, force: bool) -> Result<()> {
    let result = api::init(config_path, force)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(config_path: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = api::config(config_path, action.clone())?;
    if let (ConfigAction::ShowAll, Some(config)) = (&action, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
