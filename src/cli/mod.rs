//! The `dj2jinja` command-line interface.
//!
//! Parses arguments, loads configuration and hands off to the library. The
//! host-side parser is not part of this crate, so the CLI works on node trees
//! that were dumped to JSON.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::batch::{self, JsonTreeLoader, DEFAULT_EXTENSIONS};
use crate::cli::args::{Command, Dj2JinjaArgs};
use crate::config::WriterConfig;
use crate::errors::Result;
use crate::sink::SharedOutput;
use crate::writer::Writer;

pub mod args;
pub mod output;

/// Environment variable holding the log filter (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "DJ2JINJA_LOG";

/// Installs the global tracing subscriber, logging to stderr.
pub fn init_logging() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::new("warn"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The main entry point for the CLI.
pub fn run() {
    init_logging();
    let args = Dj2JinjaArgs::parse();

    let result = match args.command {
        Command::Convert {
            tree,
            config,
            output,
        } => handle_convert(&tree, config.as_deref(), output.as_deref()),
        Command::Batch {
            templates,
            dumps,
            output,
            extensions,
            config,
        } => handle_batch(templates, &dumps, &output, extensions, config.as_deref()),
    };

    if let Err(error) = result {
        output::print_error(error);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<WriterConfig> {
    match path {
        Some(path) => WriterConfig::from_path(path),
        None => Ok(WriterConfig::default()),
    }
}

fn build_writer(config: WriterConfig) -> Writer {
    Writer::new(config).with_error_stream(SharedOutput::new(output::WarningSink::stderr()))
}

fn handle_convert(tree: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let mut writer = build_writer(load_config(config)?);
    let nodes = batch::read_tree(tree)?;
    match output {
        Some(path) => batch::convert_file(&mut writer, &nodes, path),
        None => {
            writer.body(&nodes);
            Ok(())
        }
    }
}

fn handle_batch(
    templates: Vec<PathBuf>,
    dumps: &Path,
    output_dir: &Path,
    extensions: Vec<String>,
    config: Option<&Path>,
) -> Result<()> {
    let mut writer = build_writer(load_config(config)?);
    let extensions = if extensions.is_empty() {
        DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect()
    } else {
        extensions
    };
    let loader = JsonTreeLoader::new(templates, dumps);
    let mut report = |path: &Path| output::print_converted(path);
    let written = batch::convert_templates(
        &loader,
        output_dir,
        &extensions,
        &mut writer,
        Some(&mut report),
    )?;
    output::print_summary(written.len(), output_dir);
    Ok(())
}
