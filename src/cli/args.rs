//! Command-line arguments and subcommands for `dj2jinja`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "dj2jinja",
    version,
    about = "Converts parsed Django template trees into Jinja2 templates."
)]
pub struct Dj2JinjaArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert one serialised node tree.
    Convert {
        /// JSON file holding the template's node list.
        #[arg(required = true)]
        tree: PathBuf,
        /// Writer configuration (YAML or JSON).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the result here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert every template under one or more template directories.
    Batch {
        /// Template directories, in lookup order.
        #[arg(long = "templates", required = true, num_args = 1..)]
        templates: Vec<PathBuf>,
        /// Directory of `<template>.json` tree dumps.
        #[arg(long)]
        dumps: PathBuf,
        /// Output directory; the template layout is mirrored under it.
        #[arg(long, short)]
        output: PathBuf,
        /// File suffixes to convert (default: .html and .txt).
        #[arg(long = "ext")]
        extensions: Vec<String>,
        /// Writer configuration (YAML or JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
