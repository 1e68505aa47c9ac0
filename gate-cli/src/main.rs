//! Command-line interface for gate
//! This binary compiles, checks and inspects gate documents outside an editor.
//!
//! Usage:
//!   gate [--config `<file>`] compile `<path>`                 - Print the compiled trace
//!   gate [--config `<file>`] diagnose `<path>`                - Print one line per diagnostic
//!   gate [--config `<file>`] evolution `<path>`               - Print the evolution report
//!   gate [--config `<file>`] preview `<path>`                 - Print the gate-break preview
//!   gate hover `<path>` --offset `<n>`                        - Print hover markdown at a byte offset
//!   gate tokens|tree|ir `<path>` [--format json|yaml]       - Dump a pipeline stage

mod error;
mod transforms;

use clap::{value_parser, Arg, ArgMatches, Command};
use error::CliError;
use gate_config::{GateConfig, Loader};
use gate_parser::FILE_EXTENSION;
use std::path::{Path, PathBuf};
use transforms::{OutputFormat, STRUCTURE_TRANSFORMS};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the gate file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .index(1)
}

fn build_cli() -> Command {
    let mut command = Command::new("gate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for compiling and inspecting gate files")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in configuration")
                .value_parser(value_parser!(PathBuf)),
        )
        .subcommand(
            Command::new("compile")
                .about("Print the compiled trace")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("diagnose")
                .about("Print diagnostics, one per line")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("evolution")
                .about("Print the evolution report")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the gate-break preview")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("hover")
                .about("Print hover markdown for the word at a byte offset")
                .arg(path_arg())
                .arg(
                    Arg::new("offset")
                        .long("offset")
                        .short('o')
                        .required(true)
                        .help("Byte offset into the file (clamped to the text)")
                        .value_parser(value_parser!(usize)),
                ),
        );

    for stage in STRUCTURE_TRANSFORMS {
        command = command.subcommand(
            Command::new(*stage)
                .about(format!("Dump the {} stage", stage))
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "yaml"])
                        .default_value("json"),
                ),
        );
    }

    command
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gate=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = build_cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let Some((name, sub)) = matches.subcommand() else {
        return Ok(());
    };
    let config = load_config(sub.get_one::<PathBuf>("config"))?;
    let path = sub
        .get_one::<PathBuf>("path")
        .expect("path is required by every subcommand");
    let source = read_source(path)?;
    tracing::debug!(command = name, path = %path.display(), "dispatching");

    let output = match name {
        "compile" => transforms::compile(&source),
        "diagnose" => transforms::diagnose(&source, &config),
        "evolution" => transforms::evolution(&source, &config),
        "preview" => transforms::preview(&source, &config),
        "hover" => {
            let offset = sub.get_one::<usize>("offset").copied().unwrap_or(0);
            transforms::hover_at(&source, offset).unwrap_or_default()
        }
        stage => {
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("json");
            transforms::structure(&source, stage, OutputFormat::parse(format)?)?
        }
    };

    if !output.is_empty() {
        println!("{}", output.trim_end_matches('\n'));
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GateConfig, CliError> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    Ok(loader.build()?)
}

fn read_source(path: &Path) -> Result<String, CliError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
        tracing::warn!(
            "{} does not have the .{} extension",
            path.display(),
            FILE_EXTENSION
        );
    }
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
