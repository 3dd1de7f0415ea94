//! Courier Code Generator
//!
//! Generates a blocking HTTP client implementation for an annotated trait.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use courier_gen::analyzer::analyze_file;
use courier_gen::errors::GeneratorError;
use courier_gen::output::{generate_and_write, normalize_module_path};
use courier_gen::resolve::resolve_service;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Courier code generator - turns annotated service traits into HTTP clients
#[derive(Parser, Debug)]
#[command(name = "courier-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the annotated trait (e.g., "Store")
    #[arg(value_name = "SERVICE")]
    service: String,

    /// Source file defining the trait
    #[arg(short, long, env = "COURIER_FILE")]
    file: PathBuf,

    /// Module defining the trait, imported by the generated file
    #[arg(short, long, env = "COURIER_MODULE", default_value = "super")]
    module: String,

    /// Output directory (defaults to the directory of the source file)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Print the resolved descriptors as JSON instead of generating code
    #[arg(long)]
    descriptors: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,courier_gen=info".to_string(),
            2 => "info,courier_gen=debug".to_string(),
            _ => "debug,courier_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(cli: &Cli) -> Result<(), GeneratorError> {
    let source = analyze_file(&cli.file, &cli.service)?;
    let service = resolve_service(&source)?;

    if cli.descriptors {
        let json = serde_json::to_string_pretty(&service)
            .map_err(|e| GeneratorError::CodeGenError(format!("Failed to serialize descriptors: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let out_dir = match &cli.out_dir {
        Some(dir) => dir.as_path(),
        None => cli.file.parent().unwrap_or(Path::new(".")),
    };
    let module = normalize_module_path(&cli.module);
    generate_and_write(&service, &module, out_dir, cli.dry_run)?;

    if !cli.dry_run {
        info!(
            file = %out_dir.join(service.impl_file_name()).display(),
            client = %service.client_name(),
            "generated client"
        );
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
