//! dual-license-finder: report exactly dual-licensed files in SPDX documents.

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use dual_license_finder::{
    cli,
    config::{self, AppConfig, CliOverrides},
    pipeline::exit_codes,
    reports::ReportFormat,
    Validatable,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dual-license-finder")]
#[command(version)]
#[command(about = "Find files in SPDX tag-value documents that are exactly dual-licensed", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Every input was scanned
    1  An error occurred
    2  --keep-going: some inputs failed, the rest were scanned

EXAMPLES:
    # Files licensed 'Apache-2.0 OR MIT' with Khronos in the copyright
    dual-license-finder vulkan.spdx

    # Several documents, grouped by file name
    dual-license-finder docs/*.spdx --keep-going

    # A different pair and copyright holder, as JSON
    dual-license-finder --license BSD-3-Clause --license MIT --copyright Acme \\
        --output-file matches.json sbom.spdx")]
struct Cli {
    /// SPDX tag-value documents to scan, in order
    #[arg(required_unless_present_any = ["completions", "print_config_schema", "print_example_config"])]
    files: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Required license (give exactly twice)
    #[arg(long = "license", value_name = "SPDX-ID")]
    licenses: Vec<String>,

    /// Substring the copyright text must contain
    #[arg(long = "copyright", value_name = "TEXT")]
    copyright: Option<String>,

    /// Output format [default: auto]
    #[arg(short = 'o', long)]
    format: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Continue with the remaining inputs when one fails
    #[arg(long)]
    keep_going: bool,

    /// SPDX license-list-data `licenses.json` to use instead of the built-in list
    #[arg(long, value_name = "PATH")]
    license_list: Option<PathBuf>,

    /// SPDX license-list-data `exceptions.json` (requires --license-list)
    #[arg(long, value_name = "PATH", requires = "license_list")]
    exception_list: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Print the JSON Schema of the config file format and exit
    #[arg(long)]
    print_config_schema: bool,

    /// Print an example config file and exit
    #[arg(long)]
    print_example_config: bool,
}

impl Cli {
    /// Settings given on the command line, applied over the config file.
    fn overrides(&self) -> Result<CliOverrides> {
        let licenses = match self.licenses.as_slice() {
            [] => None,
            [first, second] => Some([first.clone(), second.clone()]),
            other => bail!(
                "--license must be given exactly twice (got {} value(s))",
                other.len()
            ),
        };

        Ok(CliOverrides {
            licenses,
            copyright_contains: self.copyright.clone(),
            format: self.format,
            output_file: self.output_file.clone(),
            license_list: self.license_list.clone(),
            exception_list: self.exception_list.clone(),
            keep_going: self.keep_going,
            quiet: self.quiet,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the report
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Some(shell) = cli.completions {
        generate(
            shell,
            &mut Cli::command(),
            "dual-license-finder",
            &mut io::stdout(),
        );
        return Ok(());
    }
    if cli.print_config_schema {
        println!("{}", config::generate_json_schema()?);
        return Ok(());
    }
    if cli.print_example_config {
        print!("{}", config::generate_example_config());
        return Ok(());
    }

    let overrides = cli.overrides()?;
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides)
            .context("loading configuration")?;
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{error}");
        }
        bail!("{} configuration error(s): {}", errors.len(), join(&errors));
    }

    let summary = cli::run_scan(&cli.files, &config)?;
    let code = summary.exit_code();
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}

fn join(errors: &[config::ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
