//! go-specialize CLI
//!
//! Usage:
//!   go-specialize --name <NAME> --generator <KIND> [OPTIONS] <TYPE>
//!
//! Meant for `go:generate` lines, which set `GOPACKAGE`:
//!
//! ```go
//! //go:generate go-specialize --name UserCache --generator sync/map map[string]*User
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use go_specialize::{generate, GenerateConfig, GenerateError, Settings, TemplateKind};

/// Settings file looked up in the current directory when `--config` is not given
const DEFAULT_SETTINGS: &str = "go-specialize.toml";

#[derive(Parser)]
#[command(name = "go-specialize")]
#[command(about = "Generate type-specialized copies of Go's interface{} containers")]
struct Cli {
    /// Type argument: `map[K]V` for sync/map and singleflight, any type otherwise
    #[arg(value_name = "TYPE")]
    expr: String,

    /// Name of the generated type
    #[arg(long)]
    name: String,

    /// Template to specialize
    #[arg(long, value_parser = parse_kind)]
    generator: TemplateKind,

    /// Output file [default: <name>_gen.go]
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pinned golang.org/x/sync version for singleflight
    #[arg(long)]
    version: Option<String>,

    /// Package of the generated file
    #[arg(long, env = "GOPACKAGE")]
    package: String,

    /// Settings file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not run the formatter on the output
    #[arg(long)]
    no_format: bool,

    /// Log every rewrite step
    #[arg(short, long)]
    verbose: bool,
}

fn parse_kind(s: &str) -> Result<TemplateKind, String> {
    s.parse().map_err(|e: go_specialize::LoaderError| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e.report());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), GenerateError> {
    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));
    let settings = Settings::load_or_default(&settings_path)?;

    let mut config = GenerateConfig::new()
        .with_package(cli.package.as_str())
        .with_render(settings.render_config())
        .with_locator(settings.locator());
    if let Some(version) = &cli.version {
        config = config.with_version(version.as_str());
    }

    let output = generate(cli.generator, &cli.name, &cli.expr, &config)?;

    let out = cli
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_gen.go", cli.name.to_lowercase())));
    fs::write(&out, output).map_err(|source| GenerateError::Io {
        path: out.clone(),
        source,
    })?;
    info!(path = %out.display(), "wrote output");

    if !cli.no_format {
        format_output(&settings.formatter, &out)?;
    }
    Ok(())
}

/// Run the formatter command with the output path appended
fn format_output(formatter: &[String], out: &Path) -> Result<(), GenerateError> {
    let Some((program, args)) = formatter.split_first() else {
        return Ok(());
    };
    let command = formatter.join(" ");
    let result = Command::new(program).args(args).arg(out).output();
    match result {
        Ok(output) if output.status.success() => {
            info!(%command, "formatted output");
            Ok(())
        }
        Ok(output) => Err(GenerateError::Formatter {
            command,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Err(e) => Err(GenerateError::Formatter {
            command,
            message: e.to_string(),
        }),
    }
}
