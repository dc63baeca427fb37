//! Config command - inspect, bootstrap and sanity-check configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use docr_core::models::config::DocrConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,

    /// Write a configuration file populated with the default settings
    Init(InitArgs),

    /// Verify that the configured OCR model files are in place
    Check(CheckArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Model directory to check instead of the configured one
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Check(check_args) => check_models(check_args, config_path),
        ConfigCommand::Path => show_path(),
    }
}

/// Platform config location, e.g. `~/.config/docr/config.json`.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docr")
        .join("config.json")
}

/// Resolve the configuration the way every command sees it: an explicit
/// `--config` path wins, then the default location, then built-in defaults.
/// Returns the file the settings came from, if any.
pub(crate) fn load_effective(
    config_path: Option<&str>,
) -> anyhow::Result<(DocrConfig, Option<PathBuf>)> {
    if let Some(path) = config_path {
        let path = PathBuf::from(path);
        let config = DocrConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        return Ok((config, Some(path)));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        let config = DocrConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()))?;
        debug!("Using configuration from {}", default_path.display());
        Ok((config, Some(default_path)))
    } else {
        Ok((DocrConfig::default(), None))
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let (config, source) = load_effective(config_path)?;

    // Keep stdout pipeable as JSON; the provenance note goes to stderr.
    match &source {
        Some(path) => eprintln!("{} Settings from {}", style("ℹ").blue(), path.display()),
        None => eprintln!("{} No config file found, showing defaults.", style("ℹ").blue()),
    }

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let target = args.output.unwrap_or_else(default_config_path);

    if target.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            target.display()
        );
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    DocrConfig::default().save(&target)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        target.display()
    );
    println!("Edit it to adjust the OCR, PDF, extraction and ingest settings.");

    Ok(())
}

/// Report which of the configured model files are present in the model
/// directory. Missing files are reported, not fatal.
fn check_models(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let (config, source) = load_effective(config_path)?;
    let model_dir = args
        .model_dir
        .unwrap_or_else(|| config.models.model_dir.clone());

    println!("{}", style("OCR model status").bold());
    match &source {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: built-in defaults"),
    }
    println!("Model directory: {}", model_dir.display());
    println!();

    let files = [
        (config.models.detection_model.as_str(), "text detection"),
        (config.models.recognition_model.as_str(), "text recognition"),
        (config.models.dictionary.as_str(), "character dictionary"),
    ];

    let mut all_present = true;
    for (filename, role) in files {
        let path = model_dir.join(filename);
        let (marker, size) = if path.exists() {
            let len = fs::metadata(&path)?.len();
            (style("✓").green(), format_size(len))
        } else {
            all_present = false;
            (style("✗").red(), "missing".to_string())
        };
        println!("  {} {:<20} {:>10}  {}", marker, filename, size, role);
    }

    println!();
    if all_present {
        println!("{} Models ready.", style("✓").green());
    } else {
        println!(
            "{} Place the missing files in {} or point --model-dir at them.",
            style("⚠").yellow(),
            model_dir.display()
        );
    }

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let path = default_config_path();

    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'docr config init' to create one.");
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}
