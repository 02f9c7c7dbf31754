//! Command-line interface for regionizer
//!
//! `regionize photo.png` writes `photo_regionized.png` next to the input.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use regionizer::{regionize_file, RegionizeError, RegionizerConfig};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "regionize",
    version,
    about = "Render the borders between uniform color regions of an image as a black/white mask"
)]
struct Cli {
    /// Input image path (the extension selects the output format)
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// JSON configuration file (threshold, merge strategy, suffix, ...)
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Log pipeline progress to stderr
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(written) => println!("{}", written.display()),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            let code = match error.downcast_ref::<RegionizeError>() {
                Some(regionize_error) => {
                    eprintln!("Suggestion: {}", regionize_error.user_message());
                    regionize_error.exit_code()
                }
                None => 1,
            };
            process::exit(code);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let config = load_config(cli.config.as_deref())?;
    let written = regionize_file(&cli.input, &config)
        .with_context(|| format!("regionizing {}", cli.input.display()))?;
    Ok(written)
}

fn load_config(path: Option<&Path>) -> Result<RegionizerConfig> {
    match path {
        Some(path) => Ok(RegionizerConfig::from_json_file(path)?),
        None => Ok(RegionizerConfig::default()),
    }
}
