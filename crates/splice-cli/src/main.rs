//! # splice
//!
//! Replays a build plan through the runtime injection plugin and prints what
//! each compilation injected.

#![deny(unsafe_code)]

mod replay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use splice_core::RuntimeGlobal;
use splice_logging::LogFormat;
use splice_settings::SpliceSettings;

use crate::replay::{ReplayOptions, render_reports, run_replay};

/// Runtime fragment injection for bundler chunks.
#[derive(Parser, Debug)]
#[command(name = "splice", version, about = "Once-per-chunk runtime fragment injection")]
struct Cli {
    /// Log level (overrides settings; `RUST_LOG` still wins).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a build plan manifest with the injection plugin applied.
    Replay {
        /// JSON manifest describing the chunks.
        manifest: PathBuf,

        /// Settings file (defaults to `$SPLICE_SETTINGS` or `./splice.json`).
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Extra compilations to run after the first, reusing the same chunks.
        #[arg(long, default_value_t = 0)]
        rebuilds: u32,

        /// Report format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the last report to `<output path>/injections.json`.
        #[arg(long)]
        write: bool,

        /// Fail unless `SPLICE_BUNDLER`, `WEBPACK` or `RSPACK` names the bundler.
        #[arg(long)]
        strict_bundler: bool,
    },
    /// List known runtime globals and their runtime expressions.
    Capabilities,
}

/// How reports are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Pretty JSON array, one entry per compilation.
    Json,
}

fn load_settings(path: Option<&Path>) -> Result<SpliceSettings> {
    match path {
        Some(path) => splice_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => splice_settings::load_settings().context("Failed to load settings"),
    }
}

fn enforce_strict_bundler<F>(settings: &mut SpliceSettings, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    settings.bundler = splice_settings::require_bundler_env(env)?;
    settings.host.strict_bundler = true;
    Ok(())
}

fn init_logging(settings: &SpliceSettings, override_level: Option<&str>) {
    let level = override_level.unwrap_or(settings.logging.level.as_str());
    let format = if settings.logging.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    splice_logging::init_subscriber_with_format(level, format);
}

fn print_capabilities() {
    let width = RuntimeGlobal::all()
        .iter()
        .map(|global| global.name().len())
        .max()
        .unwrap_or(0);
    for global in RuntimeGlobal::all() {
        println!("{:<width$}  {}", global.name(), global.expression());
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Command::Replay {
            manifest,
            settings,
            rebuilds,
            format,
            write,
            strict_bundler,
        } => {
            let mut settings = load_settings(settings.as_deref())?;
            if strict_bundler {
                enforce_strict_bundler(&mut settings, |name| std::env::var(name).ok())?;
            }
            init_logging(&settings, args.log_level.as_deref());

            let outcome = run_replay(
                &settings,
                &ReplayOptions {
                    manifest,
                    rebuilds,
                    write,
                },
            )?;
            print!("{}", render_reports(&outcome.reports, format)?);
            if let Some(path) = outcome.written {
                eprintln!("wrote {}", path.display());
            }
        }
        Command::Capabilities => {
            splice_logging::init_subscriber(args.log_level.as_deref().unwrap_or("warn"));
            print_capabilities();
        }
    }

    Ok(())
}
