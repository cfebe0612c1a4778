//! `splice replay`: compile a manifest one or more times and collect reports.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use splice_host::{BuildPlan, Compiler, InjectionReport};
use splice_inject::RuntimeInjectionPlugin;
use splice_settings::SpliceSettings;
use tracing::info;

use crate::OutputFormat;

/// Inputs for one replay run.
#[derive(Debug)]
pub(crate) struct ReplayOptions {
    pub manifest: PathBuf,
    pub rebuilds: u32,
    pub write: bool,
}

/// Reports from every compilation, plus where the last one was written.
#[derive(Debug)]
pub(crate) struct ReplayOutcome {
    pub reports: Vec<InjectionReport>,
    pub written: Option<PathBuf>,
}

pub(crate) fn run_replay(settings: &SpliceSettings, options: &ReplayOptions) -> Result<ReplayOutcome> {
    let plan = BuildPlan::load(&options.manifest)
        .with_context(|| format!("Failed to load manifest {}", options.manifest.display()))?;

    let plugin = RuntimeInjectionPlugin::from_settings(&settings.injection);
    let mut compiler = Compiler::from_settings(settings);
    compiler.apply(&plugin).context("Failed to apply injection plugin")?;

    let runs = u64::from(options.rebuilds) + 1;
    let reports: Vec<InjectionReport> = (0..runs).map(|_| compiler.compile(&plan).report()).collect();
    info!(
        compilations = reports.len(),
        chunks = plan.len(),
        bundler = %settings.bundler,
        "replay finished"
    );

    let written = match reports.last() {
        Some(last) if options.write => {
            let dir = settings.output.resolve_path(settings.bundler);
            let path = last
                .write_to(&dir)
                .with_context(|| format!("Failed to write report to {}", dir.display()))?;
            Some(path)
        }
        _ => None,
    };

    Ok(ReplayOutcome { reports, written })
}

pub(crate) fn render_reports(reports: &[InjectionReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(reports)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut text = String::new();
            for report in reports {
                write!(text, "{report}")?;
            }
            Ok(text)
        }
    }
}
