//! End-to-end coverage runs.
//!
//! Two entry points build a [`Report`]:
//!
//! - [`xcodebuild_report`]: Locator → Extractor → Decoder → Filter → ReportBuilder
//! - [`spm_report`]: reads pre-exported flat summaries straight into the Decoder
//!
//! Both are sequential and stop at the first error. [`run_and_send`] then
//! renders the result into a [`FeedbackSink`], turning an error into a single
//! failure line and nothing else.

use crate::config::CoverageThresholds;
use crate::env::CoverageEnv;
use crate::errors::{CoverageError, Result};
use crate::extractor::extract_coverage;
use crate::feedback::FeedbackSink;
use crate::filter::{ChangeSet, ExclusionSet};
use crate::locator::CoverageSource;
use crate::model::{decode_export, decode_flat, CoverageModel, FlatCoverage};
use crate::report::{build_report, render_report, RenderedReport, Report, ReportOptions};
use std::io;
use std::path::{Path, PathBuf};

const FLAT_EXPORT_EXTENSION: &str = "json";

/// Inputs shared by both entry points.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub change_set: ChangeSet,
    /// Ignored by the flat entry point, which has no targets.
    pub excluded_targets: ExclusionSet,
    pub report: ReportOptions,
}

/// Build the report for a nested export found via `source`.
pub fn xcodebuild_report<E: CoverageEnv + ?Sized>(
    env: &E,
    source: &CoverageSource,
    options: &PipelineOptions,
) -> Result<Report> {
    let artifact = source.resolve(env.file_system())?;
    let bytes = extract_coverage(env.exporter(), &artifact)?;
    let model = CoverageModel::Targets(decode_export(&bytes)?);
    Ok(finish(model, options))
}

/// Build the report from every flat summary in `folder`.
pub fn spm_report<E: CoverageEnv + ?Sized>(
    env: &E,
    folder: &Path,
    options: &PipelineOptions,
) -> Result<Report> {
    let exports = flat_export_files(env, folder)?
        .iter()
        .map(|path| {
            let bytes = env.file_system().read_bytes(path)?;
            log::debug!("Decoding flat coverage from {}", path.display());
            decode_flat(&bytes)
        })
        .collect::<Result<Vec<_>>>()?;

    let model = CoverageModel::Flat(FlatCoverage::merge(exports));
    Ok(finish(model, options))
}

fn flat_export_files<E: CoverageEnv + ?Sized>(env: &E, folder: &Path) -> Result<Vec<PathBuf>> {
    let fs = env.file_system();
    let mut names = if fs.is_dir(folder) {
        fs.read_dir(folder)?
    } else {
        Vec::new()
    };
    names.sort();

    let files: Vec<PathBuf> = names
        .into_iter()
        .filter(|name| {
            Path::new(name)
                .extension()
                .is_some_and(|ext| ext == FLAT_EXPORT_EXTENSION)
        })
        .map(|name| folder.join(name))
        .filter(|path| !fs.is_dir(path))
        .collect();

    if files.is_empty() {
        return Err(CoverageError::io_with_path(
            "No coverage JSON files found",
            folder,
        ));
    }
    Ok(files)
}

fn finish(model: CoverageModel, options: &PipelineOptions) -> Report {
    let filtered = model.filtered(&options.change_set, &options.excluded_targets);
    build_report(&filtered, &options.change_set, &options.report)
}

/// The single line surfaced for a failed run.
pub fn failure_description(err: &CoverageError) -> String {
    format!("Failed to get the coverage - Error: {}", err)
}

/// Send messages, then each section's gate failure followed by its table.
pub fn send_report(rendered: &RenderedReport, sink: &mut dyn FeedbackSink) -> io::Result<()> {
    for message in &rendered.messages {
        sink.message(message)?;
    }
    for section in &rendered.sections {
        if let Some(failure) = &section.gate_failure {
            sink.fail(failure)?;
        }
        sink.markdown(&section.markdown)?;
    }
    Ok(())
}

/// Render a pipeline result into `sink`.
///
/// Returns `Ok(true)` when the run passed: the pipeline succeeded and no
/// section failed its gate.
pub fn run_and_send(
    result: Result<Report>,
    thresholds: &CoverageThresholds,
    sink: &mut dyn FeedbackSink,
) -> io::Result<bool> {
    match result {
        Ok(report) => {
            let rendered = render_report(&report, thresholds);
            send_report(&rendered, sink)?;
            Ok(!rendered.has_failures())
        }
        Err(err) => {
            sink.fail(&failure_description(&err))?;
            Ok(false)
        }
    }
}
