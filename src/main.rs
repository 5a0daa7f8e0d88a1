use anyhow::{Context, Result};
use colored::*;
use covgate::cli::{parse_args, parse_changed_files, Cli, Commands, CommonArgs, OutputFormat};
use covgate::config::{load_config, CoverageThresholds};
use covgate::env::RealEnv;
use covgate::errors::CoverageError;
use covgate::feedback::{FeedbackSink, StdoutFeedback};
use covgate::filter::{ChangeSet, ExclusionSet};
use covgate::pipeline::{
    failure_description, run_and_send, spm_report, xcodebuild_report, PipelineOptions,
};
use covgate::report::{render_report, Report};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_args();
    init_logging(cli.command.common().verbosity);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Returns whether the run passed every gate.
fn run(cli: Cli) -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let common = cli.command.common();
    let config = load_config(common.config.as_deref())?;

    let thresholds = common.thresholds(&config);
    thresholds.validate().map_err(anyhow::Error::msg)?;

    let change_set = ChangeSet::from_relative(&cwd, read_changed_files(common)?);
    log::debug!("Change set has {} files", change_set.len());

    let env = RealEnv::new();
    let result = match &cli.command {
        Commands::Xcodebuild {
            source,
            exclude_targets,
            common,
        } => {
            let source = source
                .to_source()
                .context("One of --derived-data, --xcresult or --artifact is required")?;
            let options = PipelineOptions {
                change_set,
                excluded_targets: ExclusionSet::new(
                    config.excluded_targets.iter().chain(exclude_targets).cloned(),
                ),
                report: common.report_options(&config, None),
            };
            xcodebuild_report(&env, &source, &options)
        }
        Commands::Spm {
            coverage_folder,
            common,
        } => {
            let folder = cwd.join(
                coverage_folder
                    .as_deref()
                    .unwrap_or(config.spm_coverage_folder.as_path()),
            );
            let options = PipelineOptions {
                change_set,
                excluded_targets: ExclusionSet::default(),
                report: common.report_options(&config, Some(cwd.as_path())),
            };
            spm_report(&env, &folder, &options)
        }
    };

    let mut feedback = StdoutFeedback::stdout();
    match common.format {
        OutputFormat::Markdown => run_and_send(result, &thresholds, &mut feedback)
            .context("Failed to write the coverage report"),
        OutputFormat::Json => write_json(result, &thresholds, &mut feedback),
    }
}

fn read_changed_files(common: &CommonArgs) -> Result<Vec<PathBuf>> {
    let mut paths = common.changed_files.clone();
    if let Some(source) = &common.changed_files_from {
        let contents = read_list(source)?;
        paths.extend(parse_changed_files(&contents));
    }
    Ok(paths)
}

fn read_list(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        return io::read_to_string(io::stdin()).context("Failed to read changed files from stdin");
    }
    std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read changed files from {}", source.display()))
}

fn write_json(
    result: std::result::Result<Report, CoverageError>,
    thresholds: &CoverageThresholds,
    feedback: &mut StdoutFeedback,
) -> Result<bool> {
    match result {
        Ok(report) => {
            let rendered = render_report(&report, thresholds);
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            Ok(!rendered.has_failures())
        }
        Err(err) => {
            feedback.fail(&failure_description(&err))?;
            Ok(false)
        }
    }
}
