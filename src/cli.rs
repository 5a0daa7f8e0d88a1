use crate::config::{CoverageThresholds, CovgateConfig};
use crate::locator::CoverageSource;
use crate::report::ReportOptions;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "covgate")]
#[command(about = "Coverage report for the files changed in a code review", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report coverage from an xcodebuild test run
    Xcodebuild {
        #[command(flatten)]
        source: SourceArgs,

        /// Target to leave out of the report (repeatable)
        #[arg(long = "exclude-target")]
        exclude_targets: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Report coverage from `swift test --enable-code-coverage` output
    Spm {
        /// Folder holding the exported coverage JSON
        /// [default: from config, else .build/debug/codecov]
        #[arg(long = "coverage-folder")]
        coverage_folder: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Xcodebuild { common, .. } | Commands::Spm { common, .. } => common,
        }
    }
}

/// Where the xcodebuild coverage lives; exactly one must be given.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Derived data folder containing Logs/Test/*.xcresult
    #[arg(long = "derived-data")]
    pub derived_data: Option<PathBuf>,

    /// Result bundle (.xcresult)
    #[arg(long = "xcresult")]
    pub xcresult: Option<PathBuf>,

    /// Coverage report (.xccovreport) to export directly
    #[arg(long = "artifact")]
    pub artifact: Option<PathBuf>,
}

impl SourceArgs {
    pub fn to_source(&self) -> Option<CoverageSource> {
        self.derived_data
            .clone()
            .map(CoverageSource::DerivedData)
            .or_else(|| self.xcresult.clone().map(CoverageSource::ResultBundle))
            .or_else(|| self.artifact.clone().map(CoverageSource::Artifact))
    }
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Changed file, relative to the working directory (repeatable)
    #[arg(long = "changed-file")]
    pub changed_files: Vec<PathBuf>,

    /// Read changed files from a newline-separated list ("-" for stdin)
    #[arg(long = "changed-files-from")]
    pub changed_files_from: Option<PathBuf>,

    /// Files at or below this percentage get the warning marker
    #[arg(long = "minimum-coverage", env = "COVGATE_MINIMUM_COVERAGE")]
    pub minimum_coverage: Option<f64>,

    /// A section below this percentage fails the run
    #[arg(
        long = "minimum-project-coverage",
        env = "COVGATE_MINIMUM_PROJECT_COVERAGE"
    )]
    pub minimum_project_coverage: Option<f64>,

    /// Do not print the overall project coverage message
    #[arg(long = "hide-project-coverage")]
    pub hide_project_coverage: bool,

    /// Only list files with this extension (repeatable) [default: from config, else swift]
    #[arg(long = "extension")]
    pub extensions: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Configuration file (defaults to searching for .covgate.toml)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl CommonArgs {
    /// CLI thresholds override the configured ones individually.
    pub fn thresholds(&self, config: &CovgateConfig) -> CoverageThresholds {
        CoverageThresholds::new(
            self.minimum_coverage
                .unwrap_or(config.thresholds.minimum_coverage),
            self.minimum_project_coverage
                .unwrap_or(config.thresholds.minimum_project_coverage),
        )
    }

    pub fn report_options(&self, config: &CovgateConfig, strip_prefix: Option<&Path>) -> ReportOptions {
        let file_extensions = if self.extensions.is_empty() {
            config.file_extensions.clone()
        } else {
            self.extensions.clone()
        };
        ReportOptions {
            hide_project_coverage: self.hide_project_coverage || config.hide_project_coverage,
            file_extensions,
            strip_prefix: strip_prefix.map(Path::to_path_buf),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// One path per line; blank lines are skipped.
pub fn parse_changed_files(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing_xcodebuild_command() {
        let cli = Cli::parse_from([
            "covgate",
            "xcodebuild",
            "--derived-data",
            "build/DerivedData",
            "--exclude-target",
            "AppTests.xctest",
            "--changed-file",
            "Sources/App.swift",
            "--minimum-coverage",
            "50",
        ]);

        match &cli.command {
            Commands::Xcodebuild {
                source,
                exclude_targets,
                common,
            } => {
                assert_eq!(
                    source.to_source(),
                    Some(CoverageSource::DerivedData("build/DerivedData".into()))
                );
                assert_eq!(exclude_targets, &vec!["AppTests.xctest".to_string()]);
                assert_eq!(common.changed_files, vec![PathBuf::from("Sources/App.swift")]);
                assert_eq!(common.minimum_coverage, Some(50.0));
                assert_eq!(common.format, OutputFormat::Markdown);
            }
            _ => panic!("Expected Xcodebuild command"),
        }
    }

    #[test]
    fn test_xcodebuild_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["covgate", "xcodebuild"]).is_err());
        assert!(Cli::try_parse_from([
            "covgate",
            "xcodebuild",
            "--xcresult",
            "a.xcresult",
            "--artifact",
            "b.xccovreport",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parsing_spm_command() {
        let cli = Cli::parse_from([
            "covgate",
            "spm",
            "--coverage-folder",
            "cov",
            "--format",
            "json",
            "-vv",
        ]);

        match &cli.command {
            Commands::Spm {
                coverage_folder,
                common,
            } => {
                assert_eq!(coverage_folder, &Some(PathBuf::from("cov")));
                assert_eq!(common.format, OutputFormat::Json);
                assert_eq!(common.verbosity, 2);
            }
            _ => panic!("Expected Spm command"),
        }
    }

    #[test]
    fn test_cli_values_override_config() {
        let cli = Cli::parse_from([
            "covgate",
            "spm",
            "--minimum-project-coverage",
            "75",
            "--extension",
            "m",
        ]);
        let config = CovgateConfig {
            thresholds: CoverageThresholds::new(40.0, 60.0),
            hide_project_coverage: true,
            ..Default::default()
        };

        let common = cli.command.common();

        assert_eq!(common.thresholds(&config), CoverageThresholds::new(40.0, 75.0));
        let options = common.report_options(&config, Some(Path::new("/repo")));
        assert_eq!(options.file_extensions, vec!["m".to_string()]);
        assert!(options.hide_project_coverage);
        assert_eq!(options.strip_prefix, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_report_options_fall_back_to_config_extensions() {
        let cli = Cli::parse_from(["covgate", "spm"]);

        let options = cli
            .command
            .common()
            .report_options(&CovgateConfig::default(), None);

        assert_eq!(options.file_extensions, vec!["swift".to_string()]);
        assert_eq!(options.strip_prefix, None);
    }

    #[test]
    fn test_parse_changed_files() {
        assert_eq!(
            parse_changed_files("Sources/A.swift\n\n  Sources/B.swift  \n"),
            vec![PathBuf::from("Sources/A.swift"), PathBuf::from("Sources/B.swift")]
        );
    }
}
