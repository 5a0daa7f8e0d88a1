// Export modules for library usage
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod extractor;
pub mod feedback;
pub mod filter;
pub mod io;
pub mod locator;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod testkit;

// Re-export commonly used types
pub use crate::config::{load_config, CoverageThresholds, CovgateConfig};

pub use crate::env::{CoverageEnv, RealEnv};

pub use crate::errors::{CoverageError, LocateError};

pub use crate::filter::{ChangeSet, ExclusionSet};

pub use crate::locator::CoverageSource;

pub use crate::model::{
    CoverageExport, CoverageFile, CoverageGroup, CoverageModel, FileSummary, FlatCoverage, Target,
};

pub use crate::pipeline::{
    failure_description, run_and_send, send_report, spm_report, xcodebuild_report,
    PipelineOptions,
};

pub use crate::report::{
    build_report, render_report, RenderedReport, RenderedSection, Report, ReportFile,
    ReportOptions, ReportSection,
};

pub use crate::feedback::{FeedbackSink, StdoutFeedback, WriterFeedback};
