//! Testing infrastructure for the coverage pipeline.
//!
//! - **[`MockEnv`]**: in-memory [`CoverageEnv`](crate::env::CoverageEnv) with
//!   a fake file system and scripted export responses
//! - **[`fixtures`]**: canned nested and flat coverage exports
//! - **[`RecordingFeedback`]**: a feedback sink that keeps every event
//! - **Assertion macros**: `assert_result_ok!`, `assert_contains_error!` and
//!   friends, exported at the crate root
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use covgate::testkit::{fixtures::XCODE_COVERAGE_JSON, MockEnv};
//! use covgate::pipeline::{xcodebuild_report, PipelineOptions};
//! use covgate::locator::CoverageSource;
//!
//! let env = MockEnv::new()
//!     .with_file("derived/Logs/Test/run.xcresult/action.xccovreport", "")
//!     .with_export_output(XCODE_COVERAGE_JSON);
//!
//! let source = CoverageSource::DerivedData("derived".into());
//! let report = xcodebuild_report(&env, &source, &PipelineOptions::default())?;
//! assert_eq!(report.sections.len(), 2);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_env;
pub mod recording;

pub use mock_env::MockEnv;
pub use recording::{FeedbackEvent, RecordingFeedback};
