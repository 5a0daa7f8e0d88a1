//! Extraction of raw coverage JSON from a located artifact.
//!
//! The export command is treated as flaky: any failure is retried, the same
//! way, with no delay, until [`MAX_EXPORT_ATTEMPTS`] attempts have been made.
//! The last failure is then reported as [`CoverageError::Extract`].

use crate::errors::{CoverageError, Result};
use crate::io::traits::{CoverageExporter, ExportFailure};
use std::path::Path;

/// Total attempts, the first one included.
pub const MAX_EXPORT_ATTEMPTS: u32 = 3;

/// Export `artifact` to JSON bytes, retrying transient failures.
pub fn extract_coverage(exporter: &dyn CoverageExporter, artifact: &Path) -> Result<Vec<u8>> {
    retry_export(MAX_EXPORT_ATTEMPTS, || exporter.export(artifact))
}

/// Run `operation` until it succeeds or `max_attempts` is used up.
pub fn retry_export<T, F>(max_attempts: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> std::result::Result<T, ExportFailure>,
{
    let mut last_failure = None;

    for attempt in 1..=max_attempts {
        match operation() {
            Ok(output) => {
                if attempt > 1 {
                    log::debug!("Coverage export succeeded on attempt {}", attempt);
                }
                return Ok(output);
            }
            Err(failure) => {
                log::warn!(
                    "Coverage export attempt {}/{} failed: {}",
                    attempt,
                    max_attempts,
                    failure
                );
                last_failure = Some(failure);
            }
        }
    }

    Err(CoverageError::Extract {
        attempts: max_attempts,
        message: last_failure
            .map(|failure| failure.message)
            .unwrap_or_else(|| "no export attempt was made".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MockEnv;
    use crate::env::CoverageEnv;
    use std::cell::Cell;

    #[test]
    fn test_first_success_is_returned_without_retry() {
        let env = MockEnv::new().with_export_output(b"{}".to_vec());

        let bytes = extract_coverage(env.exporter(), Path::new("a.xccovreport")).unwrap();

        assert_eq!(bytes, b"{}".to_vec());
        assert_eq!(env.export_calls().len(), 1);
    }

    #[test]
    fn test_succeeds_on_third_attempt() {
        let env = MockEnv::new()
            .with_export_failures(2, "database is locked")
            .with_export_output(b"[]".to_vec());

        let bytes = extract_coverage(env.exporter(), Path::new("a.xccovreport")).unwrap();

        assert_eq!(bytes, b"[]".to_vec());
        assert_eq!(env.export_calls().len(), 3);
    }

    #[test]
    fn test_budget_exhausted_reports_last_failure() {
        let env = MockEnv::new()
            .with_export_failures(2, "first")
            .with_export_failures(1, "last")
            .with_export_output(b"{}".to_vec());

        let err = extract_coverage(env.exporter(), Path::new("a.xccovreport")).unwrap_err();

        assert_eq!(
            err,
            CoverageError::Extract {
                attempts: 3,
                message: "last".to_string(),
            }
        );
        assert_eq!(env.export_calls().len(), 3);
    }

    #[test]
    fn test_every_attempt_targets_the_same_artifact() {
        let env = MockEnv::new().with_export_failures(3, "boom");

        let _ = extract_coverage(env.exporter(), Path::new("run/action.xccovreport"));

        assert!(env
            .export_calls()
            .iter()
            .all(|p| p == Path::new("run/action.xccovreport")));
    }

    #[test]
    fn test_retry_export_counts_attempts() {
        let calls = Cell::new(0);

        let result: Result<()> = retry_export(5, || {
            calls.set(calls.get() + 1);
            Err(ExportFailure::new("nope"))
        });

        assert!(result.unwrap_err().is_extract());
        assert_eq!(calls.get(), 5);
    }
}
