//! Assertion macros for pipeline results.
//!
//! - [`crate::assert_result_ok!`] - Assert Result is Ok and extract value
//! - [`crate::assert_result_err!`] - Assert Result is Err and extract error
//! - [`crate::assert_contains_error!`] - Assert error message contains pattern
//! - [`crate::assert_section_titles!`] - Compare the titles of a report's sections
//!
//! # Example
//!
//! ```rust,ignore
//! use covgate::{assert_contains_error, assert_result_ok};
//!
//! let report = assert_result_ok!(xcodebuild_report(&env, &source, &options));
//! assert_section_titles!(report, ["Danger.framework: Coverage: 43.44%"]);
//!
//! assert_contains_error!(spm_report(&env, "missing", &options), "No coverage JSON");
//! ```

/// Assert that a Result is Ok and extract the value.
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "{}: Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                format!($($msg)+),
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

/// Assert that a Result is Err and extract the error.
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err, got Ok: {:?}\n  at {}:{}:{}",
                value,
                file!(),
                line!(),
                column!()
            ),
            Err(e) => e,
        }
    };
}

/// Assert that an error's Display output contains `pattern`; returns the error.
#[macro_export]
macro_rules! assert_contains_error {
    ($result:expr, $pattern:expr) => {{
        let err = $crate::assert_result_err!($result);
        let err_str = err.to_string();
        assert!(
            err_str.contains($pattern),
            "Error '{}' does not contain '{}'\n  at {}:{}:{}",
            err_str,
            $pattern,
            file!(),
            line!(),
            column!()
        );
        err
    }};
}

/// Assert the exact, ordered titles of a [`Report`](crate::report::Report)'s
/// sections. Untitled sections never match.
#[macro_export]
macro_rules! assert_section_titles {
    ($report:expr, [$($title:expr),* $(,)?]) => {{
        let actual: Vec<Option<&str>> = $report
            .sections
            .iter()
            .map(|section| section.title.as_deref())
            .collect();
        let expected: Vec<Option<&str>> = vec![$(Some($title)),*];
        assert_eq!(
            actual,
            expected,
            "Section titles differ\n  at {}:{}:{}",
            file!(),
            line!(),
            column!()
        );
    }};
}
