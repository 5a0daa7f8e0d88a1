//! Canned coverage exports shared by unit and integration tests.

use std::path::PathBuf;

/// Nested export with two targets. `RunnerLib/Runtime.swift` is the one file
/// that [`xcode_changed_files`] does not touch.
pub const XCODE_COVERAGE_JSON: &str = r#"{
  "lineCoverage": 0.5009,
  "targets": [
    {
      "name": "Danger.framework",
      "lineCoverage": 0.4344,
      "files": [
        {
          "name": "BitBucketServerDSL.swift",
          "path": "/Users/franco/Projects/swift/Sources/Danger/BitBucketServerDSL.swift",
          "lineCoverage": 1.0
        },
        {
          "name": "Danger.swift",
          "path": "/Users/franco/Projects/swift/Sources/Danger/Danger.swift",
          "lineCoverage": 0.0
        }
      ]
    },
    {
      "name": "RunnerLib.framework",
      "lineCoverage": 0.6667,
      "files": [
        {
          "name": "ImportsFinder.swift",
          "path": "/Users/franco/Projects/swift/Sources/RunnerLib/Files Import/ImportsFinder.swift",
          "lineCoverage": 1.0
        },
        {
          "name": "HelpMessagePresenter.swift",
          "path": "/Users/franco/Projects/swift/Sources/RunnerLib/HelpMessagePresenter.swift",
          "lineCoverage": 1.0
        },
        {
          "name": "Runtime.swift",
          "path": "/Users/franco/Projects/swift/Sources/RunnerLib/Runtime.swift",
          "coveredLines": 0,
          "executableLines": 12
        }
      ]
    }
  ]
}"#;

/// Flat export as written by `swift test --enable-code-coverage`.
pub const SPM_COVERAGE_JSON: &str = r#"{
  "data": [
    {
      "files": [
        {
          "filename": "/Users/dev/Project/Sources/Project/Parser.swift",
          "summary": { "lines": { "count": 30, "covered": 20, "percent": 66.666666 } }
        },
        {
          "filename": "/Users/dev/Project/Sources/Project/Lexer.swift",
          "summary": { "lines": { "count": 10, "covered": 10, "percent": 100 } }
        },
        {
          "filename": "/Users/dev/Project/Tests/ProjectTests/ParserTests.swift",
          "summary": { "lines": { "count": 40, "covered": 36, "percent": 90 } }
        }
      ],
      "totals": { "lines": { "count": 80, "covered": 66, "percent": 82.5 } }
    }
  ],
  "type": "llvm.coverage.json.export",
  "version": "2.0.1"
}"#;

/// The four changed files that hit both targets of [`XCODE_COVERAGE_JSON`].
pub fn xcode_changed_files() -> Vec<PathBuf> {
    [
        "/Users/franco/Projects/swift/Sources/Danger/BitBucketServerDSL.swift",
        "/Users/franco/Projects/swift/Sources/Danger/Danger.swift",
        "/Users/franco/Projects/swift/Sources/RunnerLib/Files Import/ImportsFinder.swift",
        "/Users/franco/Projects/swift/Sources/RunnerLib/HelpMessagePresenter.swift",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}
