//! Mock environment for testing the coverage pipeline.
//!
//! [`MockEnv`] is an in-memory implementation of [`CoverageEnv`]:
//! - [`FileSystem`]: in-memory files and directories
//! - [`CoverageExporter`]: a queue of scripted export responses
//!
//! # Thread Safety
//!
//! `MockEnv` is `Send + Sync + Clone`. Clones share state through
//! `Arc<RwLock<_>>` / `Arc<Mutex<_>>`, so a test can hand a clone to the
//! pipeline and still inspect the recorded export calls afterwards.

use crate::env::CoverageEnv;
use crate::errors::{CoverageError, Result};
use crate::io::traits::{CoverageExporter, ExportFailure, FileSystem};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// In-memory test environment.
///
/// # Example
///
/// ```rust,ignore
/// use covgate::testkit::MockEnv;
/// use covgate::pipeline::{xcodebuild_report, PipelineOptions};
///
/// let env = MockEnv::new()
///     .with_file("derived/Logs/Test/run.xcresult/action.xccovreport", "")
///     .with_export_failure("database is locked")
///     .with_export_output(XCODE_COVERAGE_JSON);
/// ```
#[derive(Clone, Default)]
pub struct MockEnv {
    file_system: MockFileSystem,
    exporter: ScriptedExporter,
}

impl MockEnv {
    /// Create an environment with no files and no scripted exports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; its parent directories exist implicitly.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Self {
        self.file_system
            .files
            .write()
            .expect("Lock poisoned")
            .insert(path.into(), content.as_ref().to_vec());
        self
    }

    /// Add an (otherwise empty) directory.
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.file_system
            .dirs
            .write()
            .expect("Lock poisoned")
            .insert(path.into());
        self
    }

    /// Queue a successful export response.
    pub fn with_export_output(self, output: impl AsRef<[u8]>) -> Self {
        self.exporter.push(Ok(output.as_ref().to_vec()));
        self
    }

    /// Queue one failing export response.
    pub fn with_export_failure(self, message: impl Into<String>) -> Self {
        self.exporter.push(Err(ExportFailure::new(message)));
        self
    }

    /// Queue `count` identical failing export responses.
    pub fn with_export_failures(mut self, count: usize, message: &str) -> Self {
        for _ in 0..count {
            self = self.with_export_failure(message);
        }
        self
    }

    /// Artifacts the exporter was invoked with, in call order.
    pub fn export_calls(&self) -> Vec<PathBuf> {
        self.exporter.calls.lock().expect("Lock poisoned").clone()
    }

    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.file_system
            .files
            .read()
            .expect("Lock poisoned")
            .contains_key(path.as_ref())
    }
}

impl std::fmt::Debug for MockEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file_count = self.file_system.files.read().map(|f| f.len()).unwrap_or(0);
        let pending = self.exporter.responses.lock().map(|r| r.len()).unwrap_or(0);
        f.debug_struct("MockEnv")
            .field("file_count", &file_count)
            .field("pending_exports", &pending)
            .finish_non_exhaustive()
    }
}

impl CoverageEnv for MockEnv {
    fn file_system(&self) -> &dyn FileSystem {
        &self.file_system
    }

    fn exporter(&self) -> &dyn CoverageExporter {
        &self.exporter
    }
}

#[derive(Clone, Default)]
struct MockFileSystem {
    files: Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl MockFileSystem {
    /// Every known path: files, explicit directories, and all their ancestors.
    fn known_paths(&self) -> BTreeSet<PathBuf> {
        let files = self.files.read().expect("Lock poisoned");
        let dirs = self.dirs.read().expect("Lock poisoned");
        let known = files
            .keys()
            .chain(dirs.iter())
            .flat_map(|path| path.ancestors().map(Path::to_path_buf))
            .filter(|path| !path.as_os_str().is_empty())
            .collect();
        known
    }
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        if !self.is_dir(path) {
            return Err(CoverageError::io_with_path("Not a directory", path));
        }
        let mut names: Vec<String> = self
            .known_paths()
            .into_iter()
            .filter(|candidate| candidate.parent() == Some(path))
            .filter_map(|candidate| {
                candidate
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect();
        // Reverse order so callers cannot rely on enumeration order.
        names.reverse();
        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        if self.dirs.read().expect("Lock poisoned").contains(path) {
            return true;
        }
        self.files
            .read()
            .expect("Lock poisoned")
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .read()
            .expect("Lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| CoverageError::io_with_path("File not found", path))
    }
}

type ScriptedResponse = std::result::Result<Vec<u8>, ExportFailure>;

/// Replays queued responses; an exhausted queue fails every call.
#[derive(Clone, Default)]
struct ScriptedExporter {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl ScriptedExporter {
    fn push(&self, response: ScriptedResponse) {
        self.responses
            .lock()
            .expect("Lock poisoned")
            .push_back(response);
    }
}

impl CoverageExporter for ScriptedExporter {
    fn export(&self, artifact: &Path) -> std::result::Result<Vec<u8>, ExportFailure> {
        self.calls
            .lock()
            .expect("Lock poisoned")
            .push(artifact.to_path_buf());
        self.responses
            .lock()
            .expect("Lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(ExportFailure::new("no scripted export response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_env_is_empty() {
        let env = MockEnv::new();

        assert!(!env.has_file("any.json"));
        assert!(!env.file_system().is_dir(Path::new("any")));
        assert!(env.export_calls().is_empty());
    }

    #[test]
    fn test_file_parents_are_directories() {
        let env = MockEnv::new().with_file("a/b/c.json", "{}");
        let fs = env.file_system();

        assert!(fs.is_dir(Path::new("a")));
        assert!(fs.is_dir(Path::new("a/b")));
        assert!(!fs.is_dir(Path::new("a/b/c.json")));
        assert_eq!(fs.read_bytes(Path::new("a/b/c.json")).unwrap(), b"{}");
    }

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let env = MockEnv::new()
            .with_file("root/x.json", "")
            .with_file("root/sub/y.json", "")
            .with_dir("root/empty");

        let mut names = env.file_system().read_dir(Path::new("root")).unwrap();
        names.sort();

        assert_eq!(names, vec!["empty", "sub", "x.json"]);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let env = MockEnv::new();

        let err = env
            .file_system()
            .read_bytes(Path::new("missing.json"))
            .unwrap_err();

        assert_eq!(
            err,
            CoverageError::io_with_path("File not found", Path::new("missing.json"))
        );
    }

    #[test]
    fn test_scripted_exports_replay_in_order() {
        let env = MockEnv::new()
            .with_export_failure("locked")
            .with_export_output("ok");
        let exporter = env.exporter();

        assert_eq!(
            exporter.export(Path::new("r")).unwrap_err(),
            ExportFailure::new("locked")
        );
        assert_eq!(exporter.export(Path::new("r")).unwrap(), b"ok".to_vec());
        assert!(exporter.export(Path::new("r")).is_err());
        assert_eq!(env.export_calls().len(), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let env = MockEnv::new().with_export_output("{}");
        let clone = env.clone();

        clone.exporter().export(Path::new("r")).unwrap();

        assert_eq!(env.export_calls(), vec![PathBuf::from("r")]);
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockEnv>();
    }
}
