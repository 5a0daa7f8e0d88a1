//! Narrows a coverage model to the files touched by a change.
//!
//! Policy:
//!
//! - An empty [`ChangeSet`] is a no-op. The model passes through untouched,
//!   exclusions included, so whole-project runs still report.
//! - Otherwise excluded targets are dropped, each remaining target keeps only
//!   the files matching a changed path, and targets left without files are
//!   dropped.
//! - A target's own percentage is carried through as exported.
//!
//! Path matching is by trailing components in either direction, since build
//! tools record absolute paths from the build machine while changed paths are
//! rooted at the checkout.

use crate::model::{CoverageExport, CoverageGroup, CoverageModel, FlatCoverage, Target};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Paths under review. Order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<PathBuf>,
}

impl ChangeSet {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Join repository-relative paths onto `root`. Absolute paths are kept.
    pub fn from_relative<I, P>(root: &Path, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths.into_iter().map(|p| root.join(p)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// Whether any changed path references `model_path`.
    pub fn matches(&self, model_path: &Path) -> bool {
        self.paths.iter().any(|changed| paths_match(changed, model_path))
    }
}

/// Target names dropped whenever filtering applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, target: &str) -> bool {
        self.names.contains(target)
    }
}

/// Suffix match in either direction, comparing whole components.
///
/// This is stricter than a plain trailing-substring test: a changed
/// `Foo.swift` never matches a recorded `MyFoo.swift`.
///
/// `/repo/Sources/App/Foo.swift` matches `Sources/App/Foo.swift` and
/// `./App/Foo.swift`, but not `MyFoo.swift`.
pub fn paths_match(changed: &Path, model: &Path) -> bool {
    let changed = strip_current_dir(changed);
    let model = strip_current_dir(model);
    if changed.as_os_str().is_empty() || model.as_os_str().is_empty() {
        return false;
    }
    changed.ends_with(model) || model.ends_with(changed)
}

fn strip_current_dir(path: &Path) -> &Path {
    let mut components = path.components();
    while components.clone().next() == Some(Component::CurDir) {
        components.next();
    }
    components.as_path()
}

impl CoverageModel {
    /// Apply the change-set policy, producing a new model.
    pub fn filtered(&self, change_set: &ChangeSet, exclusions: &ExclusionSet) -> CoverageModel {
        if change_set.is_empty() {
            log::debug!("Empty change set, reporting the whole model");
            return self.clone();
        }
        let filtered = match self {
            Self::Targets(export) => Self::Targets(filter_export(export, change_set, exclusions)),
            Self::Flat(flat) => Self::Flat(filter_flat(flat, change_set)),
        };
        log::debug!(
            "Filtered coverage to {} of {} files",
            filtered.file_count(),
            self.file_count()
        );
        filtered
    }
}

fn filter_export(
    export: &CoverageExport,
    change_set: &ChangeSet,
    exclusions: &ExclusionSet,
) -> CoverageExport {
    let targets = export
        .targets
        .iter()
        .filter(|target| !exclusions.contains(&target.name))
        .filter_map(|target| {
            let files: Vec<_> = target
                .files
                .iter()
                .filter(|file| change_set.matches(&file.path))
                .cloned()
                .collect();
            if files.is_empty() {
                None
            } else {
                Some(Target {
                    name: target.name.clone(),
                    percentage: target.percentage,
                    files,
                })
            }
        })
        .collect();

    CoverageExport {
        percentage: export.percentage,
        targets,
    }
}

fn filter_flat(flat: &FlatCoverage, change_set: &ChangeSet) -> FlatCoverage {
    let groups = flat
        .groups
        .iter()
        .filter_map(|group| {
            let files: Vec<_> = group
                .files
                .iter()
                .filter(|file| change_set.matches(&file.filename))
                .cloned()
                .collect();
            (!files.is_empty()).then_some(CoverageGroup { files })
        })
        .collect();

    FlatCoverage { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverageFile, FileSummary};
    use pretty_assertions::assert_eq;

    fn file(path: &str, percentage: f64) -> CoverageFile {
        CoverageFile {
            name: Path::new(path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned(),
            path: PathBuf::from(path),
            percentage,
        }
    }

    fn sample_model() -> CoverageModel {
        CoverageModel::Targets(CoverageExport {
            percentage: 50.09,
            targets: vec![
                Target {
                    name: "A".into(),
                    percentage: 43.44,
                    files: vec![file("/src/A/X.swift", 100.0), file("/src/A/Y.swift", 0.0)],
                },
                Target {
                    name: "B".into(),
                    percentage: 66.67,
                    files: vec![file("/src/B/Z.swift", 100.0), file("/src/B/W.swift", 100.0)],
                },
            ],
        })
    }

    fn targets(model: &CoverageModel) -> &[Target] {
        match model {
            CoverageModel::Targets(export) => &export.targets,
            CoverageModel::Flat(_) => panic!("expected target model"),
        }
    }

    #[test]
    fn test_paths_match_suffix_both_directions() {
        assert!(paths_match(
            Path::new("/home/user/project/Sources/App/Foo.swift"),
            Path::new("Sources/App/Foo.swift")
        ));
        assert!(paths_match(
            Path::new("./App/Foo.swift"),
            Path::new("/build/Sources/App/Foo.swift")
        ));
        assert!(paths_match(
            Path::new("/same/path.swift"),
            Path::new("/same/path.swift")
        ));
    }

    #[test]
    fn test_paths_match_requires_whole_components() {
        assert!(!paths_match(
            Path::new("/project/Sources/MyFoo.swift"),
            Path::new("Foo.swift")
        ));
        assert!(!paths_match(
            Path::new("/project/Sources/Foo.swift"),
            Path::new("/other/Sources/Foo.swift")
        ));
    }

    #[test]
    fn test_empty_paths_never_match() {
        assert!(!paths_match(Path::new(""), Path::new("/a/b.swift")));
        assert!(!paths_match(Path::new("/a/b.swift"), Path::new("./")));
    }

    #[test]
    fn test_empty_change_set_is_noop_even_with_exclusions() {
        let model = sample_model();

        let filtered = model.filtered(&ChangeSet::default(), &ExclusionSet::new(["A", "B"]));

        assert_eq!(filtered, model);
    }

    #[test]
    fn test_keeps_only_changed_files() {
        let change_set = ChangeSet::new(["/src/A/X.swift", "/src/B/W.swift"]);

        let filtered = sample_model().filtered(&change_set, &ExclusionSet::default());

        let targets = targets(&filtered);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].files, vec![file("/src/A/X.swift", 100.0)]);
        assert_eq!(targets[1].files, vec![file("/src/B/W.swift", 100.0)]);
    }

    #[test]
    fn test_drops_targets_left_without_files() {
        let change_set = ChangeSet::new(["/src/A/X.swift", "/src/A/Y.swift"]);

        let filtered = sample_model().filtered(&change_set, &ExclusionSet::default());

        let targets = targets(&filtered);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "A");
    }

    #[test]
    fn test_excluded_target_dropped_despite_overlap() {
        let change_set = ChangeSet::new(["/src/A/X.swift", "/src/B/Z.swift"]);

        let filtered = sample_model().filtered(&change_set, &ExclusionSet::new(["B"]));

        let names: Vec<_> = targets(&filtered).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_target_and_project_percentages_carried_through() {
        let change_set = ChangeSet::new(["/src/A/Y.swift"]);

        let filtered = sample_model().filtered(&change_set, &ExclusionSet::default());

        assert_eq!(filtered.aggregate_percentage(), Some(50.09));
        assert_eq!(targets(&filtered)[0].percentage, 43.44);
        assert_eq!(targets(&filtered)[0].files[0].percentage, 0.0);
    }

    #[test]
    fn test_flat_model_filtering() {
        let summary = |name: &str| FileSummary {
            filename: PathBuf::from(name),
            percent: 50.0,
        };
        let model = CoverageModel::Flat(FlatCoverage {
            groups: vec![
                CoverageGroup {
                    files: vec![summary("/p/Sources/A.swift"), summary("/p/Sources/B.swift")],
                },
                CoverageGroup {
                    files: vec![summary("/p/Tests/T.swift")],
                },
            ],
        });

        let filtered = model.filtered(
            &ChangeSet::from_relative(Path::new("/p"), ["Sources/B.swift"]),
            &ExclusionSet::default(),
        );

        assert_eq!(
            filtered,
            CoverageModel::Flat(FlatCoverage {
                groups: vec![CoverageGroup {
                    files: vec![summary("/p/Sources/B.swift")],
                }],
            })
        );
        assert_eq!(model.filtered(&ChangeSet::default(), &ExclusionSet::default()), model);
    }

    #[test]
    fn test_change_set_from_relative_keeps_absolute_paths() {
        let set = ChangeSet::from_relative(Path::new("/repo"), ["a/b.swift", "/abs/c.swift"]);

        let paths: Vec<_> = set.iter().cloned().collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/abs/c.swift"), PathBuf::from("/repo/a/b.swift")]
        );
        assert_eq!(set.len(), 2);
    }
}
