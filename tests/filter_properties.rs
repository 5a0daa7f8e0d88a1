//! Property-based tests for change-set filtering
//!
//! These tests verify invariants that should hold for all inputs:
//! - A file survives iff its target is not excluded and it matches a changed path
//! - Targets left without files disappear
//! - Surviving targets keep their exported percentage
//! - An empty change set leaves the model untouched

use covgate::filter::{ChangeSet, ExclusionSet};
use covgate::model::{CoverageExport, CoverageFile, CoverageModel, Target};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

const ROOT: &str = "/build/repo";

fn file_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}".prop_map(|stem| format!("{}.swift", stem))
}

/// Targets named T0..Tn, each with uniquely named files under its own folder.
fn export() -> impl Strategy<Value = CoverageExport> {
    (
        prop::collection::vec(
            (
                0u32..=10_000,
                prop::collection::btree_set(file_name(), 0..5),
            ),
            1..5,
        ),
        0u32..=10_000,
    )
        .prop_map(|(targets, project)| CoverageExport {
            percentage: f64::from(project) / 100.0,
            targets: targets
                .into_iter()
                .enumerate()
                .map(|(index, (percentage, files))| {
                    let name = format!("T{}", index);
                    Target {
                        files: files
                            .into_iter()
                            .map(|file| CoverageFile {
                                path: PathBuf::from(format!("{}/{}/{}", ROOT, name, file)),
                                name: file,
                                percentage: 50.0,
                            })
                            .collect(),
                        name,
                        percentage: f64::from(percentage) / 100.0,
                    }
                })
                .collect(),
        })
}

fn all_paths(export: &CoverageExport) -> Vec<(String, PathBuf)> {
    export
        .targets
        .iter()
        .flat_map(|t| t.files.iter().map(move |f| (t.name.clone(), f.path.clone())))
        .collect()
}

fn targets(model: &CoverageModel) -> &[Target] {
    match model {
        CoverageModel::Targets(export) => &export.targets,
        CoverageModel::Flat(_) => panic!("expected target model"),
    }
}

proptest! {
    /// Property: membership in the filtered model is exactly the policy
    #[test]
    fn prop_filtered_membership(
        export in export(),
        picks in prop::collection::vec(any::<bool>(), 0..25),
        excluded_index in prop::option::of(0usize..5),
    ) {
        let paths = all_paths(&export);
        let changed: Vec<PathBuf> = paths
            .iter()
            .zip(picks.iter().chain(std::iter::repeat(&false)))
            .filter(|(_, pick)| **pick)
            // Changed paths are repository-relative: drop the build root.
            .map(|((_, path), _)| path.strip_prefix(ROOT).unwrap().to_path_buf())
            .collect();
        prop_assume!(!changed.is_empty());

        let excluded = excluded_index.map(|i| format!("T{}", i));
        let exclusions = ExclusionSet::new(excluded.clone());
        let model = CoverageModel::Targets(export.clone());

        let filtered = model.filtered(&ChangeSet::new(changed.clone()), &exclusions);

        let expected: BTreeSet<PathBuf> = paths
            .iter()
            .filter(|(target, _)| Some(target) != excluded.as_ref())
            .filter(|(_, path)| changed.iter().any(|c| path.ends_with(c)))
            .map(|(_, path)| path.clone())
            .collect();
        let actual: BTreeSet<PathBuf> = targets(&filtered)
            .iter()
            .flat_map(|t| t.files.iter().map(|f| f.path.clone()))
            .collect();
        prop_assert_eq!(actual, expected);

        for target in targets(&filtered) {
            prop_assert!(!target.files.is_empty());
            let original = export.targets.iter().find(|t| t.name == target.name).unwrap();
            prop_assert_eq!(target.percentage, original.percentage);
        }
        prop_assert_eq!(filtered.aggregate_percentage(), Some(export.percentage));
    }

    /// Property: an empty change set is the identity, exclusions included
    #[test]
    fn prop_empty_change_set_is_identity(
        export in export(),
        excluded_index in 0usize..5,
    ) {
        let model = CoverageModel::Targets(export);
        let exclusions = ExclusionSet::new([format!("T{}", excluded_index)]);

        prop_assert_eq!(model.filtered(&ChangeSet::default(), &exclusions), model);
    }
}
