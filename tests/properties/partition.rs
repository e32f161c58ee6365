//! Property tests for source partitioning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use proptest::prelude::*;

use compart::config::CompartmentConfig;
use compart::{assign, partition, Assignment};

const DIRS: &[&str] = &["src", "tools", "tests", "include", "examples"];

fn source() -> impl Strategy<Value = PathBuf> {
    (
        proptest::sample::select(DIRS),
        proptest::collection::vec("[a-z]{1,6}", 0..=2),
        "[a-z_]{1,8}",
    )
        .prop_map(|(dir, middle, stem)| {
            let mut path = PathBuf::from(dir);
            for part in middle {
                path.push(part);
            }
            path.push(format!("{}.c", stem));
            path
        })
}

fn mapping() -> BTreeMap<String, CompartmentConfig> {
    let mut map = BTreeMap::new();
    map.insert("src".to_string(), CompartmentConfig::new(2, "lib.c"));
    map.insert("tools".to_string(), CompartmentConfig::new(1, "dav1d.c"));
    map
}

/// Random sources plus both entry files, so partitioning always succeeds.
fn sources() -> impl Strategy<Value = Vec<PathBuf>> {
    proptest::collection::vec(source(), 0..=40).prop_map(|mut files| {
        files.push(PathBuf::from("src/lib.c"));
        files.push(PathBuf::from("tools/dav1d.c"));
        files
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every file lands in at most one compartment, and nothing
    /// appears that was not in the input.
    #[test]
    fn property_partition_is_disjoint_subset(files in sources()) {
        let result = partition(&files, &mapping()).unwrap();
        let input: BTreeSet<&PathBuf> = files.iter().collect();

        let mut seen = BTreeSet::new();
        for compartment in &result.compartments {
            for member in &compartment.members {
                prop_assert!(seen.insert(member.clone()), "{:?} in two compartments", member);
                prop_assert!(input.contains(member));
            }
        }
        for path in &result.unassigned {
            prop_assert!(!seen.contains(path));
            prop_assert!(input.contains(path));
        }
    }

    /// PROPERTY: partition agrees with `assign` file by file.
    #[test]
    fn property_partition_matches_assign(files in sources()) {
        let map = mapping();
        let result = partition(&files, &map).unwrap();
        for file in &files {
            match assign(file, &map) {
                Assignment::Assigned(key) => {
                    let compartment = result.compartments.iter().find(|c| c.key == key);
                    prop_assert!(compartment.is_some_and(|c| c.members.contains(file)));
                }
                Assignment::Unassigned => prop_assert!(result.unassigned.contains(file)),
            }
        }
    }

    /// PROPERTY: compartments come out in ascending key order, keys unique.
    #[test]
    fn property_compartments_sorted_by_key(files in sources()) {
        let result = partition(&files, &mapping()).unwrap();
        let keys: Vec<u32> = result.compartments.iter().map(|c| c.key.get()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(keys, sorted);
    }
}
