//! Compartment assignment service
//!
//! Pure functions from root-relative source paths to compartments. No I/O:
//! the entry-file invariant is checked here so a misconfiguration aborts
//! before anything touches the disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::CompartmentConfig;
use crate::domain::entities::{Assignment, Compartment};
use crate::domain::value_objects::{top_level_dir, CompartmentKey};
use crate::error::{CompartError, CompartResult};

/// Which compartment owns `path`, judged by its first component.
pub fn assign(path: &Path, compartments: &BTreeMap<String, CompartmentConfig>) -> Assignment {
    let Some(dir) = top_level_dir(path) else {
        return Assignment::Unassigned;
    };
    // a bare file at the root is not inside any directory
    if path.components().count() < 2 {
        return Assignment::Unassigned;
    }
    match compartments.get(dir) {
        Some(rule) if !is_excluded(path, rule) => Assignment::Assigned(rule.key),
        _ => Assignment::Unassigned,
    }
}

fn is_excluded(path: &Path, rule: &CompartmentConfig) -> bool {
    if rule.exclude.is_empty() {
        return false;
    }
    let text = path.to_string_lossy();
    rule.exclude.iter().any(|needle| text.contains(needle.as_str()))
}

/// Result of partitioning the compile database
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Compartments ordered by key
    pub compartments: Vec<Compartment>,
    /// Sources that matched no configured directory
    pub unassigned: Vec<PathBuf>,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.compartments.len()
    }
}

/// Group `sources` into compartments and check every entry file is present.
pub fn partition(
    sources: &[PathBuf],
    compartments: &BTreeMap<String, CompartmentConfig>,
) -> CompartResult<Partition> {
    let mut by_key: BTreeMap<CompartmentKey, Compartment> = BTreeMap::new();
    let mut unassigned = Vec::new();

    for source in sources {
        let Some((name, rule)) = owning_rule(source, compartments) else {
            if !unassigned.contains(source) {
                unassigned.push(source.clone());
            }
            continue;
        };

        let compartment = by_key.entry(rule.key).or_insert_with(|| {
            Compartment::new(rule.key, name, Path::new(name).join(&rule.entry))
        });
        compartment.members.insert(source.clone());
    }

    for compartment in by_key.values() {
        if !compartment.has_entry_file() {
            return Err(CompartError::EntryFileMissing {
                compartment: compartment.name.clone(),
                entry: compartment.entry_file.clone(),
            });
        }
    }

    Ok(Partition {
        compartments: by_key.into_values().collect(),
        unassigned,
    })
}

/// The configured directory owning `source`, if any.
///
/// Entry files are never excluded, even when an `exclude` pattern matches.
fn owning_rule<'a>(
    source: &Path,
    compartments: &'a BTreeMap<String, CompartmentConfig>,
) -> Option<(&'a str, &'a CompartmentConfig)> {
    let dir = top_level_dir(source)?;
    let (name, rule) = compartments.get_key_value(dir)?;
    let is_entry = Path::new(name).join(&rule.entry) == source;
    match assign(source, compartments) {
        Assignment::Assigned(_) => Some((name.as_str(), rule)),
        Assignment::Unassigned if is_entry => Some((name.as_str(), rule)),
        Assignment::Unassigned => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> BTreeMap<String, CompartmentConfig> {
        let mut map = BTreeMap::new();
        map.insert("src".to_string(), CompartmentConfig::new(2, "lib.c"));
        map.insert("tools".to_string(), CompartmentConfig::new(1, "dav1d.c"));
        map
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    fn named<'p>(partition: &'p Partition, name: &str) -> Option<&'p Compartment> {
        partition.compartments.iter().find(|c| c.name == name)
    }

    #[test]
    fn assign_by_first_component() {
        let map = mapping();
        assert_eq!(
            assign(Path::new("src/x86/cpu.c"), &map),
            Assignment::Assigned(CompartmentKey::new(2))
        );
        assert_eq!(
            assign(Path::new("tools/dav1d.c"), &map),
            Assignment::Assigned(CompartmentKey::new(1))
        );
        assert_eq!(assign(Path::new("tests/seek_stress.c"), &map), Assignment::Unassigned);
    }

    #[test]
    fn root_level_file_named_like_directory_is_unassigned() {
        let map = mapping();
        assert_eq!(assign(Path::new("src"), &map), Assignment::Unassigned);
    }

    #[test]
    fn partition_literal_scenario() {
        let sources = paths(&["src/lib.c", "src/data.c", "tools/dav1d.c", "tests/seek_stress.c"]);
        let partition = partition(&sources, &mapping()).unwrap();

        assert_eq!(partition.total(), 2);
        let keys: Vec<u32> = partition.compartments.iter().map(|c| c.key.get()).collect();
        assert_eq!(keys, vec![1, 2]);

        let src = named(&partition, "src").unwrap();
        assert_eq!(src.entry_file, PathBuf::from("src/lib.c"));
        assert_eq!(src.members.len(), 2);

        assert_eq!(partition.unassigned, paths(&["tests/seek_stress.c"]));
    }

    #[test]
    fn duplicate_records_collapse() {
        let sources = paths(&["src/lib.c", "src/recon_tmpl.c", "src/recon_tmpl.c"]);
        let partition = partition(&sources, &mapping()).unwrap();
        assert_eq!(named(&partition, "src").unwrap().members.len(), 2);
    }

    #[test]
    fn missing_entry_file_is_fatal() {
        let sources = paths(&["src/lib.c", "tools/dav1d_cli_parse.c"]);
        let err = partition(&sources, &mapping()).unwrap_err();
        match err {
            CompartError::EntryFileMissing { compartment, entry } => {
                assert_eq!(compartment, "tools");
                assert_eq!(entry, PathBuf::from("tools/dav1d.c"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn configured_directory_without_sources_creates_nothing() {
        let sources = paths(&["src/lib.c"]);
        let partition = partition(&sources, &mapping()).unwrap();
        assert_eq!(partition.total(), 1);
        assert!(named(&partition, "tools").is_none());
    }

    #[test]
    fn exclude_skips_matching_members_but_not_entry() {
        let mut map = mapping();
        map.get_mut("src").unwrap().exclude = vec!["tmpl".to_string(), "lib".to_string()];
        let sources = paths(&["src/lib.c", "src/mc_tmpl.c", "src/data.c"]);
        let partition = partition(&sources, &map).unwrap();
        let src = named(&partition, "src").unwrap();
        assert!(src.contains(Path::new("src/lib.c")));
        assert!(src.contains(Path::new("src/data.c")));
        assert!(!src.contains(Path::new("src/mc_tmpl.c")));
        assert_eq!(partition.unassigned, paths(&["src/mc_tmpl.c"]));
    }
}
