//! Dependency resolution: version selection and load ordering.
//!
//! # Responsibilities
//! - Select, per enabled module, the highest available version satisfying
//!   the distributor's selector
//! - Follow `requires` edges, selecting the highest version of each
//!   dependency satisfying the declared range
//! - Produce a dependency-first load order via depth-first topological sort
//! - Detect cycles and report the exact cycle path
//!
//! # Design Decisions
//! - One version of a module per distributor: a dependency already selected
//!   at a version outside a later requirer's range is an unresolved
//!   dependency, not a second parallel install
//! - Cycle detection tracks the active DFS stack so the failure names the
//!   members of the cycle, not just its existence

use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use crate::module::descriptor::ModuleDescriptor;
use crate::version::{Version, VersionRange};

/// Fatal resolution failures. Any of these keeps the distributor down; it
/// must never come up partially loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Two descriptors carry the same (code, version) pair — a packaging
    /// defect in the module source.
    #[error("duplicate descriptor for {code}@{version}")]
    DuplicateVersion { code: String, version: Version },

    /// No available version of `dependency` satisfies `range`, or the
    /// version already selected for this distributor falls outside it.
    #[error("module '{module}' requires {dependency}@{range}, which cannot be satisfied")]
    UnresolvedDependency {
        /// The requiring module, or the distributor id for enable-list
        /// entries.
        module: String,
        dependency: String,
        range: VersionRange,
    },

    /// The dependency graph contains a cycle; `cycle` lists the member
    /// module codes with the entry module repeated at the end.
    #[error("cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

/// Resolve a distributor's load order.
///
/// `enabled` names the modules the distributor turns on, each with a version
/// selector; `available` is every descriptor installed for the distributor.
/// Returns descriptors in a valid topological order (dependencies before
/// dependents). Ordering beyond that is unspecified.
pub fn resolve(
    enabled: &[(String, VersionRange)],
    available: &[ModuleDescriptor],
    requested_by: &str,
) -> Result<Vec<ModuleDescriptor>, ResolutionError> {
    let index = index_versions(available)?;

    // Version selection: enabled modules first, then requirements
    // discovered while walking their dependency edges.
    let mut selected: BTreeMap<String, &ModuleDescriptor> = BTreeMap::new();
    let mut frontier: Vec<String> = Vec::new();

    for (code, selector) in enabled {
        // A repeated enable entry does not re-select; it must accept the
        // version already chosen, same as a requires edge would.
        if let Some(existing) = selected.get(code) {
            if !selector.matches(&existing.version) {
                return Err(ResolutionError::UnresolvedDependency {
                    module: requested_by.to_string(),
                    dependency: code.clone(),
                    range: selector.clone(),
                });
            }
            continue;
        }
        let descriptor = pick_version(&index, code, selector).ok_or_else(|| {
            ResolutionError::UnresolvedDependency {
                module: requested_by.to_string(),
                dependency: code.clone(),
                range: selector.clone(),
            }
        })?;
        selected.insert(code.clone(), descriptor);
        frontier.push(code.clone());
    }

    while let Some(code) = frontier.pop() {
        let Some(descriptor) = selected.get(&code).copied() else {
            continue;
        };
        for (dep_code, range) in descriptor.requires.clone() {
            match selected.get(&dep_code) {
                Some(existing) => {
                    if !range.matches(&existing.version) {
                        return Err(ResolutionError::UnresolvedDependency {
                            module: code.clone(),
                            dependency: dep_code,
                            range,
                        });
                    }
                }
                None => {
                    let dep = pick_version(&index, &dep_code, &range).ok_or_else(|| {
                        ResolutionError::UnresolvedDependency {
                            module: code.clone(),
                            dependency: dep_code.clone(),
                            range: range.clone(),
                        }
                    })?;
                    selected.insert(dep_code.clone(), dep);
                    frontier.push(dep_code);
                }
            }
        }
    }

    topological_order(&selected)
}

/// Group available descriptors by code, highest version first.
fn index_versions<'a>(
    available: &'a [ModuleDescriptor],
) -> Result<HashMap<&'a str, Vec<&'a ModuleDescriptor>>, ResolutionError> {
    let mut index: HashMap<&str, Vec<&ModuleDescriptor>> = HashMap::new();
    for descriptor in available {
        let entry = index.entry(descriptor.code.as_str()).or_default();
        if entry.iter().any(|d| d.version == descriptor.version) {
            return Err(ResolutionError::DuplicateVersion {
                code: descriptor.code.clone(),
                version: descriptor.version,
            });
        }
        entry.push(descriptor);
    }
    for versions in index.values_mut() {
        versions.sort_by(|a, b| b.version.cmp(&a.version));
    }
    Ok(index)
}

/// Highest available version of `code` satisfying `range`, if any.
fn pick_version<'a>(
    index: &HashMap<&str, Vec<&'a ModuleDescriptor>>,
    code: &str,
    range: &VersionRange,
) -> Option<&'a ModuleDescriptor> {
    index
        .get(code)?
        .iter()
        .find(|d| range.matches(&d.version))
        .copied()
}

/// Depth-first topological sort over the selected set, with cycle path
/// extraction.
fn topological_order<'a>(
    selected: &'a BTreeMap<String, &'a ModuleDescriptor>,
) -> Result<Vec<ModuleDescriptor>, ResolutionError> {
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut on_stack: HashSet<&'a str> = HashSet::new();
    let mut path: Vec<&'a str> = Vec::new();
    let mut order: Vec<ModuleDescriptor> = Vec::with_capacity(selected.len());

    for code in selected.keys() {
        if !visited.contains(code.as_str()) {
            visit(
                code,
                selected,
                &mut visited,
                &mut on_stack,
                &mut path,
                &mut order,
            )?;
        }
    }
    Ok(order)
}

fn visit<'a>(
    code: &'a str,
    selected: &'a BTreeMap<String, &'a ModuleDescriptor>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    order: &mut Vec<ModuleDescriptor>,
) -> Result<(), ResolutionError> {
    visited.insert(code);
    on_stack.insert(code);
    path.push(code);

    // Selection guarantees every requirement is present in the map.
    if let Some(descriptor) = selected.get(code).copied() {
        for dep_code in descriptor.requires.keys() {
            let dep_code = dep_code.as_str();
            if on_stack.contains(dep_code) {
                // Back edge: extract the cycle from the active path.
                let start = path.iter().position(|c| *c == dep_code).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|c| c.to_string()).collect();
                cycle.push(dep_code.to_string());
                return Err(ResolutionError::CyclicDependency { cycle });
            }
            if !visited.contains(dep_code) {
                visit(dep_code, selected, visited, on_stack, path, order)?;
            }
        }
        order.push(descriptor.clone());
    }

    on_stack.remove(code);
    path.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::descriptor::ModuleDescriptor;

    fn module(code: &str, version: &str) -> ModuleDescriptor {
        ModuleDescriptor::new(code, Version::parse(version).unwrap())
    }

    fn requiring(code: &str, version: &str, deps: &[(&str, &str)]) -> ModuleDescriptor {
        let mut desc = module(code, version);
        for (dep, range) in deps {
            desc = desc.with_requirement(*dep, VersionRange::parse(range).unwrap());
        }
        desc
    }

    fn enabled(entries: &[(&str, &str)]) -> Vec<(String, VersionRange)> {
        entries
            .iter()
            .map(|(code, range)| (code.to_string(), VersionRange::parse(range).unwrap()))
            .collect()
    }

    fn codes(order: &[ModuleDescriptor]) -> Vec<&str> {
        order.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn test_single_module() {
        let available = vec![module("acme/core", "1.0.0")];
        let order = resolve(&enabled(&[("acme/core", "*")]), &available, "site").unwrap();
        assert_eq!(codes(&order), vec!["acme/core"]);
    }

    #[test]
    fn test_highest_satisfying_version_selected() {
        let available = vec![
            module("acme/core", "1.2.0"),
            module("acme/core", "2.0.0"),
            requiring("acme/ui", "1.0.0", &[("acme/core", "^1.0.0")]),
        ];
        let order = resolve(&enabled(&[("acme/ui", "*")]), &available, "site").unwrap();
        assert_eq!(codes(&order), vec!["acme/core", "acme/ui"]);
        assert_eq!(order[0].version, Version::new(1, 2, 0));
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let available = vec![
            module("acme/core", "1.0.0"),
            requiring("acme/db", "1.0.0", &[("acme/core", "*")]),
            requiring("acme/ui", "1.0.0", &[("acme/db", "*"), ("acme/core", "*")]),
        ];
        let order = resolve(&enabled(&[("acme/ui", "*")]), &available, "site").unwrap();

        let pos = |code: &str| codes(&order).iter().position(|c| *c == code).unwrap();
        assert!(pos("acme/core") < pos("acme/db"));
        assert!(pos("acme/db") < pos("acme/ui"));
    }

    #[test]
    fn test_missing_dependency() {
        let available = vec![requiring("acme/ui", "1.0.0", &[("acme/core", "^1.0.0")])];
        let err = resolve(&enabled(&[("acme/ui", "*")]), &available, "site").unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnresolvedDependency {
                module: "acme/ui".into(),
                dependency: "acme/core".into(),
                range: VersionRange::parse("^1.0.0").unwrap(),
            }
        );
    }

    #[test]
    fn test_range_unsatisfied_by_available_versions() {
        let available = vec![
            module("acme/core", "2.0.0"),
            requiring("acme/ui", "1.0.0", &[("acme/core", "^1.0.0")]),
        ];
        let err = resolve(&enabled(&[("acme/ui", "*")]), &available, "site").unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UnresolvedDependency { dependency, .. } if dependency == "acme/core"
        ));
    }

    #[test]
    fn test_conflicting_requirement_on_selected_version() {
        // The enable list pins core@2, ui wants core@^1: one version per
        // distributor, so this is unresolvable.
        let available = vec![
            module("acme/core", "1.2.0"),
            module("acme/core", "2.0.0"),
            requiring("acme/ui", "1.0.0", &[("acme/core", "^1.0.0")]),
        ];
        let err = resolve(
            &enabled(&[("acme/core", "^2.0.0"), ("acme/ui", "*")]),
            &available,
            "site",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UnresolvedDependency { module, .. } if module == "acme/ui"
        ));
    }

    #[test]
    fn test_two_module_cycle_named() {
        let available = vec![
            requiring("acme/a", "1.0.0", &[("acme/b", "*")]),
            requiring("acme/b", "1.0.0", &[("acme/a", "*")]),
        ];
        let err = resolve(&enabled(&[("acme/a", "*")]), &available, "site").unwrap_err();
        match err {
            ResolutionError::CyclicDependency { cycle } => {
                assert!(cycle.contains(&"acme/a".to_string()));
                assert!(cycle.contains(&"acme/b".to_string()));
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_dependency_cycle() {
        let available = vec![requiring("acme/a", "1.0.0", &[("acme/a", "*")])];
        let err = resolve(&enabled(&[("acme/a", "*")]), &available, "site").unwrap_err();
        assert!(matches!(err, ResolutionError::CyclicDependency { .. }));
    }

    #[test]
    fn test_repeated_enable_entry_checked_against_selection() {
        let available = vec![module("acme/core", "1.2.0"), module("acme/core", "2.0.0")];

        // Compatible repeat: one selection, listed once in the order.
        let order = resolve(
            &enabled(&[("acme/core", "*"), ("acme/core", "^2.0.0")]),
            &available,
            "site",
        )
        .unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].version, Version::new(2, 0, 0));

        // Incompatible repeat: the earlier selection stands, so this fails.
        let err = resolve(
            &enabled(&[("acme/core", "*"), ("acme/core", "^1.0.0")]),
            &available,
            "site",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UnresolvedDependency { module, .. } if module == "site"
        ));
    }

    #[test]
    fn test_duplicate_descriptor_detected() {
        let available = vec![module("acme/core", "1.0.0"), module("acme/core", "1.0.0")];
        let err = resolve(&enabled(&[("acme/core", "*")]), &available, "site").unwrap_err();
        assert_eq!(
            err,
            ResolutionError::DuplicateVersion {
                code: "acme/core".into(),
                version: Version::new(1, 0, 0),
            }
        );
    }

    #[test]
    fn test_enable_selector_unsatisfied_names_distributor() {
        let available = vec![module("acme/core", "1.0.0")];
        let err = resolve(&enabled(&[("acme/core", "^2.0.0")]), &available, "site").unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::UnresolvedDependency { module, .. } if module == "site"
        ));
    }

    #[test]
    fn test_diamond_graph() {
        let available = vec![
            module("acme/core", "1.0.0"),
            requiring("acme/left", "1.0.0", &[("acme/core", "*")]),
            requiring("acme/right", "1.0.0", &[("acme/core", "*")]),
            requiring(
                "acme/top",
                "1.0.0",
                &[("acme/left", "*"), ("acme/right", "*")],
            ),
        ];
        let order = resolve(&enabled(&[("acme/top", "*")]), &available, "site").unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(codes(&order).last(), Some(&"acme/top"));
        assert_eq!(codes(&order).first(), Some(&"acme/core"));
    }
}
