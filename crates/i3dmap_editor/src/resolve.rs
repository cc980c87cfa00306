//! Duplicate node name resolution
//!
//! Pass one walks the forest in pre-order and groups named nodes by exact
//! name, keeping encounter order. Pass two gives every member of a group
//! with more than one node a `_NNN` suffix, starting at `_001` for the first
//! encounter. Names that occur once are kept and reserved, so a generated
//! name never lands on an existing one.

use i3dmap_error::{I3dMapError, Result};
use i3dmap_parser::{Address, NodeId, SceneForest};
use indexmap::IndexMap;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// Largest suffix that fits the fixed three-digit width
pub const MAX_SUFFIX: usize = 999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub node: NodeId,
    pub old_name: String,
    pub new_name: String,
    pub address: Address,
}

/// Give every named node a tree-wide unique resolved name.
///
/// Only resolved names change; structure and authored names are untouched.
/// Returns the renames in pre-order. Fails with `CapacityExceeded` when a
/// collision group needs a suffix beyond `_999`, leaving the forest as it was.
pub fn resolve(forest: &mut SceneForest) -> Result<Vec<Rename>> {
    let groups = group_by_name(forest);
    let assigned = assign_suffixes(&groups)?;

    let mut renames = Vec::with_capacity(assigned.len());
    let order: Vec<NodeId> = forest.preorder().collect();
    for id in order {
        let Some(new_name) = assigned.get(&id) else {
            continue;
        };
        let old_name = forest.node(id).name().unwrap_or_default().to_string();
        forest.set_resolved_name(id, new_name.clone());
        renames.push(Rename {
            node: id,
            old_name,
            new_name: new_name.clone(),
            address: forest.address_of(id),
        });
    }

    if renames.is_empty() {
        debug!("No duplicate node names found");
    } else {
        info!(
            "Resolved {} duplicate node name(s) across {} name(s)",
            renames.len(),
            groups.values().filter(|ids| ids.len() > 1).count()
        );
    }
    Ok(renames)
}

/// Named nodes grouped by exact name, groups and members in encounter order
pub fn group_by_name(forest: &SceneForest) -> IndexMap<String, Vec<NodeId>> {
    let mut groups: IndexMap<String, Vec<NodeId>> = IndexMap::new();
    for id in forest.preorder() {
        if let Some(name) = forest.node(id).name() {
            groups.entry(name.to_string()).or_default().push(id);
        }
    }
    groups
}

fn assign_suffixes(groups: &IndexMap<String, Vec<NodeId>>) -> Result<HashMap<NodeId, String>> {
    let taken: HashSet<&str> = groups
        .iter()
        .filter(|(_, ids)| ids.len() == 1)
        .map(|(name, _)| name.as_str())
        .collect();
    let mut generated: HashSet<String> = HashSet::new();
    let mut assigned = HashMap::new();

    for (name, ids) in groups.iter().filter(|(_, ids)| ids.len() > 1) {
        if ids.len() > MAX_SUFFIX {
            return Err(I3dMapError::capacity_exceeded(
                format!(
                    "{} nodes share the name '{name}', at most {MAX_SUFFIX} can be suffixed",
                    ids.len()
                ),
                name.as_str(),
            ));
        }
        let mut suffix = 0;
        for &id in ids {
            let new_name = loop {
                suffix += 1;
                if suffix > MAX_SUFFIX {
                    return Err(I3dMapError::capacity_exceeded(
                        format!("No free suffix left for '{name}' below _{MAX_SUFFIX}"),
                        name.as_str(),
                    ));
                }
                let candidate = format!("{name}_{suffix:03}");
                if !taken.contains(candidate.as_str()) && !generated.contains(&candidate) {
                    break candidate;
                }
                debug!("Skipping '{candidate}', already used by another node");
            };
            debug!("Duplicate '{name}' ({id}) -> '{new_name}'");
            generated.insert(new_name.clone());
            assigned.insert(id, new_name);
        }
    }
    Ok(assigned)
}
