use std::collections::{HashMap, HashSet};

use crate::record::NodeRecord;

use super::types::LayoutWarning;

#[derive(Debug, Default)]
pub struct BuiltLevels {
    /// Breadth-first levels, root level first. Each level is sorted by parent
    /// key (ordinal, ties keep input order) so same-parent records are
    /// contiguous for the group partitioner.
    pub levels: Vec<Vec<NodeRecord>>,
    pub warnings: Vec<LayoutWarning>,
}

/// Reconstructs levels from the flat parent-pointer list. The first record
/// with an absent/empty parent reference is the root; records unreachable
/// from it are excluded and reported, never a hard failure.
pub fn build_levels(records: &[NodeRecord]) -> BuiltLevels {
    let mut warnings = Vec::new();

    let Some(root) = records.iter().find(|record| record.is_root()) else {
        if !records.is_empty() {
            warnings.push(LayoutWarning::MissingRoot);
        }
        return BuiltLevels {
            levels: Vec::new(),
            warnings,
        };
    };

    for record in records.iter().filter(|record| record.is_root()) {
        if record.id != root.id {
            warnings.push(LayoutWarning::ExtraRoot {
                id: record.id.clone(),
            });
        }
    }

    let mut children: HashMap<&str, Vec<&NodeRecord>> = HashMap::new();
    for record in records {
        if !record.is_root() {
            children.entry(record.parent_key()).or_default().push(record);
        }
    }

    let ids: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(root.id.as_str());

    let mut levels = Vec::new();
    let mut current = vec![root.clone()];
    while !current.is_empty() {
        current.sort_by(|a, b| a.parent_key().cmp(b.parent_key()));
        let mut next = Vec::new();
        for record in &current {
            if let Some(kids) = children.get(record.id.as_str()) {
                for kid in kids {
                    visited.insert(kid.id.as_str());
                    next.push((*kid).clone());
                }
            }
        }
        levels.push(std::mem::take(&mut current));
        current = next;
    }

    for record in records {
        if visited.contains(record.id.as_str()) || record.is_root() {
            continue;
        }
        if ids.contains(record.parent_key()) {
            warnings.push(LayoutWarning::Unreachable {
                id: record.id.clone(),
            });
        } else {
            warnings.push(LayoutWarning::Orphan {
                id: record.id.clone(),
                parent_id: record.parent_key().to_string(),
            });
        }
    }

    BuiltLevels { levels, warnings }
}
