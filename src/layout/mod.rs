mod groups;
mod levels;
mod orientation;
mod routing;
mod spacing;
pub(crate) mod types;

pub use groups::{ChildGroup, partition_groups};
pub use levels::{BuiltLevels, build_levels};
pub use orientation::{Orientation, OrientationTransform};
pub use routing::{ConnectorRouter, MARKER_RADIUS};
pub use spacing::SpacingPolicy;
pub use types::*;

use std::collections::{HashMap, HashSet};

use crate::config::ChartConfig;
use crate::record::NodeRecord;

/// One full placement pass: flat records in, placed nodes plus routed
/// connectors out. Structural anomalies (missing root, orphans, extra roots)
/// degrade to a partial or empty result with warnings; only non-unique ids
/// are an error.
pub fn compute_layout(
    records: &[NodeRecord],
    config: &ChartConfig,
) -> Result<LayoutResult, LayoutError> {
    check_unique_ids(records)?;

    let BuiltLevels { levels, warnings } = build_levels(records);
    if levels.is_empty() {
        return Ok(LayoutResult {
            levels: Vec::new(),
            connectors: Vec::new(),
            warnings,
        });
    }

    let transform = OrientationTransform::new(config.orientation, config);
    let router = ConnectorRouter::new(config.orientation, config);
    let max_depth = levels.len() - 1;

    // Deepest level first: seed at the engine origin, then advance by the
    // same-parent / cross-group gap.
    let mut placed: Vec<Vec<PlacedNode>> = Vec::with_capacity(levels.len());
    let mut deepest: Vec<PlacedNode> = Vec::with_capacity(levels[max_depth].len());
    for record in &levels[max_depth] {
        let pos = match deepest.last() {
            Some(prev) => {
                let same = prev.parent_key() == record.parent_key();
                transform.advance(prev.pos, transform.spacing().gap(same))
            }
            None => transform.place(0.0, max_depth),
        };
        deepest.push(PlacedNode {
            record: record.clone(),
            pos,
            depth: max_depth,
        });
    }
    placed.push(deepest);

    // Walk upward: center a parent over each child group, then weave in the
    // records of this level that have no placed descendants.
    for depth in (0..max_depth).rev() {
        let current = {
            let child_level = &placed[placed.len() - 1];
            let level_data = &levels[depth];
            let mut parents: Vec<PlacedNode> = Vec::new();
            for group in partition_groups(child_level) {
                let parent_id = child_level[group.start].parent_key();
                let Some(record) = level_data.iter().find(|r| r.id == parent_id) else {
                    continue;
                };
                let cross = transform.group_center(
                    child_level[group.start].pos,
                    child_level[group.end - 1].pos,
                );
                parents.push(PlacedNode {
                    record: record.clone(),
                    pos: transform.place(cross, depth),
                    depth,
                });
            }
            weave_childless(parents, level_data, depth, &transform)
        };
        placed.push(current);
    }
    placed.reverse();

    recenter(&mut placed, config);

    let connectors = route_connectors(&placed, &router);

    Ok(LayoutResult {
        levels: placed,
        connectors,
        warnings,
    })
}

fn check_unique_ids(records: &[NodeRecord]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(LayoutError::DuplicateId(record.id.clone()));
        }
    }
    Ok(())
}

/// Inserts records with no placed descendants behind the last placed node of
/// their sibling run, then appends records related to nothing at the end.
/// Insertions are collected first and materialized in a single rebuild; when
/// an insertion lands too close to the node that follows it, that neighbor
/// is pushed out to the required gap and the shift carries rigidly through
/// the rest of the level.
fn weave_childless(
    parents: Vec<PlacedNode>,
    level_data: &[NodeRecord],
    depth: usize,
    transform: &OrientationTransform,
) -> Vec<PlacedNode> {
    if parents.len() == level_data.len() {
        return parents;
    }

    let placed_ids: HashSet<&str> = parents.iter().map(|node| node.id()).collect();
    let mut queued: HashMap<usize, Vec<&NodeRecord>> = HashMap::new();
    let mut leftovers: Vec<&NodeRecord> = Vec::new();
    for record in level_data {
        if placed_ids.contains(record.id.as_str()) {
            continue;
        }
        match parents
            .iter()
            .rposition(|node| node.parent_key() == record.parent_key())
        {
            Some(index) => queued.entry(index).or_default().push(record),
            None => leftovers.push(record),
        }
    }

    let spacing = transform.spacing();
    let mut out: Vec<PlacedNode> = Vec::with_capacity(level_data.len());
    let mut shift = 0.0;
    for (index, mut node) in parents.into_iter().enumerate() {
        if shift != 0.0 {
            node.pos = transform.shift_cross(node.pos, shift);
        }
        if let Some(prev) = out.last() {
            let required = spacing.gap(prev.parent_key() == node.parent_key());
            let gap = transform.cross(node.pos) - transform.cross(prev.pos);
            if gap < required {
                let fix = required - gap;
                node.pos = transform.shift_cross(node.pos, fix);
                shift += fix;
            }
        }
        out.push(node);
        if let Some(records) = queued.remove(&index) {
            for record in records {
                let pos = transform.advance(out[out.len() - 1].pos, spacing.gap(true));
                out.push(PlacedNode {
                    record: record.clone(),
                    pos,
                    depth,
                });
            }
        }
    }

    for record in leftovers {
        let pos = match out.last() {
            Some(prev) => transform.advance(prev.pos, spacing.gap(false)),
            None => transform.place(0.0, depth),
        };
        out.push(PlacedNode {
            record: record.clone(),
            pos,
            depth,
        });
    }
    out
}

/// Rigid translation pinning the root at the configured anchor. The anchor
/// defines the diagram's coordinate origin; relative offsets are untouched.
fn recenter(levels: &mut [Vec<PlacedNode>], config: &ChartConfig) {
    let Some(root_pos) = levels.first().and_then(|level| level.first()).map(|n| n.pos) else {
        return;
    };
    let delta = Vec2::new(
        config.root_anchor.x - root_pos.x,
        config.root_anchor.y - root_pos.y,
    );
    if delta == Vec2::ZERO {
        return;
    }
    for level in levels.iter_mut() {
        for node in level.iter_mut() {
            node.pos = node.pos.translate(delta);
        }
    }
}

/// Routes every parent-child edge over the settled positions, level by level
/// in placement order.
fn route_connectors(levels: &[Vec<PlacedNode>], router: &ConnectorRouter) -> Vec<Connector> {
    let mut by_id: HashMap<&str, &PlacedNode> = HashMap::new();
    for level in levels {
        for node in level {
            by_id.insert(node.id(), node);
        }
    }
    let mut connectors = Vec::new();
    for level in levels.iter().skip(1) {
        for node in level {
            let Some(parent) = by_id.get(node.parent_key()) else {
                continue;
            };
            connectors.push(router.route(parent, node));
        }
    }
    connectors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, parent: Option<&str>) -> NodeRecord {
        NodeRecord::new(id, parent)
    }

    fn config() -> ChartConfig {
        ChartConfig::default()
    }

    #[test]
    fn empty_input_is_a_valid_empty_layout() {
        let layout = compute_layout(&[], &config()).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.node_count(), 0);
        assert!(layout.connectors.is_empty());
        assert!(layout.warnings.is_empty());
    }

    #[test]
    fn missing_root_is_a_valid_empty_layout() {
        let records = vec![record("b", Some("a")), record("c", Some("b"))];
        let layout = compute_layout(&records, &config()).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.warnings, vec![LayoutWarning::MissingRoot]);
    }

    #[test]
    fn duplicate_ids_are_rejected_before_layout() {
        let records = vec![record("a", None), record("a", None)];
        assert_eq!(
            compute_layout(&records, &config()),
            Err(LayoutError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn straight_line_child_sits_one_level_pitch_below() {
        // 80 node height + 80 level space.
        let records = vec![record("a", None), record("b", Some("a"))];
        let layout = compute_layout(&records, &config()).unwrap();
        let a = layout.get("a").unwrap().pos;
        let b = layout.get("b").unwrap().pos;
        assert_eq!(b, a.add(0.0, 160.0));

        let connector = &layout.connectors[0];
        assert!(connector.route.is_straight());
        let start = connector.route.start();
        let end = connector.route.end();
        assert_eq!(end.y - start.y, 80.0);
        assert_eq!(start.x, end.x);
    }

    #[test]
    fn two_children_center_their_parent() {
        let mut config = config();
        config.siblings_space = 40.0;
        config.groups_space = 40.0;
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
        ];
        let layout = compute_layout(&records, &config).unwrap();
        let a = layout.get("a").unwrap().pos;
        let b = layout.get("b").unwrap().pos;
        let c = layout.get("c").unwrap().pos;
        assert_eq!(c.x - b.x, 390.0);
        assert_eq!(a.x - b.x, 195.0);
        assert_eq!(b.y - a.y, 160.0);
        assert_eq!(layout.connectors.len(), 2);
        assert!(!layout.connectors[0].route.is_straight());
    }

    #[test]
    fn orphan_is_excluded_but_reported() {
        let records = vec![record("a", None), record("b", Some("zz"))];
        let layout = compute_layout(&records, &config()).unwrap();
        assert_eq!(layout.node_count(), 1);
        assert!(layout.get("b").is_none());
        assert!(layout.connectors.is_empty());
        assert_eq!(
            layout.warnings,
            vec![LayoutWarning::Orphan {
                id: "b".to_string(),
                parent_id: "zz".to_string(),
            }]
        );
    }

    #[test]
    fn n_nodes_yield_n_minus_one_connectors() {
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
            record("d", Some("b")),
            record("e", Some("b")),
            record("f", Some("c")),
            record("g", Some("f")),
        ];
        let layout = compute_layout(&records, &config()).unwrap();
        assert_eq!(layout.node_count(), 7);
        assert_eq!(layout.connectors.len(), 6);
        // every non-root node has exactly one incoming connector
        for node in layout.nodes().filter(|n| !n.record.is_root()) {
            let incoming = layout
                .connectors
                .iter()
                .filter(|c| c.to == node.record.id)
                .count();
            assert_eq!(incoming, 1, "node {}", node.record.id);
        }
    }

    #[test]
    fn root_lands_on_the_configured_anchor() {
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
            record("d", Some("c")),
        ];
        for orientation in [
            Orientation::Top,
            Orientation::Bottom,
            Orientation::Left,
            Orientation::LeftTop,
            Orientation::Right,
            Orientation::RightTop,
        ] {
            let mut config = config();
            config.orientation = orientation;
            config.root_anchor = Vec2::new(12.0, -34.0);
            let layout = compute_layout(&records, &config).unwrap();
            assert_eq!(
                layout.root().unwrap().pos,
                Vec2::new(12.0, -34.0),
                "orientation {}",
                orientation.as_str()
            );
        }
    }

    #[test]
    fn identical_input_gives_identical_layout() {
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
            record("d", Some("b")),
            record("e", Some("c")),
        ];
        let first = compute_layout(&records, &config()).unwrap();
        let second = compute_layout(&records, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn childless_sibling_is_inserted_after_its_parents_run() {
        // b and c are parents; s is their childless sibling and must appear
        // in level 1 right after the a-run, not at the level's end.
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
            record("s", Some("a")),
            record("b1", Some("b")),
            record("c1", Some("c")),
        ];
        let layout = compute_layout(&records, &config()).unwrap();
        let level1: Vec<&str> = layout.levels[1].iter().map(|n| n.id()).collect();
        assert_eq!(level1, vec!["b", "c", "s"]);
        let c = layout.get("c").unwrap().pos;
        let s = layout.get("s").unwrap().pos;
        assert_eq!(s.x - c.x, 370.0);
    }

    #[test]
    fn inserted_sibling_pushes_a_too_close_neighbor() {
        // s is woven in after the b1/b2 run at level 2; the c1 parent sits
        // right behind that run and would end up 20 apart, so it shifts out
        // to the cross-group gap.
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
            record("b1", Some("b")),
            record("b2", Some("b")),
            record("s", Some("b")),
            record("c1", Some("c")),
            record("b1x", Some("b1")),
            record("b2x", Some("b2")),
            record("c1x", Some("c1")),
        ];
        let layout = compute_layout(&records, &config()).unwrap();
        let level2: Vec<&str> = layout.levels[2].iter().map(|n| n.id()).collect();
        assert_eq!(level2, vec!["b1", "b2", "s", "c1"]);
        let b2 = layout.get("b2").unwrap().pos;
        let s = layout.get("s").unwrap().pos;
        let c1 = layout.get("c1").unwrap().pos;
        assert_eq!(s.x - b2.x, 370.0);
        assert_eq!(c1.x - s.x, 390.0);
    }

    #[test]
    fn adjacent_nodes_never_overlap() {
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
            record("s1", Some("a")),
            record("s2", Some("a")),
            record("b1", Some("b")),
            record("b2", Some("b")),
            record("b3", Some("b")),
            record("c1", Some("c")),
            record("c2", Some("c")),
        ];
        let config = config();
        let layout = compute_layout(&records, &config).unwrap();
        for level in &layout.levels {
            for pair in level.windows(2) {
                let same = pair[0].parent_key() == pair[1].parent_key();
                let space = if same {
                    config.siblings_space
                } else {
                    config.groups_space
                };
                let gap = pair[1].pos.x - pair[0].pos.x;
                assert!(
                    gap >= config.node_width + space,
                    "{} and {} are {} apart",
                    pair[0].id(),
                    pair[1].id(),
                    gap
                );
            }
        }
    }

    #[test]
    fn right_top_aligns_parent_with_first_child() {
        let mut config = config();
        config.orientation = Orientation::RightTop;
        let records = vec![
            record("a", None),
            record("b", Some("a")),
            record("c", Some("a")),
        ];
        let layout = compute_layout(&records, &config).unwrap();
        let a = layout.get("a").unwrap().pos;
        let b = layout.get("b").unwrap().pos;
        assert_eq!(a.y, b.y);
        // children sit one level toward negative x
        assert_eq!(b.x - a.x, -430.0);
    }
}
