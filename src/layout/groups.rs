use super::types::PlacedNode;

/// A maximal contiguous same-parent run within one placed level, as a
/// half-open index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildGroup {
    pub start: usize,
    pub end: usize,
}

impl ChildGroup {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Single left-to-right scan collecting same-parent runs. Relies on the
/// level builder's parent-key sort; interleaved parents would silently split
/// into separate groups.
pub fn partition_groups(level: &[PlacedNode]) -> Vec<ChildGroup> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=level.len() {
        if i == level.len() || level[i].parent_key() != level[start].parent_key() {
            groups.push(ChildGroup { start, end: i });
            start = i;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Vec2;
    use crate::record::NodeRecord;

    fn placed(id: &str, parent: Option<&str>) -> PlacedNode {
        PlacedNode {
            record: NodeRecord::new(id, parent),
            pos: Vec2::ZERO,
            depth: 0,
        }
    }

    #[test]
    fn partitions_contiguous_runs() {
        let level = vec![
            placed("b1", Some("b")),
            placed("b2", Some("b")),
            placed("c1", Some("c")),
            placed("d1", Some("d")),
            placed("d2", Some("d")),
        ];
        let groups = partition_groups(&level);
        assert_eq!(
            groups,
            vec![
                ChildGroup { start: 0, end: 2 },
                ChildGroup { start: 2, end: 3 },
                ChildGroup { start: 3, end: 5 },
            ]
        );
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn single_run_level() {
        let level = vec![placed("x", Some("p")), placed("y", Some("p"))];
        assert_eq!(partition_groups(&level), vec![ChildGroup { start: 0, end: 2 }]);
    }

    #[test]
    fn empty_level_has_no_groups() {
        assert!(partition_groups(&[]).is_empty());
    }
}
