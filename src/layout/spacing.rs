use crate::config::ChartConfig;

use super::orientation::Orientation;

/// Distances between placed boxes, resolved once per pass from the active
/// orientation. Gaps are origin-to-origin along the cross axis and already
/// include the node extent, so a gap is the minimum non-overlapping pitch
/// between neighbors.
#[derive(Debug, Clone, Copy)]
pub struct SpacingPolicy {
    cross_extent: f32,
    depth_extent: f32,
    siblings_space: f32,
    groups_space: f32,
    level_space: f32,
    depth_sign: f32,
}

impl SpacingPolicy {
    pub fn new(orientation: Orientation, config: &ChartConfig) -> Self {
        let (cross_extent, depth_extent) = if orientation.grows_vertically() {
            (config.node_width, config.node_height)
        } else {
            (config.node_height, config.node_width)
        };
        Self {
            cross_extent,
            depth_extent,
            siblings_space: config.siblings_space,
            groups_space: config.groups_space,
            level_space: config.level_space,
            depth_sign: orientation.depth_sign(),
        }
    }

    /// Required cross-axis offset between two adjacent nodes.
    pub fn gap(&self, same_parent: bool) -> f32 {
        let space = if same_parent {
            self.siblings_space
        } else {
            self.groups_space
        };
        self.cross_extent + space
    }

    /// Signed depth-axis coordinate of a level.
    pub fn level_offset(&self, depth: usize) -> f32 {
        self.depth_sign * depth as f32 * (self.depth_extent + self.level_space)
    }

    pub fn level_space(&self) -> f32 {
        self.level_space
    }
}
