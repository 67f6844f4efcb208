use crate::config::ChartConfig;

use super::orientation::Orientation;
use super::types::{Connector, ConnectorRoute, PlacedNode, Vec2};

// ── Junction marker ─────────────────────────────────────────────────
/// Offset of the junction dot's bounding box from the route start, so the
/// dot sits centered on the parent's attach point.
const MARKER_OFFSET: (f32, f32) = (-10.0, -10.0);
/// Junction dot radius, shared with the SVG realization.
pub const MARKER_RADIUS: f32 = 10.0;

/// Routes the elbow polyline and junction marker between a parent and one
/// child. The route starts at the parent's attach corner for the active
/// growth direction; keeping it glued to a moving parent afterwards is the
/// geometry surface's `attach` capability, not re-routing.
#[derive(Debug, Clone, Copy)]
pub struct ConnectorRouter {
    orientation: Orientation,
    level_space: f32,
    node_width: f32,
    node_height: f32,
}

impl ConnectorRouter {
    pub fn new(orientation: Orientation, config: &ChartConfig) -> Self {
        Self {
            orientation,
            level_space: config.level_space,
            node_width: config.node_width,
            node_height: config.node_height,
        }
    }

    /// Attach corner on the parent box: the midpoint of the edge facing the
    /// children.
    fn attach_point(&self, parent: Vec2) -> Vec2 {
        match self.orientation {
            Orientation::Top => parent.add(self.node_width / 2.0, self.node_height),
            Orientation::Bottom => parent.add(self.node_width / 2.0, 0.0),
            Orientation::Right | Orientation::RightTop => {
                parent.add(0.0, self.node_height / 2.0)
            }
            Orientation::Left | Orientation::LeftTop => {
                parent.add(self.node_width, self.node_height / 2.0)
            }
        }
    }

    pub fn route(&self, from: &PlacedNode, to: &PlacedNode) -> Connector {
        let start = self.attach_point(from.pos);
        let factor = self.orientation.depth_sign();
        let half = self.level_space / 2.0 * factor;

        let mut points = vec![start];
        if self.orientation.grows_vertically() {
            if from.pos.x == to.pos.x {
                points.push(start.add(0.0, self.level_space * factor));
            } else {
                let jog = to.pos.x - from.pos.x;
                points.push(start.add(0.0, half));
                points.push(start.add(jog, half));
                points.push(start.add(jog, half * 2.0));
            }
        } else if from.pos.y == to.pos.y {
            points.push(start.add(self.level_space * factor, 0.0));
        } else {
            let jog = to.pos.y - from.pos.y;
            points.push(start.add(half, 0.0));
            points.push(start.add(half, jog));
            points.push(start.add(half * 2.0, jog));
        }

        Connector {
            from: from.record.id.clone(),
            to: to.record.id.clone(),
            route: ConnectorRoute { points },
            marker: start.add(MARKER_OFFSET.0, MARKER_OFFSET.1),
        }
    }
}
