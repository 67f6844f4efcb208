use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;

use super::spacing::SpacingPolicy;
use super::types::Vec2;

/// Growth direction of the diagram. The depth axis is the screen axis levels
/// stack along; siblings spread along the orthogonal cross axis. The `*Top`
/// variants differ from their base direction only in how a group's parent is
/// centered (on the first child instead of the midpoint).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    Top,
    Bottom,
    Left,
    LeftTop,
    Right,
    RightTop,
}

impl Orientation {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "left-top" => Some(Self::LeftTop),
            "right" => Some(Self::Right),
            "right-top" => Some(Self::RightTop),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::LeftTop => "left-top",
            Self::Right => "right",
            Self::RightTop => "right-top",
        }
    }

    /// Levels stack along the y axis for `top`/`bottom` growth, along x
    /// otherwise.
    pub fn grows_vertically(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Sign of the depth axis: `bottom`, `right` and `right-top` grow toward
    /// negative coordinates.
    pub fn depth_sign(self) -> f32 {
        match self {
            Self::Top | Self::Left | Self::LeftTop => 1.0,
            Self::Bottom | Self::Right | Self::RightTop => -1.0,
        }
    }

    pub fn aligns_to_first_child(self) -> bool {
        matches!(self, Self::LeftTop | Self::RightTop)
    }
}

/// Strategy object selected once per layout pass. Maps the abstract
/// (cross-axis, depth) placement onto concrete coordinates for the active
/// growth direction.
#[derive(Debug, Clone, Copy)]
pub struct OrientationTransform {
    orientation: Orientation,
    spacing: SpacingPolicy,
}

impl OrientationTransform {
    pub fn new(orientation: Orientation, config: &ChartConfig) -> Self {
        Self {
            orientation,
            spacing: SpacingPolicy::new(orientation, config),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn spacing(&self) -> &SpacingPolicy {
        &self.spacing
    }

    /// Position of the next sibling, `gap` further along the cross axis.
    pub fn advance(&self, prev: Vec2, gap: f32) -> Vec2 {
        if self.orientation.grows_vertically() {
            prev.add(gap, 0.0)
        } else {
            prev.add(0.0, gap)
        }
    }

    /// Depth-axis coordinate of a level.
    pub fn level_anchor(&self, depth: usize) -> f32 {
        self.spacing.level_offset(depth)
    }

    /// Concrete position from a cross-axis coordinate and a depth.
    pub fn place(&self, cross: f32, depth: usize) -> Vec2 {
        let anchor = self.level_anchor(depth);
        if self.orientation.grows_vertically() {
            Vec2::new(cross, anchor)
        } else {
            Vec2::new(anchor, cross)
        }
    }

    pub fn cross(&self, pos: Vec2) -> f32 {
        if self.orientation.grows_vertically() {
            pos.x
        } else {
            pos.y
        }
    }

    pub fn shift_cross(&self, pos: Vec2, delta: f32) -> Vec2 {
        if self.orientation.grows_vertically() {
            pos.add(delta, 0.0)
        } else {
            pos.add(0.0, delta)
        }
    }

    /// Cross-axis coordinate for a group's parent: midpoint of the first and
    /// last child, or the first child alone in aligned-to-first-child mode.
    pub fn group_center(&self, first: Vec2, last: Vec2) -> f32 {
        if self.orientation.aligns_to_first_child() {
            self.cross(first)
        } else {
            (self.cross(first) + self.cross(last)) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        for orientation in [
            Orientation::Top,
            Orientation::Bottom,
            Orientation::Left,
            Orientation::LeftTop,
            Orientation::Right,
            Orientation::RightTop,
        ] {
            assert_eq!(Orientation::from_token(orientation.as_str()), Some(orientation));
        }
        assert_eq!(Orientation::from_token("diagonal"), None);
    }

    #[test]
    fn top_levels_grow_downward() {
        let config = ChartConfig::default();
        let transform = OrientationTransform::new(Orientation::Top, &config);
        // 80 node height + 80 level space per level.
        assert_eq!(transform.place(0.0, 2), Vec2::new(0.0, 320.0));
        assert_eq!(transform.advance(Vec2::ZERO, 370.0), Vec2::new(370.0, 0.0));
    }

    #[test]
    fn bottom_levels_grow_upward() {
        let config = ChartConfig::default();
        let transform = OrientationTransform::new(Orientation::Bottom, &config);
        assert_eq!(transform.place(10.0, 1), Vec2::new(10.0, -160.0));
    }

    #[test]
    fn side_orientations_stack_levels_on_x() {
        let config = ChartConfig::default();
        let left = OrientationTransform::new(Orientation::Left, &config);
        // 350 node width + 80 level space per level.
        assert_eq!(left.place(5.0, 1), Vec2::new(430.0, 5.0));
        assert_eq!(left.advance(Vec2::ZERO, 100.0), Vec2::new(0.0, 100.0));

        let right = OrientationTransform::new(Orientation::Right, &config);
        assert_eq!(right.place(5.0, 1), Vec2::new(-430.0, 5.0));
    }

    #[test]
    fn group_center_modes() {
        let config = ChartConfig::default();
        let top = OrientationTransform::new(Orientation::Top, &config);
        assert_eq!(top.group_center(Vec2::new(0.0, 0.0), Vec2::new(390.0, 0.0)), 195.0);

        let right_top = OrientationTransform::new(Orientation::RightTop, &config);
        assert_eq!(
            right_top.group_center(Vec2::new(0.0, 40.0), Vec2::new(0.0, 400.0)),
            40.0
        );
    }
}
