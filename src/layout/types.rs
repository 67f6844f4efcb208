use serde::{Deserialize, Serialize};

use crate::record::NodeRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn translate(self, delta: Vec2) -> Self {
        self.add(delta.x, delta.y)
    }
}

/// A record with its computed top-left position. Positions are final once the
/// layout pass returns; the realized geometry handle lives in the engine, not
/// here, so a `LayoutResult` stays plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub record: NodeRecord,
    pub pos: Vec2,
    pub depth: usize,
}

impl PlacedNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn parent_key(&self) -> &str {
        self.record.parent_key()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorRoute {
    /// Absolute polyline: attach point on the parent, optional elbow bends,
    /// end at the child's near edge.
    pub points: Vec<Vec2>,
}

impl ConnectorRoute {
    pub fn start(&self) -> Vec2 {
        self.points.first().copied().unwrap_or(Vec2::ZERO)
    }

    pub fn end(&self) -> Vec2 {
        self.points.last().copied().unwrap_or(Vec2::ZERO)
    }

    pub fn is_straight(&self) -> bool {
        self.points.len() == 2
    }
}

/// Routed edge between a parent and one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub route: ConnectorRoute,
    /// Top-left of the junction dot's bounding box; the dot itself is
    /// `routing::MARKER_RADIUS` wide and sits centered on the route start.
    pub marker: Vec2,
}

/// Everything one layout pass produced. Superseded wholesale by the next
/// pass; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Placed nodes grouped by level, root level first.
    pub levels: Vec<Vec<PlacedNode>>,
    pub connectors: Vec<Connector>,
    pub warnings: Vec<LayoutWarning>,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.levels.iter().map(|level| level.len()).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PlacedNode> {
        self.levels.iter().flatten()
    }

    pub fn get(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes().find(|node| node.id() == id)
    }

    pub fn root(&self) -> Option<&PlacedNode> {
        self.levels.first().and_then(|level| level.first())
    }
}

/// Structural anomalies recovered during level building. These never abort a
/// layout pass; the diagram renders what it can.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LayoutWarning {
    /// No record with an absent/empty parent reference.
    MissingRoot,
    /// Parent reference points at an id that does not exist.
    Orphan { id: String, parent_id: String },
    /// A second (or later) root; only the first root's tree is laid out.
    ExtraRoot { id: String },
    /// Reachable only through an orphan or an extra root.
    Unreachable { id: String },
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::MissingRoot => write!(f, "no root record found"),
            LayoutWarning::Orphan { id, parent_id } => {
                write!(f, "record `{id}` references missing parent `{parent_id}`")
            }
            LayoutWarning::ExtraRoot { id } => {
                write!(f, "record `{id}` is a second root; its tree is not laid out")
            }
            LayoutWarning::Unreachable { id } => {
                write!(f, "record `{id}` is unreachable from the root")
            }
        }
    }
}

/// Caller contract violations detected before placement begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("duplicate record id `{0}`")]
    DuplicateId(String),
}
