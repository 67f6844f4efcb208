use std::collections::BTreeMap;

use crate::layout::Vec2;

/// Opaque identity of a realized shape, minted by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeHandle(u64);

impl ShapeHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSpec {
    Box { pos: Vec2, size: Vec2 },
    Path { points: Vec<Vec2> },
    Circle { center: Vec2, radius: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub corner_radius: f32,
}

/// The external rendering collaborator. The engine realizes placed nodes and
/// connectors through this contract and never touches a canvas itself.
pub trait GeometrySurface {
    fn add_shape(&mut self, spec: ShapeSpec, style: ShapeStyle) -> ShapeHandle;

    fn remove_shape(&mut self, handle: ShapeHandle);

    /// The child's position becomes parent-relative: when the parent moves,
    /// the child follows without the engine re-placing it.
    fn attach(&mut self, child: ShapeHandle, parent: ShapeHandle);

    fn restyle(&mut self, handle: ShapeHandle, style: ShapeStyle);

    fn destroy(&mut self, handle: ShapeHandle);

    /// Drains click notifications accumulated since the last call.
    fn take_clicks(&mut self) -> Vec<ShapeHandle> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Added(ShapeHandle),
    Removed(ShapeHandle),
    Destroyed(ShapeHandle),
}

/// In-memory surface keeping every call observable. Backs the unit tests and
/// headless runs; a real canvas/DOM surface implements the same trait.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    shapes: BTreeMap<ShapeHandle, (ShapeSpec, ShapeStyle)>,
    attachments: Vec<(ShapeHandle, ShapeHandle)>,
    events: Vec<SurfaceEvent>,
    pending_clicks: Vec<ShapeHandle>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&(ShapeSpec, ShapeStyle)> {
        self.shapes.get(&handle)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeHandle, &(ShapeSpec, ShapeStyle))> {
        self.shapes.iter()
    }

    pub fn attachments(&self) -> &[(ShapeHandle, ShapeHandle)] {
        &self.attachments
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Simulates a user click on a shape.
    pub fn push_click(&mut self, handle: ShapeHandle) {
        self.pending_clicks.push(handle);
    }
}

impl GeometrySurface for RecordingSurface {
    fn add_shape(&mut self, spec: ShapeSpec, style: ShapeStyle) -> ShapeHandle {
        self.next_id += 1;
        let handle = ShapeHandle(self.next_id);
        self.shapes.insert(handle, (spec, style));
        self.events.push(SurfaceEvent::Added(handle));
        handle
    }

    fn remove_shape(&mut self, handle: ShapeHandle) {
        self.events.push(SurfaceEvent::Removed(handle));
    }

    fn attach(&mut self, child: ShapeHandle, parent: ShapeHandle) {
        self.attachments.push((child, parent));
    }

    fn restyle(&mut self, handle: ShapeHandle, style: ShapeStyle) {
        if let Some(entry) = self.shapes.get_mut(&handle) {
            entry.1 = style;
        }
    }

    fn destroy(&mut self, handle: ShapeHandle) {
        self.shapes.remove(&handle);
        self.attachments
            .retain(|(child, parent)| *child != handle && *parent != handle);
        self.events.push(SurfaceEvent::Destroyed(handle));
    }

    fn take_clicks(&mut self) -> Vec<ShapeHandle> {
        std::mem::take(&mut self.pending_clicks)
    }
}
