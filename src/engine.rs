use std::collections::HashMap;

use crate::config::Config;
use crate::layout::{LayoutError, LayoutResult, MARKER_RADIUS, Vec2, compute_layout};
use crate::record::{NodeKind, NodeRecord};
use crate::surface::{GeometrySurface, ShapeHandle, ShapeSpec, ShapeStyle};
use crate::theme::{StylePatch, Theme};

/// Owns the geometry realized on a surface across snapshot rebuilds. Each
/// snapshot replaces the previous layout wholesale: every prior handle is
/// removed and destroyed before the first new shape is created, so no
/// surface state leaks between passes. Dropping the engine is the
/// unsubscribe path and tears down whatever is live.
pub struct ChartEngine<S: GeometrySurface> {
    surface: S,
    config: Config,
    theme: Theme,
    realized: Option<Realized>,
}

struct Realized {
    layout: LayoutResult,
    /// Every handle created for this layout, in creation order.
    shapes: Vec<ShapeHandle>,
    /// Node box handle -> record id, for click re-exposure.
    node_ids: HashMap<ShapeHandle, String>,
}

impl<S: GeometrySurface> ChartEngine<S> {
    pub fn new(surface: S, config: Config) -> Self {
        let theme = config.resolved_theme();
        Self {
            surface,
            config,
            theme,
            realized: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.realized.as_ref().map(|realized| &realized.layout)
    }

    /// Full rebuild from one snapshot of the record list.
    pub fn apply_snapshot(
        &mut self,
        records: &[NodeRecord],
    ) -> Result<&LayoutResult, LayoutError> {
        self.clear();
        let layout = compute_layout(records, &self.config.chart)?;
        let realized = self.realize(layout);
        Ok(&self.realized.insert(realized).layout)
    }

    /// Consumes a snapshot stream, rebuilding once per emission.
    pub fn drive<I>(&mut self, snapshots: I) -> Result<(), LayoutError>
    where
        I: IntoIterator<Item = Vec<NodeRecord>>,
    {
        for snapshot in snapshots {
            self.apply_snapshot(&snapshot)?;
        }
        Ok(())
    }

    /// Releases every handle of the current layout.
    pub fn clear(&mut self) {
        let Some(realized) = self.realized.take() else {
            return;
        };
        for handle in realized.shapes.into_iter().rev() {
            self.surface.remove_shape(handle);
            self.surface.destroy(handle);
        }
    }

    /// Clicked node ids accumulated on the surface since the last call.
    pub fn take_node_clicks(&mut self) -> Vec<String> {
        let clicks = self.surface.take_clicks();
        let Some(realized) = &self.realized else {
            return Vec::new();
        };
        clicks
            .into_iter()
            .filter_map(|handle| realized.node_ids.get(&handle).cloned())
            .collect()
    }

    fn realize(&mut self, layout: LayoutResult) -> Realized {
        let node_size = Vec2::new(self.config.chart.node_width, self.config.chart.node_height);
        let link_style = ShapeStyle {
            fill: None,
            stroke: Some(self.theme.link_stroke.clone()),
            stroke_width: self.theme.link_stroke_width,
            corner_radius: 0.0,
        };
        let marker_style = ShapeStyle {
            fill: Some(self.theme.marker_fill.clone()),
            stroke: Some(self.theme.marker_stroke.clone()),
            stroke_width: self.theme.marker_stroke_width,
            corner_radius: 0.0,
        };

        let mut shapes = Vec::new();
        let mut node_ids = HashMap::new();
        let mut box_by_id: HashMap<String, ShapeHandle> = HashMap::new();

        for level in &layout.levels {
            for node in level {
                let style = self.node_style(&node.record);
                let handle = self.surface.add_shape(
                    ShapeSpec::Box {
                        pos: node.pos,
                        size: node_size,
                    },
                    style,
                );
                if let Some(parent_handle) = box_by_id.get(node.record.parent_key()) {
                    self.surface.attach(handle, *parent_handle);
                }
                box_by_id.insert(node.record.id.clone(), handle);
                node_ids.insert(handle, node.record.id.clone());
                shapes.push(handle);
            }
        }

        for connector in &layout.connectors {
            let path = self.surface.add_shape(
                ShapeSpec::Path {
                    points: connector.route.points.clone(),
                },
                link_style.clone(),
            );
            if let Some(parent_handle) = box_by_id.get(connector.from.as_str()) {
                self.surface.attach(path, *parent_handle);
            }
            let dot = self.surface.add_shape(
                ShapeSpec::Circle {
                    center: connector.marker.add(MARKER_RADIUS, MARKER_RADIUS),
                    radius: MARKER_RADIUS,
                },
                marker_style.clone(),
            );
            self.surface.attach(dot, path);
            shapes.push(path);
            shapes.push(dot);
        }

        Realized {
            layout,
            shapes,
            node_ids,
        }
    }

    fn node_style(&self, record: &NodeRecord) -> ShapeStyle {
        let mut style = ShapeStyle {
            fill: Some(self.theme.node_fill.clone()),
            stroke: Some(self.theme.node_stroke.clone()),
            stroke_width: self.theme.node_stroke_width,
            corner_radius: self.theme.node_radius,
        };
        let NodeKind::Basic(basic) = &record.kind;
        if let Some(patch) = &basic.style {
            apply_patch(&mut style, patch);
        }
        style
    }
}

fn apply_patch(style: &mut ShapeStyle, patch: &StylePatch) {
    if let Some(fill) = &patch.fill {
        style.fill = Some(fill.clone());
    }
    if let Some(stroke) = &patch.stroke {
        style.stroke = Some(stroke.clone());
    }
    if let Some(width) = patch.stroke_width {
        style.stroke_width = width;
    }
    if let Some(radius) = patch.radius {
        style.corner_radius = radius;
    }
}

impl<S: GeometrySurface> Drop for ChartEngine<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
