#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod engine;
pub mod layout;
pub mod layout_dump;
pub mod record;
pub mod render;
pub mod surface;
pub mod theme;

pub use config::{ChartConfig, Config, RenderConfig, load_config};
pub use engine::ChartEngine;
pub use layout::{
    Connector, LayoutError, LayoutResult, LayoutWarning, Orientation, PlacedNode, Vec2,
    compute_layout,
};
pub use record::{BasicNode, NodeKind, NodeRecord};
pub use render::render_svg;
pub use surface::{GeometrySurface, RecordingSurface, ShapeHandle, ShapeSpec, ShapeStyle};
pub use theme::{StyleOverrides, StylePatch, Theme};

#[cfg(feature = "cli")]
pub use cli::run;
