use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layout::{Orientation, Vec2};
use crate::theme::{StyleOverrides, Theme};

/// Geometry knobs for one layout pass. Spacing values are the clear space
/// between box edges; the node extent is added on top by the spacing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub orientation: Orientation,
    /// Gap between adjacent same-parent nodes.
    pub siblings_space: f32,
    /// Gap between adjacent nodes of different parents.
    pub groups_space: f32,
    /// Gap between consecutive levels; also the connector's straight length.
    pub level_space: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Where the root box lands; defines the diagram's coordinate origin.
    pub root_anchor: Vec2,
    /// Right-to-left text placement inside nodes. Never affects geometry.
    pub rtl: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Top,
            siblings_space: 20.0,
            groups_space: 40.0,
            level_space: 80.0,
            node_width: 350.0,
            node_height: 80.0,
            root_anchor: Vec2::new(-175.0, -200.0),
            rtl: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    /// Whitespace around the diagram's bounding box.
    pub padding: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 40.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub chart: ChartConfig,
    pub theme: Theme,
    pub style: StyleOverrides,
    pub render: RenderConfig,
}

impl Config {
    /// Theme with the per-category overrides folded in.
    pub fn resolved_theme(&self) -> Theme {
        let mut theme = self.theme.clone();
        theme.apply(&self.style);
        theme
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    orientation: Option<String>,
    siblings_space: Option<f32>,
    groups_space: Option<f32>,
    level_space: Option<f32>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    root_anchor: Option<[f32; 2]>,
    rtl: Option<bool>,
    style: Option<StyleOverrides>,
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(name) = parsed.theme.as_deref() {
        match name {
            "slate" => config.theme = Theme::slate(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => anyhow::bail!("unknown theme `{other}`"),
        }
    }
    if let Some(token) = parsed.orientation.as_deref() {
        let Some(orientation) = Orientation::from_token(token) else {
            anyhow::bail!("unknown orientation `{token}`");
        };
        config.chart.orientation = orientation;
    }
    if let Some(v) = parsed.siblings_space {
        config.chart.siblings_space = v;
    }
    if let Some(v) = parsed.groups_space {
        config.chart.groups_space = v;
    }
    if let Some(v) = parsed.level_space {
        config.chart.level_space = v;
    }
    if let Some(v) = parsed.node_width {
        config.chart.node_width = v;
    }
    if let Some(v) = parsed.node_height {
        config.chart.node_height = v;
    }
    if let Some([x, y]) = parsed.root_anchor {
        config.chart.root_anchor = Vec2::new(x, y);
    }
    if let Some(v) = parsed.rtl {
        config.chart.rtl = v;
    }
    if let Some(style) = parsed.style {
        config.style = style;
    }
    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    if let Some(v) = parsed.padding {
        config.render.padding = v;
    }

    Ok(config)
}
