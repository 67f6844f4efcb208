use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::config::ChartConfig;
use crate::layout::LayoutResult;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub orientation: String,
    pub node_width: f32,
    pub node_height: f32,
    pub levels: usize,
    pub nodes: Vec<NodeDump>,
    pub connectors: Vec<ConnectorDump>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
    pub marker: [f32; 2],
}

impl LayoutDump {
    pub fn from_layout(layout: &LayoutResult, config: &ChartConfig) -> Self {
        let nodes = layout
            .nodes()
            .map(|node| NodeDump {
                id: node.record.id.clone(),
                parent_id: node.record.parent_id.clone(),
                title: node.record.title().to_string(),
                depth: node.depth,
                x: node.pos.x,
                y: node.pos.y,
            })
            .collect();

        let connectors = layout
            .connectors
            .iter()
            .map(|connector| ConnectorDump {
                from: connector.from.clone(),
                to: connector.to.clone(),
                points: connector
                    .route
                    .points
                    .iter()
                    .map(|point| [point.x, point.y])
                    .collect(),
                marker: [connector.marker.x, connector.marker.y],
            })
            .collect();

        LayoutDump {
            orientation: config.orientation.as_str().to_string(),
            node_width: config.node_width,
            node_height: config.node_height,
            levels: layout.levels.len(),
            nodes,
            connectors,
            warnings: layout
                .warnings
                .iter()
                .map(|warning| warning.to_string())
                .collect(),
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &LayoutResult,
    config: &ChartConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
