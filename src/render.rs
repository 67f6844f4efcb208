use std::path::Path;

use anyhow::Result;

use crate::config::{ChartConfig, RenderConfig};
use crate::layout::{LayoutResult, MARKER_RADIUS, Vec2};
use crate::record::NodeKind;
use crate::theme::Theme;

// Text offsets inside the node box; mirrored on the far edge in rtl mode.
const TEXT_INSET_X: f32 = 80.0;
const TITLE_OFFSET_Y: f32 = 25.0;
const TITLE_OFFSET_Y_WITH_CATEGORY: f32 = 35.0;
const CATEGORY_OFFSET_Y: f32 = 15.0;
const ICON_INSET_X: f32 = 25.0;
const ICON_OFFSET_Y: f32 = 25.0;
const ICON_SIZE: f32 = 32.0;

pub fn render_svg(layout: &LayoutResult, theme: &Theme, config: &ChartConfig) -> String {
    render_svg_sized(layout, theme, config, &RenderConfig::default())
}

pub fn render_svg_sized(
    layout: &LayoutResult,
    theme: &Theme,
    config: &ChartConfig,
    render: &RenderConfig,
) -> String {
    let (min, max) = bounds(layout, config);
    let width = (max.x - min.x + render.padding * 2.0).max(1.0);
    let height = (max.y - min.y + render.padding * 2.0).max(1.0);
    let view_x = min.x - render.padding;
    let view_y = min.y - render.padding;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{view_x:.2} {view_y:.2} {width:.2} {height:.2}\">",
    ));

    svg.push_str(&format!(
        "<rect x=\"{view_x:.2}\" y=\"{view_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str(&format!(
        "<style>.org-node rect:hover{{fill:{};}}</style>",
        theme.node_hover_fill
    ));

    for connector in &layout.connectors {
        let d = points_to_path(&connector.route.points);
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            d, theme.link_stroke, theme.link_stroke_width
        ));
    }
    for connector in &layout.connectors {
        let center = connector.marker.add(MARKER_RADIUS, MARKER_RADIUS);
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            center.x,
            center.y,
            MARKER_RADIUS,
            theme.marker_fill,
            theme.marker_stroke,
            theme.marker_stroke_width
        ));
    }

    for (index, node) in layout.nodes().enumerate() {
        svg.push_str(&node_svg(index, node.pos, &node.record.kind, theme, config));
    }

    svg.push_str("</svg>");
    svg
}

fn node_svg(index: usize, pos: Vec2, kind: &NodeKind, theme: &Theme, config: &ChartConfig) -> String {
    let NodeKind::Basic(basic) = kind;

    let mut fill = theme.node_fill.as_str();
    let mut stroke = theme.node_stroke.as_str();
    let mut stroke_width = theme.node_stroke_width;
    let mut radius = theme.node_radius;
    if let Some(patch) = &basic.style {
        if let Some(v) = &patch.fill {
            fill = v;
        }
        if let Some(v) = &patch.stroke {
            stroke = v;
        }
        if let Some(v) = patch.stroke_width {
            stroke_width = v;
        }
        if let Some(v) = patch.radius {
            radius = v;
        }
    }

    let mut out = format!("<g class=\"org-node\" id=\"org-node-{index}\">");
    if let Some(hover) = basic.hover_style.as_ref().and_then(|patch| patch.fill.as_deref()) {
        out.push_str(&format!(
            "<style>#org-node-{index} rect:hover{{fill:{hover};}}</style>"
        ));
    }
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        pos.x, pos.y, config.node_width, config.node_height, radius, radius, fill, stroke, stroke_width
    ));

    let (text_x, anchor) = if config.rtl {
        (pos.x + config.node_width - TEXT_INSET_X, "end")
    } else {
        (pos.x + TEXT_INSET_X, "start")
    };

    if let Some(category) = &basic.category {
        let color = category
            .style
            .as_ref()
            .and_then(|s| s.font_color.as_deref())
            .unwrap_or(&theme.category_color);
        let size = category
            .style
            .as_ref()
            .and_then(|s| s.font_size)
            .unwrap_or(theme.category_font_size);
        let y = pos.y + CATEGORY_OFFSET_Y + size;
        out.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{size}\" fill=\"{color}\">{}</text>",
            theme.font_family,
            escape_xml(&category.text)
        ));
    }

    let title_color = basic
        .title
        .style
        .as_ref()
        .and_then(|s| s.font_color.as_deref())
        .unwrap_or(&theme.title_color);
    let title_size = basic
        .title
        .style
        .as_ref()
        .and_then(|s| s.font_size)
        .unwrap_or(theme.title_font_size);
    let title_offset = if basic.category.is_some() {
        TITLE_OFFSET_Y_WITH_CATEGORY
    } else {
        TITLE_OFFSET_Y
    };
    let title_y = pos.y + title_offset + title_size;
    out.push_str(&format!(
        "<text x=\"{text_x:.2}\" y=\"{title_y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{title_size}\" fill=\"{title_color}\">{}</text>",
        theme.font_family,
        escape_xml(&basic.title.text)
    ));

    if let Some(icon) = &basic.icon {
        let icon_x = if config.rtl {
            pos.x + config.node_width - ICON_INSET_X - ICON_SIZE
        } else {
            pos.x + ICON_INSET_X
        };
        out.push_str(&format!(
            "<image x=\"{icon_x:.2}\" y=\"{:.2}\" width=\"{ICON_SIZE}\" height=\"{ICON_SIZE}\" href=\"{}\"/>",
            pos.y + ICON_OFFSET_Y,
            escape_xml(icon)
        ));
    }

    out.push_str("</g>");
    out
}

fn bounds(layout: &LayoutResult, config: &ChartConfig) -> (Vec2, Vec2) {
    let mut min = Vec2::new(f32::MAX, f32::MAX);
    let mut max = Vec2::new(f32::MIN, f32::MIN);
    for node in layout.nodes() {
        min.x = min.x.min(node.pos.x);
        min.y = min.y.min(node.pos.y);
        max.x = max.x.max(node.pos.x + config.node_width);
        max.y = max.y.max(node.pos.y + config.node_height);
    }
    for connector in &layout.connectors {
        for point in &connector.route.points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
    }
    if min.x == f32::MAX {
        (Vec2::ZERO, Vec2::ZERO)
    } else {
        (min, max)
    }
}

fn points_to_path(points: &[Vec2]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].x, points[0].y));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.x, point.y));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::record::NodeRecord;

    fn sample_layout(config: &ChartConfig) -> LayoutResult {
        let records = vec![
            NodeRecord::basic("a", None, "CEO"),
            NodeRecord::basic("b", Some("a"), "CTO"),
            NodeRecord::basic("c", Some("a"), "CFO"),
        ];
        compute_layout(&records, config).unwrap()
    }

    #[test]
    fn render_svg_basic() {
        let config = ChartConfig::default();
        let layout = sample_layout(&config);
        let svg = render_svg(&layout, &Theme::classic(), &config);
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("CEO"));
        assert_eq!(svg.matches("<rect").count(), 4); // background + 3 nodes
        assert_eq!(svg.matches("<path").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn hover_fill_comes_from_theme() {
        let config = ChartConfig::default();
        let layout = sample_layout(&config);
        let svg = render_svg(&layout, &Theme::classic(), &config);
        assert!(svg.contains("rect:hover{fill:#59BF66;}"));
    }

    #[test]
    fn rtl_flips_text_anchor() {
        let mut config = ChartConfig::default();
        config.rtl = true;
        let layout = sample_layout(&config);
        let svg = render_svg(&layout, &Theme::classic(), &config);
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(!svg.contains("text-anchor=\"start\""));
    }

    #[test]
    fn escapes_markup_in_titles() {
        let config = ChartConfig::default();
        let records = vec![NodeRecord::basic("a", None, "R&D <Lead>")];
        let layout = compute_layout(&records, &config).unwrap();
        let svg = render_svg(&layout, &Theme::classic(), &config);
        assert!(svg.contains("R&amp;D &lt;Lead&gt;"));
    }

    #[test]
    fn per_node_hover_style_gets_a_scoped_rule() {
        use crate::record::{BasicNode, NodeKind, NodeText};
        use crate::theme::StylePatch;

        let config = ChartConfig::default();
        let mut record = NodeRecord::basic("a", None, "CEO");
        record.kind = NodeKind::Basic(BasicNode {
            title: NodeText::plain("CEO"),
            hover_style: Some(StylePatch {
                fill: Some("#FF8800".to_string()),
                ..StylePatch::default()
            }),
            ..BasicNode::default()
        });
        let layout = compute_layout(&[record], &config).unwrap();
        let svg = render_svg(&layout, &Theme::classic(), &config);
        assert!(svg.contains("#org-node-0 rect:hover{fill:#FF8800;}"));
    }

    #[test]
    fn empty_layout_renders_an_empty_canvas() {
        let config = ChartConfig::default();
        let layout = compute_layout(&[], &config).unwrap();
        let svg = render_svg(&layout, &Theme::classic(), &config);
        assert!(svg.contains("<svg"));
        assert_eq!(svg.matches("<path").count(), 0);
    }
}
