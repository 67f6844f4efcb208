use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub title_font_size: f32,
    pub title_color: String,
    pub category_font_size: f32,
    pub category_color: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_stroke_width: f32,
    pub node_radius: f32,
    pub node_hover_fill: String,
    pub link_stroke: String,
    pub link_stroke_width: f32,
    pub marker_fill: String,
    pub marker_stroke: String,
    pub marker_stroke_width: f32,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Tajawal, sans-serif".to_string(),
            title_font_size: 16.0,
            title_color: "#FFFFFF".to_string(),
            category_font_size: 14.0,
            category_color: "#DDDDDD".to_string(),
            node_fill: "#48AF55".to_string(),
            node_stroke: "#555555".to_string(),
            node_stroke_width: 0.0,
            node_radius: 40.0,
            node_hover_fill: "#59BF66".to_string(),
            link_stroke: "#888888".to_string(),
            link_stroke_width: 1.0,
            marker_fill: "#FFFFFF".to_string(),
            marker_stroke: "#888888".to_string(),
            marker_stroke_width: 1.0,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn slate() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, sans-serif".to_string(),
            title_font_size: 15.0,
            title_color: "#F4F7FB".to_string(),
            category_font_size: 13.0,
            category_color: "#C9D4E3".to_string(),
            node_fill: "#4A6FA5".to_string(),
            node_stroke: "#2F4858".to_string(),
            node_stroke_width: 1.0,
            node_radius: 12.0,
            node_hover_fill: "#5B80B6".to_string(),
            link_stroke: "#7A8AA6".to_string(),
            link_stroke_width: 1.2,
            marker_fill: "#FFFFFF".to_string(),
            marker_stroke: "#7A8AA6".to_string(),
            marker_stroke_width: 1.0,
            background: "#FFFFFF".to_string(),
        }
    }

    /// Folds per-category overrides over this theme.
    pub fn apply(&mut self, overrides: &StyleOverrides) {
        if let Some(patch) = &overrides.node {
            if let Some(v) = &patch.fill {
                self.node_fill = v.clone();
            }
            if let Some(v) = &patch.stroke {
                self.node_stroke = v.clone();
            }
            if let Some(v) = patch.stroke_width {
                self.node_stroke_width = v;
            }
            if let Some(v) = patch.radius {
                self.node_radius = v;
            }
        }
        if let Some(patch) = &overrides.node_hover
            && let Some(v) = &patch.fill
        {
            self.node_hover_fill = v.clone();
        }
        if let Some(patch) = &overrides.link {
            if let Some(v) = &patch.stroke {
                self.link_stroke = v.clone();
            }
            if let Some(v) = patch.stroke_width {
                self.link_stroke_width = v;
            }
        }
        if let Some(patch) = &overrides.marker {
            if let Some(v) = &patch.fill {
                self.marker_fill = v.clone();
            }
            if let Some(v) = &patch.stroke {
                self.marker_stroke = v.clone();
            }
            if let Some(v) = patch.stroke_width {
                self.marker_stroke_width = v;
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Partial shape style, merged over a theme category or a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
}

/// Per-category overrides recognized in configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<StylePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_hover: Option<StylePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<StylePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<StylePatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_fold_over_theme() {
        let mut theme = Theme::classic();
        theme.apply(&StyleOverrides {
            node: Some(StylePatch {
                fill: Some("#123456".to_string()),
                radius: Some(8.0),
                ..StylePatch::default()
            }),
            link: Some(StylePatch {
                stroke_width: Some(2.5),
                ..StylePatch::default()
            }),
            ..StyleOverrides::default()
        });
        assert_eq!(theme.node_fill, "#123456");
        assert_eq!(theme.node_radius, 8.0);
        assert_eq!(theme.link_stroke_width, 2.5);
        // untouched categories keep their defaults
        assert_eq!(theme.marker_fill, "#FFFFFF");
    }
}
