use serde::{Deserialize, Serialize};

use crate::theme::StylePatch;

/// One entry of the flat hierarchy snapshot. A record is the root when its
/// parent reference is absent or empty; every other record must point at an
/// existing `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    #[serde(default, alias = "pid", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub kind: NodeKind,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(|value| value.to_string()),
            kind: NodeKind::default(),
        }
    }

    pub fn basic(id: impl Into<String>, parent_id: Option<&str>, title: impl Into<String>) -> Self {
        let mut record = Self::new(id, parent_id);
        record.kind = NodeKind::Basic(BasicNode {
            title: NodeText::plain(title),
            ..BasicNode::default()
        });
        record
    }

    /// Sort/grouping key: the empty string marks a root.
    pub fn parent_key(&self) -> &str {
        self.parent_id.as_deref().unwrap_or("")
    }

    pub fn is_root(&self) -> bool {
        self.parent_key().is_empty()
    }

    pub fn title(&self) -> &str {
        match &self.kind {
            NodeKind::Basic(basic) => &basic.title.text,
        }
    }
}

/// Rendering payload variants. Placement never inspects the payload; it only
/// travels with the record so the surface can realize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Basic(BasicNode),
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Basic(BasicNode::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicNode {
    #[serde(default)]
    pub title: NodeText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<NodeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_style: Option<StylePatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeText {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
}

impl NodeText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}
