//! Display payloads rendered by an element's visible primitive.

use crate::host::{Billboard, PrimitiveSpec};
use serde::{Deserialize, Serialize};

/// Closed set of display kinds an element can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    /// Text display.
    Text,
    /// Item model display.
    Item,
}

/// Item shown by an item display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPayload {
    /// Registry key of the item (e.g. `"diamond_sword"`).
    pub key: String,
    /// Stack size shown.
    pub count: u32,
}

impl ItemPayload {
    /// Single item with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            count: 1,
        }
    }

    /// Builder: set the stack size.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Content handed to the host when spawning a display primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayContent {
    /// Text content.
    Text(String),
    /// Item content.
    Item(ItemPayload),
}

impl DisplayContent {
    /// Kind this payload can be displayed as.
    pub fn kind(&self) -> DisplayKind {
        match self {
            DisplayContent::Text(_) => DisplayKind::Text,
            DisplayContent::Item(_) => DisplayKind::Item,
        }
    }

    /// Spawn initializer for a centre-billboarded display of this content.
    pub fn to_spec(&self) -> PrimitiveSpec {
        match self {
            DisplayContent::Text(text) => PrimitiveSpec::Text {
                text: text.clone(),
                billboard: Billboard::Center,
            },
            DisplayContent::Item(item) => PrimitiveSpec::Item {
                item: item.clone(),
                billboard: Billboard::Center,
            },
        }
    }
}

impl From<ItemPayload> for DisplayContent {
    fn from(item: ItemPayload) -> Self {
        DisplayContent::Item(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_reports_its_kind() {
        assert_eq!(DisplayContent::Text("hi".into()).kind(), DisplayKind::Text);
        assert_eq!(
            DisplayContent::Item(ItemPayload::new("apple")).kind(),
            DisplayKind::Item
        );
    }

    #[test]
    fn specs_billboard_to_center() {
        match DisplayContent::Text("hi".into()).to_spec() {
            PrimitiveSpec::Text { text, billboard } => {
                assert_eq!(text, "hi");
                assert_eq!(billboard, Billboard::Center);
            }
            other => panic!("unexpected spec {other:?}"),
        }
    }
}
