//! How the send macro names the elements it is after.

use regex::Regex;

use crate::snapshot::UiNode;

/// A predicate over dump nodes. Querying is always a full-tree scan; these
/// are cheap string checks, and captures top out at a few hundred nodes.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Exact `resource-id` match. Compose test tags surface here as bare
    /// names without the usual `package:id/` prefix.
    Id(String),
    /// Substring of the `text` attribute.
    TextContains(String),
    /// Regex over the `text` attribute.
    TextMatches(Regex),
    /// Regex over the `content-desc` attribute.
    DescriptionMatches(Regex),
    /// String equality against any dump attribute by its XML name.
    Attribute { key: String, value: String },
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    pub fn text_contains(text: impl Into<String>) -> Self {
        Selector::TextContains(text.into())
    }

    pub fn attribute(key: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attribute {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether `node` satisfies this selector.
    pub fn matches(&self, node: &UiNode) -> bool {
        match self {
            Selector::Id(id) => node.resource_id == *id,
            Selector::TextContains(needle) => node.text.contains(needle.as_str()),
            Selector::TextMatches(pattern) => pattern.is_match(&node.text),
            Selector::DescriptionMatches(pattern) => pattern.is_match(&node.content_desc),
            Selector::Attribute { key, value } => node.attribute(key).as_deref() == Some(value),
        }
    }
}
