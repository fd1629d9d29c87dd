//! Point-in-time captures of the device's element tree.
//!
//! uiautomator dumps the whole visible hierarchy as one XML document. A
//! [`Snapshot`] owns the parsed tree; element handles are plain borrows into
//! it, so the borrow checker enforces what the screen itself enforces: a
//! handle is only meaningful against the capture it came from. Navigate,
//! then capture again.

use serde::Serialize;

use crate::errors::AutomationError;
use crate::selector::Selector;

const CLOSING_TAG: &str = "</hierarchy>";

/// Pixel rectangle of a node, dumped as `[left,top][right,bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn parse(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
        let (first, second) = inner.split_once("][")?;
        let (left, top) = first.split_once(',')?;
        let (right, bottom) = second.split_once(',')?;
        Some(Self {
            left: left.trim().parse().ok()?,
            top: top.trim().parse().ok()?,
            right: right.trim().parse().ok()?,
            bottom: bottom.trim().parse().ok()?,
        })
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// One element in a captured tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UiNode {
    #[serde(rename = "resource-id", skip_serializing_if = "String::is_empty")]
    pub resource_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "content-desc", skip_serializing_if = "String::is_empty")]
    pub content_desc: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub package: String,
    pub clickable: bool,
    pub enabled: bool,
    pub focused: bool,
    pub bounds: Bounds,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UiNode>,
}

impl UiNode {
    /// Center point, where taps are aimed.
    pub fn center(&self) -> (i32, i32) {
        self.bounds.center()
    }

    /// Dump attribute by its XML name, rendered as a string. `None` for
    /// attributes the capture does not carry.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "resource-id" => Some(self.resource_id.clone()),
            "text" => Some(self.text.clone()),
            "content-desc" => Some(self.content_desc.clone()),
            "class" => Some(self.class.clone()),
            "package" => Some(self.package.clone()),
            "clickable" => Some(self.clickable.to_string()),
            "enabled" => Some(self.enabled.to_string()),
            "focused" => Some(self.focused.to_string()),
            "bounds" => Some(format!(
                "[{},{}][{},{}]",
                self.bounds.left, self.bounds.top, self.bounds.right, self.bounds.bottom
            )),
            _ => None,
        }
    }
}

/// A parsed capture of everything on screen.
///
/// All queries walk the tree in depth-first document order, matching the
/// top-to-bottom order elements appear in the dump.
#[derive(Debug, Clone)]
pub struct Snapshot {
    roots: Vec<UiNode>,
}

impl Snapshot {
    /// Parse raw `uiautomator dump` output.
    ///
    /// The dumper writes a status line ("UI hierchary dumped to: ...", typo
    /// theirs) after the document, so everything outside the first `<` and
    /// the closing `</hierarchy>` is discarded before the XML parse.
    pub fn parse(raw: &str) -> Result<Self, AutomationError> {
        let xml = trim_dump(raw)?;
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| AutomationError::SnapshotParse(e.to_string()))?;
        let hierarchy = doc.root_element();
        if !hierarchy.has_tag_name("hierarchy") {
            return Err(AutomationError::SnapshotParse(format!(
                "expected <hierarchy> root, found <{}>",
                hierarchy.tag_name().name()
            )));
        }
        let roots = hierarchy
            .children()
            .filter(|c| c.has_tag_name("node"))
            .map(build_node)
            .collect();
        Ok(Self { roots })
    }

    /// First node matching `selector`, in document order.
    pub fn find(&self, selector: &Selector) -> Option<&UiNode> {
        self.iter().find(|node| selector.matches(node))
    }

    /// Every node matching `selector`, in document order.
    pub fn find_all(&self, selector: &Selector) -> Vec<&UiNode> {
        self.iter().filter(|node| selector.matches(node)).collect()
    }

    /// Depth-first iterator over every node in the capture.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// The capture as pretty-printed JSON, for offline inspection of what
    /// the app actually renders.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.roots)
    }
}

/// Preorder walk over a [`Snapshot`].
pub struct Nodes<'a> {
    stack: Vec<&'a UiNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a UiNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn build_node(xml: roxmltree::Node<'_, '_>) -> UiNode {
    let attr = |name: &str| xml.attribute(name).unwrap_or("").to_string();
    let flag = |name: &str| xml.attribute(name) == Some("true");
    UiNode {
        resource_id: attr("resource-id"),
        text: attr("text"),
        content_desc: attr("content-desc"),
        class: attr("class"),
        package: attr("package"),
        clickable: flag("clickable"),
        enabled: flag("enabled"),
        focused: flag("focused"),
        bounds: xml
            .attribute("bounds")
            .and_then(Bounds::parse)
            .unwrap_or_default(),
        children: xml
            .children()
            .filter(|c| c.has_tag_name("node"))
            .map(build_node)
            .collect(),
    }
}

fn trim_dump(raw: &str) -> Result<&str, AutomationError> {
    let start = raw
        .find('<')
        .ok_or_else(|| AutomationError::SnapshotParse("no XML in dump output".to_string()))?;
    let end = raw
        .rfind(CLOSING_TAG)
        .map(|idx| idx + CLOSING_TAG.len())
        .ok_or_else(|| {
            AutomationError::SnapshotParse("dump output has no closing hierarchy tag".to_string())
        })?;
    if end <= start {
        return Err(AutomationError::SnapshotParse(
            "malformed dump output".to_string(),
        ));
    }
    Ok(&raw[start..end])
}
