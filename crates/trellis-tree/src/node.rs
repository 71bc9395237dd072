use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::meta::MetaId;
use crate::value::{PropValue, Props};

/// A named handle to an output component.
///
/// The builder never calls components; it only records which one a tag
/// resolved to. The host renderer maps the name back to something renderable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ComponentRef(Arc<str>);

impl ComponentRef {
    /// Create a handle for the component with the given name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved type identity of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ElementType {
    /// A plain tag name, either the original one or an alias.
    Tag(String),
    /// A genuine component.
    Component(ComponentRef),
}

impl ElementType {
    /// Plain tag type.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Component type.
    #[must_use]
    pub fn component(name: impl Into<Arc<str>>) -> Self {
        Self::Component(ComponentRef::new(name))
    }

    /// Whether this is a component rather than a plain tag name.
    #[must_use]
    pub const fn is_component(&self) -> bool {
        matches!(self, Self::Component(_))
    }

    /// The tag or component name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tag(tag) => tag,
            Self::Component(component) => component.name(),
        }
    }
}

impl From<ComponentRef> for ElementType {
    fn from(value: ComponentRef) -> Self {
        Self::Component(value)
    }
}

impl From<&str> for ElementType {
    fn from(value: &str) -> Self {
        Self::Tag(value.to_owned())
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Resolved type identity.
    #[serde(rename = "type")]
    pub kind: ElementType,
    /// Position of this element in its parent's children when it was opened.
    pub key: usize,
    /// Attributes, after key renaming and value conversion.
    pub props: Props,
    /// Children in document order. Empty for void and raw-text elements.
    pub children: Vec<Node>,
    /// Side-channel link into the metadata tree. Only set for component
    /// types when metadata is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaId>,
}

impl Element {
    /// Create an element with no attributes and no children.
    #[must_use]
    pub const fn new(kind: ElementType, key: usize) -> Self {
        Self {
            kind,
            key,
            props: Props::new(),
            children: Vec::new(),
            meta: None,
        }
    }

    /// Look up an attribute by its (possibly renamed) key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    /// Concatenated text of all descendant text nodes, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
        out
    }
}

/// Tears the subtree down with an explicit work stack. Nesting depth is
/// bounded only by memory, not by the call stack.
impl Drop for Element {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(node) = stack.pop() {
            if let Node::Element(mut element) = node {
                stack.append(&mut element.children);
            }
        }
    }
}

/// A node in a children list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Text run. Never adjacent to another text node in a finished tree.
    Text(String),
    /// Element node.
    Element(Element),
}

impl Node {
    /// Returns the text if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    /// Returns the element if this is an element node.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

/// Normalised root of a parse.
///
/// Zero top-level nodes collapse to [`Fragment::Empty`], one to
/// [`Fragment::Single`], and two or more stay a [`Fragment::List`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Fragment {
    /// No top-level nodes.
    #[default]
    Empty,
    /// Exactly one top-level node.
    Single(Node),
    /// Two or more top-level nodes, in document order.
    List(Vec<Node>),
}

impl Fragment {
    /// Normalise a root children list.
    #[must_use]
    pub fn from_nodes(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => Self::Empty,
            1 => nodes.pop().map_or(Self::Empty, Self::Single),
            _ => Self::List(nodes),
        }
    }

    /// Top-level nodes as a slice.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        match self {
            Self::Empty => &[],
            Self::Single(node) => std::slice::from_ref(node),
            Self::List(nodes) => nodes,
        }
    }

    /// Consume the fragment and return its top-level nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(node) => vec![node],
            Self::List(nodes) => nodes,
        }
    }

    /// The single top-level node, if there is exactly one.
    #[must_use]
    pub const fn single(&self) -> Option<&Node> {
        match self {
            Self::Single(node) => Some(node),
            _ => None,
        }
    }

    /// Number of top-level nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    /// Whether the parse produced nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
