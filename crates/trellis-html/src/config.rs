//! Declarative options, loadable from JSON or any other serde format.
//!
//! Only the parts of [`ParseOptions`] that can be expressed as data live here:
//! component names, attribute renames, style-converted keys and tags to drop.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use trellis_tree::ElementType;

use crate::options::ParseOptions;

/// What a tag in [`MarkupConfig::components`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ComponentTarget {
    /// A component with this name.
    Component(String),
    /// Another plain tag name.
    Alias {
        /// The tag name to emit instead.
        alias: String,
    },
}

impl From<ComponentTarget> for ElementType {
    fn from(value: ComponentTarget) -> Self {
        match value {
            ComponentTarget::Component(name) => Self::component(name),
            ComponentTarget::Alias { alias } => Self::Tag(alias),
        }
    }
}

/// Serializable subset of [`ParseOptions`].
///
/// ```json
/// {
///   "components": { "a": "Link", "b": { "alias": "strong" } },
///   "attributes": { "class": "className" },
///   "style_keys": ["style"],
///   "ignore_tags": ["iframe"],
///   "with_meta": true
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupConfig {
    /// Tag name (any case) to component or alias.
    pub components: BTreeMap<String, ComponentTarget>,
    /// Attribute key renames.
    pub attributes: BTreeMap<String, String>,
    /// Attribute keys parsed with the style converter.
    pub style_keys: Vec<String>,
    /// Tag names (any case) whose elements are discarded.
    pub ignore_tags: Vec<String>,
    /// Also register the conventional component prop renames. Explicit
    /// `attributes` entries take precedence.
    pub react_attribute_names: bool,
    /// Build the metadata tree.
    pub with_meta: bool,
}

impl MarkupConfig {
    /// Build the equivalent [`ParseOptions`].
    #[must_use]
    pub fn into_options(self) -> ParseOptions {
        let mut options = ParseOptions::new().with_meta(self.with_meta);
        for (tag, target) in self.components {
            options = options.component(&tag, target);
        }
        for (from, to) in self.attributes {
            options = options.attribute(from, to);
        }
        if self.react_attribute_names {
            options = options.with_react_attribute_names();
        }
        for key in self.style_keys {
            options = options.style_converter_for(key);
        }
        if !self.ignore_tags.is_empty() {
            let ignored: HashSet<String> = self
                .ignore_tags
                .iter()
                .map(|tag| tag.to_ascii_lowercase())
                .collect();
            options = options
                .should_be_ignored(move |tag, _props| Ok(ignored.contains(&tag.to_ascii_lowercase())));
        }
        options
    }
}
