use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Attribute key under which a raw-text element's opaque payload is stored.
///
/// A host renderer seeing this key injects the payload without escaping it.
pub const RAW_CONTENT_KEY: &str = "dangerouslySetInnerHTML";

/// Flat style declarations, keyed by camel-cased property name.
pub type StyleMap = BTreeMap<String, String>;

/// Attribute map of an element. Keys are unique; order carries no meaning.
pub type Props = BTreeMap<String, PropValue>;

/// A typed attribute value.
///
/// Attributes start out as raw strings; converters registered for a key may
/// turn them into any of the other variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Raw or converted string value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Parsed inline style declarations.
    Style(StyleMap),
    /// Opaque payload of a raw-text element.
    RawContent {
        /// The captured markup, unescaped.
        #[serde(rename = "__html")]
        html: String,
    },
}

impl PropValue {
    /// Wrap a raw-text payload.
    #[must_use]
    pub fn raw_content(html: impl Into<String>) -> Self {
        Self::RawContent { html: html.into() }
    }

    /// Returns the string if this is a [`PropValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the style map if this is a [`PropValue::Style`].
    #[must_use]
    pub const fn as_style(&self) -> Option<&StyleMap> {
        match self {
            Self::Style(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the payload if this is a [`PropValue::RawContent`].
    #[must_use]
    pub fn as_raw_content(&self) -> Option<&str> {
        match self {
            Self::RawContent { html } => Some(html),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<StyleMap> for PropValue {
    fn from(value: StyleMap) -> Self {
        Self::Style(value)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Bool(b) => write!(f, "{{{b}}}"),
            Self::Number(n) => write!(f, "{{{n}}}"),
            Self::Style(map) => {
                let decls: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{{{}}}}}", decls.join(", "))
            }
            Self::RawContent { html } => write!(f, "{{raw {} bytes}}", html.len()),
        }
    }
}
