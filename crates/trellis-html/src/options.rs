//! Configuration bag for a parse.
//!
//! Every collaborator is optional and independent. Collaborators are stored as
//! `Arc<dyn Fn .. + Send + Sync>` so one set of options can be cloned and
//! shared by parses running on different threads.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trellis_tree::{ElementType, PropValue, Props};

use crate::error::CallbackResult;
use crate::segment::{Processed, SegmentContext};

/// Converts a raw attribute value, given the tag name, into a typed value.
pub type Converter = Arc<dyn Fn(&str, &str) -> CallbackResult<PropValue> + Send + Sync>;

/// Resolves a tag name the static component map did not know.
pub type ComponentResolver = Arc<dyn Fn(&str) -> CallbackResult<Option<ElementType>> + Send + Sync>;

/// Turns a raw text run into zero, one or many segments.
pub type TextProcessor =
    Arc<dyn Fn(&str, &mut SegmentContext) -> CallbackResult<Processed> + Send + Sync>;

/// Decides, once an element is complete, whether to discard it.
pub type IgnorePredicate = Arc<dyn Fn(&str, &Props) -> CallbackResult<bool> + Send + Sync>;

/// Attribute renames matching the conventional component prop names.
pub const REACT_ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    ("class", "className"),
    ("for", "htmlFor"),
    ("tabindex", "tabIndex"),
    ("readonly", "readOnly"),
    ("maxlength", "maxLength"),
    ("colspan", "colSpan"),
    ("rowspan", "rowSpan"),
    ("contenteditable", "contentEditable"),
    ("crossorigin", "crossOrigin"),
    ("accesskey", "accessKey"),
    ("autocomplete", "autoComplete"),
    ("autofocus", "autoFocus"),
    ("enctype", "encType"),
    ("srcset", "srcSet"),
    ("usemap", "useMap"),
    ("http-equiv", "httpEquiv"),
    ("charset", "charSet"),
];

/// Options recognised by the tree builder.
///
/// ```ignore
/// let options = ParseOptions::new()
///     .component("a", ElementType::component("Link"))
///     .attribute("class", "className")
///     .with_style_converter()
///     .with_meta(true);
/// ```
#[derive(Clone, Default)]
pub struct ParseOptions {
    components: HashMap<String, ElementType>,
    attributes: HashMap<String, String>,
    converters: HashMap<String, Converter>,
    process_text_segment: Option<TextProcessor>,
    get_component: Option<ComponentResolver>,
    should_be_ignored: Option<IgnorePredicate>,
    with_meta: bool,
}

impl ParseOptions {
    /// Options with no collaborators and metadata disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a tag name, matched ignoring ASCII case, to an output type.
    #[must_use]
    pub fn component(mut self, tag: &str, kind: impl Into<ElementType>) -> Self {
        let _ = self.components.insert(tag.to_ascii_lowercase(), kind.into());
        self
    }

    /// Rename an attribute key (exact match).
    #[must_use]
    pub fn attribute(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let _ = self.attributes.insert(from.into(), to.into());
        self
    }

    /// Register a converter for a (possibly renamed) attribute key.
    #[must_use]
    pub fn converter<F>(mut self, key: impl Into<String>, convert: F) -> Self
    where
        F: Fn(&str, &str) -> CallbackResult<PropValue> + Send + Sync + 'static,
    {
        let _ = self.converters.insert(key.into(), Arc::new(convert));
        self
    }

    /// Set the text segment processor.
    #[must_use]
    pub fn process_text_segment<F>(mut self, process: F) -> Self
    where
        F: Fn(&str, &mut SegmentContext) -> CallbackResult<Processed> + Send + Sync + 'static,
    {
        self.process_text_segment = Some(Arc::new(process));
        self
    }

    /// Set the fallback resolver consulted when the component map misses.
    #[must_use]
    pub fn get_component<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&str) -> CallbackResult<Option<ElementType>> + Send + Sync + 'static,
    {
        self.get_component = Some(Arc::new(resolve));
        self
    }

    /// Set the ignore predicate.
    #[must_use]
    pub fn should_be_ignored<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &Props) -> CallbackResult<bool> + Send + Sync + 'static,
    {
        self.should_be_ignored = Some(Arc::new(predicate));
        self
    }

    /// Enable or disable the metadata tree.
    #[must_use]
    pub const fn with_meta(mut self, enabled: bool) -> Self {
        self.with_meta = enabled;
        self
    }

    /// Parse the `style` attribute with [`trellis_style::parse_style`].
    #[must_use]
    pub fn with_style_converter(self) -> Self {
        self.style_converter_for("style")
    }

    /// Parse the given attribute key with [`trellis_style::parse_style`].
    #[must_use]
    pub fn style_converter_for(self, key: impl Into<String>) -> Self {
        self.converter(key, |value, _tag| Ok(trellis_style::style_value(value)))
    }

    /// Register every rename in [`REACT_ATTRIBUTE_NAMES`].
    #[must_use]
    pub fn with_react_attribute_names(mut self) -> Self {
        for (from, to) in REACT_ATTRIBUTE_NAMES {
            let _ = self
                .attributes
                .entry((*from).to_owned())
                .or_insert_with(|| (*to).to_owned());
        }
        self
    }

    pub(crate) fn lookup_component(&self, folded_tag: &str) -> Option<&ElementType> {
        self.components.get(folded_tag)
    }

    pub(crate) fn rename_attribute<'a>(&'a self, key: &'a str) -> &'a str {
        self.attributes.get(key).map_or(key, String::as_str)
    }

    pub(crate) fn converter_for(&self, key: &str) -> Option<&Converter> {
        self.converters.get(key)
    }

    pub(crate) const fn text_processor(&self) -> Option<&TextProcessor> {
        self.process_text_segment.as_ref()
    }

    pub(crate) const fn component_resolver(&self) -> Option<&ComponentResolver> {
        self.get_component.as_ref()
    }

    pub(crate) const fn ignore_predicate(&self) -> Option<&IgnorePredicate> {
        self.should_be_ignored.as_ref()
    }

    /// Whether the metadata tree is built.
    #[must_use]
    pub const fn meta_enabled(&self) -> bool {
        self.with_meta
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut converters: Vec<&String> = self.converters.keys().collect();
        converters.sort();
        f.debug_struct("ParseOptions")
            .field("components", &self.components)
            .field("attributes", &self.attributes)
            .field("converters", &converters)
            .field("process_text_segment", &self.process_text_segment.is_some())
            .field("get_component", &self.get_component.is_some())
            .field("should_be_ignored", &self.should_be_ignored.is_some())
            .field("with_meta", &self.with_meta)
            .finish()
    }
}
