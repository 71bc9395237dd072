//! Inline style-string converter.
//!
//! Turns a flat declaration list such as `"color:red;font-size:12px;"` into a
//! [`StyleMap`] keyed by camel-cased property names. Only flat `key:value;`
//! pairs are understood; there is no selector, nesting or value parsing.

use trellis_tree::{PropValue, StyleMap};

/// Parse an inline style string into a [`StyleMap`].
///
/// Declarations are split on `;`, empty ones are skipped, and each is split
/// on its first `:`. Both sides are trimmed, the key is camel-cased with
/// [`camel_case`], and a missing value becomes the empty string. Later
/// declarations of the same property win. A whitespace-only declaration is
/// not empty and yields an empty key.
#[must_use]
pub fn parse_style(value: &str) -> StyleMap {
    let mut map = StyleMap::new();
    for declaration in value.split(';') {
        if declaration.is_empty() {
            continue;
        }
        let (key, value) = declaration.split_once(':').unwrap_or((declaration, ""));
        let _ = map.insert(camel_case(key.trim()), value.trim().to_owned());
    }
    map
}

/// Camel-case a hyphenated property name.
///
/// The first letter after each `-` is upper-cased and the hyphens are
/// removed, so `font-size` becomes `fontSize` and `-webkit-transition`
/// becomes `WebkitTransition`. Runs of hyphens collapse.
#[must_use]
pub fn camel_case(key: &str) -> String {
    let mut parts = key.split('-');
    let mut out = parts.next().unwrap_or_default().to_owned();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// [`parse_style`] wrapped as an attribute value.
#[must_use]
pub fn style_value(value: &str) -> PropValue {
    PropValue::Style(parse_style(value))
}
