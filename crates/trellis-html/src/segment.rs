//! Values a text segment processor hands back, and the rules that turn them
//! into children.
//!
//! Empty strings, booleans, `Null` and `NaN` are dropped; the number `0` is
//! kept.

use trellis_tree::{Element, MetaId};

/// One value produced by a text segment processor.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A string. Empty strings are dropped.
    Text(String),
    /// A number, appended in its canonical string form. `0` is kept; `NaN`
    /// is dropped.
    Number(f64),
    /// A boolean. Both values are dropped.
    Bool(bool),
    /// Nothing. Always dropped.
    Null,
    /// A composite node, appended as its own child.
    Node(Element),
}

/// What a segment turns into once the drop rules have been applied.
pub(crate) enum Child {
    Text(String),
    Element(Element),
}

impl Segment {
    pub(crate) fn into_child(self) -> Option<Child> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(Child::Text(text)),
            Self::Number(n) if n.is_nan() => None,
            Self::Number(n) => Some(Child::Text(number_to_string(n))),
            Self::Bool(_) | Self::Null => None,
            Self::Node(element) => Some(Child::Element(element)),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Segment {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Element> for Segment {
    fn from(value: Element) -> Self {
        Self::Node(value)
    }
}

/// Canonical string form of a number: integral values print without a
/// fraction, negative zero prints as `0`, infinities as `Infinity`.
fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        "0".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else {
        n.to_string()
    }
}

/// Output of a text segment processor for one raw text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    /// A single segment.
    One(Segment),
    /// Several segments, appended in order.
    Many(Vec<Segment>),
    /// Drop the text run entirely.
    Skip,
}

impl From<Segment> for Processed {
    fn from(value: Segment) -> Self {
        Self::One(value)
    }
}

impl From<&str> for Processed {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl From<String> for Processed {
    fn from(value: String) -> Self {
        Self::One(value.into())
    }
}

impl From<Vec<Segment>> for Processed {
    fn from(value: Vec<Segment>) -> Self {
        Self::Many(value)
    }
}

/// Handle passed to a text segment processor.
///
/// Hands out child positions for composite nodes the processor creates and
/// exposes the metadata parent the run will be attached under.
#[derive(Debug)]
pub struct SegmentContext {
    next_key: usize,
    parent_meta: Option<MetaId>,
}

impl SegmentContext {
    pub(crate) const fn new(next_key: usize, parent_meta: Option<MetaId>) -> Self {
        Self {
            next_key,
            parent_meta,
        }
    }

    /// Allocate the next child position, starting at the current length of
    /// the active children list.
    pub const fn next_key(&mut self) -> usize {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    /// Metadata node of the enclosing element, or the virtual root. `None`
    /// when metadata is disabled.
    #[must_use]
    pub const fn parent_meta(&self) -> Option<MetaId> {
        self.parent_meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(segment: Segment) -> Option<String> {
        match segment.into_child()? {
            Child::Text(text) => Some(text),
            Child::Element(_) => None,
        }
    }

    #[test]
    fn test_zero_is_kept() {
        assert_eq!(text_of(Segment::Number(0.0)).as_deref(), Some("0"));
        assert_eq!(text_of(Segment::Number(-0.0)).as_deref(), Some("0"));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(text_of(Segment::Number(42.0)).as_deref(), Some("42"));
        assert_eq!(text_of(Segment::Number(0.5)).as_deref(), Some("0.5"));
        assert_eq!(
            text_of(Segment::Number(f64::NEG_INFINITY)).as_deref(),
            Some("-Infinity")
        );
        assert_eq!(text_of(Segment::Number(f64::NAN)), None);
    }

    #[test]
    fn test_falsy_sentinels_are_dropped() {
        assert!(Segment::Bool(false).into_child().is_none());
        assert!(Segment::Bool(true).into_child().is_none());
        assert!(Segment::Null.into_child().is_none());
        assert!(Segment::Text(String::new()).into_child().is_none());
    }

    #[test]
    fn test_next_key_counts_up() {
        let mut ctx = SegmentContext::new(3, None);
        assert_eq!(ctx.next_key(), 3);
        assert_eq!(ctx.next_key(), 4);
        assert_eq!(ctx.parent_meta(), None);
    }
}
