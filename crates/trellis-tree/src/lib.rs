//! Element tree produced by the trellis markup builder.
//!
//! This crate holds the output side of a parse:
//! - **Element tree** - [`Element`], [`Node`] and the normalised root [`Fragment`]
//! - **Attribute values** - [`PropValue`] and the [`Props`] map
//! - **Metadata tree** - an arena of [`MetaNode`]s addressed by [`MetaId`]
//!
//! # Design
//!
//! Element and text nodes own their children directly. The metadata tree is a
//! separate arena that only records structural facts (type, sibling index,
//! parent) and never owns element or text nodes; elements point into it through
//! their side-channel [`Element::meta`] field.

/// Metadata arena mirroring the element tree.
pub mod meta;
/// Element, text and root node types.
pub mod node;
/// Text dump of a parsed tree.
pub mod print;
/// Attribute value types.
pub mod value;

pub use meta::{MetaId, MetaNode, MetaTree};
pub use node::{ComponentRef, Element, ElementType, Fragment, Node};
pub use print::{print_tree, write_tree};
pub use value::{PropValue, Props, RAW_CONTENT_KEY, StyleMap};
