//! Single-pass, permissive markup-to-element-tree builder.
//!
//! # Scope
//!
//! This crate implements:
//! - **Scanner** - delimiter and byte-class searches that fail with
//!   [`ParseError::MalformedMarkup`] when the input runs out
//! - **Tree builder** - one forward scan that splits the input into tags,
//!   attributes, text, comments and raw-text bodies while assembling the tree
//!   on an explicit stack of open elements
//! - **Collaborators** - component resolution, attribute renaming and
//!   conversion, text segment processing and a post-hoc ignore predicate, all
//!   configured through [`ParseOptions`]
//! - **Metadata tree** - an optional structural shadow of the output
//!
//! # Not Implemented
//!
//! - Validation against any formal grammar
//! - Recovery from unterminated tags, quotes or comments
//! - Character reference decoding

/// Tree builder state machine.
pub mod builder;
/// Declarative options.
pub mod config;
/// Error types.
pub mod error;
/// Parse options and collaborator types.
pub mod options;
mod scanner;
/// Text segment processing types.
pub mod segment;

pub use builder::{Parsed, RAW_TEXT_TAG, ScanState, TreeBuilder, VOID_TAGS, is_void_tag};
pub use config::{ComponentTarget, MarkupConfig};
pub use error::{CallbackError, CallbackResult, ParseError};
pub use options::{ParseOptions, REACT_ATTRIBUTE_NAMES};
pub use segment::{Processed, Segment, SegmentContext};
pub use trellis_tree::{
    ComponentRef, Element, ElementType, Fragment, MetaId, MetaNode, MetaTree, Node, PropValue,
    Props, RAW_CONTENT_KEY,
};

/// Parse `markup` with `options`.
///
/// # Errors
///
/// Returns [`ParseError::MalformedMarkup`] when a required delimiter is
/// missing, or [`ParseError::Callback`] when a collaborator fails.
pub fn parse(markup: &str, options: &ParseOptions) -> Result<Parsed, ParseError> {
    TreeBuilder::new(markup, options).run()
}

/// Parse `markup` with default options and return only the root.
///
/// # Errors
///
/// Returns [`ParseError::MalformedMarkup`] when a required delimiter is
/// missing.
pub fn parse_fragment(markup: &str) -> Result<Fragment, ParseError> {
    parse(markup, &ParseOptions::default()).map(|parsed| parsed.root)
}
