//! Single forward scan that tokenizes markup and assembles the element tree.
//!
//! The builder never recurses: open elements live on an explicit stack and are
//! folded into their parent's children when they close, so nesting depth is
//! bounded only by memory.

use serde::Serialize;
use strum_macros::Display;
use trellis_tree::{
    Element, ElementType, Fragment, MetaId, MetaTree, Node, PropValue, RAW_CONTENT_KEY,
};

use crate::error::ParseError;
use crate::options::ParseOptions;
use crate::scanner::{CharClass, Scanner, is_whitespace};
use crate::segment::{Child, Processed, Segment, SegmentContext};

/// Tags that never contain children, whether or not they carry a `/`.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tag whose body is captured as an opaque payload instead of being parsed.
pub const RAW_TEXT_TAG: &str = "script";

/// Whether a case-folded tag name is a void element.
#[must_use]
pub fn is_void_tag(folded_tag: &str) -> bool {
    VOID_TAGS.contains(&folded_tag)
}

/// What the scanner is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScanState {
    /// Character data between tags.
    Text,
    /// `<name ...>`
    OpenTag,
    /// `</name>`
    CloseTag,
    /// `<!-- ... -->` or `<!DOCTYPE ...>`
    CommentOrDoctype,
    /// Body of a raw-text element.
    RawText,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed {
    /// Normalised root.
    pub root: Fragment,
    /// Metadata tree, when enabled.
    pub meta: Option<MetaTree>,
}

/// An element whose closing tag has not been seen yet.
struct OpenElement {
    /// Tag name exactly as written, matched against closing tags.
    tag: String,
    element: Element,
    meta: Option<MetaId>,
}

/// Per-call scan state. Nothing here outlives [`TreeBuilder::run`].
pub struct TreeBuilder<'a> {
    scanner: Scanner<'a>,
    options: &'a ParseOptions,
    root: Vec<Node>,
    open: Vec<OpenElement>,
    meta: Option<MetaTree>,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder for one input.
    #[must_use]
    pub fn new(markup: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(markup),
            options,
            root: Vec::new(),
            open: Vec::new(),
            meta: options.meta_enabled().then(MetaTree::new),
        }
    }

    /// Scan the whole input and return the tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMarkup`] when a required delimiter is
    /// missing, or [`ParseError::Callback`] when a collaborator fails.
    pub fn run(mut self) -> Result<Parsed, ParseError> {
        let scanner = self.scanner;
        let mut start = 0;

        while let Some(mut lt) = scanner.try_find_next(b'<', start) {
            // A bare `<` inside an unquoted value must not start a tag: take
            // the right-most `<` that still precedes the next `>`. Comments
            // and doctypes are skipped whole, markup inside them included.
            if scanner.byte_at(lt + 1) != Some(b'!') {
                let gt = scanner.find_next(b'>', lt + 1)?;
                if let Some(nested) = scanner.find_last_between(b'<', lt + 1, gt) {
                    lt = nested;
                }
            }

            if start != lt {
                self.handle_text(start, lt)?;
            }

            let state = match scanner.byte_at(lt + 1) {
                Some(b'/') => ScanState::CloseTag,
                Some(b'!') => ScanState::CommentOrDoctype,
                _ => ScanState::OpenTag,
            };
            tracing::trace!(%state, position = lt, "dispatch");

            let end = match state {
                ScanState::CloseTag => self.close_tag(lt + 2)?,
                ScanState::CommentOrDoctype => self.comment_or_doctype(lt + 2)?,
                _ => self.open_tag(lt + 1)?,
            };
            start = end + 1;
        }

        if start < scanner.len() {
            self.handle_text(start, scanner.len())?;
        }

        Ok(self.finish())
    }

    /// Children list of the innermost open element, or the root.
    fn children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(open) => &mut open.element.children,
            None => &mut self.root,
        }
    }

    /// Metadata node new children attach under. `None` when metadata is off.
    fn meta_parent(&self) -> Option<MetaId> {
        if self.meta.is_none() {
            return None;
        }
        Some(
            self.open
                .last()
                .and_then(|open| open.meta)
                .unwrap_or(MetaId::ROOT),
        )
    }

    fn handle_text(&mut self, start: usize, end: usize) -> Result<(), ParseError> {
        let raw = self.scanner.slice(start, end);
        let options = self.options;
        tracing::trace!(state = %ScanState::Text, bytes = raw.len(), "text run");

        let Some(process) = options.text_processor() else {
            self.append_segment(Segment::Text(raw.to_owned()));
            return Ok(());
        };

        let mut ctx = SegmentContext::new(self.children().len(), self.meta_parent());
        match process(raw, &mut ctx)? {
            Processed::One(segment) => self.append_segment(segment),
            Processed::Many(segments) => {
                for segment in segments {
                    self.append_segment(segment);
                }
            }
            Processed::Skip => {}
        }
        Ok(())
    }

    /// Append one processed segment, merging text into a preceding text entry.
    fn append_segment(&mut self, segment: Segment) {
        let parent = self.meta_parent();
        match segment.into_child() {
            None => {}
            Some(Child::Text(text)) => {
                let children = self.children();
                if let Some(Node::Text(previous)) = children.last_mut() {
                    previous.push_str(&text);
                    return;
                }
                children.push(Node::Text(text));
                if let (Some(tree), Some(parent)) = (self.meta.as_mut(), parent) {
                    tree.append_text_slot(parent);
                }
            }
            Some(Child::Element(mut element)) => {
                if let (Some(tree), Some(parent)) = (self.meta.as_mut(), parent) {
                    let id = tree.append_element(parent, element.kind.clone());
                    if element.kind.is_component() {
                        element.meta = id;
                    }
                }
                self.children().push(Node::Element(element));
            }
        }
    }

    fn comment_or_doctype(&self, pos: usize) -> Result<usize, ParseError> {
        let scanner = self.scanner;
        if scanner.starts_with_at(pos, b"DOCTYPE") {
            return scanner.find_next(b'>', pos + "DOCTYPE".len());
        }
        if !scanner.starts_with_at(pos, b"--") {
            return Err(ParseError::malformed("'--' or 'DOCTYPE'", pos));
        }
        Ok(scanner.find_pattern("-->", pos)? + 2)
    }

    /// Close the innermost open element named exactly `tag`, auto-closing
    /// anything opened after it. Unmatched closing tags change nothing.
    fn close_tag(&mut self, name_start: usize) -> Result<usize, ParseError> {
        let gt = self.scanner.find_next(b'>', name_start)?;
        let tag = self.scanner.slice(name_start, gt).trim();
        let Some(depth) = self.open.iter().rposition(|open| open.tag == tag) else {
            tracing::trace!(tag, position = name_start, "ignoring unmatched closing tag");
            return Ok(gt);
        };

        let unclosed = self.open.len() - depth - 1;
        if unclosed > 0 {
            tracing::debug!(tag, unclosed, "auto-closing unclosed descendants");
        }
        while self.open.len() > depth + 1 {
            if let Some(open) = self.open.pop() {
                self.append_element(open.element);
            }
        }
        if let Some(open) = self.open.pop() {
            self.complete(open)?;
        }
        Ok(gt)
    }

    fn open_tag(&mut self, pos: usize) -> Result<usize, ParseError> {
        let scanner = self.scanner;
        let options = self.options;

        let name_start = scanner.search(pos, CharClass::NonWhitespace)?;
        let mut index = scanner.search(name_start, CharClass::TagNameEnd)?;
        let tag = scanner.slice(name_start, index);
        let folded = tag.to_ascii_lowercase();

        let kind = self.resolve(tag, &folded)?;
        let key = self.children().len();
        let meta = self.open_meta(&kind);
        let mut element = Element::new(kind, key);
        if element.kind.is_component() {
            element.meta = meta;
        }

        loop {
            index = scanner.search(index, CharClass::NonWhitespace)?;
            if matches!(scanner.byte_at(index), Some(b'/' | b'>')) {
                break;
            }

            let key_start = index;
            index = scanner.search(index, CharClass::AttributeNameEnd)?;
            let name = options.rename_attribute(scanner.slice(key_start, index));

            if scanner.byte_at(index).is_some_and(is_whitespace) {
                index = scanner.search(index + 1, CharClass::NonWhitespace)?;
            }

            let raw = if scanner.byte_at(index) == Some(b'=') {
                index = scanner.search(index + 1, CharClass::NonWhitespace)?;
                if let Some(quote @ (b'"' | b'\'')) = scanner.byte_at(index) {
                    let close = scanner.find_next(quote, index + 1)?;
                    let value = scanner.slice(index + 1, close);
                    index = close + 1;
                    value
                } else {
                    let close = scanner.search(index, CharClass::TagNameEnd)?;
                    let value = scanner.slice(index, close);
                    index = close;
                    value
                }
            } else {
                "true"
            };

            let value = match options.converter_for(name) {
                Some(convert) => convert(raw, tag)?,
                None => PropValue::from(raw),
            };
            let _ = element.props.insert(name.to_owned(), value);
        }

        // A self-closing `/` is consumed and otherwise ignored.
        if scanner.byte_at(index) == Some(b'/') {
            index += 1;
        }
        let mut end = scanner.find_next(b'>', index)?;

        let mut open = OpenElement {
            tag: tag.to_owned(),
            element,
            meta,
        };
        if folded == RAW_TEXT_TAG {
            if let Some(close_gt) = self.capture_raw_text(&mut open.element, end + 1) {
                end = close_gt;
            }
            self.complete(open)?;
        } else if is_void_tag(&folded) {
            self.complete(open)?;
        } else {
            self.open.push(open);
        }
        Ok(end)
    }

    /// Capture everything up to the next raw-text closing tag, unless another
    /// raw-text opening tag comes first. Returns the position of the closing
    /// tag's `>` when the payload was taken.
    fn capture_raw_text(&self, element: &mut Element, body_start: usize) -> Option<usize> {
        let scanner = self.scanner;
        let (close_start, close_end) =
            scanner.find_bare_tag(RAW_TEXT_TAG, true, body_start, scanner.len())?;
        if scanner
            .find_bare_tag(RAW_TEXT_TAG, false, body_start, close_start)
            .is_some()
        {
            return None;
        }

        let payload = scanner.slice(body_start, close_start);
        if !payload.is_empty() {
            tracing::trace!(state = %ScanState::RawText, bytes = payload.len(), "captured raw text");
            let _ = element
                .props
                .insert(RAW_CONTENT_KEY.to_owned(), PropValue::raw_content(payload));
        }
        Some(close_end - 1)
    }

    /// Static map first (case-insensitive), then the fallback resolver with
    /// the original-case name, then the tag name itself.
    fn resolve(&self, tag: &str, folded: &str) -> Result<ElementType, ParseError> {
        let options = self.options;
        if let Some(kind) = options.lookup_component(folded) {
            return Ok(kind.clone());
        }
        if let Some(fallback) = options.component_resolver()
            && let Some(kind) = fallback(tag)?
        {
            return Ok(kind);
        }
        Ok(ElementType::Tag(tag.to_owned()))
    }

    fn open_meta(&mut self, kind: &ElementType) -> Option<MetaId> {
        let parent = self.meta_parent()?;
        self.meta.as_mut()?.append_element(parent, kind.clone())
    }

    fn append_element(&mut self, element: Element) {
        self.children().push(Node::Element(element));
    }

    /// Run the ignore predicate on a finished element, then either attach it
    /// to its parent or drop it together with its metadata.
    fn complete(&mut self, open: OpenElement) -> Result<(), ParseError> {
        let options = self.options;
        let OpenElement { tag, element, meta } = open;

        if let Some(ignore) = options.ignore_predicate()
            && ignore(tag.as_str(), &element.props)?
        {
            tracing::debug!(tag = %tag, key = element.key, "discarding element");
            if let (Some(tree), Some(id)) = (self.meta.as_mut(), meta) {
                tree.discard_subtree(id);
            }
            return Ok(());
        }

        self.append_element(element);
        Ok(())
    }

    /// Fold still-open elements into their parents and normalise the root.
    fn finish(mut self) -> Parsed {
        while let Some(open) = self.open.pop() {
            self.append_element(open.element);
        }
        let root = Fragment::from_nodes(self.root);
        tracing::debug!(nodes = root.len(), "parse finished");
        Parsed {
            root,
            meta: self.meta,
        }
    }
}
