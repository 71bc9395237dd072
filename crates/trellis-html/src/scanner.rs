//! Scanning primitives over the markup input.
//!
//! Every search returns the first position at or after its starting offset and
//! fails with [`ParseError::MalformedMarkup`] when the input ends first. Byte
//! searches go through `memchr`; all delimiters are ASCII, so every position
//! returned is a valid `str` boundary.

use memchr::{memchr, memmem, memrchr};

use crate::error::ParseError;

/// ASCII whitespace as the scanner understands it: space, tab, line feed,
/// carriage return, vertical tab and form feed.
pub(crate) const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Byte classes the scanner can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Anything but whitespace.
    NonWhitespace,
    /// Whitespace, `>` or `/`: ends a tag name or an unquoted value.
    TagNameEnd,
    /// Whitespace, `=`, `>` or `/`: ends an attribute key.
    AttributeNameEnd,
}

impl CharClass {
    const fn matches(self, byte: u8) -> bool {
        match self {
            Self::NonWhitespace => !is_whitespace(byte),
            Self::TagNameEnd => is_whitespace(byte) || matches!(byte, b'>' | b'/'),
            Self::AttributeNameEnd => is_whitespace(byte) || matches!(byte, b'=' | b'>' | b'/'),
        }
    }

    const fn expected(self) -> &'static str {
        match self {
            Self::NonWhitespace => "a non-whitespace character",
            Self::TagNameEnd => "whitespace, '>' or '/'",
            Self::AttributeNameEnd => "whitespace, '=', '>' or '/'",
        }
    }
}

const fn describe(byte: u8) -> &'static str {
    match byte {
        b'>' => "'>'",
        b'<' => "'<'",
        b'"' => "a closing '\"'",
        b'\'' => "a closing \"'\"",
        _ => "a delimiter",
    }
}

/// Read-only view of the input with the search primitives.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanner<'a> {
    input: &'a str,
}

impl<'a> Scanner<'a> {
    pub(crate) const fn new(input: &'a str) -> Self {
        Self { input }
    }

    pub(crate) const fn len(&self) -> usize {
        self.input.len()
    }

    fn bytes_from(&self, from: usize) -> &'a [u8] {
        self.input.as_bytes().get(from..).unwrap_or_default()
    }

    /// Byte at `pos`, if any.
    pub(crate) fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    /// Whether the input continues with `pattern` at `pos`.
    pub(crate) fn starts_with_at(&self, pos: usize, pattern: &[u8]) -> bool {
        self.bytes_from(pos).starts_with(pattern)
    }

    /// Substring between two positions previously returned by a search.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }

    /// First occurrence of `needle` at or after `from`, if any.
    pub(crate) fn try_find_next(&self, needle: u8, from: usize) -> Option<usize> {
        memchr(needle, self.bytes_from(from)).map(|offset| from + offset)
    }

    /// First occurrence of `needle` at or after `from`.
    pub(crate) fn find_next(&self, needle: u8, from: usize) -> Result<usize, ParseError> {
        self.try_find_next(needle, from)
            .ok_or_else(|| ParseError::malformed(describe(needle), from))
    }

    /// Right-most occurrence of `needle` in `start..end`.
    pub(crate) fn find_last_between(&self, needle: u8, start: usize, end: usize) -> Option<usize> {
        let haystack = self.input.as_bytes().get(start..end)?;
        memrchr(needle, haystack).map(|offset| start + offset)
    }

    /// First occurrence of `pattern` at or after `from`.
    pub(crate) fn find_pattern(
        &self,
        pattern: &'static str,
        from: usize,
    ) -> Result<usize, ParseError> {
        memmem::find(self.bytes_from(from), pattern.as_bytes())
            .map(|offset| from + offset)
            .ok_or_else(|| ParseError::malformed(pattern, from))
    }

    /// First byte at or after `from` that belongs to `class`.
    pub(crate) fn search(&self, from: usize, class: CharClass) -> Result<usize, ParseError> {
        self.bytes_from(from)
            .iter()
            .position(|&byte| class.matches(byte))
            .map(|offset| from + offset)
            .ok_or_else(|| ParseError::malformed(class.expected(), from))
    }

    fn skip_whitespace(&self, from: usize) -> usize {
        let rest = self.bytes_from(from);
        from + rest.iter().take_while(|&&byte| is_whitespace(byte)).count()
    }

    /// Find a `<name>` (or `</name>` when `closing`) tag that starts in
    /// `from..limit`, tolerating whitespace around the name and ignoring ASCII
    /// case. Returns the tag's start and the position just past its `>`.
    pub(crate) fn find_bare_tag(
        &self,
        name: &str,
        closing: bool,
        from: usize,
        limit: usize,
    ) -> Option<(usize, usize)> {
        let limit = limit.min(self.len());
        let mut pos = from;
        while pos < limit {
            let haystack = self.input.as_bytes().get(pos..limit)?;
            let start = pos + memchr(b'<', haystack)?;
            if let Some(end) = self.match_bare_tag(start + 1, name, closing) {
                return Some((start, end));
            }
            pos = start + 1;
        }
        None
    }

    fn match_bare_tag(&self, mut pos: usize, name: &str, closing: bool) -> Option<usize> {
        if closing {
            if self.byte_at(pos) != Some(b'/') {
                return None;
            }
            pos += 1;
        }
        pos = self.skip_whitespace(pos);
        let candidate = self.input.as_bytes().get(pos..pos + name.len())?;
        if !candidate.eq_ignore_ascii_case(name.as_bytes()) {
            return None;
        }
        pos = self.skip_whitespace(pos + name.len());
        (self.byte_at(pos) == Some(b'>')).then_some(pos + 1)
    }
}
