//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Byte offset index of a catalog's raw text
//!
//! The index records where each group, token, version, language entry and
//! accessible element starts and ends, without building a tree. Only the
//! `value` and `code` attributes are decoded, for matching. Offsets always
//! refer to the text passed to [`TextIndex::build`].

use std::ops::Range;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::formats::catalog::{ACCESSIBLE, CODE_ATTR, DISPLAY_ATTR, LANG, TOKEN, TWO_BYTE, VALUE_ATTR, VERSION};
use crate::types::{TokenKey, value_matches};

/// Byte span of one element.
///
/// For a self-closing element `open_end`, `close_start` and `end` coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpan {
    /// Offset of the `<` opening the start tag.
    pub start: usize,
    /// Offset just past the `>` closing the start tag.
    pub open_end: usize,
    /// Offset of the `<` opening the end tag.
    pub close_start: usize,
    /// Offset just past the end tag.
    pub end: usize,
    /// Whether the element is written as `<name/>`.
    pub self_closing: bool,
}

/// Raw (still escaped) attribute value location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpan {
    /// Value bytes, between the quotes.
    pub value: Range<usize>,
    /// The quote character delimiting the value.
    pub quote: char,
}

/// A `<lang>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangSpan {
    pub element: ElementSpan,
    /// Raw language code.
    pub code: String,
    pub code_attr: Option<AttrSpan>,
    pub display_attr: Option<AttrSpan>,
    /// First `<accessible>` child.
    pub accessible: Option<ElementSpan>,
}

/// A `<version>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpan {
    pub element: ElementSpan,
    pub langs: Vec<LangSpan>,
}

/// A `<token>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    /// Raw `value` attribute (`$HH`).
    pub value: String,
    pub element: ElementSpan,
    pub versions: Vec<VersionSpan>,
}

/// A `<two-byte>` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpan {
    pub value: String,
    pub element: ElementSpan,
    pub tokens: Vec<TokenSpan>,
}

/// Offsets of every token block in a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextIndex {
    /// Tokens that are direct children of the root.
    pub tokens: Vec<TokenSpan>,
    /// Two-byte groups with their nested tokens.
    pub groups: Vec<GroupSpan>,
}

/// Open element while scanning
enum Frame {
    Root,
    Group(GroupSpan),
    Token(TokenSpan),
    Version(VersionSpan),
    Lang(LangSpan),
    Accessible(ElementSpan),
    Other,
}

impl TextIndex {
    /// Scan `text` and record the spans of all catalog blocks
    ///
    /// # Errors
    /// Returns an error if the XML is malformed.
    pub fn build(text: &str) -> Result<Self> {
        // The reader drops a BOM without counting it
        let (body, base) = match text.strip_prefix('\u{feff}') {
            Some(rest) => (rest, text.len() - rest.len()),
            None => (text, 0),
        };

        let mut reader = Reader::from_str(body);
        reader.trim_text(false);

        let mut index = TextIndex::default();
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let event = reader.read_event().map_err(Error::XmlError)?;
            let end = reader.buffer_position();
            match event {
                Event::Start(e) => {
                    let start = tag_start(body, end);
                    let span = ElementSpan {
                        start: base + start,
                        open_end: base + end,
                        close_start: base + end,
                        end: base + end,
                        self_closing: false,
                    };
                    let frame = open_frame(stack.last(), e.name().as_ref(), &body[start..end], span);
                    stack.push(frame);
                }
                Event::Empty(e) => {
                    let start = tag_start(body, end);
                    let span = ElementSpan {
                        start: base + start,
                        open_end: base + end,
                        close_start: base + end,
                        end: base + end,
                        self_closing: true,
                    };
                    let frame = open_frame(stack.last(), e.name().as_ref(), &body[start..end], span);
                    close_frame(&mut index, &mut stack, frame);
                }
                Event::End(_) => {
                    let start = tag_start(body, end);
                    if let Some(mut frame) = stack.pop() {
                        finish_span(&mut frame, base + start, base + end);
                        close_frame(&mut index, &mut stack, frame);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(index)
    }

    /// Token block for a key.
    ///
    /// Single-byte keys only ever resolve to top-level tokens. Two-byte keys
    /// search each matching group in document order.
    #[must_use]
    pub fn locate(&self, key: TokenKey) -> Option<&TokenSpan> {
        match key.secondary {
            None => self.tokens.iter().find(|token| value_matches(&token.value, key.primary)),
            Some(secondary) => self
                .groups
                .iter()
                .filter(|group| value_matches(&group.value, key.primary))
                .find_map(|group| {
                    group.tokens.iter().find(|token| value_matches(&token.value, secondary))
                }),
        }
    }
}

/// Offset of the `<` starting the tag that ends at `end`.
///
/// Element tags cannot contain a raw `<`, so the last one before `end` is it.
fn tag_start(body: &str, end: usize) -> usize {
    body[..end].rfind('<').unwrap_or(0)
}

fn open_frame(parent: Option<&Frame>, name: &[u8], tag: &str, span: ElementSpan) -> Frame {
    let Some(parent) = parent else {
        return Frame::Root;
    };
    let attrs = scan_attributes(tag, span.start);
    let raw = |attr: &str| {
        attrs
            .iter()
            .find(|a| a.name == attr)
            .map(|a| {
                let value = &tag[a.span.value.start - span.start..a.span.value.end - span.start];
                unescape(value).map_or_else(|_| value.to_string(), |decoded| decoded.into_owned())
            })
            .unwrap_or_default()
    };
    let attr_span = |attr: &str| attrs.iter().find(|a| a.name == attr).map(|a| a.span.clone());

    match (parent, name) {
        (Frame::Root, n) if n == TWO_BYTE.as_bytes() => Frame::Group(GroupSpan {
            value: raw(VALUE_ATTR),
            element: span,
            tokens: Vec::new(),
        }),
        (Frame::Root | Frame::Group(_), n) if n == TOKEN.as_bytes() => Frame::Token(TokenSpan {
            value: raw(VALUE_ATTR),
            element: span,
            versions: Vec::new(),
        }),
        (Frame::Token(_), n) if n == VERSION.as_bytes() => Frame::Version(VersionSpan {
            element: span,
            langs: Vec::new(),
        }),
        (Frame::Version(_), n) if n == LANG.as_bytes() => Frame::Lang(LangSpan {
            element: span,
            code: raw(CODE_ATTR),
            code_attr: attr_span(CODE_ATTR),
            display_attr: attr_span(DISPLAY_ATTR),
            accessible: None,
        }),
        (Frame::Lang(lang), n) if n == ACCESSIBLE.as_bytes() && lang.accessible.is_none() => {
            Frame::Accessible(span)
        }
        _ => Frame::Other,
    }
}

fn finish_span(frame: &mut Frame, close_start: usize, end: usize) {
    let span = match frame {
        Frame::Group(group) => &mut group.element,
        Frame::Token(token) => &mut token.element,
        Frame::Version(version) => &mut version.element,
        Frame::Lang(lang) => &mut lang.element,
        Frame::Accessible(span) => span,
        Frame::Root | Frame::Other => return,
    };
    span.close_start = close_start;
    span.end = end;
}

fn close_frame(index: &mut TextIndex, stack: &mut [Frame], frame: Frame) {
    match (stack.last_mut(), frame) {
        (Some(Frame::Root), Frame::Group(group)) => index.groups.push(group),
        (Some(Frame::Root), Frame::Token(token)) => index.tokens.push(token),
        (Some(Frame::Group(group)), Frame::Token(token)) => group.tokens.push(token),
        (Some(Frame::Token(token)), Frame::Version(version)) => token.versions.push(version),
        (Some(Frame::Version(version)), Frame::Lang(lang)) => version.langs.push(lang),
        (Some(Frame::Lang(lang)), Frame::Accessible(span)) => lang.accessible = Some(span),
        _ => {}
    }
}

/// Attribute found in a raw start tag
struct RawAttribute<'a> {
    name: &'a str,
    span: AttrSpan,
}

/// Locate attribute values in a raw start tag, offsets shifted by `offset`
fn scan_attributes(tag: &str, offset: usize) -> Vec<RawAttribute<'_>> {
    let bytes = tag.as_bytes();
    let len = bytes.len();
    let is_space = |b: u8| b.is_ascii_whitespace();
    let mut attrs = Vec::new();

    // Skip '<' and the element name
    let mut i = 1;
    while i < len && !is_space(bytes[i]) && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }

    loop {
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        if i >= len || bytes[i] == b'>' || bytes[i] == b'/' {
            break;
        }

        let name_start = i;
        while i < len && !is_space(bytes[i]) && !matches!(bytes[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let name = &tag[name_start..i];

        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        if i >= len || bytes[i] != b'=' {
            continue;
        }
        i += 1;
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        if i >= len || !matches!(bytes[i], b'"' | b'\'') {
            break;
        }

        let quote = bytes[i];
        i += 1;
        let value_start = i;
        while i < len && bytes[i] != quote {
            i += 1;
        }
        attrs.push(RawAttribute {
            name,
            span: AttrSpan {
                value: offset + value_start..offset + i,
                quote: char::from(quote),
            },
        });
        i += 1;
    }

    attrs
}
