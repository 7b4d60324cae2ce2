//! Surgical catalog patching
//!
//! Every addition and update becomes a [`TextEdit`] computed against the same
//! untouched text. The edits are sorted and applied in a single forward pass,
//! so no edit ever sees offsets shifted by another one. Bytes outside the
//! edits are copied verbatim.

use std::ops::Range;

use super::escape::{escape_attribute, escape_attribute_single_quoted, escape_text};
use super::index::{AttrSpan, ElementSpan, LangSpan, TextIndex, TokenSpan};
use crate::error::{Error, Result};
use crate::formats::catalog::{ACCESSIBLE, CODE_ATTR, DISPLAY_ATTR, LANG, TOKEN, VERSION};
use crate::merge::EditPlan;
use crate::settings::CatalogSettings;
use crate::types::TokenKey;

/// Replacement of `start..end` (an insertion when both are equal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    #[must_use]
    pub fn insert(at: usize, text: String) -> Self {
        Self { start: at, end: at, replacement: text }
    }

    #[must_use]
    pub fn replace(range: Range<usize>, text: String) -> Self {
        Self { start: range.start, end: range.end, replacement: text }
    }
}

/// Patched text and what went into it
#[derive(Debug, Clone)]
pub struct PatchReport {
    /// The complete output text.
    pub text: String,
    /// Number of entries inserted.
    pub additions: usize,
    /// Number of entries rewritten.
    pub updates: usize,
    /// Planned keys whose block (or entry, for updates) is not in the text.
    pub unlocated: Vec<TokenKey>,
}

/// Apply an edit plan to the raw catalog text
///
/// # Errors
/// Returns an error if the text is not well-formed XML or if two edits
/// would touch the same bytes.
pub fn patch_catalog(text: &str, plan: &EditPlan, settings: &CatalogSettings) -> Result<PatchReport> {
    let mut report = PatchReport {
        text: String::new(),
        additions: 0,
        updates: 0,
        unlocated: Vec::new(),
    };
    if plan.is_empty() {
        report.text = text.to_string();
        return Ok(report);
    }

    let index = TextIndex::build(text)?;
    let layout = Layout::detect(text, settings);
    let mut edits = Vec::with_capacity(plan.additions.len() + plan.updates.len() * 2);

    for addition in &plan.additions {
        let Some(token) = index.locate(addition.key) else {
            tracing::warn!("No token block for {} in catalog text", addition.key);
            report.unlocated.push(addition.key);
            continue;
        };
        let fragment = entry_fragment(&settings.target_language, &addition.text);
        edits.push(addition_edit(text, token, &fragment, &layout));
        report.additions += 1;
    }

    for update in &plan.updates {
        let lang = index
            .locate(update.key)
            .and_then(|token| first_entry(token, &settings.target_language));
        let Some(lang) = lang else {
            tracing::warn!("No {} entry for {} in catalog text", settings.target_language, update.key);
            report.unlocated.push(update.key);
            continue;
        };
        update_edits(lang, &update.text, &mut edits);
        report.updates += 1;
    }

    report.text = apply_edits(text, edits)?;
    Ok(report)
}

/// Apply non-overlapping edits in one pass
///
/// # Errors
/// Returns [`Error::OverlappingEdits`] if two edits share bytes.
pub fn apply_edits(text: &str, mut edits: Vec<TextEdit>) -> Result<String> {
    // Stable sort keeps insertions at the same offset in plan order
    edits.sort_by_key(|edit| (edit.start, edit.end));

    for pair in edits.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(Error::OverlappingEdits {
                first: pair[0].start,
                second: pair[1].start,
            });
        }
    }

    let added: usize = edits.iter().map(|edit| edit.replacement.len()).sum();
    let mut out = String::with_capacity(text.len() + added);
    let mut cursor = 0;
    for edit in &edits {
        out.push_str(&text[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&text[cursor..]);

    Ok(out)
}

/// Line ending and fallback indentation of the document
struct Layout<'a> {
    newline: &'static str,
    indent_unit: &'a str,
}

impl<'a> Layout<'a> {
    fn detect(text: &str, settings: &'a CatalogSettings) -> Self {
        Self {
            newline: if text.contains("\r\n") { "\r\n" } else { "\n" },
            indent_unit: &settings.indent_unit,
        }
    }
}

/// New `<lang>` entry, on one line
fn entry_fragment(language: &str, value: &str) -> String {
    format!(
        "<{LANG} {CODE_ATTR}=\"{}\" {DISPLAY_ATTR}=\"{}\"><{ACCESSIBLE}>{}</{ACCESSIBLE}></{LANG}>",
        escape_attribute(language),
        escape_attribute(value),
        escape_text(value),
    )
}

fn addition_edit(text: &str, token: &TokenSpan, fragment: &str, layout: &Layout<'_>) -> TextEdit {
    let unit = indent_unit(text, token, layout);

    match token.versions.last() {
        Some(version) => {
            let indent = version
                .langs
                .iter()
                .find_map(|lang| line_indent(text, lang.element.start))
                .map(str::to_string)
                .unwrap_or_else(|| {
                    let base = line_indent(text, version.element.start).unwrap_or(layout.indent_unit);
                    format!("{base}{unit}")
                });
            insert_into(text, &version.element, VERSION, &indent, fragment, layout)
        }
        None => {
            let base = if token.element.self_closing {
                line_indent(text, token.element.start)
            } else {
                line_indent(text, token.element.close_start)
            };
            let indent = format!("{}{unit}", base.unwrap_or(""));
            insert_into(text, &token.element, TOKEN, &indent, fragment, layout)
        }
    }
}

/// Indentation step between a token and its versions, when both start lines
fn indent_unit<'t>(text: &'t str, token: &TokenSpan, layout: &Layout<'t>) -> &'t str {
    let token_indent = line_indent(text, token.element.start);
    let version_indent = token
        .versions
        .first()
        .and_then(|version| line_indent(text, version.element.start));
    match (token_indent, version_indent) {
        (Some(outer), Some(inner)) if inner.len() > outer.len() && inner.starts_with(outer) => {
            &inner[outer.len()..]
        }
        _ => layout.indent_unit,
    }
}

/// Insert `fragment` as the last child of `element`
fn insert_into(
    text: &str,
    element: &ElementSpan,
    name: &str,
    indent: &str,
    fragment: &str,
    layout: &Layout<'_>,
) -> TextEdit {
    let newline = layout.newline;

    if element.self_closing {
        let open = text[element.start..element.end]
            .strip_suffix("/>")
            .unwrap_or(&text[element.start..element.end])
            .trim_end();
        let replacement = match line_indent(text, element.start) {
            Some(outer) => format!("{open}>{newline}{indent}{fragment}{newline}{outer}</{name}>"),
            None => format!("{open}>{fragment}</{name}>"),
        };
        return TextEdit::replace(element.start..element.end, replacement);
    }

    match line_indent(text, element.close_start) {
        // Closing tag on its own line: add a whole line above it
        Some(prefix) => {
            TextEdit::insert(element.close_start - prefix.len(), format!("{indent}{fragment}{newline}"))
        }
        None => TextEdit::insert(element.close_start, format!("{newline}{indent}{fragment}")),
    }
}

/// Whitespace preceding `pos` on its line, if nothing else precedes it
fn line_indent(text: &str, pos: usize) -> Option<&str> {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &text[line_start..pos];
    if prefix.bytes().all(|b| b == b' ' || b == b'\t') {
        Some(prefix)
    } else {
        None
    }
}

fn first_entry<'i>(token: &'i TokenSpan, language: &str) -> Option<&'i LangSpan> {
    token
        .versions
        .iter()
        .flat_map(|version| version.langs.iter())
        .find(|lang| lang.code.eq_ignore_ascii_case(language))
}

fn update_edits(lang: &LangSpan, value: &str, edits: &mut Vec<TextEdit>) {
    match &lang.display_attr {
        Some(AttrSpan { value: range, quote }) => {
            let escaped = if *quote == '\'' {
                escape_attribute_single_quoted(value)
            } else {
                escape_attribute(value)
            };
            edits.push(TextEdit::replace(range.clone(), escaped));
        }
        None => {
            // Place the missing display right after the code attribute
            let at = lang
                .code_attr
                .as_ref()
                .map_or(lang.element.start + 1 + LANG.len(), |code| code.value.end + 1);
            edits.push(TextEdit::insert(at, format!(" {DISPLAY_ATTR}=\"{}\"", escape_attribute(value))));
        }
    }

    if let Some(accessible) = lang.accessible {
        let text = escape_text(value);
        if accessible.self_closing {
            edits.push(TextEdit::replace(
                accessible.start..accessible.end,
                format!("<{ACCESSIBLE}>{text}</{ACCESSIBLE}>"),
            ));
        } else {
            edits.push(TextEdit::replace(accessible.open_end..accessible.close_start, text));
        }
    }
}
