//! Qt Linguist `.ts` file writer.
//!
//! Emits the layout lupdate produces, so a catalog parsed from an
//! lupdate-written file serializes back to identical bytes.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::escape::escape;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Catalog, Message, Translation};

/// Serialize a catalog into `.ts` file contents.
pub fn write_ts(catalog: &Catalog) -> String {
    let mut out = String::with_capacity(catalog.message_count() * 128);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n");

    out.push_str("<TS");
    push_attr(&mut out, "version", &catalog.version);
    if !catalog.language.is_empty() {
        push_attr(&mut out, "language", &catalog.language);
    }
    if let Some(source_language) = &catalog.source_language {
        push_attr(&mut out, "sourcelanguage", source_language);
    }
    out.push_str(">\n");

    for context in &catalog.contexts {
        out.push_str("<context>\n");
        push_element(&mut out, 4, "name", &context.name);
        for message in &context.messages {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

/// Serialize and write a catalog to disk.
pub fn save_ts(path: &Path, catalog: &Catalog) -> CatalogResult<()> {
    std::fs::write(path, write_ts(catalog)).map_err(|e| CatalogError::io(path, e))
}

fn write_message(out: &mut String, message: &Message) {
    out.push_str("    <message");
    if let Some(id) = &message.id {
        push_attr(out, "id", id);
    }
    if message.is_numerus() {
        push_attr(out, "numerus", "yes");
    }
    out.push_str(">\n");

    for location in &message.locations {
        out.push_str("        <location");
        if let Some(filename) = &location.filename {
            push_attr(out, "filename", filename);
        }
        if let Some(line) = &location.line {
            push_attr(out, "line", line);
        }
        out.push_str("/>\n");
    }

    push_element(out, 8, "source", &message.source);
    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.comment),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (tag, value) in optional {
        if let Some(value) = value {
            push_element(out, 8, tag, value);
        }
    }

    out.push_str("        <translation");
    if let Some(kind) = message.status.as_attr() {
        push_attr(out, "type", kind);
    }
    out.push('>');
    match &message.translation {
        Translation::Single(text) => out.push_str(&protect(text)),
        Translation::Numerus(forms) if forms.is_empty() => {}
        Translation::Numerus(forms) => {
            out.push('\n');
            for form in forms {
                push_element(out, 12, "numerusform", form);
            }
            out.push_str("        ");
        }
    }
    out.push_str("</translation>\n");
    out.push_str("    </message>\n");
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&protect(value));
    out.push('"');
}

fn push_element(out: &mut String, indent: usize, tag: &str, text: &str) {
    out.extend(std::iter::repeat_n(' ', indent));
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&protect(text));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

/// Escape markup characters, and encode control characters XML 1.0
/// cannot carry as `<byte>` elements.
fn protect(text: &str) -> Cow<'_, str> {
    let escaped = escape(text);
    if !escaped.chars().any(needs_byte_element) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 16);
    for ch in escaped.chars() {
        if needs_byte_element(ch) {
            out.push_str(&format!("<byte value=\"x{:x}\"/>", u32::from(ch)));
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn needs_byte_element(ch: char) -> bool {
    ch < '\u{20}' && !matches!(ch, '\t' | '\n' | '\r')
}
