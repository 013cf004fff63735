//! Qt Linguist `.ts` file parser.
//!
//! Streams XML events into the catalog model. Text inside `<source>`,
//! `<translation>`, `<numerusform>` and the comment elements is kept
//! verbatim after entity decoding; whitespace between structural elements
//! is dropped. Unknown elements are skipped.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Catalog, Context, Location, Message, Translation, TranslationStatus};

/// Read and parse a `.ts` file from disk.
pub fn load_ts(path: &Path) -> CatalogResult<Catalog> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    parse_ts(&content)
}

/// Parse `.ts` file contents into a catalog.
pub fn parse_ts(content: &str) -> CatalogResult<Catalog> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = TsReader::new(content);
    let mut catalog = Catalog::default();

    // Prolog: declaration, doctype, comments, then the root element.
    loop {
        match reader.next()? {
            Event::Start(e) => {
                reader.expect_root(&e, &mut catalog)?;
                break;
            }
            Event::Empty(e) => {
                reader.expect_root(&e, &mut catalog)?;
                return Ok(catalog);
            }
            Event::Eof => return Err(CatalogError::UnexpectedEof { element: "TS".into() }),
            _ => {}
        }
    }

    loop {
        match reader.next()? {
            Event::Start(e) if e.name().as_ref() == b"context" => {
                let index = catalog.contexts.len();
                catalog.contexts.push(reader.parse_context(index)?);
            }
            Event::Start(e) => reader.skip(&e)?,
            Event::End(_) => break,
            Event::Eof => return Err(CatalogError::UnexpectedEof { element: "TS".into() }),
            _ => {}
        }
    }

    Ok(catalog)
}

/// Thin wrapper over the quick-xml reader with TS-specific helpers.
struct TsReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> TsReader<'a> {
    fn new(content: &'a str) -> Self {
        let mut reader = Reader::from_str(content);
        reader.trim_text(false);
        Self { reader }
    }

    fn next(&mut self) -> CatalogResult<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|e| CatalogError::xml(self.reader.buffer_position(), e))
    }

    /// Skip an element and all of its children.
    fn skip(&mut self, start: &BytesStart<'_>) -> CatalogResult<()> {
        self.reader
            .read_to_end(start.name())
            .map(|_| ())
            .map_err(|e| CatalogError::xml(self.reader.buffer_position(), e))
    }

    fn attribute(&self, element: &BytesStart<'_>, name: &str) -> CatalogResult<Option<String>> {
        let position = self.reader.buffer_position();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| CatalogError::xml(position, e))?;
            if attr.key.as_ref() == name.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|e| CatalogError::xml(position, e))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn expect_root(&self, element: &BytesStart<'_>, catalog: &mut Catalog) -> CatalogResult<()> {
        if element.name().as_ref() != b"TS" {
            return Err(CatalogError::UnexpectedRoot {
                found: String::from_utf8_lossy(element.name().as_ref()).into_owned(),
            });
        }
        if let Some(version) = self.attribute(element, "version")? {
            catalog.version = version;
        }
        catalog.language = self.attribute(element, "language")?.unwrap_or_default();
        catalog.source_language = self.attribute(element, "sourcelanguage")?;
        Ok(())
    }

    /// Read character data up to `</tag>`.
    fn read_text(&mut self, tag: &str) -> CatalogResult<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => {
                    let decoded = t
                        .unescape()
                        .map_err(|e| CatalogError::xml(self.reader.buffer_position(), e))?;
                    text.push_str(&decoded);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    if let Some(ch) = self.byte_char(&e)? {
                        text.push(ch);
                    }
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(CatalogError::UnexpectedEof { element: tag.into() }),
                _ => {}
            }
        }
    }

    /// Decode a `<byte value="x1b"/>` element (hex with `x`/`0x`, else decimal).
    fn byte_char(&self, element: &BytesStart<'_>) -> CatalogResult<Option<char>> {
        let value = self.attribute(element, "value")?.unwrap_or_default();
        let parsed = if let Some(hex) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix('x'))
        {
            u32::from_str_radix(hex, 16)
        } else {
            value.parse::<u32>()
        };
        let Ok(code) = parsed else {
            return Err(CatalogError::invalid_attribute("byte", "value", value));
        };
        if code == 0 {
            return Ok(None);
        }
        char::from_u32(code)
            .map(Some)
            .ok_or_else(|| CatalogError::invalid_attribute("byte", "value", value))
    }

    fn parse_context(&mut self, index: usize) -> CatalogResult<Context> {
        let mut name: Option<String> = None;
        let mut messages = Vec::new();

        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"name" => name = Some(self.read_text("name")?),
                    b"message" => {
                        let context = name.as_deref().unwrap_or_default();
                        let message = self.parse_message(&e, context, messages.len())?;
                        messages.push(message);
                    }
                    _ => self.skip(&e)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(CatalogError::UnexpectedEof {
                        element: "context".into(),
                    });
                }
                _ => {}
            }
        }

        let name = name.ok_or(CatalogError::MissingContextName { index })?;
        Ok(Context { name, messages })
    }

    fn parse_message(
        &mut self,
        start: &BytesStart<'_>,
        context: &str,
        index: usize,
    ) -> CatalogResult<Message> {
        let numerus = self.attribute(start, "numerus")?.as_deref() == Some("yes");
        let mut message = Message {
            id: self.attribute(start, "id")?,
            // A message without <translation> has never been translated.
            status: TranslationStatus::Unfinished,
            translation: if numerus {
                Translation::Numerus(Vec::new())
            } else {
                Translation::default()
            },
            ..Default::default()
        };
        let mut source: Option<String> = None;

        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"source" => source = Some(self.read_text("source")?),
                    b"oldsource" => message.old_source = Some(self.read_text("oldsource")?),
                    b"comment" => message.comment = Some(self.read_text("comment")?),
                    b"extracomment" => {
                        message.extra_comment = Some(self.read_text("extracomment")?);
                    }
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.read_text("translatorcomment")?);
                    }
                    b"location" => {
                        message.locations.push(self.location(&e)?);
                        self.skip(&e)?;
                    }
                    b"translation" => {
                        message.status = self
                            .attribute(&e, "type")?
                            .unwrap_or_default()
                            .parse()?;
                        message.translation = self.parse_translation(numerus, context, source.as_deref())?;
                    }
                    _ => self.skip(&e)?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"location" => message.locations.push(self.location(&e)?),
                    b"translation" => {
                        message.status = self
                            .attribute(&e, "type")?
                            .unwrap_or_default()
                            .parse()?;
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(CatalogError::UnexpectedEof {
                        element: "message".into(),
                    });
                }
                _ => {}
            }
        }

        message.source = source.ok_or_else(|| CatalogError::MissingSource {
            context: context.to_string(),
            index,
        })?;
        Ok(message)
    }

    fn location(&self, element: &BytesStart<'_>) -> CatalogResult<Location> {
        Ok(Location {
            filename: self.attribute(element, "filename")?,
            line: self.attribute(element, "line")?,
        })
    }

    /// Parse a `<translation>` body: plain text, or numerus forms.
    fn parse_translation(
        &mut self,
        numerus: bool,
        context: &str,
        source: Option<&str>,
    ) -> CatalogResult<Translation> {
        let mut text = String::new();
        let mut forms = Vec::new();

        loop {
            match self.next()? {
                Event::Text(t) => {
                    let decoded = t
                        .unescape()
                        .map_err(|e| CatalogError::xml(self.reader.buffer_position(), e))?;
                    text.push_str(&decoded);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(self.read_text("numerusform")?);
                }
                Event::Empty(e) => match e.name().as_ref() {
                    b"numerusform" => forms.push(String::new()),
                    b"byte" => {
                        if let Some(ch) = self.byte_char(&e)? {
                            text.push(ch);
                        }
                    }
                    _ => {}
                },
                // <lengthvariant> and friends are not modelled.
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => break,
                Event::Eof => {
                    return Err(CatalogError::UnexpectedEof {
                        element: "translation".into(),
                    });
                }
                _ => {}
            }
        }

        if numerus {
            if forms.is_empty() && !text.trim().is_empty() {
                forms.push(text);
            }
            Ok(Translation::Numerus(forms))
        } else if !forms.is_empty() {
            Err(CatalogError::UnexpectedNumerus {
                context: context.to_string(),
                source_text: source.unwrap_or_default().to_string(),
            })
        } else {
            Ok(Translation::Single(text))
        }
    }
}
