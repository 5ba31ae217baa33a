//! Defines the [`Document`] type: the parsed markup tree of the blog export,
//! held as an arena of owned [`quick_xml`] events. The arena is owned by the
//! build run and outlives every posting derived from it; downstream
//! components refer into it with non-owning, index-based [`Span`]s.

use std::fmt;
use std::io::Cursor;

use quick_xml::events::{BytesRef, Event};
use quick_xml::{Reader, Writer};

/// HTML void elements are emitted by the reader as `Start` events with no
/// matching `End`. Depth bookkeeping must treat them as self-contained or a
/// single `<br>` would skew every boundary after it.
const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input",
    b"link", b"meta", b"source", b"track", b"wbr",
];

/// Returns whether `name` is an HTML void element (case-insensitive).
pub fn is_void(name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// A non-owning reference to a contiguous run of events in a [`Document`]
/// arena: `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The parsed markup tree, read once per build run and immutable thereafter.
pub struct Document {
    events: Vec<Event<'static>>,
}

impl Document {
    /// Parses source text into an event arena. The reader is configured the
    /// way real-world exports require: text untrimmed, well-formedness
    /// checks off, bare ampersands tolerated.
    pub fn parse(source: &str) -> Result<Document> {
        let mut reader = Reader::from_reader(source.as_bytes());
        reader.config_mut().trim_text(false);
        reader.config_mut().enable_all_checks(false);
        reader.config_mut().allow_dangling_amp = true;

        let mut events = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => events.push(event.into_owned()),
                Err(err) => {
                    return Err(Error::Parse {
                        position: reader.error_position(),
                        err,
                    })
                }
            }
        }
        Ok(Document { events })
    }

    /// The full extent of the arena.
    pub fn all(&self) -> Span {
        Span {
            start: 0,
            end: self.events.len(),
        }
    }

    /// The events referenced by `span`.
    pub fn events(&self, span: Span) -> &[Event<'static>] {
        &self.events[span.start..span.end]
    }

    /// The inner span of the document's `<head>` element, shared by every
    /// posting rendered from this document. `None` when the export carries
    /// no head at all; an empty `<head/>` yields an empty span.
    pub fn head(&self) -> Option<Span> {
        for (at, event) in self.events.iter().enumerate() {
            match event {
                Event::Start(elem)
                    if elem.name().as_ref().eq_ignore_ascii_case(b"head") =>
                {
                    let end = self
                        .matching_end(at, b"head")
                        .unwrap_or(self.events.len());
                    return Some(Span {
                        start: at + 1,
                        end,
                    });
                }
                Event::Empty(elem)
                    if elem.name().as_ref().eq_ignore_ascii_case(b"head") =>
                {
                    return Some(Span {
                        start: at + 1,
                        end: at + 1,
                    });
                }
                _ => {}
            }
        }
        None
    }

    /// Finds the index of the `End` event closing the element whose `Start`
    /// event sits at `start`, accounting for nested elements of the same
    /// name. `None` when the element is never closed.
    pub fn matching_end(&self, start: usize, name: &[u8]) -> Option<usize> {
        let mut nested = 0usize;
        for (at, event) in self.events.iter().enumerate().skip(start + 1) {
            match event {
                Event::Start(elem)
                    if elem.name().as_ref().eq_ignore_ascii_case(name)
                        && !is_void(name) =>
                {
                    nested += 1;
                }
                Event::End(elem)
                    if elem.name().as_ref().eq_ignore_ascii_case(name) =>
                {
                    if nested == 0 {
                        return Some(at);
                    }
                    nested -= 1;
                }
                _ => {}
            }
        }
        None
    }

    /// The concatenated, decoded text of every text node in `span`.
    pub fn text(&self, span: Span) -> String {
        let mut out = String::new();
        for event in self.events(span) {
            match event {
                Event::Text(text) => match text.xml_content() {
                    Ok(content) => out.push_str(&content),
                    Err(_) => out.push_str(&String::from_utf8_lossy(text)),
                },
                Event::CData(cdata) => {
                    out.push_str(&String::from_utf8_lossy(cdata));
                }
                Event::GeneralRef(general_ref) => {
                    if let Some(ch) = resolve_entity(general_ref) {
                        out.push(ch);
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Whether `span` holds anything that counts as posting content: an
    /// element, a CDATA section, or non-whitespace text. Comments and
    /// whitespace-only text nodes between siblings do not count.
    pub fn has_content(&self, span: Span) -> bool {
        self.events(span).iter().any(|event| match event {
            Event::Start(_) | Event::Empty(_) | Event::CData(_) => true,
            Event::GeneralRef(_) => true,
            Event::Text(text) => match text.xml_content() {
                Ok(content) => !content.trim().is_empty(),
                Err(_) => true,
            },
            _ => false,
        })
    }

    /// Serializes `span` back to markup text by round-tripping its events
    /// through a writer.
    pub fn serialize(&self, span: Span) -> String {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        for event in self.events(span) {
            writer
                .write_event(event.clone())
                .expect("writing to an in-memory buffer cannot fail");
        }
        String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned()
    }

    /// The concatenated text of every `<style>` element inside `span`. Used
    /// by the front-matter renderer to lift the export's style rules into an
    /// inline `<style>` element.
    pub fn style_rules(&self, span: Span) -> String {
        let mut out = String::new();
        let mut at = span.start;
        while at < span.end {
            if let Event::Start(elem) = &self.events[at] {
                if elem.name().as_ref().eq_ignore_ascii_case(b"style") {
                    let end = self
                        .matching_end(at, b"style")
                        .unwrap_or(span.end)
                        .min(span.end);
                    out.push_str(&self.text(Span {
                        start: at + 1,
                        end,
                    }));
                    at = end;
                }
            }
            at += 1;
        }
        out
    }
}

/// Resolves the predefined named entities; anything else (custom DTD
/// entities) is dropped from extracted text but still round-trips through
/// [`Document::serialize`] untouched.
fn resolve_entity(general_ref: &BytesRef) -> Option<char> {
    let name: &[u8] = general_ref;
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        b"nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// Represents the result of a document-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the source text cannot be read as markup at all.
    Parse {
        position: u64,
        err: quick_xml::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse { position, err } => {
                write!(f, "parsing markup at position {}: {}", position, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse { position: _, err } => Some(err),
        }
    }
}
