//! Splits a parsed [`Document`] into an ordered sequence of posting
//! boundaries, one per heading of the configured level. The heading list is
//! collected up front and each boundary is computed independently from it,
//! so downstream validation can drop a candidate without shifting the
//! boundaries that follow it.

use crate::document::{is_void, Document, Span};
use quick_xml::events::Event;

/// One heading-delimited region of the document: the heading element itself,
/// every sibling node strictly between it and the next sibling heading (or
/// the close of the heading's parent), and the raw text of the heading for
/// identity derivation. Boundaries of sibling headings never overlap; a
/// heading nested deeper than the preceding one yields its own boundary
/// inside the preceding contents, as its sibling run is its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// The heading element, open tag through close tag.
    pub heading: Span,

    /// The sibling nodes following the heading, exclusive of the next
    /// sibling heading.
    pub contents: Span,

    /// The raw, decoded text of the heading node.
    pub heading_text: String,
}

/// Collects every heading of level `heading_tag` (e.g., `"h1"`) in document
/// order and maps each to a [`Boundary`]. An export with no headings yields
/// an empty sequence; the caller treats that as "no postings", not an error.
pub fn boundaries(doc: &Document, heading_tag: &str) -> Vec<Boundary> {
    let tag = heading_tag.as_bytes();

    collect_headings(doc, tag)
        .iter()
        .map(|&heading| Boundary {
            heading,
            contents: Span {
                start: heading.end,
                end: sibling_run_end(doc, heading.end, tag),
            },
            heading_text: doc.text(heading),
        })
        .collect()
}

/// Walks the arena once and records the extent of every heading of the
/// requested tag. A heading whose `End` event never arrives is recorded as
/// running to the end of the arena; its boundary will have no contents and
/// be rejected downstream.
fn collect_headings(doc: &Document, tag: &[u8]) -> Vec<Span> {
    let all = doc.all();
    let mut headings = Vec::new();

    for (at, event) in doc.events(all).iter().enumerate() {
        if let Event::Start(elem) = event {
            if elem.name().as_ref().eq_ignore_ascii_case(tag) {
                let end = doc
                    .matching_end(at, tag)
                    .map(|end| end + 1)
                    .unwrap_or(all.end);
                headings.push(Span { start: at, end });
            }
        }
    }
    headings
}

/// Finds the end-exclusive marker of the sibling run beginning at `start`:
/// the first event at the heading's own depth that is either another heading
/// of the same tag or the `End` of the enclosing element. Elements opened
/// within the run are skipped over whole, so the run always serializes to a
/// balanced fragment. Fragment documents with no enclosing element run to
/// the end of the arena.
fn sibling_run_end(doc: &Document, start: usize, tag: &[u8]) -> usize {
    let all = doc.all();
    let mut relative = 0usize;
    for (at, event) in doc.events(all).iter().enumerate().skip(start) {
        match event {
            Event::Start(elem) if !is_void(elem.name().as_ref()) => {
                if relative == 0
                    && elem.name().as_ref().eq_ignore_ascii_case(tag)
                {
                    return at;
                }
                relative += 1;
            }
            Event::End(elem) if !is_void(elem.name().as_ref()) => {
                if relative == 0 {
                    return at;
                }
                relative -= 1;
            }
            _ => {}
        }
    }
    all.end
}
