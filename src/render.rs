//! Turns a validated [`Posting`] into output text. The two interchangeable
//! strategies--template splicing for standalone HTML, front matter for a
//! static-site generator--are a tagged variant selected once per build run.
//! Rendering is a pure, total function of its inputs: it shares no mutable
//! state between postings and never fails for a valid posting, so the
//! orchestrator is free to render independent postings concurrently.

use std::io::Cursor;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Writer;

use crate::document::{Document, Span};
use crate::posting::Posting;
use crate::sanitize;
use crate::template::Template;

/// The rendering strategy for a build run.
pub enum Renderer<'a> {
    /// Splices the posting into a page [`Template`] as a standalone HTML
    /// document.
    Standalone(&'a Template),

    /// Emits front-matter-annotated content for a static-site generator,
    /// with the export's style rules sanitized and inlined.
    FrontMatter,
}

impl Renderer<'_> {
    /// Renders one posting. `head` is the shared inner span of the export's
    /// `<head>` element, if the export has one.
    pub fn render(
        &self,
        doc: &Document,
        head: Option<Span>,
        posting: &Posting,
    ) -> String {
        match self {
            Renderer::Standalone(template) => {
                render_standalone(template, doc, head, posting)
            }
            Renderer::FrontMatter => render_front_matter(doc, head, posting),
        }
    }
}

/// Concatenates, in order: the template span before the head, the shared
/// head metadata wrapped in literal `<head>` tags, the template span between
/// head and contents, and the heading plus content nodes wrapped in a
/// literal `<article>`, followed by the trailing template span.
fn render_standalone(
    template: &Template,
    doc: &Document,
    head: Option<Span>,
    posting: &Posting,
) -> String {
    let head_inner = match head {
        Some(span) => doc.serialize(span),
        None => String::new(),
    };

    [
        template.before_head.as_str(),
        "<head>",
        &head_inner,
        "</head>",
        template.between_head_and_contents.as_str(),
        "<article>",
        &doc.serialize(posting.heading),
        &doc.serialize(posting.contents),
        "</article>",
        template.after_contents.as_str(),
    ]
    .concat()
}

/// Emits a front-matter block, an inline `<style>` element holding the
/// sanitized rules lifted from the export's head, and the content nodes
/// after inline-style normalization. Front-matter values are emitted
/// verbatim; a title containing `:` or a newline produces malformed output,
/// which is an accepted limitation of the format.
fn render_front_matter(
    doc: &Document,
    head: Option<Span>,
    posting: &Posting,
) -> String {
    let rules = match head {
        Some(span) => doc.style_rules(span),
        None => String::new(),
    };

    format!(
        "---\ndate: {}\ntitle: {}\n---\n<style>{}</style>{}",
        posting.posted.format("%Y-%m-%d"),
        posting.title,
        sanitize::strip_typography(&rules),
        serialize_sanitized(doc, posting.contents),
    )
}

/// Serializes `span` with the inline-style normalization pass applied to
/// every element carrying a `style` attribute.
fn serialize_sanitized(doc: &Document, span: Span) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for event in doc.events(span) {
        let event = match event {
            Event::Start(elem) => Event::Start(sanitize_elem(elem)),
            Event::Empty(elem) => Event::Empty(sanitize_elem(elem)),
            other => other.clone(),
        };
        writer
            .write_event(event)
            .expect("writing to an in-memory buffer cannot fail");
    }
    String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned()
}

/// Rebuilds an element's attribute list, dropping or rewriting its `style`
/// attribute per [`sanitize::normalize_inline_style`]. Other attributes pass
/// through untouched.
fn sanitize_elem(elem: &BytesStart<'_>) -> BytesStart<'static> {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut rebuilt = BytesStart::new(tag);
    for attr in elem.attributes().flatten() {
        if attr.key.as_ref() == b"style" {
            let style = String::from_utf8_lossy(attr.value.as_ref());
            match sanitize::normalize_inline_style(&style) {
                None => {} // attribute dropped entirely
                Some(bounded) => {
                    rebuilt.push_attribute((b"style".as_slice(), bounded.as_bytes()));
                }
            }
        } else {
            rebuilt.push_attribute((attr.key.as_ref(), attr.value.as_ref()));
        }
    }
    rebuilt
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::posting::Posting;
    use crate::segment::boundaries;
    use crate::template::Template;

    fn derive_first(doc: &Document) -> Posting {
        let bounds = boundaries(doc, "h1");
        Posting::derive(doc, &bounds[0], None)
            .expect("test posting should derive")
    }

    #[test]
    fn test_render_standalone() {
        let template =
            Template::parse("<html>{{head}}<body>{{contents}}</body></html>")
                .expect("test template should parse");
        let doc = Document::parse(
            "<head><title>Blog</title></head>\
             <h1>2021-05-01 My Post</h1><p>Hello</p>",
        )
        .expect("test source should parse");
        let posting = derive_first(&doc);

        assert_eq!(
            Renderer::Standalone(&template).render(&doc, doc.head(), &posting),
            "<html><head><title>Blog</title></head><body>\
             <article><h1>2021-05-01 My Post</h1><p>Hello</p></article>\
             </body></html>",
        );
    }

    #[test]
    fn test_render_standalone_without_head_metadata() {
        let template = Template::parse("{{head}}|{{contents}}")
            .expect("test template should parse");
        let doc = Document::parse("<h1>2021-05-01 My Post</h1><p>Hello</p>")
            .expect("test source should parse");
        let posting = derive_first(&doc);

        assert_eq!(
            Renderer::Standalone(&template).render(&doc, doc.head(), &posting),
            "<head></head>|<article><h1>2021-05-01 My Post</h1>\
             <p>Hello</p></article>",
        );
    }

    #[test]
    fn test_render_front_matter() {
        let doc = Document::parse(
            "<head><style>font-family: 'Arial'; color: red;</style></head>\
             <h1>2021-05-01 My Post</h1>\
             <p style=\"width:50px;color:red\">Hello</p>\
             <p style=\"color:blue\">World</p>",
        )
        .expect("test source should parse");
        let posting = derive_first(&doc);

        assert_eq!(
            Renderer::FrontMatter.render(&doc, doc.head(), &posting),
            "---\ndate: 2021-05-01\ntitle: My Post\n---\n\
             <style>color: red;</style>\
             <p style=\"width:100%;max-width:50px;color:red\">Hello</p>\
             <p>World</p>",
        );
    }

    #[test]
    fn test_sanitized_serialization_keeps_other_attributes() {
        let doc = Document::parse(
            "<h1>2021-05-01 T</h1>\
             <img src=\"a.png\" style=\"color:red\" alt=\"a\">",
        )
        .expect("test source should parse");
        let posting = derive_first(&doc);
        assert_eq!(
            serialize_sanitized(&doc, posting.contents),
            "<img src=\"a.png\" alt=\"a\">",
        );
    }
}
