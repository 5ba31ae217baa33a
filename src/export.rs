//! Exports the [`export_postings`] function which stitches together the
//! high-level steps of one build run: validating the page template
//! (standalone mode only), parsing the source document ([`crate::document`]),
//! segmenting
//! it into boundaries ([`crate::segment`]), deriving posting identities
//! ([`crate::posting`]), and rendering each accepted posting
//! ([`crate::render`]). The output is a list of `(relative path, document
//! text)` pairs; writing them under the destination root is the
//! orchestrator's job.

use std::fmt;
use std::path::PathBuf;

use crate::config::{Config, Mode};
use crate::document::Document;
use crate::posting::{Posting, PublishPolicy};
use crate::render::Renderer;
use crate::report::Reporter;
use crate::segment;
use crate::template::Template;

/// One rendered posting, ready to hand to the file-writer. The path is
/// relative to the destination root; the writer is responsible for creating
/// intermediate directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Drives one export run over a parsed document. The renderer, heading
/// level, and publish policy are fixed when the exporter is constructed;
/// rendering itself is pure, so postings could be rendered concurrently
/// without further coordination.
pub struct Exporter<'a> {
    /// The rendering strategy for this run.
    pub renderer: Renderer<'a>,

    /// The heading tag that delimits postings (e.g., `"h1"`).
    pub heading: &'a str,

    /// The optional published filter; boundaries without the marker are
    /// skipped.
    pub policy: Option<&'a PublishPolicy>,

    /// Observes skips and progress.
    pub reporter: &'a dyn Reporter,
}

impl Exporter<'_> {
    /// Segments the document, derives identities, and renders every
    /// accepted posting. A boundary that fails derivation is reported and
    /// skipped; it cannot shift the boundaries after it, since all
    /// boundaries were fixed before the first derivation.
    pub fn export(&self, doc: &Document) -> Vec<OutputFile> {
        let head = doc.head();
        let boundaries = segment::boundaries(doc, self.heading);

        let mut output = Vec::with_capacity(boundaries.len());
        for (index, boundary) in boundaries.iter().enumerate() {
            match Posting::derive(doc, boundary, self.policy) {
                Err(reason) => self.reporter.skipped(index, &reason),
                Ok(posting) => {
                    let contents = self.renderer.render(doc, head, &posting);
                    self.reporter.exported(&posting);
                    output.push(OutputFile {
                        relative_path: posting.relative_path(),
                        contents,
                    });
                }
            }
        }

        if output.is_empty() {
            self.reporter.no_postings();
        }
        output
    }
}

/// Builds the full export from a [`Config`], the page template text
/// (standalone mode only; the orchestrator reads it from
/// [`Config::template_path`]), and the already-fetched source document
/// text. The template is validated up front, so a malformed template aborts
/// the run before any posting is processed.
pub fn export_postings(
    config: &Config,
    template: Option<&str>,
    source: &str,
    reporter: &dyn Reporter,
) -> Result<Vec<OutputFile>> {
    let template = match config.mode {
        Mode::FrontMatter => None,
        Mode::Standalone => {
            let text = template.ok_or(Error::MissingTemplate)?;
            Some(Template::parse(text)?)
        }
    };

    log::debug!("exporting postings from html");
    let document = Document::parse(source)?;

    let policy = config
        .published_marker
        .as_deref()
        .map(PublishPolicy::new);
    let exporter = Exporter {
        renderer: match &template {
            Some(template) => Renderer::Standalone(template),
            None => Renderer::FrontMatter,
        },
        heading: &config.heading,
        policy: policy.as_ref(),
        reporter,
    };
    Ok(exporter.export(&document))
}

/// Represents the result of an export run.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for an export run. Only configuration-class failures
/// reach here; per-posting validation failures are resolved inside the run.
#[derive(Debug)]
pub enum Error {
    /// Returned when standalone mode is configured without a page template.
    MissingTemplate,

    /// Returned when the template is missing or misordering its placeholder
    /// tokens.
    Template(crate::template::Error),

    /// Returned when the source document cannot be parsed as markup.
    Document(crate::document::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingTemplate => {
                write!(f, "standalone mode requires a page template")
            }
            Error::Template(err) => err.fmt(f),
            Error::Document(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingTemplate => None,
            Error::Template(err) => Some(err),
            Error::Document(err) => Some(err),
        }
    }
}

impl From<crate::template::Error> for Error {
    /// Converts a [`crate::template::Error`] into an [`Error`]. This allows
    /// us to use the `?` operator when loading the template.
    fn from(err: crate::template::Error) -> Error {
        Error::Template(err)
    }
}

impl From<crate::document::Error> for Error {
    /// Converts a [`crate::document::Error`] into an [`Error`]. This allows
    /// us to use the `?` operator when parsing the source document.
    fn from(err: crate::document::Error) -> Error {
        Error::Document(err)
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use super::*;
    use crate::posting::Rejection;
    use crate::render::Renderer;
    use crate::report::LogReporter;
    use crate::template::Template;

    /// Records report events so tests can assert on skips.
    #[derive(Default)]
    struct Recorder {
        skipped: RefCell<Vec<(usize, Rejection)>>,
        no_postings: RefCell<bool>,
    }

    impl Reporter for Recorder {
        fn skipped(&self, index: usize, reason: &Rejection) {
            self.skipped.borrow_mut().push((index, reason.clone()));
        }

        fn exported(&self, _posting: &Posting) {}

        fn no_postings(&self) {
            *self.no_postings.borrow_mut() = true;
        }
    }

    fn init_test_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn standalone_exporter<'a>(
        template: &'a Template,
        reporter: &'a dyn Reporter,
    ) -> Exporter<'a> {
        Exporter {
            renderer: Renderer::Standalone(template),
            heading: "h1",
            policy: None,
            reporter,
        }
    }

    #[test]
    fn test_export_end_to_end() {
        init_test_logging();
        let template =
            Template::parse("<html>{{head}}<body>{{contents}}</body></html>")
                .expect("test template should parse");
        let doc = Document::parse(
            "<head></head><h1>2021-05-01 My Post</h1><p>Hello</p>\
             <h1>2021-05-02 Second</h1><p>World</p>",
        )
        .expect("test source should parse");

        let reporter = LogReporter;
        let output = standalone_exporter(&template, &reporter).export(&doc);

        assert_eq!(output.len(), 2);
        assert_eq!(
            output[0].relative_path,
            PathBuf::from("2021/05/01/my-post.html"),
        );
        assert_eq!(
            output[0].contents,
            "<html><head></head><body><article>\
             <h1>2021-05-01 My Post</h1><p>Hello</p>\
             </article></body></html>",
        );
        assert_eq!(
            output[1].relative_path,
            PathBuf::from("2021/05/02/second.html"),
        );
        assert!(output[1].contents.contains("<p>World</p>"));
    }

    #[test]
    fn test_export_no_headings_writes_nothing() {
        init_test_logging();
        let template = Template::parse("{{head}}{{contents}}")
            .expect("test template should parse");
        let doc = Document::parse("<p>just text, no headings</p>")
            .expect("test source should parse");

        let recorder = Recorder::default();
        let output = standalone_exporter(&template, &recorder).export(&doc);
        assert!(output.is_empty());
        assert!(*recorder.no_postings.borrow());
    }

    #[test]
    fn test_export_skip_does_not_shift_later_boundaries() {
        init_test_logging();
        let template = Template::parse("{{head}}{{contents}}")
            .expect("test template should parse");
        // The middle record has no date and must be skipped without
        // corrupting the third record's boundary.
        let doc = Document::parse(
            "<h1>2021-05-01 First</h1><p>a</p>\
             <h1>No date here</h1><p>b</p>\
             <h1>2021-05-03 Third</h1><p>c</p>",
        )
        .expect("test source should parse");

        let recorder = Recorder::default();
        let output = standalone_exporter(&template, &recorder).export(&doc);

        assert_eq!(output.len(), 2);
        assert_eq!(
            recorder.skipped.borrow().as_slice(),
            &[(1, Rejection::NoDate)],
        );
        assert!(output[0].contents.contains("<p>a</p>"));
        assert!(output[1].contents.contains("<p>c</p>"));
        assert_eq!(
            output[1].relative_path,
            PathBuf::from("2021/05/03/third.html"),
        );
    }

    #[test]
    fn test_export_published_filter() {
        init_test_logging();
        let template = Template::parse("{{head}}{{contents}}")
            .expect("test template should parse");
        let doc = Document::parse(
            "<h1>2021-05-01 [published] Shipped</h1><p>a</p>\
             <h1>2021-05-02 Draft</h1><p>b</p>",
        )
        .expect("test source should parse");

        let policy = PublishPolicy::new("[published]");
        let recorder = Recorder::default();
        let exporter = Exporter {
            renderer: Renderer::Standalone(&template),
            heading: "h1",
            policy: Some(&policy),
            reporter: &recorder,
        };
        let output = exporter.export(&doc);

        assert_eq!(output.len(), 1);
        assert_eq!(
            output[0].relative_path,
            PathBuf::from("2021/05/01/shipped.html"),
        );
        assert_eq!(
            recorder.skipped.borrow().as_slice(),
            &[(1, Rejection::Unpublished)],
        );
    }

    #[test]
    fn test_export_postings_rejects_missing_template() {
        init_test_logging();
        let config = Config {
            mode: Mode::Standalone,
            heading: String::from("h1"),
            published_marker: None,
            template_path: None,
        };
        match export_postings(
            &config,
            None,
            "<h1>2021-05-01 T</h1><p>x</p>",
            &LogReporter,
        ) {
            Err(Error::MissingTemplate) => {}
            other => panic!(
                "expected MissingTemplate, got {:?}",
                other.map(|o| o.len()),
            ),
        }
    }

    #[test]
    fn test_export_postings_standalone_with_template_text() {
        init_test_logging();
        let config = Config {
            mode: Mode::Standalone,
            heading: String::from("h1"),
            published_marker: None,
            template_path: None,
        };
        let output = export_postings(
            &config,
            Some("<html>{{head}}{{contents}}</html>"),
            "<h1>2021-05-01 My Post</h1><p>Hello</p>",
            &LogReporter,
        )
        .expect("standalone export should succeed");
        assert_eq!(output.len(), 1);
        assert_eq!(
            output[0].contents,
            "<html><head></head><article><h1>2021-05-01 My Post</h1>\
             <p>Hello</p></article></html>",
        );
    }

    #[test]
    fn test_export_postings_front_matter_needs_no_template() {
        init_test_logging();
        let config = Config {
            mode: Mode::FrontMatter,
            heading: String::from("h1"),
            published_marker: None,
            template_path: None,
        };
        let output = export_postings(
            &config,
            None,
            "<h1>2021-05-01 My Post</h1><p>Hello</p>",
            &LogReporter,
        )
        .expect("front-matter export should succeed");
        assert_eq!(output.len(), 1);
        assert!(output[0]
            .contents
            .starts_with("---\ndate: 2021-05-01\ntitle: My Post\n---\n"));
    }
}
