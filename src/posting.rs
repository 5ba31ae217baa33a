//! Defines the [`Posting`] type and the identity derivation from a
//! [`Boundary`]: title, posted date, and canonical URI. Every derivation
//! step is a hard precondition; failing one rejects the boundary with a
//! [`Rejection`] that the caller reports and skips, never a fatal error.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::document::{Document, Span};
use crate::segment::Boundary;

/// Matches an embedded `YYYY-MM-DD` date. Compiled once; matching carries no
/// internal position, so repeated derivations are deterministic.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap() // the pattern is a literal
});

/// Matches a run of whitespace for slug derivation.
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap() // the pattern is a literal
});

/// One logical blog entry extracted from the export. Immutable once derived;
/// the spans refer into the [`Document`] the posting was derived from, which
/// must outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The posting title: heading text with every embedded date removed and
    /// surrounding whitespace trimmed. Never empty.
    pub title: String,

    /// The heading element's span.
    pub heading: Span,

    /// The posting body: the sibling nodes between this heading and the
    /// next.
    pub contents: Span,

    /// The posted date, taken from the first date occurrence in the heading
    /// text and validated against the calendar.
    pub posted: NaiveDate,

    /// The canonical URI: `/YYYY/MM/DD/slug`.
    pub uri: String,
}

impl Posting {
    /// Derives a posting's identity from one boundary. Preconditions, in
    /// order: the heading text passes the publish policy (when one is
    /// configured), yields a non-empty title once dates are stripped, the
    /// boundary has content, and the heading text carries a valid date.
    pub fn derive(
        doc: &Document,
        boundary: &Boundary,
        policy: Option<&PublishPolicy>,
    ) -> Result<Posting, Rejection> {
        let heading_text = match policy {
            Some(policy) => policy.strip(&boundary.heading_text)?,
            None => boundary.heading_text.clone(),
        };

        let title = DATE_PATTERN
            .replace_all(&heading_text, "")
            .trim()
            .to_owned();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }

        if !doc.has_content(boundary.contents) {
            return Err(Rejection::NoContent);
        }

        // The first date in the original heading text wins; the others were
        // already stripped from the title above.
        let date = DATE_PATTERN
            .find(&heading_text)
            .ok_or(Rejection::NoDate)?;
        let posted = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d")
            .map_err(|_| Rejection::InvalidDate(date.as_str().to_owned()))?;

        let uri = format!("/{}/{}", posted.format("%Y/%m/%d"), slug(&title));
        Ok(Posting {
            title,
            heading: boundary.heading,
            contents: boundary.contents,
            posted,
            uri,
        })
    }

    /// The output file path relative to the destination root: the URI less
    /// its leading slash, with an `.html` extension.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.html", &self.uri[1..]))
    }
}

/// Derives a URL slug from a title: lower-cased, every whitespace run
/// replaced by a single hyphen.
fn slug(title: &str) -> String {
    WHITESPACE
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// The "published filter" policy variant: only boundaries whose heading text
/// contains the marker token (case-insensitive) become postings, and the
/// token plus its trailing separator are stripped from the heading text
/// before derivation.
pub struct PublishPolicy {
    marker: Regex,
}

impl PublishPolicy {
    /// Builds a policy for a literal marker token such as `[published]`.
    pub fn new(marker: &str) -> PublishPolicy {
        let pattern = format!(r"(?i){}[\s:\-]*", regex::escape(marker));
        PublishPolicy {
            marker: Regex::new(&pattern).unwrap(), // escaped literal
        }
    }

    /// Strips the marker and its trailing separator from `heading_text`, or
    /// rejects the boundary when the marker is absent.
    fn strip(&self, heading_text: &str) -> Result<String, Rejection> {
        if !self.marker.is_match(heading_text) {
            return Err(Rejection::Unpublished);
        }
        Ok(self.marker.replace_all(heading_text, "").into_owned())
    }
}

/// The reason a boundary was rejected. Informational: a rejected boundary is
/// skipped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The heading text lacks the configured published marker.
    Unpublished,

    /// The heading text is empty once dates are stripped.
    EmptyTitle,

    /// The boundary has no content nodes; a heading with nothing before the
    /// next heading is not a posting.
    NoContent,

    /// The heading text carries no `YYYY-MM-DD` date.
    NoDate,

    /// The heading text carries a date pattern that is not a calendar date.
    InvalidDate(String),
}

impl fmt::Display for Rejection {
    /// Displays a [`Rejection`] as human-readable text. The wording follows
    /// the export log line it is spliced into: "ignoring record at N as ...".
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::Unpublished => {
                write!(f, "published marker is missing")
            }
            Rejection::EmptyTitle => write!(f, "valid title is missing"),
            Rejection::NoContent => write!(f, "valid contents are missing"),
            Rejection::NoDate => write!(f, "valid posted date is missing"),
            Rejection::InvalidDate(date) => {
                write!(f, "posted date `{}` is not a calendar date", date)
            }
        }
    }
}

impl std::error::Error for Rejection {
    /// Implements the [`std::error::Error`] trait for [`Rejection`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
