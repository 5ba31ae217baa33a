//! Defines the [`Template`] type: a page template split into the three
//! literal spans surrounding the `{{head}}` and `{{contents}}` placeholder
//! tokens. The template text is never parsed as HTML; the renderer splices
//! serialized posting markup between the spans.

use std::fmt;

const HEAD_TOKEN: &str = "{{head}}";
const CONTENTS_TOKEN: &str = "{{contents}}";

/// A page template as three ordered literal spans. The spans are derived by
/// locating the first occurrence of each placeholder token in the template
/// source; both tokens must be present and `{{head}}` must precede
/// `{{contents}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Everything before the `{{head}}` token.
    pub before_head: String,

    /// Everything between the `{{head}}` and `{{contents}}` tokens.
    pub between_head_and_contents: String,

    /// Everything after the `{{contents}}` token.
    pub after_contents: String,
}

impl Template {
    /// Splits template source text on the two placeholder tokens. Fails if
    /// either token is missing or if `{{contents}}` precedes `{{head}}`.
    pub fn parse(source: &str) -> Result<Template> {
        let head_at = source.find(HEAD_TOKEN).ok_or(Error::MissingHeadToken)?;
        let contents_at = source
            .find(CONTENTS_TOKEN)
            .ok_or(Error::MissingContentsToken)?;
        if contents_at < head_at {
            return Err(Error::ContentsBeforeHead);
        }

        Ok(Template {
            before_head: source[..head_at].to_owned(),
            between_head_and_contents: source
                [head_at + HEAD_TOKEN.len()..contents_at]
                .to_owned(),
            after_contents: source[contents_at + CONTENTS_TOKEN.len()..]
                .to_owned(),
        })
    }
}

/// Represents the result of a template-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Template`].
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the template source lacks the `{{head}}` token.
    MissingHeadToken,

    /// Returned when the template source lacks the `{{contents}}` token.
    MissingContentsToken,

    /// Returned when `{{contents}}` occurs before `{{head}}`; the spans
    /// would be nonsensical.
    ContentsBeforeHead,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingHeadToken => {
                write!(f, "template is missing the `{}` token", HEAD_TOKEN)
            }
            Error::MissingContentsToken => {
                write!(f, "template is missing the `{}` token", CONTENTS_TOKEN)
            }
            Error::ContentsBeforeHead => write!(
                f,
                "template has `{}` before `{}`",
                CONTENTS_TOKEN, HEAD_TOKEN
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
