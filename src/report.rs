//! Defines the [`Reporter`] collaborator through which the exporter
//! surfaces per-boundary skips and run progress. Passing the reporter in
//! explicitly (rather than reaching for a global logger) keeps the export
//! loop testable; [`LogReporter`] is the production implementation and
//! forwards to the [`log`] facade.

use crate::posting::{Posting, Rejection};

/// Observes the progress of one export run. Skips are informational: a
/// rejected boundary never aborts the run.
pub trait Reporter {
    /// A boundary at `index` (position in the heading list) was rejected.
    fn skipped(&self, index: usize, reason: &Rejection);

    /// A posting was rendered successfully.
    fn exported(&self, posting: &Posting);

    /// The run produced no postings at all. A valid terminal outcome, not
    /// an error.
    fn no_postings(&self);
}

/// Forwards report events to the [`log`] facade.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn skipped(&self, index: usize, reason: &Rejection) {
        log::info!("ignoring record at {} as {}", index, reason);
    }

    fn exported(&self, posting: &Posting) {
        log::debug!(
            "rendered posting [posting.title={}] to {}",
            posting.title,
            posting.uri
        );
    }

    fn no_postings(&self) {
        log::info!("no postings");
    }
}
