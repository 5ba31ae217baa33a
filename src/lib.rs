//! The library code for the `postex` blog exporter. It takes a single HTML
//! document containing a chronological blog export and splits it into
//! individually addressable pages, one per posting. The pipeline can be
//! broken down into three distinct steps:
//!
//! 1. Parsing the export into an event arena ([`crate::document`]) and
//!    segmenting it into posting boundaries at top-level headings
//!    ([`crate::segment`])
//! 2. Deriving each posting's identity--title, posted date, and canonical
//!    URI--from its heading text ([`crate::posting`])
//! 3. Rendering each accepted posting into an output document
//!    ([`crate::render`]), either by splicing it into a page template
//!    ([`crate::template`]) or by emitting front-matter-annotated content
//!    for a static-site generator, with style sanitization
//!    ([`crate::sanitize`])
//!
//! Each boundary is computed independently from a fixed, precomputed heading
//! list, so a candidate that fails validation is skipped without
//! desynchronizing the boundaries that follow it. Skips are surfaced through
//! the [`crate::report::Reporter`] collaborator rather than a global logger.
//!
//! Fetching the source document, reading the page template, creating
//! directories, and writing files are the orchestrator's job; the crate's
//! outer surface ([`crate::export::export_postings`]) maps configuration,
//! template text, and source text to `(relative path, document text)` pairs
//! and performs no I/O at all.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod document;
pub mod export;
pub mod posting;
pub mod render;
pub mod report;
pub mod sanitize;
pub mod segment;
pub mod template;
