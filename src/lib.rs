//! Build tooling for a static personal site. The work splits into two
//! halves that never interact at runtime:
//!
//! 1. Scanning a directory of HTML blog posts and rewriting the JSON index
//!    the listing page reads ([`crate::extractor`], [`crate::generator`])
//! 2. Driving the tabbed carousel UI of the rendered page
//!    ([`crate::carousel`])
//!
//! The index side is a one-shot batch: enumerate `*.html` files, scrape
//! each one for its title, description, tags, date and word count, and
//! overwrite `blog-index.json` with the aggregate. A broken document is
//! skipped with a warning; only a broken directory fails the run.
//!
//! The carousel side is a synchronous state machine over per-section slide
//! indices. It talks to the page exclusively through the
//! [`carousel::UiSurface`] capability trait, so the transition logic runs
//! (and is tested) without a real rendering surface.

pub mod carousel;
pub mod extractor;
pub mod generator;
pub mod metadata;
pub mod tags;
