// src/checker/mod.rs
// =============================================================================
// This module contains the individual checks an audit is made of.
//
// Submodules:
// - http: Fetches a URL, measuring TTFB and total load time
// - seo: Title/description/Open Graph metadata
// - hints: Element counts, alt/lazy-loading gaps, caching and compression
// - html: Stylesheet/script/image inventory
// - sitemap: sitemap.xml parsing
//
// Everything except `http` is a pure function over already-fetched data,
// which keeps them testable without a network.
// =============================================================================

mod hints;
mod html;
mod http;
mod seo;
mod sitemap;

use scraper::Selector;

use crate::error::{AuditError, Result};

pub use hints::{check_performance_hints, PerformanceHints};
pub use html::{check_resources, resolve_url, ResourceInventory};
pub use http::{FetchFailure, FetchOutcome, FetchResult, Fetcher, MAX_REDIRECTS};
pub use seo::{check_seo, SeoReport};
pub use sitemap::{parse_sitemap, SitemapEntries};

// Compiles a CSS selector.
//
// Our selectors are constants, but a typo in one should show up in the
// report as a parse error rather than take the whole run down.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| AuditError::Selector(css.to_string()))
}
