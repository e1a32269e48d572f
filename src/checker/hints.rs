// src/checker/hints.rs
// =============================================================================
// Performance hints: counts of heavy elements, images without alt text or
// lazy loading, and the caching/compression response headers.
// =============================================================================

use reqwest::header::{HeaderMap, CACHE_CONTROL, CONTENT_ENCODING};
use scraper::Html;
use serde::{Deserialize, Serialize};

use super::selector;
use crate::error::Result;

pub const ISSUE_LAZY_LOADING: &str = "some images missing lazy loading";
pub const ISSUE_CACHE_CONTROL: &str = "missing Cache-Control header";
pub const ISSUE_COMPRESSION: &str = "missing compression (gzip/brotli)";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceHints {
    /// `src` of every image without alt text, in document order
    pub images_without_alt: Vec<String>,
    pub images_count: usize,
    pub scripts_count: usize,
    pub stylesheets_count: usize,
    pub videos_count: usize,
    pub issues: Vec<String>,
}

pub fn check_performance_hints(document: &Html, headers: &HeaderMap) -> Result<PerformanceHints> {
    let mut hints = PerformanceHints::default();

    let images = selector("img")?;
    for img in document.select(&images) {
        hints.images_count += 1;

        let element = img.value();
        if is_blank(element.attr("alt")) {
            hints
                .images_without_alt
                .push(element.attr("src").unwrap_or("").to_string());
        }
        // Pushed once per offending image, not once per page
        if is_blank(element.attr("loading")) {
            hints.issues.push(ISSUE_LAZY_LOADING.to_string());
        }
    }

    hints.scripts_count = document.select(&selector("script")?).count();
    hints.stylesheets_count = document
        .select(&selector(r#"link[rel~="stylesheet"]"#)?)
        .count();
    hints.videos_count = document.select(&selector("video")?).count();

    if is_blank(header_str(headers, CACHE_CONTROL)) {
        hints.issues.push(ISSUE_CACHE_CONTROL.to_string());
    }

    let encoding = header_str(headers, CONTENT_ENCODING).unwrap_or("");
    if !encoding.contains("gzip") && !encoding.contains("br") {
        hints.issues.push(ISSUE_COMPRESSION.to_string());
    }

    Ok(hints)
}

// An empty attribute or header counts the same as a missing one.
fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
