// src/checker/seo.rs
// =============================================================================
// This module reads search-engine metadata out of a parsed HTML page.
//
// What we extract:
// - <title>
// - <meta name="description">, <meta name="keywords">, <meta name="robots">
// - Open Graph tags: <meta property="og:title|og:description|og:image">
// - <link rel="canonical">
//
// Only the title and the description are judged. Everything else is recorded
// when present and silently tolerated when missing.
// =============================================================================

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::selector;
use crate::error::Result;

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

pub const ISSUE_MISSING_TITLE: &str = "missing title tag";
pub const ISSUE_MISSING_DESCRIPTION: &str = "missing meta description";

/// SEO metadata found on one page plus the problems detected in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub issues: Vec<String>,
}

// Extracts SEO metadata and runs the title/description length rules.
//
// Parameters:
//   document: the parsed page
//   url: the page URL, only used for log context
pub fn check_seo(document: &Html, url: &str) -> Result<SeoReport> {
    let mut seo = SeoReport {
        title: first_text(document, "title")?,
        description: first_attr(document, r#"meta[name="description"]"#, "content")?,
        keywords: first_attr(document, r#"meta[name="keywords"]"#, "content")?,
        og_title: first_attr(document, r#"meta[property="og:title"]"#, "content")?,
        og_description: first_attr(document, r#"meta[property="og:description"]"#, "content")?,
        og_image: first_attr(document, r#"meta[property="og:image"]"#, "content")?,
        canonical: first_attr(document, r#"link[rel~="canonical"]"#, "href")?,
        robots: first_attr(document, r#"meta[name="robots"]"#, "content")?,
        issues: Vec::new(),
    };

    match &seo.title {
        Some(title) => seo.issues.extend(length_issue(
            "title",
            title,
            TITLE_MIN_CHARS,
            TITLE_MAX_CHARS,
        )),
        None => seo.issues.push(ISSUE_MISSING_TITLE.to_string()),
    }

    match &seo.description {
        Some(description) => seo.issues.extend(length_issue(
            "description",
            description,
            DESCRIPTION_MIN_CHARS,
            DESCRIPTION_MAX_CHARS,
        )),
        None => seo.issues.push(ISSUE_MISSING_DESCRIPTION.to_string()),
    }

    debug!(url, issues = seo.issues.len(), "SEO checked");
    Ok(seo)
}

// Judges a text length against an inclusive [min, max] window.
//
// Length is counted in characters, not bytes, so Cyrillic or emoji titles
// are measured the way a reader would count them.
fn length_issue(field: &str, text: &str, min: usize, max: usize) -> Option<String> {
    let len = text.chars().count();
    if len < min {
        Some(format!("{field} too short (< {min} characters)"))
    } else if len > max {
        Some(format!("{field} too long (> {max} characters)"))
    } else {
        None
    }
}

// Trimmed text content of the first element matching `css`.
fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string()))
}

// Trimmed attribute of the first element matching `css`.
//
// A matching element without the attribute yields Some(""), so "tag present
// but empty" stays distinguishable from "tag missing".
fn first_attr(document: &Html, css: &str, attr: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document.select(&selector).next().map(|element| {
        element
            .value()
            .attr(attr)
            .unwrap_or("")
            .trim()
            .to_string()
    }))
}
