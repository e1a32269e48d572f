// src/checker/html.rs
// =============================================================================
// This module inventories the resources an HTML page pulls in.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative URLs to absolute URLs (RFC 3986 joining)
//
// Nothing is deduplicated: a stylesheet referenced twice is listed twice,
// because the browser may well fetch it twice.
// =============================================================================

use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use super::selector;
use crate::error::{AuditError, Result};

/// More stylesheets than this gets a bundling hint.
pub const MAX_CSS_FILES: usize = 5;
/// More scripts than this gets a code-splitting hint.
pub const MAX_JS_FILES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceInventory {
    pub css: Vec<String>,
    pub js: Vec<String>,
    pub images: Vec<String>,
    /// Fonts the page asks the browser to preload
    pub fonts: Vec<String>,
    pub issues: Vec<String>,
}

// Collects absolute URLs of stylesheets, scripts and images.
//
// Parameters:
//   document: the parsed page
//   page_url: the URL of the page (for resolving relative references)
//
// Example:
//   <link rel="stylesheet" href="/main.css"> on https://example.com/login
//   -> css = ["https://example.com/main.css"]
pub fn check_resources(document: &Html, page_url: &str) -> Result<ResourceInventory> {
    let base = Url::parse(page_url).map_err(|source| AuditError::InvalidUrl {
        url: page_url.to_string(),
        source,
    })?;

    let mut resources = ResourceInventory {
        css: collect_urls(document, &base, r#"link[rel~="stylesheet"]"#, "href", |_| true)?,
        js: collect_urls(document, &base, "script[src]", "src", |_| true)?,
        // Inline data: images cost no request
        images: collect_urls(document, &base, "img[src]", "src", |src| {
            !src.starts_with("data:")
        })?,
        fonts: collect_urls(
            document,
            &base,
            r#"link[rel~="preload"][as="font"]"#,
            "href",
            |_| true,
        )?,
        issues: Vec::new(),
    };

    if resources.css.len() > MAX_CSS_FILES {
        resources.issues.push(format!(
            "many CSS files ({}), consider bundling",
            resources.css.len()
        ));
    }
    if resources.js.len() > MAX_JS_FILES {
        resources.issues.push(format!(
            "many JS files ({}), consider code splitting",
            resources.js.len()
        ));
    }

    Ok(resources)
}

// Resolves `attr` of every element matching `css`, skipping empty values
// and values rejected by `keep`.
fn collect_urls(
    document: &Html,
    base: &Url,
    css: &str,
    attr: &str,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<String>> {
    let selector = selector(css)?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .filter(|value| !value.is_empty() && keep(*value))
        .filter_map(|value| resolve_url(base, value))
        .collect())
}

// Resolves a possibly-relative URL to an absolute URL
//
// Parameters:
//   base: the base URL (the current page)
//   href: the href value (might be relative, might be absolute)
//
// Returns: Some(absolute_url) or None if invalid
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://cdn.com/x.js" -> Some("https://cdn.com/x.js")
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    // Url::join handles absolute hrefs too: the base is simply discarded
    base.join(href.trim()).ok().map(String::from)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `impl Fn(&str) -> bool` mean?
//    - `keep` accepts any closure that takes a &str and answers yes/no
//    - `impl Trait` in argument position is a generic parameter in disguise
//    - Each call site gets its own specialized copy, so there is no runtime cost
//
// 2. Why filter_map?
//    - It combines filter and map: closures return Option<T>
//    - Some(value) is kept, None is dropped
//    - Perfect for "look up an attribute that may be missing"
//
// 3. Why does `collect()` know to build a Vec<String>?
//    - The function's return type says Result<Vec<String>>
//    - Rust infers the target collection from that
//
// 4. What does `?` do after collect_urls(...)?
//    - If a selector fails to compile, return the error to our caller
//    - Otherwise unwrap the Ok value and keep going
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stylesheets(n: usize) -> String {
        (0..n)
            .map(|i| format!(r#"<link rel="stylesheet" href="/css/{i}.css">"#))
            .collect()
    }

    #[test]
    fn test_resolve_relative_resources() {
        let html = r#"
            <link rel="stylesheet" href="/main.css">
            <script src="js/app.js"></script>
            <script>console.log("inline")</script>
            <img src="../logo.png">
        "#;
        let document = Html::parse_document(html);
        let resources = check_resources(&document, "https://example.com/shop/item").unwrap();

        assert_eq!(resources.css, vec!["https://example.com/main.css"]);
        assert_eq!(resources.js, vec!["https://example.com/shop/js/app.js"]);
        assert_eq!(resources.images, vec!["https://example.com/logo.png"]);
        assert!(resources.issues.is_empty());
    }

    #[test]
    fn test_absolute_resources_kept() {
        let html = r#"<script src="https://cdn.example.org/lib.js"></script>"#;
        let document = Html::parse_document(html);
        let resources = check_resources(&document, "https://example.com/").unwrap();
        assert_eq!(resources.js, vec!["https://cdn.example.org/lib.js"]);
    }

    #[test]
    fn test_skip_data_uri_images() {
        let html = r#"<img src="data:image/png;base64,AAAA"><img src="/real.png"><img src="">"#;
        let document = Html::parse_document(html);
        let resources = check_resources(&document, "https://example.com/").unwrap();
        assert_eq!(resources.images, vec!["https://example.com/real.png"]);
    }

    #[test]
    fn test_repeated_references_are_not_deduplicated() {
        let html = r#"<img src="/a.png"><img src="/a.png">"#;
        let document = Html::parse_document(html);
        let resources = check_resources(&document, "https://example.com/").unwrap();
        assert_eq!(resources.images.len(), 2);
    }

    #[test]
    fn test_css_bundling_threshold() {
        let five = check_resources(&Html::parse_document(&stylesheets(5)), "https://example.com/")
            .unwrap();
        assert!(five.issues.is_empty());

        let six = check_resources(&Html::parse_document(&stylesheets(6)), "https://example.com/")
            .unwrap();
        assert_eq!(six.issues.len(), 1);
        assert!(six.issues[0].contains("many CSS files"));
        assert!(six.issues[0].contains('6'));
    }

    #[test]
    fn test_js_splitting_threshold() {
        let scripts: String = (0..11)
            .map(|i| format!(r#"<script src="/js/{i}.js"></script>"#))
            .collect();
        let resources =
            check_resources(&Html::parse_document(&scripts), "https://example.com/").unwrap();
        assert_eq!(resources.issues, vec!["many JS files (11), consider code splitting"]);
    }

    #[test]
    fn test_preloaded_fonts_are_listed() {
        let html = r#"
            <link rel="preload" as="font" href="/fonts/inter.woff2" crossorigin>
            <link rel="preload" as="image" href="/hero.png">
            <link rel="stylesheet" href="/main.css">
        "#;
        let document = Html::parse_document(html);
        let resources = check_resources(&document, "https://example.com/").unwrap();
        assert_eq!(resources.fonts, vec!["https://example.com/fonts/inter.woff2"]);
        assert_eq!(resources.css, vec!["https://example.com/main.css"]);
    }

    #[test]
    fn test_fonts_are_serialized_even_when_empty() {
        let document = Html::parse_document("<p></p>");
        let resources = check_resources(&document, "https://example.com/").unwrap();
        let json = serde_json::to_value(&resources).unwrap();
        assert_eq!(json["fonts"], serde_json::json!([]));
    }

    #[test]
    fn test_invalid_page_url_is_an_error() {
        let document = Html::parse_document("<p></p>");
        assert!(check_resources(&document, "not a url").is_err());
    }
}
