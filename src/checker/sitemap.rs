// src/checker/sitemap.rs
// =============================================================================
// Reads a sitemap.xml document.
//
// Unlike HTML, XML is parsed strictly (roxmltree): a broken sitemap is a real
// finding, so parse errors are returned instead of being papered over.
// =============================================================================

use roxmltree::Document;

use crate::error::Result;

/// How many `<loc>` values are kept for the operator to eyeball.
pub const SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntries {
    /// Number of `<url>` elements
    pub urls_count: usize,
    /// `<loc>` of the first few `<url>` elements
    pub sample_urls: Vec<String>,
}

pub fn parse_sitemap(xml: &str) -> Result<SitemapEntries> {
    let document = Document::parse(xml)?;

    // Matched on the local name so the sitemaps.org namespace doesn't matter
    let urls: Vec<_> = document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "url")
        .collect();

    let sample_urls = urls
        .iter()
        .take(SAMPLE_SIZE)
        .filter_map(|url| {
            url.descendants()
                .find(|node| node.is_element() && node.tag_name().name() == "loc")
        })
        .map(|loc| loc.text().unwrap_or("").trim().to_string())
        .collect();

    Ok(SitemapEntries {
        urls_count: urls.len(),
        sample_urls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc><priority>1.0</priority></url>
  <url><loc> https://example.com/login </loc></url>
  <url><loc>https://example.com/profile</loc></url>
  <url><loc>https://example.com/service/ded-moroz</loc></url>
</urlset>"#;

    #[test]
    fn test_counts_urls_and_samples_locations() {
        let entries = parse_sitemap(SITEMAP).unwrap();
        assert_eq!(entries.urls_count, 4);
        assert_eq!(
            entries.sample_urls,
            vec![
                "https://example.com/",
                "https://example.com/login",
                "https://example.com/profile",
            ]
        );
    }

    #[test]
    fn test_empty_urlset() {
        let entries = parse_sitemap("<urlset></urlset>").unwrap();
        assert_eq!(entries, SitemapEntries::default());
    }

    #[test]
    fn test_html_error_page_is_a_parse_error() {
        assert!(parse_sitemap("<html><body><p>oops<br></body></html>").is_err());
    }
}
