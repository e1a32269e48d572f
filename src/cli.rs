// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every flag can also come from an environment variable, which is handy in
// CI where the deploy URL is already exported.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use site_auditor::config::{
    AuditConfig, DEFAULT_API_ENDPOINTS, DEFAULT_BASE_URL, DEFAULT_PAGES, DEFAULT_TIMEOUT_SECS,
};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "site-auditor",
    version,
    about = "Audit a deployed website's availability, speed, SEO metadata and resource hygiene",
    long_about = "site-auditor fetches a fixed list of pages and API endpoints, measures TTFB, \
                  load time and size, checks SEO metadata, caching and compression headers, \
                  sitemap.xml and robots.txt. It exits with 0 when every page returned HTTP 200 \
                  and 1 otherwise, so it can gate a deploy in CI."
)]
pub struct Cli {
    /// Base URL of the site under test
    #[arg(long, env = "SITE_AUDIT_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Page paths to audit (space separated)
    ///
    /// Example: --pages / /login /profile
    #[arg(
        long,
        env = "SITE_AUDIT_PAGES",
        num_args = 1..,
        value_delimiter = ' ',
        default_values_t = DEFAULT_PAGES.iter().map(|s| s.to_string())
    )]
    pub pages: Vec<String>,

    /// API endpoint paths to probe (space separated)
    #[arg(
        long,
        env = "SITE_AUDIT_API",
        num_args = 1..,
        value_delimiter = ' ',
        default_values_t = DEFAULT_API_ENDPOINTS.iter().map(|s| s.to_string())
    )]
    pub api: Vec<String>,

    /// Write the full report as JSON to this file
    #[arg(long, env = "SITE_AUDIT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SITE_AUDIT_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Don't print progress to the console
    #[arg(long, short)]
    pub quiet: bool,

    /// Print progress without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn to_config(&self) -> AuditConfig {
        AuditConfig::new(self.url.as_str())
            .with_pages(self.pages.iter().cloned())
            .with_api_endpoints(self.api.iter().cloned())
            .with_timeout(Duration::from_secs(self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-auditor"]).unwrap();
        let config = cli.to_config();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.pages, DEFAULT_PAGES);
        assert_eq!(config.api_endpoints, DEFAULT_API_ENDPOINTS);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_multiple_pages_and_trailing_slash() {
        let cli = Cli::try_parse_from([
            "site-auditor",
            "--url",
            "https://example.com/",
            "--pages",
            "/",
            "/about",
            "--api",
            "/api/a",
            "/api/b",
            "--timeout",
            "5",
            "--output",
            "report.json",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.pages, vec!["/", "/about"]);
        assert_eq!(config.api_endpoints, vec!["/api/a", "/api/b"]);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(cli.output, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["site-auditor", "--timeout", "soon"]).is_err());
    }
}
