// src/audit/auditor.rs
// =============================================================================
// SiteAuditor runs a whole audit: pages, API endpoints, sitemap, robots,
// then the summary.
//
// Everything happens in input order, one request at a time. The HTTP client
// lives inside the auditor (not in a global) so two auditors in the same
// process never share state.
// =============================================================================

use chrono::Local;
use indexmap::IndexMap;
use tracing::{info, instrument};
use url::Url;

use super::endpoints::{check_api_endpoint, check_robots, check_sitemap};
use super::page::{audit_page, PageRatings};
use crate::checker::Fetcher;
use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::report::{AuditEvent, AuditReport, EventSink, PageReport, Summary};

pub const SITEMAP_PATH: &str = "/sitemap.xml";
pub const ROBOTS_PATH: &str = "/robots.txt";

#[derive(Debug, Clone)]
pub struct SiteAuditor {
    config: AuditConfig,
    base: Url,
    fetcher: Fetcher,
}

impl SiteAuditor {
    // Validates the base URL and builds the HTTP client.
    //
    // This is the only fallible step; once an auditor exists, `run` always
    // produces a report.
    pub fn new(config: AuditConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|source| AuditError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let fetcher = Fetcher::new(config.timeout, &config.user_agent)?;

        Ok(Self {
            config,
            base,
            fetcher,
        })
    }

    // Absolute URL for a page or endpoint path.
    //
    // Examples (base "https://example.com"):
    //   "/login"       -> "https://example.com/login"
    //   "api/init"     -> "https://example.com/api/init"
    pub fn resolve(&self, path: &str) -> String {
        match self.base.join(path) {
            Ok(url) => url.into(),
            // Let the fetcher report it as an invalid URL
            Err(_) => format!("{}{}", self.config.base_url, path),
        }
    }

    #[instrument(skip_all, fields(base_url = %self.config.base_url))]
    pub async fn run(&self, sink: &mut dyn EventSink) -> AuditReport {
        let timestamp = Local::now();
        sink.emit(&AuditEvent::RunStarted {
            base_url: &self.config.base_url,
        });

        let mut pages = IndexMap::new();
        for path in &self.config.pages {
            let report = self.audit_page(path, sink).await;
            pages.insert(path.clone(), report);
        }

        let mut api = IndexMap::new();
        if !self.config.api_endpoints.is_empty() {
            sink.emit(&AuditEvent::ApiStarted);
            for endpoint in &self.config.api_endpoints {
                let result = check_api_endpoint(&self.fetcher, &self.resolve(endpoint)).await;
                sink.emit(&AuditEvent::ApiChecked {
                    endpoint,
                    result: &result,
                });
                api.insert(endpoint.clone(), result);
            }
        }

        let sitemap = check_sitemap(&self.fetcher, &self.resolve(SITEMAP_PATH)).await;
        sink.emit(&AuditEvent::SitemapChecked { report: &sitemap });

        let robots = check_robots(&self.fetcher, &self.resolve(ROBOTS_PATH)).await;
        sink.emit(&AuditEvent::RobotsChecked { report: &robots });

        let summary = Summary::from_pages(pages.values());
        sink.emit(&AuditEvent::RunFinished { summary: &summary });

        info!(
            pages = summary.total_pages,
            ok = summary.ok_pages,
            status = ?summary.status,
            "audit finished"
        );

        AuditReport {
            base_url: self.config.base_url.clone(),
            timestamp,
            pages,
            api,
            sitemap,
            robots,
            summary,
        }
    }

    /// Fetches one page (with TTFB) and audits it.
    pub async fn audit_page(&self, path: &str, sink: &mut dyn EventSink) -> PageReport {
        let url = self.resolve(path);
        sink.emit(&AuditEvent::PageStarted { url: &url });

        let outcome = self.fetcher.fetch(&url, true).await;
        let report = audit_page(&url, outcome);

        let ratings = report.metrics.as_ref().map(PageRatings::from_metrics);
        sink.emit(&AuditEvent::PageChecked {
            report: &report,
            ratings: ratings.as_ref(),
        });

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ApiCheckResult, NullSink, PageStatus, RobotsStatus, SitemapStatus, SummaryStatus};
    use std::time::Duration;

    fn auditor(base_url: &str) -> SiteAuditor {
        SiteAuditor::new(AuditConfig::new(base_url).with_timeout(Duration::from_secs(2))).unwrap()
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = SiteAuditor::new(AuditConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, AuditError::InvalidUrl { .. }));
    }

    #[test]
    fn test_resolve_paths() {
        let auditor = auditor("https://example.com/");
        assert_eq!(auditor.resolve("/"), "https://example.com/");
        assert_eq!(auditor.resolve("/login"), "https://example.com/login");
        assert_eq!(auditor.resolve("api/init"), "https://example.com/api/init");
        assert_eq!(
            auditor.resolve(SITEMAP_PATH),
            "https://example.com/sitemap.xml"
        );
    }

    #[tokio::test]
    async fn test_unreachable_site_still_produces_a_report() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let auditor = SiteAuditor::new(
            AuditConfig::new(format!("http://127.0.0.1:{port}"))
                .with_pages(["/", "/about"])
                .with_api_endpoints(["/api/health"])
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let report = auditor.run(&mut NullSink).await;

        assert_eq!(report.pages.len(), 2);
        assert!(report
            .pages
            .values()
            .all(|page| page.status == PageStatus::Error));
        assert!(matches!(
            report.api["/api/health"],
            ApiCheckResult::Failed { .. }
        ));
        assert_eq!(report.sitemap.status, SitemapStatus::Error);
        assert_eq!(report.robots.status, RobotsStatus::NotFound);
        assert_eq!(report.summary.status, SummaryStatus::Warning);
        assert_eq!(report.summary.average_load_time, 0.0);
        assert_eq!(report.summary.exit_code(), 1);
    }
}
