// src/audit/endpoints.rs
// =============================================================================
// The non-page probes: API endpoints, sitemap.xml and robots.txt.
//
// Each one is a single fetch without TTFB measurement. Failures are folded
// into the returned report, never propagated.
// =============================================================================

use reqwest::StatusCode;
use tracing::warn;

use crate::checker::{parse_sitemap, Fetcher};
use crate::report::{
    round_secs, ApiCheckResult, RobotsReport, RobotsStatus, SitemapReport, SitemapStatus,
};

/// Characters of a body kept for the console or a parse-error excerpt.
pub const EXCERPT_CHARS: usize = 200;

pub async fn check_api_endpoint(fetcher: &Fetcher, url: &str) -> ApiCheckResult {
    match fetcher.fetch(url, false).await {
        Ok(fetched) => ApiCheckResult::Checked {
            status_code: fetched.status.as_u16(),
            load_time: round_secs(fetched.elapsed.as_secs_f64()),
            size: fetched.body.len(),
        },
        Err(failure) => {
            warn!(url, error = %failure, "API endpoint could not be loaded");
            ApiCheckResult::Failed {
                error: format!("failed to load: {failure}"),
            }
        }
    }
}

// Fetches and parses sitemap.xml.
//
// Three distinct failure shapes:
// - no response:          status=error
// - non-200 response:     status=error, status_code set
// - 200 but broken XML:   status=parse_error, error + body_excerpt set
pub async fn check_sitemap(fetcher: &Fetcher, url: &str) -> SitemapReport {
    let fetched = match fetcher.fetch(url, false).await {
        Ok(fetched) => fetched,
        Err(failure) => {
            warn!(url, error = %failure, "sitemap could not be loaded");
            let mut report = SitemapReport::with_status(SitemapStatus::Error);
            report.error = Some(failure.to_string());
            return report;
        }
    };

    if fetched.status != StatusCode::OK {
        let mut report = SitemapReport::with_status(SitemapStatus::Error);
        report.status_code = Some(fetched.status.as_u16());
        return report;
    }

    let load_time = round_secs(fetched.elapsed.as_secs_f64());
    let body = String::from_utf8_lossy(&fetched.body);

    match parse_sitemap(&body) {
        Ok(entries) => {
            let mut report = SitemapReport::with_status(SitemapStatus::Ok);
            report.urls_count = Some(entries.urls_count);
            report.sample_urls = entries.sample_urls;
            report.load_time = Some(load_time);
            report
        }
        Err(e) => {
            warn!(url, error = %e, "sitemap is not valid XML");
            let mut report = SitemapReport::with_status(SitemapStatus::ParseError);
            report.error = Some(e.to_string());
            report.body_excerpt = Some(excerpt(&body));
            report.load_time = Some(load_time);
            report
        }
    }
}

// Fetches robots.txt; anything but a 200 counts as not found.
pub async fn check_robots(fetcher: &Fetcher, url: &str) -> RobotsReport {
    match fetcher.fetch(url, false).await {
        Ok(fetched) if fetched.status == StatusCode::OK => RobotsReport {
            status: RobotsStatus::Ok,
            load_time: Some(round_secs(fetched.elapsed.as_secs_f64())),
            preview: Some(excerpt(&String::from_utf8_lossy(&fetched.body))),
        },
        _ => RobotsReport {
            status: RobotsStatus::NotFound,
            load_time: None,
            preview: None,
        },
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}
