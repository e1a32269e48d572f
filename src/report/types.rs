// src/report/types.rs
// =============================================================================
// The report an audit produces, exactly as it is serialized to JSON.
//
// Optional fields are skipped rather than written as null wherever the
// reference JSON layout omits them (an unreachable page has no size, a
// missing sitemap has no URL count...).
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::checker::{PerformanceHints, ResourceInventory, SeoReport};

/// Rounds seconds to milliseconds precision (3 decimal places).
pub fn round_secs(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// Byte count as kilobytes rounded to 2 decimal places.
pub fn to_kilobytes(bytes: usize) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// HTTP 200
    Ok,
    /// Any other HTTP status
    Warning,
    /// No response at all
    Error,
}

/// Measurements of a page that answered, whatever the status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub status_code: u16,
    pub load_time: f64,
    pub ttfb: Option<f64>,
    pub size: usize,
    pub size_kb: f64,
    pub headers: BTreeMap<String, String>,
    pub redirects: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub status: PageStatus,

    /// Why the page could not be loaded (only for `error`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub metrics: Option<PageMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_hints: Option<PerformanceHints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceInventory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl PageReport {
    /// Report for a page that produced no response.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: PageStatus::Error,
            error: Some(error.into()),
            metrics: None,
            seo: None,
            performance_hints: None,
            resources: None,
            parse_error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == PageStatus::Ok
    }

    pub fn load_time(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.load_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiCheckResult {
    Checked {
        status_code: u16,
        load_time: f64,
        size: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SitemapStatus {
    Ok,
    /// Served with 200 but not valid XML
    ParseError,
    /// Non-200 or no response
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapReport {
    pub status: SitemapStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Start of the body when it could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_excerpt: Option<String>,
}

impl SitemapReport {
    pub(crate) fn with_status(status: SitemapStatus) -> Self {
        Self {
            status,
            urls_count: None,
            sample_urls: Vec::new(),
            load_time: None,
            status_code: None,
            error: None,
            body_excerpt: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotsStatus {
    Ok,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotsReport {
    pub status: RobotsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Ok,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_pages: usize,
    pub ok_pages: usize,
    /// Every page that is not `ok`, warnings included
    pub error_pages: usize,
    pub average_load_time: f64,
    pub status: SummaryStatus,
}

impl Summary {
    // Aggregates page reports.
    //
    // Pages without a load time (unreachable ones) count as 0 seconds but
    // still count towards the divisor.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a PageReport>) -> Self {
        let mut total_pages = 0;
        let mut ok_pages = 0;
        let mut load_time_sum = 0.0;

        for page in pages {
            total_pages += 1;
            if page.is_ok() {
                ok_pages += 1;
            }
            load_time_sum += page.load_time().unwrap_or(0.0);
        }

        let average_load_time = if total_pages > 0 {
            round_secs(load_time_sum / total_pages as f64)
        } else {
            0.0
        };

        Self {
            total_pages,
            ok_pages,
            error_pages: total_pages - ok_pages,
            average_load_time,
            status: if ok_pages == total_pages {
                SummaryStatus::Ok
            } else {
                SummaryStatus::Warning
            },
        }
    }

    /// Process exit code for this summary: 0 when every page was `ok`.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            SummaryStatus::Ok => 0,
            SummaryStatus::Warning => 1,
        }
    }
}

/// Everything one audit run found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub base_url: String,
    pub timestamp: DateTime<Local>,
    /// Keyed by the page path as given on the command line, in input order
    pub pages: IndexMap<String, PageReport>,
    /// Keyed by the endpoint path as given on the command line, in input order
    pub api: IndexMap<String, ApiCheckResult>,
    pub sitemap: SitemapReport,
    pub robots: RobotsReport,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: PageStatus, load_time: Option<f64>) -> PageReport {
        let mut report = PageReport::failed("https://example.com/", "unused");
        report.status = status;
        report.error = None;
        report.metrics = load_time.map(|load_time| PageMetrics {
            status_code: if status == PageStatus::Ok { 200 } else { 404 },
            load_time,
            ttfb: None,
            size: 0,
            size_kb: 0.0,
            headers: BTreeMap::new(),
            redirects: 0,
        });
        report
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_secs(0.123456), 0.123);
        assert_eq!(round_secs(1.9996), 2.0);
        assert_eq!(to_kilobytes(1024), 1.0);
        assert_eq!(to_kilobytes(1536), 1.5);
        assert_eq!(to_kilobytes(1000), 0.98);
        assert_eq!(to_kilobytes(0), 0.0);
    }

    #[test]
    fn test_summary_of_no_pages() {
        let summary = Summary::from_pages(std::iter::empty());
        assert_eq!(summary.total_pages, 0);
        assert_eq!(summary.average_load_time, 0.0);
        assert_eq!(summary.status, SummaryStatus::Ok);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_summary_counts_missing_load_time_as_zero() {
        let pages = [
            page(PageStatus::Ok, Some(1.0)),
            page(PageStatus::Ok, Some(2.0)),
            PageReport::failed("https://example.com/down", "connection failed"),
        ];
        let summary = Summary::from_pages(&pages);

        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.ok_pages, 2);
        assert_eq!(summary.error_pages, 1);
        assert_eq!(summary.average_load_time, 1.0);
        assert_eq!(summary.status, SummaryStatus::Warning);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_warning_page_spoils_summary() {
        let pages = [page(PageStatus::Ok, Some(0.5)), page(PageStatus::Warning, Some(0.25))];
        let summary = Summary::from_pages(&pages);
        assert_eq!(summary.status, SummaryStatus::Warning);
        assert_eq!(summary.error_pages, 1);
        assert_eq!(summary.average_load_time, 0.375);
    }

    #[test]
    fn test_failed_page_json_shape() {
        let json = serde_json::to_value(PageReport::failed("https://example.com/", "request timed out"))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com/",
                "status": "error",
                "error": "request timed out"
            })
        );
    }

    #[test]
    fn test_checked_page_json_flattens_metrics() {
        let json = serde_json::to_value(page(PageStatus::Warning, Some(0.2))).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["status_code"], 404);
        assert_eq!(json["load_time"], 0.2);
        // Present but null, like an unmeasured TTFB
        assert!(json["ttfb"].is_null());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_api_result_json_shape() {
        let checked = ApiCheckResult::Checked {
            status_code: 200,
            load_time: 0.05,
            size: 12,
        };
        assert_eq!(
            serde_json::to_value(checked).unwrap(),
            serde_json::json!({"status_code": 200, "load_time": 0.05, "size": 12})
        );

        let failed = ApiCheckResult::Failed {
            error: "connection failed".into(),
        };
        assert_eq!(
            serde_json::to_value(failed).unwrap(),
            serde_json::json!({"error": "connection failed"})
        );
    }
}
