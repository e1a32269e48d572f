// src/audit/page.rs
// =============================================================================
// Turns one fetched page into a PageReport.
//
// Steps:
// 1. Classify the status (200 = ok, any other code = warning, no response =
//    error with nothing else filled in)
// 2. Record size and timings, rounded the way the JSON report expects
// 3. Parse the HTML and run the SEO, performance-hint and resource checks;
//    if that fails the error is stored in `parse_error` and the page report
//    is still returned
//
// The latency/size ratings are fixed thresholds used for console output.
// =============================================================================

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use scraper::Html;
use serde::Serialize;
use tracing::{debug, warn};

use crate::checker::{
    check_performance_hints, check_resources, check_seo, FetchOutcome, PerformanceHints,
    ResourceInventory, SeoReport,
};
use crate::error::Result;
use crate::report::{round_secs, to_kilobytes, PageMetrics, PageReport, PageStatus};

pub const TTFB_GOOD_SECS: f64 = 0.2;
pub const TTFB_ACCEPTABLE_SECS: f64 = 0.6;
pub const LOAD_EXCELLENT_SECS: f64 = 1.0;
pub const LOAD_GOOD_SECS: f64 = 2.0;
pub const LOAD_ACCEPTABLE_SECS: f64 = 5.0;
/// A TTFB above this on a very slow page points at a cold start.
pub const COLD_START_TTFB_SECS: f64 = 5.0;
pub const SIZE_EXCELLENT_KB: f64 = 512.0;
pub const SIZE_GOOD_KB: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TtfbRating {
    Good,
    Acceptable,
    Slow,
}

impl TtfbRating {
    pub fn classify(ttfb_secs: f64) -> Self {
        if ttfb_secs < TTFB_GOOD_SECS {
            Self::Good
        } else if ttfb_secs < TTFB_ACCEPTABLE_SECS {
            Self::Acceptable
        } else {
            Self::Slow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadRating {
    Excellent,
    Good,
    Acceptable,
    VerySlow,
}

impl LoadRating {
    pub fn classify(load_secs: f64) -> Self {
        if load_secs < LOAD_EXCELLENT_SECS {
            Self::Excellent
        } else if load_secs < LOAD_GOOD_SECS {
            Self::Good
        } else if load_secs < LOAD_ACCEPTABLE_SECS {
            Self::Acceptable
        } else {
            Self::VerySlow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeRating {
    Excellent,
    Good,
    Large,
}

impl SizeRating {
    pub fn classify(size_kb: f64) -> Self {
        if size_kb < SIZE_EXCELLENT_KB {
            Self::Excellent
        } else if size_kb < SIZE_GOOD_KB {
            Self::Good
        } else {
            Self::Large
        }
    }
}

/// Threshold judgments for one page that answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRatings {
    /// None when TTFB was not measured (or measured as zero)
    pub ttfb: Option<TtfbRating>,
    pub load: LoadRating,
    pub size: SizeRating,
    /// Very slow load together with a TTFB above 5 s
    pub cold_start: bool,
}

impl PageRatings {
    pub fn from_metrics(metrics: &PageMetrics) -> Self {
        let ttfb = metrics.ttfb.filter(|ttfb| *ttfb > 0.0);
        let load = LoadRating::classify(metrics.load_time);

        Self {
            ttfb: ttfb.map(TtfbRating::classify),
            load,
            size: SizeRating::classify(metrics.size_kb),
            cold_start: load == LoadRating::VerySlow
                && ttfb.is_some_and(|ttfb| ttfb > COLD_START_TTFB_SECS),
        }
    }
}

// Builds the report for one page.
//
// Parameters:
//   url: the URL that was requested (also the base for relative resources)
//   outcome: what the fetcher returned for it
pub fn audit_page(url: &str, outcome: FetchOutcome) -> PageReport {
    let fetched = match outcome {
        Ok(fetched) => fetched,
        Err(failure) => {
            warn!(url, error = %failure, "page could not be loaded");
            return PageReport::failed(url, format!("failed to load page: {failure}"));
        }
    };

    if fetched.redirects > 0 {
        debug!(
            url,
            final_url = %fetched.final_url,
            redirects = fetched.redirects,
            "page was redirected"
        );
    }

    let status = if fetched.status == StatusCode::OK {
        PageStatus::Ok
    } else {
        PageStatus::Warning
    };

    let metrics = PageMetrics {
        status_code: fetched.status.as_u16(),
        load_time: round_secs(fetched.elapsed.as_secs_f64()),
        ttfb: fetched.ttfb.map(|ttfb| round_secs(ttfb.as_secs_f64())),
        size: fetched.body.len(),
        size_kb: to_kilobytes(fetched.body.len()),
        headers: header_map(&fetched.headers),
        redirects: fetched.redirects,
    };

    let mut report = PageReport {
        url: url.to_string(),
        status,
        error: None,
        metrics: Some(metrics),
        seo: None,
        performance_hints: None,
        resources: None,
        parse_error: None,
    };

    // Pages in odd encodings still get analysed; broken bytes become U+FFFD.
    let html = String::from_utf8_lossy(&fetched.body);
    match analyze_html(&html, url, &fetched.headers) {
        Ok((seo, hints, resources)) => {
            report.seo = Some(seo);
            report.performance_hints = Some(hints);
            report.resources = Some(resources);
        }
        Err(e) => {
            warn!(url, error = %e, "HTML analysis failed");
            report.parse_error = Some(e.to_string());
        }
    }

    report
}

fn analyze_html(
    html: &str,
    url: &str,
    headers: &HeaderMap,
) -> Result<(SeoReport, PerformanceHints, ResourceInventory)> {
    let document = Html::parse_document(html);

    Ok((
        check_seo(&document, url)?,
        check_performance_hints(&document, headers)?,
        check_resources(&document, url)?,
    ))
}

// Flattens response headers into name -> value.
//
// Repeated headers are joined with ", " and non-UTF-8 values are decoded
// lossily so nothing silently disappears from the report.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}
