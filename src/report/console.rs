// src/report/console.rs
// =============================================================================
// Human-oriented progress output.
//
// The auditor never prints directly. It emits AuditEvents into an EventSink,
// and the binary decides what to do with them:
// - ConsoleSink: colored status lines on stdout
// - NullSink: swallow everything (--quiet, tests)
//
// None of this text is a stable contract; scripts should read the JSON report
// and the exit code instead.
// =============================================================================

use std::path::Path;

use colored::Colorize;

use super::types::{
    ApiCheckResult, PageReport, PageStatus, RobotsReport, RobotsStatus, SitemapReport,
    SitemapStatus, Summary,
};
use crate::audit::{LoadRating, PageRatings, SizeRating, TtfbRating};

/// Longest title shown on the console.
const TITLE_PREVIEW_CHARS: usize = 60;
/// Longest description shown on the console.
const DESCRIPTION_PREVIEW_CHARS: usize = 80;

/// Something worth telling the operator while an audit runs.
#[derive(Debug, Clone, Copy)]
pub enum AuditEvent<'a> {
    RunStarted { base_url: &'a str },
    PageStarted { url: &'a str },
    PageChecked {
        report: &'a PageReport,
        ratings: Option<&'a PageRatings>,
    },
    ApiStarted,
    ApiChecked {
        endpoint: &'a str,
        result: &'a ApiCheckResult,
    },
    SitemapChecked { report: &'a SitemapReport },
    RobotsChecked { report: &'a RobotsReport },
    RunFinished { summary: &'a Summary },
    ReportSaved { path: &'a Path },
}

/// Receiver of audit progress.
pub trait EventSink {
    fn emit(&mut self, event: &AuditEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AuditEvent<'_>) {}
}

/// Prints events as (optionally colored) lines on stdout.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    use_colors: bool,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn good(&self, text: &str) -> String {
        if self.use_colors {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn meh(&self, text: &str) -> String {
        if self.use_colors {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn bad(&self, text: &str) -> String {
        if self.use_colors {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    // Renders an event to the lines that would be printed.
    //
    // Split out from `emit` so the formatting can be tested without
    // capturing stdout.
    pub fn render(&self, event: &AuditEvent<'_>) -> Vec<String> {
        match event {
            AuditEvent::RunStarted { base_url } => vec![
                self.heading(&"=".repeat(60)),
                self.heading(&format!("Site audit: {base_url}")),
                self.heading(&"=".repeat(60)),
            ],
            AuditEvent::PageStarted { url } => {
                vec![String::new(), self.heading(&format!("🔍 Checking: {url}"))]
            }
            AuditEvent::PageChecked { report, ratings } => self.render_page(report, *ratings),
            AuditEvent::ApiStarted => {
                vec![String::new(), self.heading("🔌 Checking API endpoints:")]
            }
            AuditEvent::ApiChecked { endpoint, result } => self.render_api(endpoint, result),
            AuditEvent::SitemapChecked { report } => self.render_sitemap(report),
            AuditEvent::RobotsChecked { report } => self.render_robots(report),
            AuditEvent::RunFinished { summary } => self.render_summary(summary),
            AuditEvent::ReportSaved { path } => {
                vec![self.good(&format!("✓ Report saved to {}", path.display()))]
            }
        }
    }

    fn render_page(&self, report: &PageReport, ratings: Option<&PageRatings>) -> Vec<String> {
        let mut lines = Vec::new();

        let Some(metrics) = &report.metrics else {
            let error = report.error.as_deref().unwrap_or("failed to load page");
            lines.push(self.bad(&format!("✗ {error}")));
            return lines;
        };

        match report.status {
            PageStatus::Ok => lines.push(self.good(&format!("✓ Status: {}", metrics.status_code))),
            _ => lines.push(self.meh(&format!("⚠ Status: {}", metrics.status_code))),
        }

        if let Some(ratings) = ratings {
            if let (Some(ttfb), Some(rating)) = (metrics.ttfb, ratings.ttfb) {
                let line = match rating {
                    TtfbRating::Good => self.good(&format!("✓ TTFB: {ttfb:.3}s (good)")),
                    TtfbRating::Acceptable => {
                        self.meh(&format!("⚠ TTFB: {ttfb:.3}s (acceptable)"))
                    }
                    TtfbRating::Slow => self.bad(&format!(
                        "✗ TTFB: {ttfb:.3}s (slow, possibly a cold start)"
                    )),
                };
                lines.push(line);
            }

            let load = metrics.load_time;
            lines.push(match ratings.load {
                LoadRating::Excellent => self.good(&format!("✓ Load time: {load:.3}s (excellent)")),
                LoadRating::Good => self.meh(&format!("⚠ Load time: {load:.3}s (good)")),
                LoadRating::Acceptable => {
                    self.meh(&format!("⚠ Load time: {load:.3}s (acceptable)"))
                }
                LoadRating::VerySlow => {
                    self.bad(&format!("✗ Load time: {load:.3}s (very slow!)"))
                }
            });
            if ratings.cold_start {
                lines.push(self.meh("  💡 Probably a server cold start or a slow backend"));
            }

            let size_kb = metrics.size_kb;
            lines.push(match ratings.size {
                SizeRating::Excellent => self.good(&format!("✓ Size: {size_kb} KB (excellent)")),
                SizeRating::Good => self.meh(&format!("⚠ Size: {size_kb} KB (good)")),
                SizeRating::Large => self.bad(&format!("✗ Size: {size_kb} KB (large)")),
            });
        }

        if let Some(seo) = &report.seo {
            lines.push(String::new());
            lines.push(self.heading("📊 SEO:"));
            if let Some(title) = &seo.title {
                lines.push(format!("  Title: {}", preview(title, TITLE_PREVIEW_CHARS)));
            }
            if let Some(description) = &seo.description {
                lines.push(format!(
                    "  Description: {}",
                    preview(description, DESCRIPTION_PREVIEW_CHARS)
                ));
            }
            if seo.issues.is_empty() {
                lines.push(self.good("  ✓ SEO metadata looks fine"));
            }
            for issue in &seo.issues {
                lines.push(self.meh(&format!("  ⚠ {issue}")));
            }
        }

        if let Some(hints) = &report.performance_hints {
            if !hints.issues.is_empty() {
                lines.push(String::new());
                lines.push(self.meh("💡 Performance hints:"));
                for issue in &hints.issues {
                    lines.push(format!("  ⚠ {issue}"));
                }
            }
        }

        if let Some(resources) = &report.resources {
            for issue in &resources.issues {
                lines.push(self.meh(&format!("  ⚠ {issue}")));
            }
        }

        if let Some(parse_error) = &report.parse_error {
            lines.push(self.bad(&format!("✗ Could not analyse HTML: {parse_error}")));
        }

        lines
    }

    fn render_api(&self, endpoint: &str, result: &ApiCheckResult) -> Vec<String> {
        let status_line = match result {
            ApiCheckResult::Checked {
                status_code,
                load_time,
                ..
            } => {
                let text = format!("  {status_code} ({load_time:.3}s)");
                if *status_code == 200 {
                    self.good(&format!("✓{text}"))
                } else {
                    self.meh(&format!("⚠{text}"))
                }
            }
            ApiCheckResult::Failed { error } => self.bad(&format!("✗ {error}")),
        };
        vec![String::new(), format!("  Checking: {endpoint}"), format!("  {status_line}")]
    }

    fn render_sitemap(&self, report: &SitemapReport) -> Vec<String> {
        let mut lines = vec![String::new(), self.heading("🗺 Checking sitemap.xml:")];
        match report.status {
            SitemapStatus::Ok => {
                let load_time = report.load_time.unwrap_or_default();
                lines.push(self.good(&format!("✓ Sitemap available ({load_time:.3}s)")));
                lines.push(format!("  URLs found: {}", report.urls_count.unwrap_or(0)));
                for url in &report.sample_urls {
                    lines.push(format!("    - {url}"));
                }
            }
            SitemapStatus::ParseError => {
                let error = report.error.as_deref().unwrap_or("unknown error");
                lines.push(self.meh(&format!("⚠ Could not parse sitemap: {error}")));
                if let Some(excerpt) = &report.body_excerpt {
                    lines.push(format!("  Response body: {excerpt}..."));
                }
            }
            SitemapStatus::Error => match report.status_code {
                Some(code) => lines.push(self.meh(&format!("⚠ Sitemap returned status {code}"))),
                None => lines.push(self.bad("✗ Sitemap unreachable")),
            },
        }
        lines
    }

    fn render_robots(&self, report: &RobotsReport) -> Vec<String> {
        let mut lines = vec![String::new(), self.heading("🤖 Checking robots.txt:")];
        match report.status {
            RobotsStatus::Ok => {
                let load_time = report.load_time.unwrap_or_default();
                lines.push(self.good(&format!("✓ robots.txt available ({load_time:.3}s)")));
                if let Some(preview) = &report.preview {
                    lines.push(format!("  Content:\n{preview}..."));
                }
            }
            RobotsStatus::NotFound => {
                lines.push(self.meh("⚠ robots.txt unavailable or not found"));
            }
        }
        lines
    }

    fn render_summary(&self, summary: &Summary) -> Vec<String> {
        vec![
            String::new(),
            self.heading(&"=".repeat(60)),
            self.heading("Summary:"),
            format!("  Pages checked: {}", summary.total_pages),
            format!("  OK: {}", self.good(&summary.ok_pages.to_string())),
            format!("  Errors: {}", self.bad(&summary.error_pages.to_string())),
            format!("  Average load time: {:.3}s", summary.average_load_time),
            self.heading(&"=".repeat(60)),
        ]
    }
}

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: &AuditEvent<'_>) {
        for line in self.render(event) {
            println!("{line}");
        }
    }
}

// First `max` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_page_renders_error() {
        let report = PageReport::failed("https://example.com/", "request timed out");
        let lines = ConsoleSink::new().without_colors().render(&AuditEvent::PageChecked {
            report: &report,
            ratings: None,
        });
        assert_eq!(lines, vec!["✗ request timed out"]);
    }

    #[test]
    fn test_summary_without_colors() {
        let summary = Summary::from_pages(std::iter::empty());
        let lines = ConsoleSink::new()
            .without_colors()
            .render(&AuditEvent::RunFinished { summary: &summary });
        assert!(lines.contains(&"  Pages checked: 0".to_string()));
        assert!(lines.contains(&"  Average load time: 0.000s".to_string()));
    }

    #[test]
    fn test_title_and_description_preview_lengths() {
        let mut report = PageReport::failed("https://example.com/", "unused");
        report.status = PageStatus::Ok;
        report.error = None;
        report.metrics = Some(crate::report::PageMetrics {
            status_code: 200,
            load_time: 0.1,
            ttfb: None,
            size: 0,
            size_kb: 0.0,
            headers: Default::default(),
            redirects: 0,
        });
        report.seo = Some(crate::checker::SeoReport {
            title: Some("t".repeat(70)),
            description: Some("d".repeat(90)),
            ..Default::default()
        });

        let lines = ConsoleSink::new().without_colors().render(&AuditEvent::PageChecked {
            report: &report,
            ratings: None,
        });
        assert!(lines.contains(&format!("  Title: {}...", "t".repeat(60))));
        assert!(lines.contains(&format!("  Description: {}...", "d".repeat(80))));
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        assert_eq!(preview("привет", 3), "при...");
        assert_eq!(preview("short", 10), "short");
    }
}
