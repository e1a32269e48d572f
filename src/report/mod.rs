// src/report/mod.rs
// =============================================================================
// The report data model and the two ways it leaves the process:
// - console: human progress lines through an EventSink
// - json: the machine-readable file written with --output
// =============================================================================

mod console;
mod json;
mod types;

pub use console::{AuditEvent, ConsoleSink, EventSink, NullSink};
pub use json::{to_json, write_json};
pub use types::{
    round_secs, to_kilobytes, ApiCheckResult, AuditReport, PageMetrics, PageReport, PageStatus,
    RobotsReport, RobotsStatus, SitemapReport, SitemapStatus, Summary, SummaryStatus,
};
