// src/lib.rs
// =============================================================================
// site-auditor: a pre/post-deploy health check for a website.
//
// For a base URL and a list of page paths it measures availability, TTFB,
// load time and payload size, reads SEO metadata, counts resources, checks
// caching/compression headers, probes API endpoints, sitemap.xml and
// robots.txt, and assembles everything into one AuditReport.
//
// Modules:
// - checker: individual checks (HTTP fetch, SEO, hints, resources, sitemap)
// - audit: SiteAuditor and the per-page/per-endpoint orchestration
// - report: the report data model, console events and JSON output
// - config: AuditConfig and its defaults
// - error: AuditError
//
// Typical use:
//
//   let auditor = SiteAuditor::new(AuditConfig::new("https://example.com"))?;
//   let report = auditor.run(&mut ConsoleSink::new()).await;
//   std::process::exit(report.summary.exit_code());
// =============================================================================

pub mod audit;
pub mod checker;
pub mod config;
pub mod error;
pub mod report;

pub use audit::SiteAuditor;
pub use config::AuditConfig;
pub use error::{AuditError, Result};
pub use report::{AuditReport, ConsoleSink, EventSink, NullSink};
