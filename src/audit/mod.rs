// src/audit/mod.rs
// =============================================================================
// This module orchestrates an audit run.
//
// Submodules:
// - page: PageReport construction and latency/size ratings
// - endpoints: API, sitemap.xml and robots.txt probes
// - auditor: SiteAuditor, which ties everything together in input order
// =============================================================================

mod auditor;
mod endpoints;
mod page;

pub use auditor::{SiteAuditor, ROBOTS_PATH, SITEMAP_PATH};
pub use endpoints::{check_api_endpoint, check_robots, check_sitemap};
pub use page::{audit_page, LoadRating, PageRatings, SizeRating, TtfbRating};
