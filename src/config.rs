// src/config.rs
// =============================================================================
// What to audit and how patiently.
//
// An AuditConfig is built once (usually from the CLI) and does not change
// while the audit runs.
// =============================================================================

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGES: &[&str] = &["/", "/login", "/profile"];
pub const DEFAULT_API_ENDPOINTS: &[&str] = &["/api/init"];
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Site root, without trailing slash
    pub base_url: String,
    /// Page paths, audited in this order
    pub pages: Vec<String>,
    /// API paths, probed in this order
    pub api_endpoints: Vec<String>,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl AuditConfig {
    /// Config for `base_url` with the default pages, endpoints and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            pages: DEFAULT_PAGES.iter().map(|s| s.to_string()).collect(),
            api_endpoints: DEFAULT_API_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages = pages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_api_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
