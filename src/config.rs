//! Client Configuration
//!
//! Rate window and HTTP client configuration. All configuration is
//! programmatic; there is no file or environment loading layer.

use crate::error::ConfigError;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://ismp.crpt.ru/api/v3";

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default grace period for stopping the window timer on shutdown
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Fixed admission window: at most `limit` requests per `period`.
///
/// Both values are validated at construction and never change afterwards,
/// so a `RateWindow` in hand is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Maximum admissions per window
    limit: u32,

    /// Window length
    period: Duration,
}

impl RateWindow {
    /// Create a window admitting `limit` requests per `period`
    pub fn new(limit: u32, period: Duration) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(Self { limit, period })
    }

    /// Window admitting `limit` requests per second
    pub fn per_second(limit: u32) -> Result<Self, ConfigError> {
        Self::new(limit, Duration::from_secs(1))
    }

    /// Window admitting `limit` requests per minute
    pub fn per_minute(limit: u32) -> Result<Self, ConfigError> {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Window admitting `limit` requests per hour
    pub fn per_hour(limit: u32) -> Result<Self, ConfigError> {
        Self::new(limit, Duration::from_secs(3600))
    }

    /// Maximum admissions per window
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Window length
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Maximum time a caller waits for admission (twice the period)
    pub fn wait_budget(&self) -> Duration {
        self.period * 2
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Admission window shared by all callers of one client
    pub window: RateWindow,

    /// API base URL, without a trailing slash
    pub base_url: String,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Grace period given to the window timer task on shutdown
    pub shutdown_grace: Duration,
}

impl ClientConfig {
    /// Create a configuration with default endpoints and timeouts
    pub fn new(window: RateWindow) -> Self {
        Self {
            window,
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Override the TCP connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the shutdown grace period
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Check invariants that builder methods could have violated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(())
    }
}
