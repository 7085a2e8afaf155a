/// Directory scanned for installations when none is configured.
pub const DEFAULT_SEARCH_ROOT: &str = "/";

/// Directory listing that publishes one anchor per released version.
pub const DEFAULT_CATALOG_URL: &str = "http://download.netbeans.org/netbeans/";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default release catalog URL.
#[must_use]
pub const fn default_catalog_url() -> &'static str {
    DEFAULT_CATALOG_URL
}

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}
