//! Constants shared by the tracker and its configuration.

/// Every HTTP method tracked when `allowed_methods` is `"all-methods"`.
pub const HTTP_METHODS: [&str; 9] = [
    "GET", "POST", "HEAD", "OPTIONS", "TRACE", "PUT", "DELETE", "PATCH", "CONNECT",
];

/// Keyword selecting [`HTTP_METHODS`] as the allowed set.
pub const ALL_METHODS: &str = "all-methods";

/// Collector endpoint appended to a bare `matomo_url`.
pub const DEFAULT_ENDPOINT: &str = "/matomo.php";

/// Endpoint filenames accepted at the end of `matomo_url`.
pub const KNOWN_ENDPOINTS: [&str; 2] = ["/matomo.php", "/piwik.php"];

/// `action_name` used when no route pattern matched the request.
pub const NOT_FOUND_ACTION: &str = "Not Found";

/// Key of the elapsed handler time written by the middleware.
pub const SERVER_TIME_KEY: &str = "pf_srv";

/// Key of the total generation time written at request end.
pub const GENERATION_TIME_KEY: &str = "gt_ms";
