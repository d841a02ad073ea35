//! Error types for configuration and tracking-state construction.

use thiserror::Error;

/// Errors raised while configuring the tracker or building tracking state.
///
/// All variants are configuration problems: they are fatal to the caller and
/// go away only by fixing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The collector URL was empty or missing.
    #[error("matomo_url has to be set")]
    MissingMatomoUrl,

    /// Tracking state was requested without a site id.
    #[error("id_site has to be set")]
    MissingIdSite,

    /// An ignore pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::config::MatomoConfig`].
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
