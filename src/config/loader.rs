//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::MatomoConfig;
use crate::error::ConfigResult;

/// Load configuration from a TOML file.
///
/// Only syntax is checked here; `MatomoCore::new` rejects semantic problems.
pub fn load_config(path: &Path) -> ConfigResult<MatomoConfig> {
    let content = fs::read_to_string(path)?;
    let config: MatomoConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join("matomo_core_loader_test.toml");
        std::fs::write(
            &path,
            r#"
matomo_url = "https://stats.example.com"
id_site = 7
ignored_routes = ["/health"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.matomo_url, "https://stats.example.com");
        assert_eq!(config.ignored_routes, vec!["/health".to_string()]);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/matomo.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
