use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Labscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the tracing filter directive
pub const LOG_ENV: &str = "LABSCAN_LOG";

/// Environment variable pointing at a catalog JSON file
pub const CATALOG_ENV: &str = "LABSCAN_CATALOG";

/// Filter used when `LABSCAN_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "labscan=info"
}

/// Catalog override from the environment, if set and non-empty
pub fn catalog_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CATALOG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_labscan() {
        assert_eq!(APP_NAME, "Labscan");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_targets_crate() {
        assert!(default_log_filter().starts_with("labscan"));
    }
}
