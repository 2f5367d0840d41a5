//! Start-up configuration, read once from `CARD_CRUSH_*` environment variables.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_LEVELS_PATH: &str = "assets/levels.txt";
pub const DEFAULT_PROGRESS_PATH: &str = ".card_crush_progress.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Level seed list, one seed per line.
    pub levels_path: PathBuf,
    /// Play this seed instead of the level list.
    pub seed: Option<String>,
    /// Where the selected level is saved on exit.
    pub progress_path: PathBuf,
    /// Submitted memos, one per line; marks levels completed.
    pub history_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            levels_path: PathBuf::from(DEFAULT_LEVELS_PATH),
            seed: None,
            progress_path: PathBuf::from(DEFAULT_PROGRESS_PATH),
            history_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            levels_path: get("CARD_CRUSH_LEVELS")
                .map(PathBuf::from)
                .unwrap_or(defaults.levels_path),
            seed: get("CARD_CRUSH_SEED"),
            progress_path: get("CARD_CRUSH_PROGRESS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.progress_path),
            history_path: get("CARD_CRUSH_HISTORY_PATH").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let config = AppConfig::from_lookup(|key| match key {
            "CARD_CRUSH_LEVELS" => Some("/tmp/levels.txt".to_string()),
            "CARD_CRUSH_SEED" => Some("  abc ".to_string()),
            "CARD_CRUSH_HISTORY_PATH" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.levels_path, PathBuf::from("/tmp/levels.txt"));
        assert_eq!(config.seed.as_deref(), Some("abc"));
        assert_eq!(config.progress_path, PathBuf::from(DEFAULT_PROGRESS_PATH));
        assert!(config.history_path.is_none());
    }
}
