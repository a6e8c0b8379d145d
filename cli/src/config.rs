//! Runtime configuration
//!
//! Read from the environment, then overridden by command-line flags.

use std::path::PathBuf;

use todo_core::STORAGE_KEY;

const DEFAULT_DATA_DIR: &str = ".todo-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of the file-backed key-value store
    pub data_dir: PathBuf,
    /// Slot holding the task collection
    pub storage_key: String,
    /// Print JSON instead of tables
    pub json: bool,
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an environment lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = non_empty(lookup("TODO_DATA_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let storage_key =
            non_empty(lookup("TODO_STORAGE_KEY")).unwrap_or_else(|| STORAGE_KEY.to_string());

        Self {
            data_dir,
            storage_key,
            json: parse_flag(lookup("TODO_JSON"), false),
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, json: bool) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self.json |= json;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.data_dir, PathBuf::from(".todo-data"));
        assert_eq!(config.storage_key, "todos-app-data");
        assert!(!config.json);
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("TODO_DATA_DIR", "/tmp/tasks"),
            ("TODO_STORAGE_KEY", "work-tasks"),
            ("TODO_JSON", "Yes"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tasks"));
        assert_eq!(config.storage_key, "work-tasks");
        assert!(config.json);
    }

    #[test]
    fn test_blank_and_unknown_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("TODO_DATA_DIR", "  "),
            ("TODO_JSON", "maybe"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from(".todo-data"));
        assert!(!config.json);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[("TODO_JSON", "1")]))
            .with_overrides(Some(PathBuf::from("elsewhere")), false);
        assert_eq!(config.data_dir, PathBuf::from("elsewhere"));
        assert!(config.json);
    }
}
