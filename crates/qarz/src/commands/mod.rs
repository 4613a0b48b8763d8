//! Command implementations

pub mod emit;
pub mod gateway;
pub mod logs;
pub mod notifications;
pub mod rules;
pub mod scheduled;
pub mod send;
pub mod settings;
pub mod templates;

use anyhow::Result;
use qarz_core::{constants, EngineConfig, Error};
use qarz_notify::NotificationEngine;
use std::path::{Path, PathBuf};

/// Path of the config file in use
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(constants::config_path)
}

/// Load the engine config. An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(p) if !p.exists() => return Err(Error::ConfigNotFound(p.to_path_buf()).into()),
        Some(p) => EngineConfig::load_from(p)?,
        None => EngineConfig::load()?,
    };
    Ok(config)
}

/// Open the engine over the configured database
pub async fn open_engine(path: Option<&Path>) -> Result<NotificationEngine> {
    let config = load_config(path)?;
    Ok(NotificationEngine::open(&config).await?)
}

/// Resolve a full id or a unique id prefix (tables show the first 8 chars)
pub fn resolve_id<'a>(ids: impl IntoIterator<Item = &'a str>, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let matches: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(needle)).collect();
    if let Some(exact) = matches.iter().find(|id| **id == needle) {
        return Some(exact.to_string());
    }
    match matches.as_slice() {
        [only] => Some(only.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_id() {
        let ids = ["abc12345-1", "abd99999-2", "abc12345"];
        assert_eq!(resolve_id(ids, "abd"), Some("abd99999-2".to_string()));
        assert_eq!(resolve_id(ids, "abc12345"), Some("abc12345".to_string()));
        // Ambiguous
        assert_eq!(resolve_id(ids, "ab"), None);
        assert_eq!(resolve_id(ids, "zzz"), None);
        assert_eq!(resolve_id(ids, ""), None);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));

        let present = dir.path().join("config.toml");
        std::fs::write(&present, "send_timeout_secs = 3\n").unwrap();
        assert_eq!(load_config(Some(&present)).unwrap().send_timeout_secs, 3);
        assert_eq!(config_file(Some(&present)), present);
    }
}
