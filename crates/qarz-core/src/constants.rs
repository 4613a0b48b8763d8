//! Constants and default values for Qarz

use std::path::PathBuf;

/// Default Qarz home directory name
pub const QARZ_DIR: &str = ".qarz";

/// Default database file name
pub const DB_FILE: &str = "qarz.db";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

/// Storage key for notification records
pub const KEY_NOTIFICATIONS: &str = "notifications";

/// Storage key for per-user notification settings
pub const KEY_SETTINGS: &str = "notification_settings";

/// Storage key for message templates
pub const KEY_TEMPLATES: &str = "notification_templates";

/// Storage key for notifications waiting to be sent
pub const KEY_SCHEDULED: &str = "scheduled_notifications";

/// Storage key for per-channel delivery attempts
pub const KEY_LOGS: &str = "notification_logs";

/// Storage key for manager-defined rules
pub const KEY_RULES: &str = "manager_notification_rules";

/// Default per-channel send timeout in seconds
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// Default high-debt warning threshold in dinars
pub const DEFAULT_HIGH_DEBT_THRESHOLD: i64 = 1_000_000;

/// Default number of days before due date to send a reminder
pub const DEFAULT_REMINDER_DAYS_BEFORE: u32 = 3;

/// Get the Qarz home directory
pub fn qarz_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(QARZ_DIR))
        .unwrap_or_else(|| PathBuf::from(QARZ_DIR))
}

/// Get the database path inside a data directory
pub fn db_path_in(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(DB_FILE)
}

/// Get the default config file path
pub fn config_path() -> PathBuf {
    qarz_home().join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qarz_home() {
        let home = qarz_home();
        assert!(home.to_string_lossy().contains(".qarz"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_db_path_in() {
        let path = db_path_in(std::path::Path::new("/tmp/data"));
        assert_eq!(path, PathBuf::from("/tmp/data/qarz.db"));
    }
}
