//! Structured logging via `tracing`.
//!
//! Initialization is idempotent: the first call installs the subscriber,
//! later calls (and a subscriber installed by someone else) are ignored.
//! `RUST_LOG` overrides the configured filter when set.

use std::fmt;
use std::str::FromStr;
use std::sync::Once;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Installs the subscriber described by its [`TracingConfig`].
#[derive(Default)]
pub struct LoggingPlugin {
    pub config: TracingConfig,
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    /// Per-module overrides, e.g. `("banner_core::abilities", Debug)`
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("banner_core::abilities".to_string(), LogLevel::Info),
                ("banner_core::run".to_string(), LogLevel::Info),
                ("banner_core::scenes".to_string(), LogLevel::Info),
                ("wgpu".to_string(), LogLevel::Error),
            ],
            show_targets: true,
            show_thread_ids: false,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{module}={level}"));
        }
        parts.join(",")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

static TRACING_INIT: Once = Once::new();

/// First call wins.
pub fn init_tracing(config: &TracingConfig) {
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.to_env_filter_string()));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .compact();

        // A global subscriber may already be installed
        let _ = subscriber.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_env_filter_string() {
        let filter = TracingConfig::default().to_env_filter_string();
        assert!(filter.starts_with("info,"));
        assert!(filter.contains("banner_core::abilities=info"));
        assert!(filter.contains("wgpu=error"));
    }

    #[test]
    fn test_config_file_sets_filters() {
        let config: crate::config::GameConfig = ron::from_str(
            r#"(logging: (default_level: Warn, module_filters: [("banner_core::run", Trace)], show_targets: false, show_thread_ids: false, show_file_line: true))"#,
        )
        .unwrap();
        assert_eq!(config.logging.to_env_filter_string(), "warn,banner_core::run=trace");
        assert!(config.logging.show_file_line);
    }

    #[test]
    fn test_tracing_config_json_roundtrip() {
        let config = TracingConfig {
            default_level: LogLevel::Warn,
            ..Default::default()
        };
        assert_eq!(TracingConfig::from_json(&config.to_json().unwrap()), Some(config));
    }

    #[test]
    fn test_logging_plugin_idempotent() {
        let mut app = App::new();
        app.add_plugins(LoggingPlugin::default());
        init_tracing(&TracingConfig {
            default_level: LogLevel::Debug,
            ..Default::default()
        });
    }
}
