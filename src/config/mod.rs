use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Base URL of the task API server (default: http://localhost:5000).
    api_base_url: Option<String>,
    /// Log level filter string, e.g. "debug", "info,taskdeck=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
}

/// Load `{data_dir}/config.toml`. A missing file is not an error; a parse
/// failure yields defaults plus a description for the caller to log.
///
/// Config loads before the tracing subscriber exists, so the parse error is
/// handed back instead of logged here — an `error!` at this point would go
/// to the no-op default dispatcher and vanish.
fn load_toml(data_dir: &Path) -> (TomlConfig, Option<String>) {
    let path = data_dir.join("config.toml");
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return (TomlConfig::default(), None),
    };
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => (cfg, None),
        Err(e) => (
            TomlConfig::default(),
            Some(format!("failed to parse {}: {e}", path.display())),
        ),
    }
}

// ─── ClientConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the task API server (TASKDECK_API_URL env var).
    pub api_base_url: String,
    /// Directory holding the stored session and config.toml.
    pub data_dir: PathBuf,
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// config.toml parse failure, if any. Defaults applied; the caller
    /// reports this once logging is up.
    pub load_error: Option<String>,
}

impl ClientConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        api_base_url: Option<String>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let (toml, load_error) = load_toml(&data_dir);

        let api_base_url = api_base_url
            .or(toml.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("TASKDECK_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        Self {
            api_base_url,
            data_dir,
            log,
            log_format,
            load_error,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/taskdeck
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/taskdeck or ~/.local/share/taskdeck
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("taskdeck");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\taskdeck
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("taskdeck");
        }
    }
    // Fallback
    PathBuf::from(".taskdeck")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_config_file() {
        let dir = TempDir::new().unwrap();
        let cfg = ClientConfig::new(None, Some(dir.path().to_path_buf()), None);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.log_format, "pretty");
        assert_eq!(cfg.load_error, None);
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "api_base_url = \"https://tasks.example.com\"\nlog = \"debug\"\n",
        )
        .unwrap();
        let cfg = ClientConfig::new(None, Some(dir.path().to_path_buf()), None);
        assert_eq!(cfg.api_base_url, "https://tasks.example.com");
        assert_eq!(cfg.log, "debug");
    }

    #[test]
    fn cli_args_beat_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "api_base_url = \"https://tasks.example.com\"\n",
        )
        .unwrap();
        let cfg = ClientConfig::new(
            Some("http://127.0.0.1:9000".to_string()),
            Some(dir.path().to_path_buf()),
            Some("trace".to_string()),
        );
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.log, "trace");
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults_and_reports_the_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "api_base_url = [not toml").unwrap();
        let cfg = ClientConfig::new(None, Some(dir.path().to_path_buf()), None);
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);

        // The parse failure is carried out of the constructor so it can be
        // logged after the subscriber is installed, not swallowed.
        let err = cfg.load_error.expect("parse failure must be reported");
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn valid_toml_reports_no_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "log = \"debug\"\n").unwrap();
        let cfg = ClientConfig::new(None, Some(dir.path().to_path_buf()), None);
        assert_eq!(cfg.load_error, None);
    }
}
