//! Command-line flags. Every flag can also be set through a `USERDECK_*`
//! environment variable.
//!
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::api::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::api::cache::CachePolicy;
use crate::app::AppConfig;
use crate::app::debounce::DEFAULT_DEBOUNCE;
use crate::error::{Context, Result, simple_error};

pub const APP_DIR: &str = "userdeck";
pub const LOG_FILE: &str = "userdeck.log";

#[derive(Parser, Debug, Clone)]
#[command(name = "userdeck")]
#[command(about = "Browse, search and sort a remote user directory", long_about = None)]
#[command(version)]
pub struct Args {
    /// Base URL of the directory API; `/users` is appended.
    #[arg(long, env = "USERDECK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "USERDECK_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Quiet period before typed search text is applied.
    #[arg(long, env = "USERDECK_DEBOUNCE_MS", default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Directory holding session storage and config files.
    #[arg(long, env = "USERDECK_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log destination, `<config-dir>/userdeck.log` when unset.
    #[arg(long, env = "USERDECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Open the dashboard directly, without picking an account.
    #[arg(long, env = "USERDECK_SKIP_LOGIN")]
    pub skip_login: bool,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Explicit `--config-dir`, else `<platform config dir>/userdeck`. Created if missing.
    pub fn resolve_config_dir(&self) -> Result<PathBuf> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => dirs::config_dir()
                .map(|base| base.join(APP_DIR))
                .ok_or_else(|| simple_error("no config directory on this platform; pass --config-dir"))?,
        };
        std::fs::create_dir_all(&dir).with_ctx(|| format!("create {}", dir.display()))?;
        Ok(dir)
    }

    pub fn log_path(&self, config_dir: &Path) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| config_dir.join(LOG_FILE))
    }

    pub fn app_config(&self, config_dir: PathBuf) -> AppConfig {
        AppConfig {
            config_dir: Some(config_dir),
            debounce: Duration::from_millis(self.debounce_ms),
            skip_login: self.skip_login,
            cache_policy: CachePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::try_parse_from(["userdeck"]).unwrap();
        assert_eq!(args.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(args.timeout(), Duration::from_secs(10));
        assert_eq!(args.debounce_ms, 300);
        assert!(!args.skip_login);
    }

    #[test]
    fn log_path_defaults_into_config_dir() {
        let args = Args::try_parse_from(["userdeck", "--skip-login"]).unwrap();
        let dir = PathBuf::from("/tmp/userdeck-test");
        assert_eq!(args.log_path(&dir), dir.join(LOG_FILE));
        assert!(args.app_config(dir).skip_login);
    }

    #[test]
    fn explicit_config_dir_is_created() {
        let dir = std::env::temp_dir().join(format!("userdeck_cli_{}", std::process::id()));
        let args =
            Args::try_parse_from(["userdeck", "--config-dir", dir.to_str().unwrap()]).unwrap();
        assert_eq!(args.resolve_config_dir().unwrap(), dir);
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
