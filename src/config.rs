use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::backoff::{Backoff, Exponential, Limited, Nearest};

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per session (including the first).
    pub max_attempts: u32,
    /// Floor for the inter-attempt delay in milliseconds.
    pub min_delay_ms: u64,
    /// Ceiling for the inter-attempt delay in milliseconds.
    pub max_delay_ms: u64,
    /// Delays are rounded up to a multiple of this grid step in milliseconds.
    pub step_ms: u64,
    /// Growth ceiling for the jittered exponential range in milliseconds.
    pub growth_cap_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay_ms: 50,
            max_delay_ms: 1024,
            step_ms: 25,
            growth_cap_ms: 1024,
        }
    }
}

impl RetryConfig {
    /// Build the canonical composed backoff for one retry session:
    /// a floor-clamped, grid-aligned, growing-jitter delay sequence.
    pub fn backoff(&self) -> impl Backoff {
        Limited::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            Nearest::new(
                Duration::from_millis(self.step_ms),
                Exponential::new(Duration::from_millis(self.growth_cap_ms)),
            ),
        )
    }
}

/// Global configuration loaded from `~/.config/rexec/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RexecConfig {
    /// Retry policy; if the section is missing, built-in defaults are used.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Seconds of SSH inactivity before the connection is considered dead.
    pub inactivity_timeout_secs: u64,
}

impl Default for RexecConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            inactivity_timeout_secs: 30,
        }
    }
}

impl RexecConfig {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rexec")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RexecConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RexecConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RexecConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RexecConfig::default();
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.min_delay_ms, 50);
        assert_eq!(cfg.retry.max_delay_ms, 1024);
        assert_eq!(cfg.inactivity_timeout_secs, 30);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RexecConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RexecConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.retry.max_attempts, cfg.retry.max_attempts);
        assert_eq!(parsed.retry.step_ms, cfg.retry.step_ms);
        assert_eq!(parsed.inactivity_timeout_secs, cfg.inactivity_timeout_secs);
    }

    #[test]
    fn missing_retry_section_uses_defaults() {
        let parsed: RexecConfig = toml::from_str("inactivity_timeout_secs = 10\n").unwrap();
        assert_eq!(parsed.retry.max_attempts, 5);
        assert_eq!(parsed.inactivity_timeout_secs, 10);
    }

    #[test]
    fn configured_backoff_respects_bounds_and_grid() {
        let cfg = RetryConfig::default();
        let mut backoff = cfg.backoff();
        for _ in 0..100 {
            let d = backoff.next_delay().as_millis() as u64;
            assert!((cfg.min_delay_ms..=cfg.max_delay_ms).contains(&d));
            assert_eq!(d % cfg.step_ms, 0);
        }
    }
}
