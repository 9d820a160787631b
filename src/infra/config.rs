//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Display name shown in the dashboard header
    #[serde(default = "default_site_name")]
    pub name: String,
}

fn default_site_name() -> String {
    "ArtGuard AI".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { name: default_site_name() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Inclusive visitor count range drawn at spawn
    #[serde(default = "default_min_dots")]
    pub min_dots: usize,
    #[serde(default = "default_max_dots")]
    pub max_dots: usize,
    /// Visitor dot radius in floor-map units
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
    /// Speed magnitude below which a visitor counts as stationary
    #[serde(default = "default_speed_threshold")]
    pub speed_threshold: f64,
    /// Stationary duration before a visitor is flagged suspicious
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
    /// Spawn keep-out distance from the walls
    #[serde(default = "default_wall_margin")]
    pub wall_margin: f64,
    /// Rejection-sampling cap; the last candidate is accepted past it
    #[serde(default = "default_max_spawn_attempts")]
    pub max_spawn_attempts: u32,
    /// Frame clock period for the session run loop
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Uniform map scale applied while a camera is focused
    #[serde(default = "default_focus_scale")]
    pub focus_scale: f64,
}

fn default_min_dots() -> usize {
    10
}

fn default_max_dots() -> usize {
    35
}

fn default_dot_radius() -> f64 {
    5.0
}

// Very low on purpose: only truly stationary visitors qualify, since
// people naturally pause to view art.
fn default_speed_threshold() -> f64 {
    0.025
}

fn default_dwell_ms() -> u64 {
    8000
}

fn default_wall_margin() -> f64 {
    10.0
}

fn default_max_spawn_attempts() -> u32 {
    100
}

fn default_frame_interval_ms() -> u64 {
    33
}

fn default_focus_scale() -> f64 {
    2.4
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_dots: default_min_dots(),
            max_dots: default_max_dots(),
            dot_radius: default_dot_radius(),
            speed_threshold: default_speed_threshold(),
            dwell_ms: default_dwell_ms(),
            wall_margin: default_wall_margin(),
            max_spawn_attempts: default_max_spawn_attempts(),
            frame_interval_ms: default_frame_interval_ms(),
            focus_scale: default_focus_scale(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    /// Minimum interval between successive alerts for one camera.
    /// Deployments have run both 60s and 45s; 45s is the default.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Chat transcript cap
    #[serde(default = "default_max_transcript")]
    pub max_transcript: usize,
}

fn default_cooldown_ms() -> u64 {
    45_000
}

fn default_max_transcript() -> usize {
    200
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self { cooldown_ms: default_cooldown_ms(), max_transcript: default_max_transcript() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DirectoryConfig {
    /// Optional TOML file overriding the built-in museum directory
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval_secs")]
    pub interval_secs: u64,
}

fn default_metrics_interval_secs() -> u64 {
    10
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval_secs() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_name: String,
    min_dots: usize,
    max_dots: usize,
    dot_radius: f64,
    speed_threshold: f64,
    dwell_ms: u64,
    wall_margin: f64,
    max_spawn_attempts: u32,
    frame_interval_ms: u64,
    focus_scale: f64,
    cooldown_ms: u64,
    max_transcript: usize,
    directory_file: Option<String>,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default")
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, source: &str) -> Self {
        Self {
            site_name: toml_config.site.name,
            min_dots: toml_config.simulation.min_dots,
            max_dots: toml_config.simulation.max_dots,
            dot_radius: toml_config.simulation.dot_radius,
            speed_threshold: toml_config.simulation.speed_threshold,
            dwell_ms: toml_config.simulation.dwell_ms,
            wall_margin: toml_config.simulation.wall_margin,
            max_spawn_attempts: toml_config.simulation.max_spawn_attempts,
            frame_interval_ms: toml_config.simulation.frame_interval_ms,
            focus_scale: toml_config.simulation.focus_scale,
            cooldown_ms: toml_config.alerts.cooldown_ms,
            max_transcript: toml_config.alerts.max_transcript,
            directory_file: toml_config.directory.file,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file: source.to_string(),
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        // Check for --config argument
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        // Default to dev.toml
        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, &path.display().to_string()))
    }

    /// Load configuration from a path - falls back to defaults on error
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn min_dots(&self) -> usize {
        self.min_dots
    }

    pub fn max_dots(&self) -> usize {
        self.max_dots
    }

    pub fn dot_radius(&self) -> f64 {
        self.dot_radius
    }

    pub fn speed_threshold(&self) -> f64 {
        self.speed_threshold
    }

    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }

    pub fn wall_margin(&self) -> f64 {
        self.wall_margin
    }

    pub fn max_spawn_attempts(&self) -> u32 {
        self.max_spawn_attempts
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    pub fn focus_scale(&self) -> f64 {
        self.focus_scale
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn max_transcript(&self) -> usize {
        self.max_transcript
    }

    pub fn directory_file(&self) -> Option<&str> {
        self.directory_file.as_deref()
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to set the dwell threshold
    #[cfg(test)]
    pub fn with_dwell_ms(mut self, ms: u64) -> Self {
        self.dwell_ms = ms;
        self
    }

    /// Builder method for tests to set the alert cooldown
    #[cfg(test)]
    pub fn with_cooldown_ms(mut self, ms: u64) -> Self {
        self.cooldown_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site_name(), "ArtGuard AI");
        assert_eq!(config.min_dots(), 10);
        assert_eq!(config.max_dots(), 35);
        assert_eq!(config.dot_radius(), 5.0);
        assert_eq!(config.speed_threshold(), 0.025);
        assert_eq!(config.dwell_ms(), 8000);
        assert_eq!(config.cooldown_ms(), 45_000);
        assert_eq!(config.focus_scale(), 2.4);
        assert_eq!(config.max_transcript(), 200);
    }

    #[test]
    fn test_resolve_config_path_default() {
        let args: Vec<String> = vec!["artguard".to_string()];
        assert_eq!(Config::resolve_config_path(&args), "config/dev.toml");
    }

    #[test]
    fn test_resolve_config_path_from_arg() {
        let args: Vec<String> = vec![
            "artguard".to_string(),
            "--config".to_string(),
            "config/louvre.toml".to_string(),
        ];
        assert_eq!(Config::resolve_config_path(&args), "config/louvre.toml");
    }

    #[test]
    fn test_resolve_config_path_from_arg_equals() {
        let args: Vec<String> =
            vec!["artguard".to_string(), "--config=config/demo.toml".to_string()];
        assert_eq!(Config::resolve_config_path(&args), "config/demo.toml");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[alerts]
cooldown_ms = 60000
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline");
        assert_eq!(config.cooldown_ms(), 60_000);
        assert_eq!(config.dwell_ms(), 8000);
        assert_eq!(config.min_dots(), 10);
    }

    #[test]
    fn test_builders() {
        let config = Config::default().with_dwell_ms(100).with_cooldown_ms(500);
        assert_eq!(config.dwell_ms(), 100);
        assert_eq!(config.cooldown_ms(), 500);
    }
}
