//! TOML Configuration File Support
//!
//! Centralized configuration loading for Moonlit, from a TOML file at
//! `~/.config/moonlit/moonlit.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/moonlit/moonlit.toml` (typically `~/.config/moonlit/moonlit.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [sky]
//! seed_broadcasts = true
//! viewport_width = 1440
//! viewport_height = 900
//!
//! [placement]
//! moon_radius = 150
//! safety_margin = 80
//! body_size = 48
//! max_attempts = 100
//!
//! [timing]
//! new_glow_ms = 5000
//! press_hold_ms = 800
//! decay_ms = 800
//! reply_fade_ms = 8000
//!
//! [garden]
//! flower_cost = 3
//! min_distance = 20
//! max_distance_ratio = 0.68
//!
//! [classifier]
//! kind = "chat"
//! base_url = "https://api.deepseek.com/v1"
//! model = "deepseek-chat"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::ClassifierConfig;
use crate::garden::GardenConfig;
use crate::observatory::ObservatoryConfig;
use crate::placement::{PlacementConfig, Viewport};
use crate::timers::TimingConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Sky section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyToml {
    /// Seed the default broadcasts on start
    pub seed_broadcasts: Option<bool>,

    /// Initial viewport width in pixels
    pub viewport_width: Option<f64>,

    /// Initial viewport height in pixels
    pub viewport_height: Option<f64>,

    /// Fixed RNG seed for reproducible layouts
    pub rng_seed: Option<u64>,
}

/// Placement section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementToml {
    /// Moon radius in pixels
    pub moon_radius: Option<f64>,

    /// Halo clearance around the moon
    pub safety_margin: Option<f64>,

    /// Body sprite edge length
    pub body_size: Option<f64>,

    /// Minimum separation as a multiple of `body_size`
    pub separation_factor: Option<f64>,

    /// Reserved space above the sky
    pub top_margin: Option<f64>,

    /// Reserved space below the sky
    pub bottom_margin: Option<f64>,

    /// Reserved space on each side
    pub side_margin: Option<f64>,

    /// Candidates sampled before accepting an overlap
    pub max_attempts: Option<u32>,
}

/// Timing section of the TOML configuration (milliseconds)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Fresh glow length
    pub new_glow_ms: Option<u64>,

    /// Hold needed to release a meteor
    pub press_hold_ms: Option<u64>,

    /// Decay before removal
    pub decay_ms: Option<u64>,

    /// Reply fade length
    pub reply_fade_ms: Option<u64>,

    /// Welcome notice
    pub welcome_notice_ms: Option<u64>,

    /// Reply acknowledgement notice
    pub reply_notice_ms: Option<u64>,

    /// Radio notice
    pub radio_notice_ms: Option<u64>,

    /// Meteor released notice
    pub meteor_notice_ms: Option<u64>,

    /// Not enough stars notice
    pub stars_notice_ms: Option<u64>,
}

/// Garden section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenToml {
    /// Credits per flower
    pub flower_cost: Option<u32>,

    /// Closest a flower may sit to the moon centre
    pub min_distance: Option<f64>,

    /// Farthest a flower may sit, as a fraction of the container radius
    pub max_distance_ratio: Option<f64>,
}

/// Classifier section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierToml {
    /// `"ollama"` or `"chat"`
    pub kind: Option<String>,

    /// Model name
    pub model: Option<String>,

    /// Ollama host
    pub host: Option<String>,

    /// Ollama port
    pub port: Option<u16>,

    /// Chat-completions base URL
    pub base_url: Option<String>,

    /// Chat-completions bearer token
    pub api_key: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonlitToml {
    /// Sky section
    pub sky: SkyToml,

    /// Placement section
    pub placement: PlacementToml,

    /// Timing section
    pub timing: TimingToml,

    /// Garden section
    pub garden: GardenToml,

    /// Classifier section
    pub classifier: ClassifierToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Which classifier backend to build
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions
    Chat,
}

impl ClassifierKind {
    /// Parse a backend name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "chat" | "openai" | "deepseek" => Some(Self::Chat),
            _ => None,
        }
    }
}

/// Centralized configuration for Moonlit
///
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug)]
pub struct MoonlitConfigFile {
    /// Placement tuning
    pub placement: PlacementConfig,

    /// Lifecycle and notice durations
    pub timing: TimingConfig,

    /// Garden tuning
    pub garden: GardenConfig,

    /// Initial viewport
    pub viewport: Viewport,

    /// Seed the default broadcasts on start
    pub seed_broadcasts: bool,

    /// Fixed RNG seed
    pub rng_seed: Option<u64>,

    /// Classifier backend
    pub classifier_kind: ClassifierKind,

    /// Model override (backend default when `None`)
    pub model: Option<String>,

    /// Ollama host
    pub ollama_host: String,

    /// Ollama port
    pub ollama_port: u16,

    /// Chat-completions base URL
    pub chat_base_url: String,

    /// Chat-completions bearer token
    pub chat_api_key: String,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for MoonlitConfigFile {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            timing: TimingConfig::default(),
            garden: GardenConfig::default(),
            viewport: Viewport::default(),
            seed_broadcasts: true,
            rng_seed: None,
            classifier_kind: ClassifierKind::default(),
            model: None,
            ollama_host: "localhost".to_string(),
            ollama_port: 11434,
            chat_base_url: "https://api.deepseek.com/v1".to_string(),
            chat_api_key: String::new(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl MoonlitConfigFile {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check values that would make the sky misbehave
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placement.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "placement.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.placement.body_size <= 0.0 {
            return Err(ConfigError::ValidationError(
                "placement.body_size must be positive".to_string(),
            ));
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.garden.min_distance > self.garden.max_distance() {
            return Err(ConfigError::ValidationError(format!(
                "garden.min_distance ({}) exceeds the maximum flower distance ({})",
                self.garden.min_distance,
                self.garden.max_distance()
            )));
        }
        Ok(())
    }

    /// Classifier connection settings
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        match self.classifier_kind {
            ClassifierKind::Ollama => ClassifierConfig::ollama(
                self.ollama_host.clone(),
                self.ollama_port,
                self.model.clone().unwrap_or_else(|| "llama3.2".to_string()),
            ),
            ClassifierKind::Chat => ClassifierConfig::chat(
                self.chat_base_url.clone(),
                self.chat_api_key.clone(),
                self.model
                    .clone()
                    .unwrap_or_else(|| "deepseek-chat".to_string()),
            ),
        }
    }

    /// Observatory settings
    #[must_use]
    pub fn observatory_config(&self) -> ObservatoryConfig {
        ObservatoryConfig {
            placement: self.placement.clone(),
            timing: self.timing.clone(),
            garden: self.garden.clone(),
            viewport: self.viewport,
            seed_broadcasts: self.seed_broadcasts,
            rng_seed: self.rng_seed,
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/moonlit/moonlit.toml` or
/// `~/.config/moonlit/moonlit.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("moonlit").join("moonlit.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// merged values fail validation. A missing config file is not an error.
pub fn load_config() -> Result<MoonlitConfigFile, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the merged values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<MoonlitConfigFile, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration, reading environment overrides through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<MoonlitConfigFile, ConfigError> {
    // Start with defaults
    let mut config = MoonlitConfigFile::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: MoonlitToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env);

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut MoonlitConfigFile, toml: &MoonlitToml) -> Result<(), ConfigError> {
    // Sky settings
    if let Some(seed) = toml.sky.seed_broadcasts {
        config.seed_broadcasts = seed;
    }
    if let Some(width) = toml.sky.viewport_width {
        config.viewport.width = width;
    }
    if let Some(height) = toml.sky.viewport_height {
        config.viewport.height = height;
    }
    if toml.sky.rng_seed.is_some() {
        config.rng_seed = toml.sky.rng_seed;
    }

    // Placement settings
    let placement = &mut config.placement;
    if let Some(radius) = toml.placement.moon_radius {
        placement.moon_radius = radius;
    }
    if let Some(margin) = toml.placement.safety_margin {
        placement.safety_margin = margin;
    }
    if let Some(size) = toml.placement.body_size {
        placement.body_size = size;
    }
    if let Some(factor) = toml.placement.separation_factor {
        placement.separation_factor = factor;
    }
    if let Some(margin) = toml.placement.top_margin {
        placement.top_margin = margin;
    }
    if let Some(margin) = toml.placement.bottom_margin {
        placement.bottom_margin = margin;
    }
    if let Some(margin) = toml.placement.side_margin {
        placement.side_margin = margin;
    }
    if let Some(attempts) = toml.placement.max_attempts {
        placement.max_attempts = attempts;
    }

    // Timing settings
    let timing = &mut config.timing;
    let durations = [
        (toml.timing.new_glow_ms, &mut timing.new_glow),
        (toml.timing.press_hold_ms, &mut timing.press_hold),
        (toml.timing.decay_ms, &mut timing.decay),
        (toml.timing.reply_fade_ms, &mut timing.reply_fade),
        (toml.timing.welcome_notice_ms, &mut timing.welcome_notice),
        (toml.timing.reply_notice_ms, &mut timing.reply_notice),
        (toml.timing.radio_notice_ms, &mut timing.radio_notice),
        (toml.timing.meteor_notice_ms, &mut timing.meteor_notice),
        (toml.timing.stars_notice_ms, &mut timing.stars_notice),
    ];
    for (ms, slot) in durations {
        if let Some(ms) = ms {
            *slot = Duration::from_millis(ms);
        }
    }

    // Garden settings
    if let Some(cost) = toml.garden.flower_cost {
        config.garden.flower_cost = cost;
    }
    if let Some(distance) = toml.garden.min_distance {
        config.garden.min_distance = distance;
    }
    if let Some(ratio) = toml.garden.max_distance_ratio {
        config.garden.max_distance_ratio = ratio;
    }

    // Classifier settings
    if let Some(ref kind) = toml.classifier.kind {
        config.classifier_kind = ClassifierKind::parse(kind).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "classifier.kind must be \"ollama\" or \"chat\", got {kind:?}"
            ))
        })?;
    }
    if toml.classifier.model.is_some() {
        config.model = toml.classifier.model.clone();
    }
    if let Some(ref host) = toml.classifier.host {
        config.ollama_host = host.clone();
    }
    if let Some(port) = toml.classifier.port {
        config.ollama_port = port;
    }
    if let Some(ref url) = toml.classifier.base_url {
        config.chat_base_url = url.clone();
    }
    if let Some(ref key) = toml.classifier.api_key {
        config.chat_api_key = key.clone();
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut MoonlitConfigFile, env: impl Fn(&str) -> Option<String>) {
    if let Some(kind) = env("MOONLIT_CLASSIFIER") {
        match ClassifierKind::parse(&kind) {
            Some(kind) => {
                config.classifier_kind = kind;
                config.source = ConfigSource::Env;
            }
            None => tracing::warn!(value = %kind, "Ignoring unknown MOONLIT_CLASSIFIER"),
        }
    }
    if let Some(model) = env("MOONLIT_MODEL") {
        config.model = Some(model);
        config.source = ConfigSource::Env;
    }
    if let Some(host) = env("OLLAMA_HOST") {
        config.ollama_host = host;
        config.source = ConfigSource::Env;
    }
    if let Some(port) = env("OLLAMA_PORT") {
        if let Ok(p) = port.parse::<u16>() {
            config.ollama_port = p;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(url) = env("MOONLIT_CHAT_URL") {
        config.chat_base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(key) = env("MOONLIT_CHAT_API_KEY") {
        config.chat_api_key = key;
        config.source = ConfigSource::Env;
    }
    if let Some(retries) = env("MOONLIT_PLACEMENT_RETRIES") {
        if let Ok(n) = retries.parse::<u32>() {
            config.placement.max_attempts = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(seed) = env("MOONLIT_SEED_BROADCASTS") {
        match parse_flag(&seed) {
            Some(on) => {
                config.seed_broadcasts = on;
                config.source = ConfigSource::Env;
            }
            None => tracing::warn!(value = %seed, "Ignoring unknown MOONLIT_SEED_BROADCASTS"),
        }
    }
}

/// Parse an on/off environment value
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = MoonlitConfigFile::default();

        assert_eq!(config.placement.max_attempts, 100);
        assert_eq!(config.timing.press_hold, Duration::from_millis(800));
        assert_eq!(config.garden.flower_cost, 3);
        assert!(config.seed_broadcasts);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.classifier_config(),
            ClassifierConfig::ollama("localhost", 11434, "llama3.2")
        );
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("moonlit"));
            assert!(p.to_string_lossy().ends_with("moonlit.toml"));
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            load_config_with_env(Some(dir.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[sky]
seed_broadcasts = false
viewport_width = 1440
viewport_height = 900
rng_seed = 7

[placement]
max_attempts = 250
side_margin = 60

[timing]
press_hold_ms = 1200
reply_fade_ms = 4000

[garden]
flower_cost = 5

[classifier]
kind = "chat"
base_url = "https://llm.example.invalid/v1"
model = "small-chat"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.source(), ConfigSource::File);
        assert!(!config.seed_broadcasts);
        assert_eq!(config.viewport, Viewport::new(1440.0, 900.0));
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.placement.max_attempts, 250);
        assert_eq!(config.placement.side_margin, 60.0);
        assert_eq!(config.placement.moon_radius, 150.0);
        assert_eq!(config.timing.press_hold, Duration::from_millis(1200));
        assert_eq!(config.timing.reply_fade, Duration::from_millis(4000));
        assert_eq!(config.timing.decay, Duration::from_millis(800));
        assert_eq!(config.garden.flower_cost, 5);
        assert_eq!(
            config.classifier_config(),
            ClassifierConfig::chat("https://llm.example.invalid/v1", "", "small-chat")
        );

        let observatory = config.observatory_config();
        assert_eq!(observatory.timing.press_hold, Duration::from_millis(1200));
        assert!(!observatory.seed_broadcasts);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml(
            r#"
[placement]
max_attempts = 250

[classifier]
kind = "chat"
"#,
        );
        let env = env_from(&[
            ("MOONLIT_CLASSIFIER", "ollama"),
            ("MOONLIT_MODEL", "qwen2.5"),
            ("OLLAMA_PORT", "11500"),
            ("MOONLIT_PLACEMENT_RETRIES", "40"),
            ("MOONLIT_SEED_BROADCASTS", "false"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.source(), ConfigSource::Env);
        assert_eq!(config.placement.max_attempts, 40);
        assert!(!config.seed_broadcasts);
        assert_eq!(
            config.classifier_config(),
            ClassifierConfig::ollama("localhost", 11500, "qwen2.5")
        );
    }

    #[test]
    fn test_seed_broadcasts_flag_values() {
        for (value, expected) in [
            ("no", false),
            ("OFF", false),
            ("0", false),
            ("yes", true),
            ("on", true),
        ] {
            let env = env_from(&[("MOONLIT_SEED_BROADCASTS", value)]);
            let config = load_config_with_env(None, env).unwrap();
            assert_eq!(config.seed_broadcasts, expected, "value {value}");
        }

        // Unrecognized values keep the default and do not count as an override
        let env = env_from(&[("MOONLIT_SEED_BROADCASTS", "nope")]);
        let config = load_config_with_env(None, env).unwrap();
        assert!(config.seed_broadcasts);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let file = write_toml("[placement\nmax_attempts = ");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let env = env_from(&[("MOONLIT_PLACEMENT_RETRIES", "0")]);
        let err = load_config_with_env(None, env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_flower_annulus_must_not_invert() {
        let file = write_toml(
            r#"
[garden]
min_distance = 150
"#,
        );
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(err.to_string().contains("garden.min_distance"));
    }

    #[test]
    fn test_unknown_classifier_kind_rejected() {
        let file = write_toml(
            r#"
[classifier]
kind = "telepathy"
"#,
        );
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
