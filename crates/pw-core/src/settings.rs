//! Analysis settings and their resolution.
//!
//! Resolution order, highest first: CLI flags → `PW_*` environment
//! variables → config file → built-in defaults. The config file itself is
//! found via `--config`, then `PW_CONFIG`, then
//! `$XDG_CONFIG_HOME/prime-wheel/config.toml`.

use pw_report::SampleLimits;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Application name for XDG directories.
pub const APP_NAME: &str = "prime-wheel";

/// Config file name inside the XDG directory.
pub const CONFIG_FILENAME: &str = "config.toml";

pub const ENV_CONFIG: &str = "PW_CONFIG";
pub const ENV_ARCHIVE: &str = "PW_ARCHIVE";
pub const ENV_STRICT_WHEEL: &str = "PW_STRICT_WHEEL";
pub const ENV_SAMPLE_GAPS: &str = "PW_SAMPLE_GAPS";
pub const ENV_SAMPLE_PAIRS: &str = "PW_SAMPLE_PAIRS";
pub const ENV_SAMPLE_PRIMES: &str = "PW_SAMPLE_PRIMES";

/// Settings that shape decoding and analysis.
///
/// ```toml
/// strict_wheel = false
/// default_archive = "/data/primes/compact_0.json"
///
/// [sample_limits]
/// gaps = 100
/// pairs_per_kind = 50
/// primes = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Reject offsets off the 16 wheel residues or out of order.
    pub strict_wheel: bool,
    /// Archive analyzed when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_archive: Option<PathBuf>,
    /// Caps on the samples stored in reports.
    pub sample_limits: SampleLimits,
}

impl AnalysisSettings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("sample_limits.gaps", self.sample_limits.gaps),
            ("sample_limits.pairs_per_kind", self.sample_limits.pairs_per_kind),
            ("sample_limits.primes", self.sample_limits.primes),
        ] {
            if value == 0 {
                return Err(SettingsError::InvalidValue {
                    key: key.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Where a setting came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,
    /// Set via environment variable.
    Environment,
    /// Found in the config file.
    ConfigFile,
    /// Found in the XDG config directory.
    XdgConfig,
    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Errors raised while resolving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SettingsError>;

impl From<SettingsError> for pw_common::Error {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::InvalidValue { key, reason } => {
                pw_common::Error::InvalidSetting { key, reason }
            }
            other => pw_common::Error::Config(other.to_string()),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_path: Option<PathBuf>,
    pub archive: Option<PathBuf>,
    /// `--strict` only ever switches strict mode on.
    pub strict_wheel: bool,
}

/// Settings after resolution, with provenance for `config show`.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSettings {
    pub settings: AnalysisSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    pub config_source: ConfigSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_source: Option<ConfigSource>,
}

impl ResolvedSettings {
    /// Resolve from the process environment.
    pub fn resolve(overrides: &SettingsOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok(), xdg_config_dir())
    }

    /// Resolve with an injectable environment and XDG directory.
    pub fn resolve_with<F>(
        overrides: &SettingsOverrides,
        lookup: F,
        xdg_dir: Option<PathBuf>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config_path, config_source) = locate_config(overrides, &lookup, xdg_dir);

        let mut settings = match &config_path {
            Some(path) => load_settings_file(path)?,
            None => AnalysisSettings::default(),
        };
        // Relative archive paths in a file are relative to that file
        let config_dir = config_path.as_deref().and_then(Path::parent);
        if let (Some(archive), Some(dir)) = (settings.default_archive.as_mut(), config_dir) {
            if archive.is_relative() {
                *archive = dir.join(&*archive);
            }
        }
        let mut archive_source = settings
            .default_archive
            .as_ref()
            .map(|_| ConfigSource::ConfigFile);

        apply_env(&mut settings, &lookup)?;
        if let Some(archive) = lookup(ENV_ARCHIVE).filter(|v| !v.trim().is_empty()) {
            settings.default_archive = Some(PathBuf::from(archive));
            archive_source = Some(ConfigSource::Environment);
        }

        if let Some(archive) = &overrides.archive {
            settings.default_archive = Some(archive.clone());
            archive_source = Some(ConfigSource::CliArgument);
        }
        if overrides.strict_wheel {
            settings.strict_wheel = true;
        }

        settings.validate()?;
        debug!(
            config_source = %config_source,
            strict_wheel = settings.strict_wheel,
            "Settings resolved"
        );

        Ok(ResolvedSettings {
            settings,
            config_path,
            config_source,
            archive_source,
        })
    }
}

/// Pick the config file. Explicit paths are returned even when missing so
/// that loading reports them; the XDG file is used only if it exists.
fn locate_config<F>(
    overrides: &SettingsOverrides,
    lookup: &F,
    xdg_dir: Option<PathBuf>,
) -> (Option<PathBuf>, ConfigSource)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = &overrides.config_path {
        return (Some(path.clone()), ConfigSource::CliArgument);
    }
    if let Some(path) = lookup(ENV_CONFIG).filter(|v| !v.trim().is_empty()) {
        return (Some(PathBuf::from(path)), ConfigSource::Environment);
    }
    if let Some(path) = xdg_dir.map(|dir| dir.join(CONFIG_FILENAME)) {
        if path.is_file() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }
    (None, ConfigSource::BuiltinDefault)
}

/// Read and parse one settings file.
pub fn load_settings_file(path: &Path) -> Result<AnalysisSettings> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SettingsError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SettingsError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    AnalysisSettings::from_toml(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env<F>(settings: &mut AnalysisSettings, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_STRICT_WHEEL) {
        settings.strict_wheel = parse_bool(ENV_STRICT_WHEEL, &value)?;
    }
    if let Some(value) = lookup(ENV_SAMPLE_GAPS) {
        settings.sample_limits.gaps = parse_limit(ENV_SAMPLE_GAPS, &value)?;
    }
    if let Some(value) = lookup(ENV_SAMPLE_PAIRS) {
        settings.sample_limits.pairs_per_kind = parse_limit(ENV_SAMPLE_PAIRS, &value)?;
    }
    if let Some(value) = lookup(ENV_SAMPLE_PRIMES) {
        settings.sample_limits.primes = parse_limit(ENV_SAMPLE_PRIMES, &value)?;
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{}'", value),
        }),
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| SettingsError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a positive integer, got '{}'", value),
        })
}

/// `$XDG_CONFIG_HOME/prime-wheel`, else the platform config dir.
pub fn xdg_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .or_else(dirs::config_dir)
        .map(|dir| dir.join(APP_NAME))
}
