//! Configuration for Ghostline.
//!
//! Everything is optional. A missing `~/.ghostline/config.toml` means defaults
//! throughout; the API key may come from the file (with `${VAR}` expansion)
//! or straight from the environment.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//!
//! [google]
//! api_key = "${GEMINI_API_KEY}"
//! model = "gemini-3-flash-preview"
//!
//! [timing]
//! scan_interval_ms = 2000
//!
//! [sequence]
//! tokens = ["01", "10", "11"]
//! ```

use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use ghostline_types::ui::UiOptions;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Default, Deserialize)]
pub struct GhostlineConfig {
    pub app: Option<AppConfig>,
    pub google: Option<GoogleConfig>,
    pub timing: Option<TimingConfig>,
    pub sequence: Option<SequenceConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Use the 16-color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Show binary entries without the typing effect.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Default, Deserialize)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() { "[REDACTED]" } else { "None" },
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimingConfig {
    pub scan_interval_ms: Option<u64>,
    pub start_delay_ms: Option<u64>,
    pub finish_delay_ms: Option<u64>,
    pub reveal_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SequenceConfig {
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// Resolved timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause between sequence ticks.
    pub scan_interval: Duration,
    /// Delay between the start action and the first token.
    pub start_delay: Duration,
    /// Delay between the last token and the closing messages.
    pub finish_delay: Duration,
    /// Per-character delay of the binary reveal.
    pub reveal_interval: Duration,
}

impl Timing {
    pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(2000);
    pub const DEFAULT_START_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_FINISH_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(60);
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            scan_interval: Self::DEFAULT_SCAN_INTERVAL,
            start_delay: Self::DEFAULT_START_DELAY,
            finish_delay: Self::DEFAULT_FINISH_DELAY,
            reveal_interval: Self::DEFAULT_REVEAL_INTERVAL,
        }
    }
}

impl GhostlineConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content)
            .map(Some)
            .map_err(|source| {
                tracing::warn!("Failed to parse config at {:?}: {}", path, source);
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        let defaults = Timing::default();
        let Some(timing) = self.timing.as_ref() else {
            return defaults;
        };
        let ms = |value: Option<u64>, fallback: Duration| {
            value.map_or(fallback, Duration::from_millis)
        };
        Timing {
            scan_interval: ms(timing.scan_interval_ms, defaults.scan_interval),
            start_delay: ms(timing.start_delay_ms, defaults.start_delay),
            finish_delay: ms(timing.finish_delay_ms, defaults.finish_delay),
            reveal_interval: ms(timing.reveal_interval_ms, defaults.reveal_interval),
        }
    }

    /// Sequence override, if one is configured.
    ///
    /// An explicitly empty list is honored: the run completes immediately.
    #[must_use]
    pub fn tokens(&self) -> Option<Vec<String>> {
        self.sequence.as_ref().map(|seq| seq.tokens.clone())
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.google
            .as_ref()
            .and_then(|google| google.model.as_deref())
            .map(str::trim)
            .filter(|model| !model.is_empty())
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.google
            .as_ref()
            .and_then(|google| google.base_url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Resolve the API key from config, then the process environment.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        let configured = self
            .google
            .as_ref()
            .and_then(|google| google.api_key.as_deref());
        resolve_api_key(configured, |name| env::var(name).ok())
    }
}

/// Resolve the API key: a non-empty configured value (after `${VAR}` expansion)
/// wins, otherwise the first non-empty variable from [`API_KEY_ENV_VARS`].
pub fn resolve_api_key<F>(configured: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |value: String| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    configured
        .map(|raw| expand_vars_with(raw, &lookup))
        .and_then(non_empty)
        .or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .find_map(|name| lookup(name).and_then(non_empty))
        })
}

/// Expand `${VAR}` references through `lookup`.
///
/// Unset variables expand to nothing; an unclosed `${` is kept verbatim.
fn expand_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &after[..end];
        if !name.is_empty()
            && let Some(replacement) = lookup(name)
        {
            out.push_str(&replacement);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ghostline").join("config.toml"))
}
