//! Configuration file management for pathwise.
//!
//! Provides a TOML-based config file at `~/.config/pathwise/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pathwise_core::EnrichConfig;
use pathwise_core::PlanService;
use pathwise_core::llm::{self, GeminiConfig};
use pathwise_core::plan::PlanGenerator;
use pathwise_core::video::{VideoLookup, YouTubeClient, YouTubeConfig};

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub video: VideoSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VideoSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Per-module cap during plan enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the pathwise config directory.
///
/// `$XDG_CONFIG_HOME/pathwise`, falling back to `~/.config/pathwise`.
/// The path is resolved by hand so macOS users find the file under
/// `~/.config` too; `dirs::config_dir()` points at
/// `~/Library/Application Support` there.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("pathwise");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pathwise")
}

/// Return the path to the pathwise config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    // API keys live in this file.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Show only the first and last four characters of a secret.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub bind: Option<&'a str>,
    pub port: Option<u16>,
}

/// Fully resolved configuration, ready for use.
///
/// Missing API keys are not an error here: the matching client config is
/// simply `None`, and each command decides what that means.
#[derive(Debug)]
pub struct PathwiseConfig {
    pub gemini: Option<GeminiConfig>,
    pub youtube: Option<YouTubeConfig>,
    pub enrich: EnrichConfig,
    pub bind: String,
    pub port: u16,
}

/// Read an env var, treating an empty value as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl PathwiseConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Gemini key: `GEMINI_API_KEY` env > `generation.api_key`
    /// - Gemini model: `GEMINI_MODEL` env > `generation.model` > `GeminiConfig::DEFAULT_MODEL`
    /// - YouTube key: `YOUTUBE_API_KEY` env > `video.api_key`
    /// - Bind / port: CLI flag > `PATHWISE_BIND` / `PATHWISE_PORT` env > `[server]` > 127.0.0.1:3000
    pub fn resolve(overrides: &CliOverrides<'_>) -> Result<Self> {
        let path = config_path();
        let file = if path.exists() {
            Some(load_config()?)
        } else {
            None
        };
        Self::resolve_with(file.unwrap_or_default(), overrides)
    }

    fn resolve_with(file: ConfigFile, overrides: &CliOverrides<'_>) -> Result<Self> {
        let ConfigFile {
            generation,
            video,
            server,
        } = file;

        let gemini = env_var("GEMINI_API_KEY")
            .or(generation.api_key)
            .map(|key| {
                let mut config = GeminiConfig::new(key);
                if let Some(model) = env_var("GEMINI_MODEL").or(generation.model) {
                    config.model = model;
                }
                if let Some(base_url) = generation.base_url {
                    config.base_url = base_url;
                }
                if let Some(secs) = generation.timeout_secs {
                    config.timeout = Duration::from_secs(secs);
                }
                config
            });

        let youtube = env_var("YOUTUBE_API_KEY").or(video.api_key).map(|key| {
            let mut config = YouTubeConfig::new(key);
            if let Some(base_url) = video.base_url {
                config.base_url = base_url;
            }
            if let Some(secs) = video.timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }
            config
        });

        let enrich = EnrichConfig {
            lookup_timeout: video
                .lookup_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(EnrichConfig::DEFAULT_LOOKUP_TIMEOUT),
        };

        let bind = overrides
            .bind
            .map(str::to_string)
            .or_else(|| env_var("PATHWISE_BIND"))
            .or(server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let port = match (overrides.port, env_var("PATHWISE_PORT")) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .trim()
                .parse()
                .with_context(|| format!("PATHWISE_PORT is not a valid port: {raw:?}"))?,
            (None, None) => server.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            gemini,
            youtube,
            enrich,
            bind,
            port,
        })
    }

    /// Video lookup backed by YouTube, if a YouTube key is configured.
    pub fn video_lookup(&self) -> Result<Option<Arc<VideoLookup>>> {
        let Some(youtube) = &self.youtube else {
            return Ok(None);
        };
        let client = YouTubeClient::new(youtube.clone()).context("failed to build YouTube client")?;
        Ok(Some(Arc::new(VideoLookup::new(Arc::new(client)))))
    }

    /// Plan service, if a Gemini key is configured.
    ///
    /// With `with_videos` false, or without a YouTube key, the service
    /// returns plans without recommended videos.
    pub fn plan_service(&self, with_videos: bool) -> Result<Option<PlanService>> {
        let Some(gemini) = &self.gemini else {
            return Ok(None);
        };
        let generator =
            llm::create_generator(gemini.clone()).context("failed to build Gemini client")?;
        let lookup = if with_videos {
            self.video_lookup()?
        } else {
            None
        };
        Ok(Some(
            PlanService::new(PlanGenerator::new(generator), lookup)
                .with_enrich_config(self.enrich.clone()),
        ))
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
