//! Configuration for the preloader.
//!
//! Raw TOML lives in [`PreloaderConfig`]; [`PreloadSettings`] is the validated
//! form the engine runs from. Every field is optional and falls back to the
//! built-in intro.
//!
//! ```toml
//! [app]
//! tui = "full"
//! reduced_motion = false
//!
//! [playlist]
//! words = ["HELLO", "BONJOUR", "WELCOME"]
//!
//! [assets]
//! root = "${HOME}/site/public"
//! locators = ["img/hero.png", "https://cdn.example.com/cover.jpg"]
//!
//! [timing]
//! first_dwell_ms = 600
//! dwell_ms = 200
//!
//! [progress]
//! asset_weight = 0.4
//! word_weight = 0.6
//! ```

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use preloader_core::PreloadPlan;
use preloader_types::ui::UiOptions;
use preloader_types::{
    AssetManifest, DwellPolicy, EmptyPlaylistError, ExitTimings, ProgressWeights, WeightsError,
    WordPlaylist,
};

/// Greetings cycled by the default intro.
pub const DEFAULT_WORDS: [&str; 9] = [
    "HELLO",
    "BONJOUR",
    "HOLA",
    "GUTEN TAG",
    "CIAO",
    "OLÁ",
    "नमस्ते",
    "你好",
    "WELCOME",
];

/// Images the default landing page needs before it is revealed.
pub const DEFAULT_ASSETS: [&str; 6] = [
    "img/fisa.png",
    "img/gstarcad.jpg",
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?q=80&w=2564&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1614850523459-c2f4c699c52e?q=80&w=2670&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1614851099511-773084f6911d?q=80&w=2670&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1614850523018-8f26a5eb8c80?q=80&w=2670&auto=format&fit=crop",
];

const DEFAULT_TICK_MS: u64 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Playlist(#[from] EmptyPlaylistError),
    #[error(transparent)]
    Weights(#[from] WeightsError),
    #[error("timing.tick_ms must be greater than zero")]
    ZeroTick,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreloaderConfig {
    pub app: Option<AppConfig>,
    pub playlist: Option<PlaylistConfig>,
    pub assets: Option<AssetsConfig>,
    pub timing: Option<TimingConfig>,
    pub progress: Option<ProgressConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// "full", "inline", or "headless".
    pub tui: Option<String>,
    /// Use ASCII-only glyphs for the status dot and progress bar.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable per-character motion effects.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistConfig {
    pub words: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetsConfig {
    /// Directory relative locators resolve against. Supports `${VAR}`.
    pub root: Option<String>,
    /// Asset locators. Supports `${VAR}`. An explicit empty list disables preloading.
    pub locators: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimingConfig {
    pub first_dwell_ms: Option<u64>,
    pub dwell_ms: Option<u64>,
    pub leave_ms: Option<u64>,
    pub tick_ms: Option<u64>,
    pub exit_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressConfig {
    pub asset_weight: Option<f32>,
    pub word_weight: Option<f32>,
}

/// Replace `${VAR}` with the environment value (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unclosed: keep the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl PreloaderConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
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
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".preloader").join("config.toml"))
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct PreloadSettings {
    pub playlist: WordPlaylist,
    pub manifest: AssetManifest,
    pub asset_root: PathBuf,
    pub dwell: DwellPolicy,
    pub exit: ExitTimings,
    pub weights: ProgressWeights,
    /// Sequencer tick cadence.
    pub tick: Duration,
    pub ui: UiOptions,
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            playlist: WordPlaylist::new(DEFAULT_WORDS).expect("default playlist is non-empty"),
            manifest: AssetManifest::new(DEFAULT_ASSETS),
            asset_root: PathBuf::from("."),
            dwell: DwellPolicy::default(),
            exit: ExitTimings::default(),
            weights: ProgressWeights::default(),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            ui: UiOptions::default(),
        }
    }
}

impl PreloadSettings {
    pub fn from_config(config: Option<&PreloaderConfig>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        let Some(config) = config else {
            return Ok(settings);
        };

        settings.ui = config.ui_options();

        if let Some(words) = config.playlist.as_ref().and_then(|p| p.words.as_ref()) {
            settings.playlist = WordPlaylist::new(words.iter().cloned())?;
        }

        if let Some(assets) = &config.assets {
            if let Some(locators) = &assets.locators {
                settings.manifest =
                    AssetManifest::new(locators.iter().map(|raw| expand_env_vars(raw)));
            }
            if let Some(root) = &assets.root {
                settings.asset_root = PathBuf::from(expand_env_vars(root));
            }
        }

        if let Some(timing) = &config.timing {
            if let Some(ms) = timing.first_dwell_ms {
                settings.dwell.first = Duration::from_millis(ms);
            }
            if let Some(ms) = timing.dwell_ms {
                settings.dwell.rest = Duration::from_millis(ms);
            }
            if let Some(ms) = timing.leave_ms {
                settings.dwell.leave = Duration::from_millis(ms);
            }
            if let Some(ms) = timing.exit_delay_ms {
                settings.exit.delay = Duration::from_millis(ms);
            }
            if let Some(ms) = timing.tick_ms {
                if ms == 0 {
                    return Err(SettingsError::ZeroTick);
                }
                settings.tick = Duration::from_millis(ms);
            }
        }

        if let Some(progress) = &config.progress {
            let defaults = ProgressWeights::default();
            settings.weights = ProgressWeights::new(
                progress.asset_weight.unwrap_or(defaults.assets()),
                progress.word_weight.unwrap_or(defaults.words()),
            )?;
        }

        Ok(settings)
    }

    /// The state-machine inputs derived from these settings.
    #[must_use]
    pub fn plan(&self) -> PreloadPlan {
        PreloadPlan {
            playlist: self.playlist.clone(),
            asset_count: self.manifest.len(),
            dwell: self.dwell,
            exit: self.exit,
            weights: self.weights,
        }
    }
}
