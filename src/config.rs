use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CONNECTION_THRESHOLD, DRAG_THRESHOLD, ENTRANCE_MS, FADE_OUT_MS, FLOATING_MESSAGE_CHANCE,
    LINE_ALPHA, NOTE_REVEAL_MS, PARTICLE_COUNT, TAP_DEBOUNCE_MS,
};

/// Environment variable that points at an alternative config file
pub const CONFIG_ENV: &str = "GREETING_CONFIG";

/// Config file looked up in the working directory when the env var is unset
pub const DEFAULT_CONFIG_FILE: &str = "greeting.json";

/// Errors raised while loading or validating the greeting config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("the gallery needs at least one photo")]
    NoPhotos,

    #[error("the story needs at least one chapter")]
    NoChapters,

    #[error("invalid tuning value `{field}`: {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Photo {
    /// Asset path, relative to the assets folder
    pub image: String,
    pub alt: String,
    pub label: String,
    pub note: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Chapter {
    pub emoji: String,
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub particle_count: usize,
    pub connection_threshold: f32,
    pub line_alpha: f32,
    pub drag_threshold: f32,
    pub tap_debounce_ms: u64,
    pub note_reveal_ms: u64,
    pub fade_out_ms: u64,
    pub entrance_ms: u64,
    pub floating_message_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            connection_threshold: CONNECTION_THRESHOLD,
            line_alpha: LINE_ALPHA,
            drag_threshold: DRAG_THRESHOLD,
            tap_debounce_ms: TAP_DEBOUNCE_MS,
            note_reveal_ms: NOTE_REVEAL_MS,
            fade_out_ms: FADE_OUT_MS,
            entrance_ms: ENTRANCE_MS,
            floating_message_chance: FLOATING_MESSAGE_CHANCE,
        }
    }
}

impl Tuning {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::InvalidTuning { field, reason });
        if !(self.connection_threshold > 0.0) {
            return invalid("connection_threshold", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.line_alpha) {
            return invalid("line_alpha", "must be within 0..=1");
        }
        if !(self.drag_threshold > 0.0) {
            return invalid("drag_threshold", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.floating_message_chance) {
            return invalid("floating_message_chance", "must be within 0..=1");
        }
        Ok(())
    }
}

/// Everything the page shows: photos, story chapters, messages and tuning.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GreetingConfig {
    pub photos: Vec<Photo>,
    pub chapters: Vec<Chapter>,
    pub messages: Vec<String>,
    pub banner: Vec<String>,
    pub tuning: Tuning,
}

impl GreetingConfig {
    /// Number of photos, checked non-zero so the carousel modulus is always valid.
    pub fn photo_count(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.photos.len()).ok_or(ConfigError::NoPhotos)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.photo_count()?;
        if self.chapters.is_empty() {
            return Err(ConfigError::NoChapters);
        }
        self.tuning.validate()
    }

    pub fn from_json(path: &Path, data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &data)
    }

    /// Loads the config named by `GREETING_CONFIG` (or `greeting.json`),
    /// falling back to the built-in greeting when the file does not exist.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded greeting config from {}", path.display());
                Ok(config)
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} not found, using the built-in greeting", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }
}

fn photo(index: usize, label: &str, note: &str) -> Photo {
    Photo {
        image: format!("photos/photo{index}.jpg"),
        alt: format!("Our beautiful memory {index}"),
        label: label.into(),
        note: note.into(),
    }
}

fn chapter(emoji: &str, title: &str, content: &str) -> Chapter {
    Chapter {
        emoji: emoji.into(),
        title: title.into(),
        content: content.into(),
    }
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            photos: vec![
                photo(1, "Misibis Bay Resort", "From the moment I met you, I knew you were special. Every day with you is a blessing I cherish deeply. ❤️"),
                photo(2, "From Dangwa, Binondo, Manila", "You make my heart smile in ways I never thought possible. Your laughter is my favorite sound. 😊💕"),
                photo(3, "Farm Plate", "42 months have passed, but it feels like yesterday when we first fell in love. Here's to forever with you! 💖"),
                photo(4, "Mt Mayon Black Lava", "You're not just my partner, you're my best friend, my confidant, my everything. I'm so grateful for you. 🌟"),
                photo(5, "Mayon ATV Drive", "Thank you for loving me unconditionally, for supporting my dreams, and for being my safe place. You mean the world to me. 🥰"),
                photo(6, "Cagraray Amphitheater", "I love you more today than yesterday, but not as much as tomorrow. You're my forever and always. 💍✨"),
            ],
            chapters: vec![
                chapter("💕", "The Beginning", "From the moment our eyes met, I knew you were special. Every day with you is a blessing I cherish deeply."),
                chapter("💖", "Growing Closer", "As we spent more time together, I realized how perfectly we complement each other. Your smile lights up my world."),
                chapter("💗", "Deep Connection", "Our bond grew stronger with each passing day. I love how we can be ourselves around each other."),
                chapter("💝", "Special Moments", "Every memory we create together becomes a treasure. You make ordinary moments extraordinary."),
                chapter("💞", "Soulmates", "I believe we were meant to find each other. You are my best friend, my love, my everything."),
                chapter("💍", "Forever Together", "Here's to 42 months of beautiful memories and countless more to come. I love you more than words can express."),
            ],
            messages: [
                "💕 You make my heart skip a beat! 💕",
                "💖 Every moment with you is magical! 💖",
                "💕 You're my favorite person! 💕",
                "💖 I love you more than words can say! 💖",
                "💕 You're my sunshine on cloudy days! 💕",
                "💖 Together forever and always! 💖",
                "💕 You're my greatest adventure! 💕",
                "💖 My heart belongs to you! 💖",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            banner: vec![
                "💖 Happy 42nd Monthsary! 💖".into(),
                "42 months of love, laughter, and beautiful memories together.".into(),
            ],
            tuning: Tuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = GreetingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.photo_count().map(NonZeroUsize::get).ok(), Some(6));
        assert_eq!(config.chapters.len(), 6);
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "photos": [{{"image": "a.png", "alt": "a", "label": "A", "note": "note"}}],
                "tuning": {{"drag_threshold": 80.0}}
            }}"#
        )
        .expect("write config");

        let config = GreetingConfig::load(file.path()).expect("config loads");
        assert_eq!(config.photos.len(), 1);
        assert_eq!(config.tuning.drag_threshold, 80.0);
        assert_eq!(config.tuning.particle_count, PARTICLE_COUNT);
        assert_eq!(config.chapters.len(), 6);
    }

    #[test]
    fn rejects_empty_photo_list() {
        let err = GreetingConfig::from_json(Path::new("inline"), r#"{"photos": []}"#)
            .expect_err("empty gallery must be rejected");
        assert!(matches!(err, ConfigError::NoPhotos));
    }

    #[test]
    fn rejects_non_positive_drag_threshold() {
        let err = GreetingConfig::from_json(
            Path::new("inline"),
            r#"{"tuning": {"drag_threshold": 0.0}}"#,
        )
        .expect_err("a zero drag threshold turns every release into a swipe");
        assert!(matches!(err, ConfigError::InvalidTuning { field: "drag_threshold", .. }));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = GreetingConfig::from_json(Path::new("broken.json"), "{ not json")
            .expect_err("malformed json");
        assert!(err.to_string().starts_with("failed to parse broken.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = GreetingConfig::load(&dir.path().join("absent.json")).expect_err("no file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
