use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use lofty::file::AudioFile;
use lofty::probe::Probe;
use serde::Deserialize;
use tokio::fs;

use crate::song::Song;

pub const DEFAULT_PATH: &str = "serenade.json";
/// Section the audio player depends on. The player only initializes when
/// this section loads successfully.
pub const MUSIC_SECTION_ID: &str = "music";

/// Startup configuration: the ordered section list, the playlist, the quote
/// collection, and the countdown target. All of it is fixed for the process
/// lifetime once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_target")]
    pub target_date: DateTime<Utc>,
    #[serde(default = "default_quotes")]
    pub quotes: Vec<String>,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionEntry>,
    #[serde(default = "default_playlist")]
    pub playlist: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_date: default_target(),
            quotes: default_quotes(),
            sections: default_sections(),
            playlist: default_playlist(),
        }
    }
}

impl Config {
    /// Reads the config file named by `SERENADE_CONFIG` (or the default
    /// path). Missing or invalid files fall back to the built-in defaults;
    /// startup never fails on configuration.
    pub async fn load() -> Self {
        let path =
            std::env::var("SERENADE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());

        let config = match fs::read_to_string(&path).await {
            Ok(raw) => match Self::parse(&raw) {
                Ok(config) => {
                    tracing::info!(%path, "loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%path, %e, "invalid configuration, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::info!(%path, %e, "no configuration file, using defaults");
                Self::default()
            }
        };

        config.with_probed_durations()
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn with_probed_durations(mut self) -> Self {
        for song in &mut self.playlist {
            song.duration_str = probe_duration(&song.src);
        }
        self
    }
}

fn probe_duration(path: &Path) -> Option<String> {
    match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(tagged) => {
            let duration = tagged.properties().duration();
            Some(format!(
                "{}:{:02}",
                duration.as_secs() / 60,
                duration.as_secs() % 60
            ))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "unable to probe song duration");
            None
        }
    }
}

fn default_target() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap()
}

fn default_quotes() -> Vec<String> {
    [
        "Your smile is my sun on a cloudy day.",
        "Every ordinary day turns special next to you.",
        "Wherever you are is my favorite place.",
        "The world is a better place just because you exist.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_sections() -> Vec<SectionEntry> {
    [
        ("home", "sections/home.html"),
        ("you", "sections/you.html"),
        ("world", "sections/world.html"),
        (MUSIC_SECTION_ID, "sections/music.html"),
        ("memories", "sections/memories.html"),
        ("quirks", "sections/quirks.html"),
        ("thanks", "sections/thanks.html"),
    ]
    .into_iter()
    .map(|(id, path)| SectionEntry {
        id: id.to_string(),
        path: PathBuf::from(path),
    })
    .collect()
}

fn default_playlist() -> Vec<Song> {
    vec![
        Song::new("Always Together", "Favorite Artist", "songs/song1.mp3"),
        Song::new("Ours", "The Two of Us", "songs/song2.mp3"),
        Song::new("Happy Birthday", "Theme of the Day", "songs/song3.mp3"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_feature() {
        let config = Config::default();
        assert!(!config.quotes.is_empty());
        assert!(!config.playlist.is_empty());
        assert!(config.sections.iter().any(|s| s.id == MUSIC_SECTION_ID));
        assert_eq!(config.target_date, default_target());
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.sections.len(), Config::default().sections.len());
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config = Config::parse(
            r#"{
                "target_date": "2020-01-02T03:04:05Z",
                "quotes": ["hi"],
                "sections": [{"id": "home", "path": "home.html"}],
                "playlist": [{"title": "A", "artist": "X", "src": "a.mp3"}]
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.target_date,
            Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()
        );
        assert_eq!(config.quotes, vec!["hi".to_string()]);
        assert_eq!(config.playlist[0].label(), "A - X");
        assert_eq!(config.sections[0].path, PathBuf::from("home.html"));
    }
}
