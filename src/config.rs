//! Track list configuration
//!
//! The playable tracks come from `tracks.toml` next to the binary, or from
//! a small built-in list when the file is absent. The config yields two
//! index-aligned sequences (titles, urls) that the core zips into its
//! `TrackList`.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "tracks.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracks: Vec<TrackEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    pub title: String,
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        let entry = |title: &str, url: &str| TrackEntry {
            title: title.to_string(),
            url: url.to_string(),
        };

        Self {
            tracks: vec![
                entry(
                    "SoundHelix Song 1",
                    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
                ),
                entry(
                    "SoundHelix Song 2",
                    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
                ),
                entry(
                    "SoundHelix Song 3",
                    "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
                ),
            ],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read track list from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse track list TOML from {:?}", path))
    }

    /// Load the config file if present, fall back to the built-in list.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(?path, "No track list file, using built-in tracks");
            Ok(Self::default())
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.title.clone()).collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.url.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_track_entries() {
        let raw = r#"
            [[tracks]]
            title = "First"
            url = "http://example.com/first.mp3"

            [[tracks]]
            title = "Second"
            url = "http://example.com/second.mp3"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.titles(), vec!["First", "Second"]);
        assert_eq!(
            config.urls(),
            vec![
                "http://example.com/first.mp3",
                "http://example.com/second.mp3"
            ]
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[tracks]]\ntitle = \"Only\"\nurl = \"http://example.com/only.mp3\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.tracks.len(), 1);
        assert_eq!(config.tracks[0].title, "Only");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("does-not-exist.toml")).unwrap();
        assert!(!config.tracks.is_empty());
        assert_eq!(config.titles().len(), config.urls().len());
    }
}
