//! Serde view of the provider's program document.
//!
//! Program-level fields the feed cannot do without are required here, so a
//! malformed document fails at deserialization. Card fields stay optional:
//! cards without audio are skipped by the extractor and must not fail the
//! run just because they carry a different shape.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramDocument {
    pub title: String,
    pub podcast_info: PodcastInfo,
    pub block: Block,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PodcastInfo {
    #[serde(default)]
    pub description: Option<String>,
    pub image: String,
    pub genres: Vec<Category>,
    pub subgenres: Vec<Category>,
    pub dfp: Dfp,
}

/// Advertising taxonomy, which doubles as an extra category source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dfp {
    #[serde(default)]
    pub escaped_genres: Vec<Category>,
    #[serde(default)]
    pub escaped_typology: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub audio: Option<Audio>,
    #[serde(default)]
    pub toptitle: Option<String>,
    #[serde(default)]
    pub uniquename: Option<String>,
    #[serde(default)]
    pub track_info: Option<TrackInfo>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Audio {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<Duration>,
}

/// Episode length as published by the provider
///
/// Usually an `HH:MM:SS` string, occasionally a bare number of seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Duration {
    Text(String),
    Seconds(u64),
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Duration::Text(text) => f.write_str(text),
            Duration::Seconds(seconds) => write!(f, "{seconds}"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackInfo {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_deserializes() {
        let json = r#"{
            "title": "Il ruggito del coniglio",
            "podcast_info": {
                "image": "/img/cover.jpg",
                "genres": [{"name": "Comedy"}],
                "subgenres": [],
                "dfp": {}
            },
            "block": {}
        }"#;

        let doc: ProgramDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.title, "Il ruggito del coniglio");
        assert!(doc.podcast_info.description.is_none());
        assert!(doc.podcast_info.dfp.escaped_genres.is_empty());
        assert!(doc.block.cards.is_empty());
    }

    #[test]
    fn missing_program_title_is_rejected() {
        let json = r#"{
            "podcast_info": {"image": "x", "genres": [], "subgenres": [], "dfp": {}},
            "block": {}
        }"#;

        let err = serde_json::from_str::<ProgramDocument>(json).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn duration_accepts_text_and_seconds() {
        let text: Audio = serde_json::from_str(r#"{"url": "u", "duration": "00:27:29"}"#).unwrap();
        let seconds: Audio = serde_json::from_str(r#"{"url": "u", "duration": 1649}"#).unwrap();

        assert_eq!(text.duration.unwrap().to_string(), "00:27:29");
        assert_eq!(seconds.duration.unwrap().to_string(), "1649");
    }

    #[test]
    fn card_without_audio_deserializes() {
        let card: Card = serde_json::from_str(r#"{"title": "Promo"}"#).unwrap();
        assert!(card.audio.is_none());
        assert_eq!(card.title.as_deref(), Some("Promo"));
    }
}
