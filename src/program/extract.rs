// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;

use tracing::debug;
use url::Url;

use crate::error::ParseError;

use super::date::{PublishDate, parse_publish_date};
use super::schema::{Card, ProgramDocument};

/// Program-level metadata shared by every episode
#[derive(Debug, Clone)]
pub struct ProgramMetadata {
    pub title: String,
    pub description: String,
    pub page_url: Url,
    pub image_url: Url,
    /// Union of every category-like taxonomy, deduplicated and sorted
    pub categories: BTreeSet<String>,
}

/// One playable episode taken from the program document
#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    pub title: String,
    pub unique_name: String,
    pub pub_date: PublishDate,
    pub page_url: Url,
    pub description: String,
    /// Raw audio reference as published, never empty
    pub audio_url: String,
    pub duration: String,
    pub image_url: Url,
}

/// Build the program metadata from a parsed document
pub fn extract_program(
    doc: &ProgramDocument,
    program_url: &Url,
) -> Result<ProgramMetadata, ParseError> {
    let info = &doc.podcast_info;

    let categories = info
        .genres
        .iter()
        .chain(&info.subgenres)
        .chain(&info.dfp.escaped_genres)
        .chain(&info.dfp.escaped_typology)
        .map(|category| category.name.clone())
        .collect();

    Ok(ProgramMetadata {
        title: doc.title.clone(),
        description: info
            .description
            .clone()
            .unwrap_or_else(|| doc.title.clone()),
        page_url: program_url.clone(),
        image_url: join_url(program_url, &info.image)?,
        categories,
    })
}

/// Collect every card that carries audio, in provider order
///
/// Cards without an audio reference are skipped. Cards with audio must carry
/// the rest of the episode fields.
pub fn extract_episodes(
    doc: &ProgramDocument,
    program_url: &Url,
) -> Result<Vec<EpisodeRecord>, ParseError> {
    let mut episodes = Vec::new();

    for (index, card) in doc.block.cards.iter().enumerate() {
        let Some(audio_url) = audio_reference(card) else {
            debug!(index, title = ?card.title, "skipping card without audio");
            continue;
        };

        episodes.push(extract_episode(card, index, audio_url, program_url)?);
    }

    Ok(episodes)
}

fn audio_reference(card: &Card) -> Option<&str> {
    card.audio
        .as_ref()
        .and_then(|audio| audio.url.as_deref())
        .filter(|url| !url.trim().is_empty())
}

fn extract_episode(
    card: &Card,
    index: usize,
    audio_url: &str,
    program_url: &Url,
) -> Result<EpisodeRecord, ParseError> {
    let label = card
        .uniquename
        .clone()
        .or_else(|| card.title.clone())
        .unwrap_or_else(|| format!("#{index}"));
    let missing = |field| ParseError::MissingField {
        episode: label.clone(),
        field,
    };

    let title = card.toptitle.clone().ok_or_else(|| missing("toptitle"))?;
    let unique_name = card.uniquename.clone().ok_or_else(|| missing("uniquename"))?;
    let track_info = card.track_info.as_ref().ok_or_else(|| missing("track_info"))?;
    let page_url = track_info
        .page_url
        .as_deref()
        .ok_or_else(|| missing("track_info.page_url"))?;
    let image = card.image.as_deref().ok_or_else(|| missing("image"))?;
    let duration = card
        .audio
        .as_ref()
        .and_then(|audio| audio.duration.as_ref())
        .ok_or_else(|| missing("audio.duration"))?;
    let description = card
        .description
        .clone()
        .or_else(|| card.title.clone())
        .ok_or_else(|| missing("description"))?;

    Ok(EpisodeRecord {
        title,
        unique_name,
        pub_date: parse_publish_date(track_info.date.as_deref()),
        page_url: join_url(program_url, page_url)?,
        description,
        audio_url: audio_url.to_string(),
        duration: duration.to_string(),
        image_url: join_url(program_url, image)?,
    })
}

/// Resolve a possibly relative provider URL against the program URL
fn join_url(base: &Url, value: &str) -> Result<Url, ParseError> {
    base.join(value).map_err(|e| ParseError::InvalidUrl {
        value: value.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM_URL: &str = "https://www.raiplaysound.it/programmi/ilruggitodelconiglio";

    fn program_url() -> Url {
        Url::parse(PROGRAM_URL).unwrap()
    }

    fn parse(json: &str) -> ProgramDocument {
        serde_json::from_str(json).unwrap()
    }

    const SAMPLE_DOCUMENT: &str = r#"{
        "title": "Il ruggito del coniglio",
        "podcast_info": {
            "description": "Radio comedy",
            "image": "/cropgd/cover.jpg",
            "genres": [{"name": "Satira"}, {"name": "Comico"}],
            "subgenres": [{"name": "Comico"}],
            "dfp": {
                "escaped_genres": [{"name": "Attualita"}],
                "escaped_typology": [{"name": "Satira"}]
            }
        },
        "block": {
            "cards": [
                {
                    "audio": {"url": "ttp://relinker/1", "duration": "00:50:00"},
                    "toptitle": "Puntata del 02/05",
                    "uniquename": "ContentItem-1",
                    "track_info": {"date": "2023-05-02", "page_url": "/audio/2023/05/ep1.html"},
                    "description": "First",
                    "title": "Ep 1",
                    "image": "/img/ep1.jpg"
                },
                {
                    "title": "Trailer without audio",
                    "image": "/img/trailer.jpg"
                },
                {
                    "audio": {"url": "", "duration": "00:01:00"},
                    "title": "Empty audio"
                },
                {
                    "audio": {"url": "https://relinker/2", "duration": 1800},
                    "toptitle": "Puntata del 01/05",
                    "uniquename": "ContentItem-2",
                    "track_info": {"page_url": "https://www.raiplaysound.it/audio/ep2.html"},
                    "title": "Ep 2 title as description",
                    "image": "https://cdn.example.com/ep2.jpg"
                }
            ]
        }
    }"#;

    #[test]
    fn extract_program_unions_and_sorts_categories() {
        let program = extract_program(&parse(SAMPLE_DOCUMENT), &program_url()).unwrap();

        let categories: Vec<_> = program.categories.iter().map(String::as_str).collect();
        assert_eq!(categories, vec!["Attualita", "Comico", "Satira"]);
    }

    #[test]
    fn extract_program_resolves_image_against_program_url() {
        let program = extract_program(&parse(SAMPLE_DOCUMENT), &program_url()).unwrap();

        assert_eq!(program.title, "Il ruggito del coniglio");
        assert_eq!(program.description, "Radio comedy");
        assert_eq!(
            program.image_url.as_str(),
            "https://www.raiplaysound.it/cropgd/cover.jpg"
        );
        assert_eq!(program.page_url.as_str(), PROGRAM_URL);
    }

    #[test]
    fn extract_program_falls_back_to_title_for_description() {
        let doc = parse(
            r#"{
                "title": "No description",
                "podcast_info": {"image": "/c.jpg", "genres": [], "subgenres": [], "dfp": {}},
                "block": {}
            }"#,
        );

        let program = extract_program(&doc, &program_url()).unwrap();
        assert_eq!(program.description, "No description");
        assert!(program.categories.is_empty());
    }

    #[test]
    fn extract_episodes_skips_cards_without_audio() {
        let episodes = extract_episodes(&parse(SAMPLE_DOCUMENT), &program_url()).unwrap();

        assert_eq!(episodes.len(), 2);
        assert!(episodes.iter().all(|ep| !ep.audio_url.is_empty()));
        assert_eq!(episodes[0].unique_name, "ContentItem-1");
        assert_eq!(episodes[1].unique_name, "ContentItem-2");
    }

    #[test]
    fn extract_episodes_maps_fields() {
        let episodes = extract_episodes(&parse(SAMPLE_DOCUMENT), &program_url()).unwrap();

        let first = &episodes[0];
        assert_eq!(first.title, "Puntata del 02/05");
        assert_eq!(first.description, "First");
        assert_eq!(first.audio_url, "ttp://relinker/1");
        assert_eq!(first.duration, "00:50:00");
        assert!(!first.pub_date.is_fallback());
        assert_eq!(
            first.page_url.as_str(),
            "https://www.raiplaysound.it/audio/2023/05/ep1.html"
        );
        assert_eq!(first.image_url.as_str(), "https://www.raiplaysound.it/img/ep1.jpg");

        let second = &episodes[1];
        assert_eq!(second.description, "Ep 2 title as description");
        assert_eq!(second.duration, "1800");
        assert!(second.pub_date.is_fallback());
        assert_eq!(second.image_url.as_str(), "https://cdn.example.com/ep2.jpg");
    }

    #[test]
    fn extract_episodes_reports_missing_required_field() {
        let doc = parse(
            r#"{
                "title": "T",
                "podcast_info": {"image": "/c.jpg", "genres": [], "subgenres": [], "dfp": {}},
                "block": {"cards": [{
                    "audio": {"url": "https://relinker/1", "duration": "00:10:00"},
                    "uniquename": "ContentItem-9",
                    "track_info": {"page_url": "/a.html"},
                    "title": "T",
                    "image": "/i.jpg"
                }]}
            }"#,
        );

        match extract_episodes(&doc, &program_url()).unwrap_err() {
            ParseError::MissingField { episode, field } => {
                assert_eq!(episode, "ContentItem-9");
                assert_eq!(field, "toptitle");
            }
            other => panic!("Expected MissingField error, got {other:?}"),
        }
    }
}
