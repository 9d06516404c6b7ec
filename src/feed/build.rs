// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rss::extension::itunes::{
    ITunesCategoryBuilder, ITunesChannelExtensionBuilder, ITunesItemExtensionBuilder,
    ITunesOwnerBuilder,
};
use rss::validation::Validate;
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder};
use url::Url;

use crate::error::WriteError;
use crate::program::{EpisodeRecord, ProgramMetadata};

/// MIME type announced for every enclosure
pub const ENCLOSURE_MIME_TYPE: &str = "audio/mpeg";

/// Enclosure length written when the media size is not known
pub const UNKNOWN_ENCLOSURE_LENGTH: &str = "0";

/// Feed identity that does not come from the provider
#[derive(Debug, Clone)]
pub struct FeedIdentity {
    pub author: String,
    pub language: String,
    pub owner_email: Option<String>,
    /// Prepended to each episode's unique name to form its GUID
    pub guid_prefix: String,
}

impl Default for FeedIdentity {
    fn default() -> Self {
        Self {
            author: "RaiPlaySound".to_string(),
            language: "it-it".to_string(),
            owner_email: None,
            guid_prefix: "raiplay-feed-".to_string(),
        }
    }
}

/// An episode paired with its playable media URL
#[derive(Debug, Clone)]
pub struct ResolvedEpisode {
    pub episode: EpisodeRecord,
    pub media_url: Url,
    /// Media size in bytes, as announced by the media server
    pub media_length: Option<u64>,
}

/// Everything needed to render the feed, episodes newest first
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub program: ProgramMetadata,
    pub episodes: Vec<ResolvedEpisode>,
}

impl FeedDocument {
    /// Assemble a document, stably sorting episodes by publish date descending
    pub fn new(program: ProgramMetadata, mut episodes: Vec<ResolvedEpisode>) -> Self {
        episodes.sort_by(|a, b| b.episode.pub_date.at.cmp(&a.episode.pub_date.at));
        Self { program, episodes }
    }

    /// Build the RSS channel for this document
    pub fn to_channel(&self, identity: &FeedIdentity) -> Channel {
        let program = &self.program;

        let categories = program
            .categories
            .iter()
            .map(|name| ITunesCategoryBuilder::default().text(name.as_str()).build())
            .collect::<Vec<_>>();

        let owner = ITunesOwnerBuilder::default()
            .name(identity.author.clone())
            .email(identity.owner_email.clone())
            .build();

        let itunes = ITunesChannelExtensionBuilder::default()
            .author(identity.author.clone())
            .image(program.image_url.to_string())
            .categories(categories)
            .owner(owner)
            .summary(program.description.clone())
            .build();

        let image = ImageBuilder::default()
            .url(program.image_url.as_str())
            .title(program.title.as_str())
            .link(program.page_url.as_str())
            .build();

        let items = self
            .episodes
            .iter()
            .map(|resolved| episode_to_item(resolved, identity))
            .collect::<Vec<_>>();

        ChannelBuilder::default()
            .title(program.title.as_str())
            .link(program.page_url.as_str())
            .description(program.description.as_str())
            .language(identity.language.clone())
            .image(image)
            .itunes_ext(itunes)
            .items(items)
            .build()
    }

    /// Render the document as RSS XML, rejecting structurally invalid output
    pub fn to_xml(&self, identity: &FeedIdentity) -> Result<String, WriteError> {
        let channel = self.to_channel(identity);
        validate(&channel)?;
        Ok(channel.to_string())
    }
}

/// Validate a channel, accepting unknown enclosure lengths
fn validate(channel: &Channel) -> Result<(), WriteError> {
    let mut checked = channel.clone();

    for item in checked.items_mut() {
        let Some(mut enclosure) = item.enclosure().cloned() else {
            continue;
        };
        if enclosure.length() == UNKNOWN_ENCLOSURE_LENGTH {
            enclosure.set_length("1");
            item.set_enclosure(enclosure);
        }
    }

    checked
        .validate()
        .map_err(|e| WriteError::InvalidFeed(e.to_string()))
}

fn episode_to_item(resolved: &ResolvedEpisode, identity: &FeedIdentity) -> Item {
    let episode = &resolved.episode;

    let length = resolved
        .media_length
        .filter(|length| *length > 0)
        .map_or_else(|| UNKNOWN_ENCLOSURE_LENGTH.to_string(), |length| length.to_string());

    let enclosure = EnclosureBuilder::default()
        .url(resolved.media_url.as_str())
        .length(length)
        .mime_type(ENCLOSURE_MIME_TYPE)
        .build();

    let guid = GuidBuilder::default()
        .value(format!("{}{}", identity.guid_prefix, episode.unique_name))
        .permalink(false)
        .build();

    let itunes = ITunesItemExtensionBuilder::default()
        .duration(episode.duration.clone())
        .summary(episode.description.clone())
        .image(episode.image_url.to_string())
        .build();

    ItemBuilder::default()
        .title(episode.title.clone())
        .link(episode.page_url.to_string())
        .description(episode.description.clone())
        .guid(guid)
        .pub_date(episode.pub_date.at.to_rfc2822())
        .enclosure(enclosure)
        .itunes_ext(itunes)
        .build()
}
