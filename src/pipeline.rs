// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use url::Url;

use crate::error::{FeedError, FetchError, WriteError};
use crate::feed::{FeedDocument, FeedIdentity, ResolvedEpisode, feed_filename, write_atomic};
use crate::http::HttpClient;
use crate::program::{extract_episodes, extract_program, fetch_program};
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::resolve::resolve_media_url;

/// Options for feed generation
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    /// Channel identity not provided by the program document
    pub identity: FeedIdentity,
    /// Leave out episodes whose media URL cannot be resolved instead of
    /// aborting the whole run
    pub continue_on_error: bool,
}

/// Result of a feed generation run
#[derive(Debug, Clone)]
pub struct FeedResult {
    /// Path of the written feed
    pub path: PathBuf,
    /// Number of episodes in the feed
    pub episodes: usize,
    /// Details of episodes left out (title, error message)
    pub skipped_episodes: Vec<(String, String)>,
}

/// Generate the podcast feed for a program page and write it to `output_dir`
///
/// This is the main entry point for the library. It:
/// 1. Fetches and parses the program document
/// 2. Extracts episodes that carry audio
/// 3. Resolves each episode's media URL, one at a time
/// 4. Builds the feed and writes it atomically
///
/// Nothing is written unless every step before the write succeeds.
pub async fn generate_feed<C: HttpClient>(
    client: &C,
    program_url: &str,
    output_dir: &Path,
    options: &FeedOptions,
    reporter: SharedProgressReporter,
) -> Result<FeedResult, FeedError> {
    let program_url = Url::parse(program_url).map_err(FetchError::from)?;

    if !output_dir.is_dir() {
        return Err(WriteError::DirectoryNotFound(output_dir.to_path_buf()).into());
    }
    let destination = output_dir.join(feed_filename(&program_url)?);

    reporter.report(ProgressEvent::FetchingProgram {
        url: program_url.to_string(),
    });

    let document = fetch_program(client, &program_url).await?;
    let program = extract_program(&document, &program_url)?;
    let episodes = extract_episodes(&document, &program_url)?;

    info!(
        title = %program.title,
        cards = document.block.cards.len(),
        episodes = episodes.len(),
        "program parsed"
    );
    reporter.report(ProgressEvent::ProgramParsed {
        program_title: program.title.clone(),
        total_cards: document.block.cards.len(),
        episodes: episodes.len(),
    });

    let total_episodes = episodes.len();
    let mut resolved = Vec::with_capacity(total_episodes);
    let mut skipped_episodes = Vec::new();

    for (episode_index, episode) in episodes.into_iter().enumerate() {
        reporter.report(ProgressEvent::ResolvingEpisode {
            episode_title: episode.title.clone(),
            episode_index,
            total_episodes,
        });

        match resolve_media_url(client, &episode.audio_url).await {
            Ok(media) => {
                reporter.report(ProgressEvent::EpisodeResolved {
                    episode_title: episode.title.clone(),
                    media_url: media.url.to_string(),
                });
                resolved.push(ResolvedEpisode {
                    episode,
                    media_url: media.url,
                    media_length: media.length,
                });
            }
            Err(e) if options.continue_on_error => {
                warn!(title = %episode.title, error = %e, "leaving out unresolved episode");
                reporter.report(ProgressEvent::EpisodeSkipped {
                    episode_title: episode.title.clone(),
                    error: e.to_string(),
                });
                skipped_episodes.push((episode.title, e.to_string()));
            }
            Err(e) => {
                return Err(FeedError::Resolve {
                    title: episode.title,
                    source: e,
                });
            }
        }
    }

    let feed = FeedDocument::new(program, resolved);
    let xml = feed.to_xml(&options.identity)?;

    reporter.report(ProgressEvent::WritingFeed {
        path: destination.clone(),
    });
    let path = write_atomic(&destination, &xml)?;

    reporter.report(ProgressEvent::FeedCompleted {
        path: path.clone(),
        episode_count: feed.episodes.len(),
        skipped_count: skipped_episodes.len(),
    });

    Ok(FeedResult {
        path,
        episodes: feed.episodes.len(),
        skipped_episodes,
    })
}
