use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while generating a feed, for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Program metadata is being fetched
    FetchingProgram { url: String },

    /// Program metadata has been parsed
    ProgramParsed {
        program_title: String,
        total_cards: usize,
        episodes: usize,
    },

    /// An episode's media URL is being resolved
    ResolvingEpisode {
        episode_title: String,
        /// Index of this episode in provider order
        episode_index: usize,
        total_episodes: usize,
    },

    /// An episode's media URL was resolved
    EpisodeResolved {
        episode_title: String,
        media_url: String,
    },

    /// An episode could not be resolved and was left out of the feed
    EpisodeSkipped { episode_title: String, error: String },

    /// The feed is being written to disk
    WritingFeed { path: PathBuf },

    /// Feed generation completed
    FeedCompleted {
        path: PathBuf,
        episode_count: usize,
        skipped_count: usize,
    },
}

/// Trait for reporting progress events during feed generation.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
