mod build;
mod write;

pub use build::{
    ENCLOSURE_MIME_TYPE, FeedDocument, FeedIdentity, ResolvedEpisode, UNKNOWN_ENCLOSURE_LENGTH,
};
pub use write::{AtomicFile, feed_filename, write_atomic};
