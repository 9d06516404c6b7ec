pub mod error;
pub mod feed;
pub mod http;
pub mod pipeline;
pub mod program;
pub mod progress;
pub mod resolve;

// Re-export main types for convenience
pub use error::{ClientError, FeedError, FetchError, ParseError, ResolveError, WriteError};
pub use feed::{FeedDocument, FeedIdentity, ResolvedEpisode, feed_filename, write_atomic};
pub use http::{ByteStream, ClientConfig, HttpClient, HttpResponse, ReqwestClient};
pub use pipeline::{FeedOptions, FeedResult, generate_feed};
pub use program::{EpisodeRecord, ProgramMetadata, PublishDate, parse_publish_date};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use resolve::{ResolvedMedia, normalize_audio_url, resolve_media_url};
