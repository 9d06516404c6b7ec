use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the HTTP client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid value for header {name}: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("Failed to build HTTP client: {0}")]
    BuildFailed(#[from] reqwest::Error),
}

/// Errors that can occur when fetching the program document
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid program URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch program metadata from {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

/// Errors that can occur when interpreting the program document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Program document from {url} is malformed: {source}")]
    InvalidDocument {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Episode '{episode}' is missing required field '{field}'")]
    MissingField { episode: String, field: &'static str },

    #[error("Invalid URL '{value}' in program document: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur while resolving an episode's media URL
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("HTTP request failed for {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Manifest at {url} lists no segment")]
    EmptyManifest { url: String },

    #[error("Cannot derive a media URL from {url}")]
    InvalidUrl { url: String },
}

/// Errors that can occur when writing the feed to disk
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Output directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Cannot derive a feed filename from {0}")]
    NoFilename(String),

    #[error("Failed to create temporary file in {dir}: {source}")]
    TempFileFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move feed into place at {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generated feed is invalid: {0}")]
    InvalidFeed(String),
}

/// Top-level errors for feed generation
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to resolve media for episode '{title}': {source}")]
    Resolve {
        title: String,
        #[source]
        source: ResolveError,
    },

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}
