use thiserror::Error;

/// Error type returned by collaborator implementations (network fetchers,
/// sinks, queues). Boxed so any implementation's error can be carried as a source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum DetailsError {
    #[error("Unsupported page type: {0}")]
    UnsupportedPageType(String),

    #[error("Missing {container} container in page data for {page_type} page")]
    MissingContainer {
        page_type: &'static str,
        container: &'static str,
    },

    #[error("Not a profile page")]
    NotAProfilePage,

    #[error("XHR for hasPublicStory not loaded correctly: {0}")]
    PublicStoryLookupFailed(#[source] BoxError),

    #[error("Failed to load {what}: {source}")]
    Enrichment {
        what: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Request queue error: {0}")]
    Queue(#[source] BoxError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DetailsError>;
