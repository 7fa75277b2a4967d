use thiserror::Error;

/// Errors thrown by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied board code is not on the allow-list.
    #[error("'{0}' is not a valid board")]
    InvalidBoard(String),

    /// A request kept failing after every allowed attempt.
    #[error("request for {url} failed after {attempts} attempt(s): {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// How many attempts were made before giving up.
        attempts: u32,
        /// Status code or transport error of the final attempt.
        reason: String,
    },

    /// The endpoint answered but the body was not the JSON we expect.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        /// The URL that produced the malformed body.
        url: String,
        /// The underlying deserialization error.
        source: serde_json::Error,
    },

    /// An attachment could not be downloaded. Non-fatal: the image is skipped.
    #[error("image {url} could not be fetched: {reason}")]
    Image {
        /// The media URL that failed.
        url: String,
        /// Why the download failed.
        reason: String,
    },

    /// Transport-level failure from the HTTP client.
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// Directory creation or file write failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The rate limiter shut down while a request was waiting on it.
    #[error("rate limiter closed: {0}")]
    Limiter(#[from] tokio::sync::AcquireError),
}
