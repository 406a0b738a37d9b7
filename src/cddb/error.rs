use thiserror::Error;

#[derive(Debug, Error)]
pub enum CddbError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Either the HTTP status or the CDDB response code was not 2xx.
    #[error("query failed with status {status}")]
    Service { status: u16 },

    #[error("malformed CDDB response: {0}")]
    Malformed(String),

    #[error("track listing has no title for track {0}")]
    MissingTrackTitle(usize),
}
