//! Disc lookups against a CDDB-compatible (freedb) mirror.

pub mod client;
pub mod error;
pub mod response;
pub mod throttle;

use crate::domain::{disc::DiscFingerprint, metadata::MetadataEntry};
use client::CddbClient;
use error::CddbError;
use throttle::Throttle;

/// Queries the mirror for a disc and fetches the track listing of every
/// candidate. `throttle` spaces each track query from the end of the previous
/// one.
pub fn fetch_entries(
    client: &CddbClient,
    fingerprint: &DiscFingerprint,
    throttle: &mut Throttle,
) -> Result<Vec<MetadataEntry>, CddbError> {
    let candidates = client.query_disc(fingerprint)?;

    let mut entries = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        throttle.wait();
        let listing = client.query_tracks(&candidate, fingerprint.track_count as usize)?;
        throttle.mark();
        entries.push(MetadataEntry { candidate, listing });
    }
    Ok(entries)
}
