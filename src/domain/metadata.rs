use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::disc::DiscFingerprint;

/// One CDDB search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub category: String,
    pub disc_id: String,
    /// Usually "Artist / Album"
    pub title: String,
}

/// Track titles of one candidate, indexed from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackListing {
    pub titles: Vec<String>,
    /// Remaining xmcd fields (DTITLE, DYEAR, DGENRE, EXTD, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub candidate: CandidateRecord,
    pub listing: TrackListing,
}

/// Everything known about a disc for one rip session.
///
/// `preferred` indexes into `entries`; there is at most one preferred entry,
/// and none when the database had no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscMetadataRecord {
    pub fingerprint: DiscFingerprint,
    #[serde(default)]
    pub entries: Vec<MetadataEntry>,
    #[serde(default)]
    pub preferred: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ripped_at: Option<DateTime<Utc>>,
}

/// Outcome of reconciliation, borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciledMetadata<'a> {
    NoMatch,
    Resolved {
        candidate: &'a CandidateRecord,
        listing: &'a TrackListing,
    },
}

impl DiscMetadataRecord {
    pub fn new(fingerprint: DiscFingerprint, entries: Vec<MetadataEntry>) -> Self {
        Self {
            fingerprint,
            entries,
            preferred: None,
            ripped_at: None,
        }
    }

    pub fn reconciled(&self) -> ReconciledMetadata<'_> {
        match self.preferred.and_then(|index| self.entries.get(index)) {
            Some(entry) => ReconciledMetadata::Resolved {
                candidate: &entry.candidate,
                listing: &entry.listing,
            },
            None => ReconciledMetadata::NoMatch,
        }
    }

    pub fn has_match(&self) -> bool {
        matches!(self.reconciled(), ReconciledMetadata::Resolved { .. })
    }
}
