use serde::{Deserialize, Serialize};

/// CD frames (sectors) per second of audio.
pub const FRAMES_PER_SECOND: u32 = 75;

/// Table of contents of an audio disc.
///
/// Offsets are absolute frame addresses, including the 2 second lead-in,
/// which is the form libdiscid reports them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toc {
    pub offsets: Vec<u32>,
    pub leadout: u32,
}

impl Toc {
    pub fn track_count(&self) -> u32 {
        self.offsets.len() as u32
    }

    pub fn length_seconds(&self) -> u32 {
        self.leadout / FRAMES_PER_SECOND
    }
}

/// Identifies a disc for CDDB lookups.
///
/// Computed once when the session starts and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscFingerprint {
    pub id: String,
    pub track_count: u32,
    pub offsets: Vec<u32>,
    pub length_seconds: u32,
}

impl DiscFingerprint {
    pub fn from_toc(toc: &Toc) -> Self {
        Self {
            id: format!("{:08x}", cddb_disc_id(toc)),
            track_count: toc.track_count(),
            offsets: toc.offsets.clone(),
            length_seconds: toc.length_seconds(),
        }
    }
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Standard freedb disc id checksum.
pub fn cddb_disc_id(toc: &Toc) -> u32 {
    let checksum: u32 = toc
        .offsets
        .iter()
        .map(|offset| digit_sum(offset / FRAMES_PER_SECOND))
        .sum();

    let first = toc.offsets.first().copied().unwrap_or(0) / FRAMES_PER_SECOND;
    let total = toc.length_seconds().saturating_sub(first);

    ((checksum % 0xff) << 24) | (total << 8) | toc.track_count()
}
