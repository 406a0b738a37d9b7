//! Reads the disc table of contents through libdiscid.

use discid::DiscId;
use thiserror::Error;

use crate::domain::disc::{DiscFingerprint, Toc};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot read disc in {device} (is an audio CD inserted?): {reason}")]
    Unreadable { device: String, reason: String },

    #[error("disc table of contents is unusable: {0}")]
    BadToc(String),
}

/// Source of the table of contents of the disc in a drive.
pub trait TocReader {
    fn read_toc(&self, device: &str) -> Result<Toc, DeviceError>;
}

/// Reads the drive with `discid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscIdReader;

impl TocReader for DiscIdReader {
    fn read_toc(&self, device: &str) -> Result<Toc, DeviceError> {
        let disc = DiscId::read(Some(device)).map_err(|e| DeviceError::Unreadable {
            device: device.to_string(),
            reason: e.to_string(),
        })?;

        let toc = toc_of(&disc)?;
        let computed = DiscFingerprint::from_toc(&toc).id;
        let reported = disc.freedb_id().to_lowercase();
        if computed != reported {
            log::warn!("libdiscid reported freedb id {reported}, computed {computed}");
        }
        Ok(toc)
    }
}

/// Converts libdiscid's view of a disc into a [`Toc`].
pub fn toc_of(disc: &DiscId) -> Result<Toc, DeviceError> {
    let first = disc.first_track_num();
    let last = disc.last_track_num();
    if first < 1 || last < first {
        return Err(DeviceError::BadToc(format!("tracks {first} to {last}")));
    }

    let offsets = (first..=last)
        .map(|number| {
            let offset = disc.nth_track(number).offset;
            u32::try_from(offset)
                .map_err(|_| DeviceError::BadToc(format!("track {number} at sector {offset}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let leadout = u32::try_from(disc.sectors())
        .map_err(|_| DeviceError::BadToc(format!("lead-out at sector {}", disc.sectors())))?;

    if offsets.windows(2).any(|pair| pair[0] >= pair[1])
        || offsets.last().is_some_and(|&offset| offset >= leadout)
    {
        return Err(DeviceError::BadToc(format!(
            "offsets {offsets:?}, lead-out {leadout}"
        )));
    }
    Ok(Toc { offsets, leadout })
}

/// Reads the TOC of the disc in `device` and fingerprints it.
pub fn read_fingerprint<T: TocReader>(
    reader: &T,
    device: &str,
) -> Result<DiscFingerprint, DeviceError> {
    let toc = reader.read_toc(device)?;
    let fingerprint = DiscFingerprint::from_toc(&toc);

    log::info!(
        "disc {} has {} tracks, {} s",
        fingerprint.id,
        fingerprint.track_count,
        fingerprint.length_seconds
    );
    Ok(fingerprint)
}
