use crate::domain::metadata::{DiscMetadataRecord, ReconciledMetadata};

pub const AUDIO_EXTENSION: &str = "wav";
pub const TOC_TRACK_FILE: &str = "track00.cdda.wav";
pub const TOC_LABEL: &str = "00 - CDDA TOC.wav";
pub const RECORD_FILE: &str = "00 - disc info.yaml";

const PATH_SEPARATORS: &[char] = &['/', '\\'];
const SEPARATOR_SUBSTITUTE: &str = "::";

/// Replaces path separators so a title stays within one path component.
pub fn sanitize(title: &str) -> String {
    title.replace(PATH_SEPARATORS, SEPARATOR_SUBSTITUTE)
}

/// Directory name for a disc: the preferred title, or the disc id when
/// there is none or the title is blank, `.` or `..`.
pub fn disc_dir_name(record: &DiscMetadataRecord) -> String {
    match record.reconciled() {
        ReconciledMetadata::Resolved { candidate, .. } => {
            let name = sanitize(&candidate.title);
            if matches!(name.trim(), "" | "." | "..") {
                record.fingerprint.id.clone()
            } else {
                name
            }
        }
        ReconciledMetadata::NoMatch => record.fingerprint.id.clone(),
    }
}

/// Name cdparanoia gives track `number` (1-based).
pub fn ripped_track_name(number: usize) -> String {
    format!("track{number:02}.cdda.{AUDIO_EXTENSION}")
}

pub fn titled_track_name(number: usize, title: &str) -> String {
    format!("{number:02} - {}.{AUDIO_EXTENSION}", sanitize(title))
}
