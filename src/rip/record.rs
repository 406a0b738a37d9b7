//! Persistence of the disc metadata record next to the ripped audio.

use std::{fs, path::Path};

use super::{RipError, naming::RECORD_FILE};
use crate::domain::metadata::DiscMetadataRecord;

pub fn save_record(dir: &Path, record: &DiscMetadataRecord) -> Result<(), RipError> {
    let yaml = serde_yaml::to_string(record)?;
    fs::write(dir.join(RECORD_FILE), yaml)?;
    Ok(())
}

pub fn load_record(path: &Path) -> Result<DiscMetadataRecord, RipError> {
    let yaml = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&yaml)?)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;
    use crate::domain::metadata::fixtures;

    #[test]
    fn saved_record_loads_back_identically() {
        let tmp = TempDir::new().unwrap();
        let mut record = DiscMetadataRecord::new(
            fixtures::fingerprint(3),
            vec![fixtures::entry("Band / One", 3), fixtures::entry("Band: Two", 3)],
        );
        record.entries[1]
            .listing
            .extended
            .insert("DYEAR".to_string(), "2001".to_string());
        record.entries[0].listing.titles[1] = "Quote \"and\" colon: yes".to_string();
        record.preferred = Some(1);
        record.ripped_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());

        save_record(tmp.path(), &record).unwrap();
        let loaded = load_record(&tmp.path().join(RECORD_FILE)).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn record_without_matches_round_trips() {
        let tmp = TempDir::new().unwrap();
        let record = DiscMetadataRecord::new(fixtures::fingerprint(5), vec![]);

        save_record(tmp.path(), &record).unwrap();
        let text = std::fs::read_to_string(tmp.path().join(RECORD_FILE)).unwrap();
        let loaded = load_record(&tmp.path().join(RECORD_FILE)).unwrap();

        assert!(text.contains("id: a1b2c3d4"));
        assert_eq!(loaded, record);
        assert_eq!(loaded.preferred, None);
    }
}
