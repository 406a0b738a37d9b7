//! Rips a disc with cdparanoia into the library and names the files.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::Utc;
use thiserror::Error;

use crate::{
    domain::metadata::{DiscMetadataRecord, ReconciledMetadata},
    system::command::{CommandError, CommandRunner, Invocation},
};

pub mod naming;
pub mod record;

use naming::{TOC_LABEL, TOC_TRACK_FILE, disc_dir_name, ripped_track_name, titled_track_name};

#[derive(Debug, Error)]
pub enum RipError {
    #[error("destination directory {} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("cdparanoia failed with exit code {code:?}")]
    RipFailed { code: Option<i32> },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("filesystem error: {0}")]
    Fs(#[from] io::Error),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Settings the orchestrator needs from the resolved configuration.
#[derive(Debug, Clone)]
pub struct RipSettings {
    pub device: String,
    pub library_dir: PathBuf,
    pub read_speed: u32,
}

pub struct Ripper<'a, R: CommandRunner> {
    settings: &'a RipSettings,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Ripper<'a, R> {
    pub fn new(settings: &'a RipSettings, runner: &'a R) -> Self {
        Self { settings, runner }
    }

    /// Rips the disc into a fresh directory under the library root, renames
    /// the tracks from the preferred entry and saves the record there.
    ///
    /// Returns the destination directory.
    pub fn rip(&self, record: &mut DiscMetadataRecord) -> Result<PathBuf, RipError> {
        let dest = self.create_destination(record)?;

        self.run_cdparanoia(&dest)?;
        rename_tracks(&dest, record)?;

        record.ripped_at = Some(Utc::now());
        record::save_record(&dest, record)?;

        log::info!("rip finished in {}", dest.display());
        Ok(dest)
    }

    fn create_destination(&self, record: &DiscMetadataRecord) -> Result<PathBuf, RipError> {
        let dest = self.settings.library_dir.join(disc_dir_name(record));
        if dest.exists() {
            return Err(RipError::DestinationExists(dest));
        }
        fs::create_dir_all(&dest)?;
        log::info!("created {}", dest.display());
        Ok(dest)
    }

    fn run_cdparanoia(&self, dest: &Path) -> Result<(), RipError> {
        let invocation = Invocation::new("cdparanoia")
            .args([
                "--log-debug=/dev/null",
                "--log-summary=/dev/null",
                "--output-wav",
                "--batch",
                "--never-skip",
            ])
            .arg(format!("--force-read-speed={}", self.settings.read_speed))
            .arg(format!("--force-cdrom-device={}", self.settings.device))
            .current_dir(dest);

        log::info!("ripping {} at speed {}", self.settings.device, self.settings.read_speed);
        let completed = self.runner.run(&invocation)?;
        if completed.success() {
            Ok(())
        } else {
            Err(RipError::RipFailed {
                code: completed.code,
            })
        }
    }
}

fn rename(dir: &Path, from: &str, to: &str) -> Result<(), RipError> {
    fs::rename(dir.join(from), dir.join(to)).map_err(|source| RipError::Rename {
        from: from.to_string(),
        to: to.to_string(),
        source,
    })
}

/// Labels the TOC file and, when an entry is preferred, gives every track
/// file its title. Track files keep their ripper names otherwise.
pub fn rename_tracks(dir: &Path, record: &DiscMetadataRecord) -> Result<(), RipError> {
    rename(dir, TOC_TRACK_FILE, TOC_LABEL)?;

    let ReconciledMetadata::Resolved { listing, .. } = record.reconciled() else {
        return Ok(());
    };

    for (index, title) in listing
        .titles
        .iter()
        .take(record.fingerprint.track_count as usize)
        .enumerate()
    {
        let number = index + 1;
        rename(dir, &ripped_track_name(number), &titled_track_name(number, title))?;
    }
    Ok(())
}
