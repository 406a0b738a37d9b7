use chrono::Local;
use clap::{Parser, Subcommand};
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    cddb::{self, client::CddbClient, throttle::Throttle},
    config::{Config, FileConfig},
    domain::{
        disc::DiscFingerprint,
        metadata::{DiscMetadataRecord, MetadataEntry, ReconciledMetadata},
    },
    error::AppError,
    reconcile::{display_entries, reconcile},
    rip::{Ripper, naming::RECORD_FILE, record::load_record},
    system::{
        command::{CommandRunner, SystemRunner},
        drive::Drive,
        toc::{DiscIdReader, TocReader, read_fingerprint},
    },
};

const DEFAULT_CONFIG: &str = "discrip.toml";

#[derive(Parser)]
#[command(name = "discrip")]
#[command(version)]
#[command(about = "Rip audio CDs and name the tracks from a CDDB mirror")]
pub struct Cli {
    /// Path to the config TOML file [default: discrip.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CD drive device name [default: /dev/sr0]
    #[arg(short, long)]
    pub device: Option<String>,

    /// File containing the HTTP client agent `name/version` [default: agent]
    #[arg(short, long)]
    pub agent_file: Option<PathBuf>,

    /// File containing the Discogs API token [default: token]
    #[arg(short, long)]
    pub token_file: Option<PathBuf>,

    /// CDDB mirror URL [default: http://freedb.freedb.org/~cddb/cddb.cgi]
    #[arg(short = 'm', long)]
    pub cddb_mirror: Option<String>,

    /// Base directory of the music library [default: ~/Music]
    #[arg(short, long)]
    pub library_dir: Option<PathBuf>,

    /// Disc drive read speed [default: 8]
    #[arg(short = 's', long)]
    pub read_speed: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Rip the disc into the library (default)
    Rip,
    /// Show the CDDB results for the disc without ripping
    Lookup,
    /// Print the disc id and track count
    Id,
    /// Show the disc record saved in a ripped directory
    Info {
        /// Ripped disc directory
        dir: PathBuf,
    },
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            device: self.device.clone(),
            agent_file: self.agent_file.clone(),
            token_file: self.token_file.clone(),
            cddb_mirror: self.cddb_mirror.clone(),
            library_dir: self.library_dir.clone(),
            read_speed: self.read_speed,
        }
    }

    fn load_config(&self) -> Result<Config, AppError> {
        let (path, explicit) = match &self.config {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_CONFIG), false),
        };
        let file = FileConfig::load_or_default(path, explicit)?;
        let cfg = Config::resolve(self.overrides(), file)?;
        if cfg.token.is_some() {
            log::debug!("Discogs token loaded; no Discogs lookups are made");
        }
        Ok(cfg)
    }
}

/// Entrypoint for CLI, returns the process exit code
pub fn run() -> i32 {
    let cli = Cli::parse();

    match dispatch(&cli) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{e}");
            e.exit_code()
        }
    }
}

fn dispatch(cli: &Cli) -> Result<(), AppError> {
    let runner = SystemRunner;
    let toc = DiscIdReader;
    let mut stdout = io::stdout();

    match cli.command.as_ref().unwrap_or(&Commands::Rip) {
        Commands::Rip => {
            let cfg = cli.load_config()?;
            let client = CddbClient::new(&cfg.cddb_mirror, &cfg.identity)?;
            let dest = rip_disc(
                &cfg,
                &runner,
                &toc,
                &client,
                &mut io::stdin().lock(),
                &mut stdout,
            )?;
            println!("{}", dest.display());
        }

        Commands::Lookup => {
            let cfg = cli.load_config()?;
            let client = CddbClient::new(&cfg.cddb_mirror, &cfg.identity)?;
            let (_, entries) = identify(&cfg, &runner, &toc, &client)?;
            display_entries(&entries, &mut stdout)?;
            if entries.is_empty() {
                println!("No CDDB results found");
            }
        }

        Commands::Id => {
            let cfg = cli.load_config()?;
            let fingerprint = load_and_fingerprint(&cfg, &runner, &toc)?;
            println!("{} {}", fingerprint.id, fingerprint.track_count);
        }

        Commands::Info { dir } => show_record(dir, &mut stdout)?,
    }
    Ok(())
}

fn show_record<W: Write>(dir: &Path, out: &mut W) -> Result<(), AppError> {
    let record = load_record(&dir.join(RECORD_FILE))?;

    writeln!(
        out,
        "disc {}, {} tracks, {} s",
        record.fingerprint.id, record.fingerprint.track_count, record.fingerprint.length_seconds
    )?;
    if let Some(ripped_at) = record.ripped_at {
        writeln!(out, "ripped {}", ripped_at.with_timezone(&Local))?;
    }
    display_entries(&record.entries, out)?;
    match record.reconciled() {
        ReconciledMetadata::Resolved { candidate, .. } => {
            writeln!(out, "Preferred result: {}", candidate.title)?
        }
        ReconciledMetadata::NoMatch => writeln!(out, "No preferred result")?,
    }
    Ok(())
}

fn load_and_fingerprint<R: CommandRunner, T: TocReader>(
    cfg: &Config,
    runner: &R,
    toc: &T,
) -> Result<DiscFingerprint, AppError> {
    Drive::new(&cfg.device, runner)
        .close_tray()
        .map_err(AppError::DriveLoad)?;
    Ok(read_fingerprint(toc, &cfg.device)?)
}

fn identify<R: CommandRunner, T: TocReader>(
    cfg: &Config,
    runner: &R,
    toc: &T,
    client: &CddbClient,
) -> Result<(DiscFingerprint, Vec<MetadataEntry>), AppError> {
    let fingerprint = load_and_fingerprint(cfg, runner, toc)?;
    let entries = cddb::fetch_entries(client, &fingerprint, &mut Throttle::default())?;
    Ok((fingerprint, entries))
}

/// One full session: load, identify, choose, rip, eject.
///
/// Returns the directory the disc was ripped into.
pub fn rip_disc<R: CommandRunner, T: TocReader, I: BufRead, W: Write>(
    cfg: &Config,
    runner: &R,
    toc: &T,
    client: &CddbClient,
    input: &mut I,
    out: &mut W,
) -> Result<PathBuf, AppError> {
    let (fingerprint, entries) = identify(cfg, runner, toc, client)?;

    let mut record = DiscMetadataRecord::new(fingerprint, entries);
    reconcile(&mut record, input, out)?;

    let settings = cfg.rip_settings();
    let dest = Ripper::new(&settings, runner).rip(&mut record)?;

    if !record.has_match() {
        log::warn!("no CDDB metadata for disc {}", record.fingerprint.id);
        writeln!(
            out,
            "\nNo CDDA database records were found for {}; \
             you must rename the disc directory, {}, and tracks manually",
            record.fingerprint.id,
            dest.display()
        )?;
    }

    Drive::new(&cfg.device, runner)
        .open_tray()
        .map_err(AppError::DriveEject)?;
    Ok(dest)
}
