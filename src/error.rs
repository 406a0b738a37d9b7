use thiserror::Error;

use crate::{
    cddb::error::CddbError,
    reconcile::ReconcileError,
    rip::RipError,
    system::{drive::DriveError, toc::DeviceError},
};

/// Process exit codes, one per failure class.
pub mod exit_code {
    pub const DRIVE_LOAD: i32 = 1;
    pub const DATABASE: i32 = 2;
    pub const DESTINATION_EXISTS: i32 = 3;
    pub const RIP: i32 = 4;
    pub const DRIVE_EJECT: i32 = 5;
    pub const DEVICE: i32 = 6;
    pub const CONFIG: i32 = 7;
    pub const FILESYSTEM: i32 = 8;
    pub const SELECTION: i32 = 9;
}

/// Any failure that ends a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load disc drive: {0}")]
    DriveLoad(#[source] DriveError),

    #[error("failed to eject disc drive: {0}")]
    DriveEject(#[source] DriveError),

    #[error("failed to read disc: {0}")]
    Device(#[from] DeviceError),

    #[error("failed to query CDDB mirror: {0}")]
    Database(#[from] CddbError),

    #[error("no result selected: {0}")]
    Selection(#[from] ReconcileError),

    #[error(transparent)]
    Rip(#[from] RipError),

    #[error("terminal output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("configuration error: {0:#}")]
    Config(#[from] anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::DriveLoad(_) => exit_code::DRIVE_LOAD,
            AppError::DriveEject(_) => exit_code::DRIVE_EJECT,
            AppError::Device(_) => exit_code::DEVICE,
            AppError::Database(_) => exit_code::DATABASE,
            AppError::Selection(_) => exit_code::SELECTION,
            AppError::Rip(RipError::DestinationExists(_)) => exit_code::DESTINATION_EXISTS,
            AppError::Rip(RipError::RipFailed { .. } | RipError::Command(_)) => exit_code::RIP,
            AppError::Rip(_) | AppError::Output(_) => exit_code::FILESYSTEM,
            AppError::Config(_) => exit_code::CONFIG,
        }
    }
}
