//! Tray control through `eject`

use thiserror::Error;

use super::command::{CommandError, CommandRunner, Invocation};

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("failed to {action} disc drive {device}")]
    Tray {
        action: &'static str,
        device: String,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

pub struct Drive<'a, R: CommandRunner> {
    device: &'a str,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Drive<'a, R> {
    pub fn new(device: &'a str, runner: &'a R) -> Self {
        Self { device, runner }
    }

    /// Pulls the tray in so the disc can be read.
    pub fn close_tray(&self) -> Result<(), DriveError> {
        log::info!("loading disc drive {}", self.device);
        self.tray(Invocation::new("eject").arg("-t").arg(self.device), "close")
    }

    /// Ejects the disc.
    pub fn open_tray(&self) -> Result<(), DriveError> {
        log::info!("ejecting disc drive {}", self.device);
        self.tray(Invocation::new("eject").arg(self.device), "open")
    }

    fn tray(&self, invocation: Invocation, action: &'static str) -> Result<(), DriveError> {
        if self.runner.run(&invocation)?.success() {
            Ok(())
        } else {
            Err(DriveError::Tray {
                action,
                device: self.device.to_string(),
            })
        }
    }
}
