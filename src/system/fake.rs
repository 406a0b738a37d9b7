use std::{cell::RefCell, collections::HashMap, fs};

use super::{
    command::{CommandError, CommandRunner, Completed, Invocation},
    toc::{DeviceError, TocReader},
};
use crate::domain::disc::Toc;

/// Scripted stand-in for external programs.
///
/// Programs exit with 0 unless told otherwise. Exit codes
/// are looked up by full command line first, then by program name. A
/// successful `cdparanoia` call writes `track00.cdda.wav` through `trackNN.cdda.wav` into its working
/// directory, like the real tool does in batch mode.
#[derive(Debug, Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<Invocation>>,
    exit_codes: HashMap<String, i32>,
    ripped_tracks: u32,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit_code(mut self, command: &str, code: i32) -> Self {
        self.exit_codes.insert(command.to_string(), code);
        self
    }

    pub fn rips(mut self, tracks: u32) -> Self {
        self.ripped_tracks = tracks;
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.program.clone())
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<Completed, CommandError> {
        self.calls.borrow_mut().push(invocation.clone());

        let code = self
            .exit_codes
            .get(&invocation.command_line())
            .or_else(|| self.exit_codes.get(&invocation.program))
            .copied()
            .unwrap_or(0);

        if invocation.program == "cdparanoia" && code == 0 {
            let dir = invocation.cwd.clone().unwrap_or_default();
            for n in 0..=self.ripped_tracks {
                fs::write(dir.join(format!("track{n:02}.cdda.wav")), b"RIFF").map_err(
                    |source| CommandError::Spawn {
                        program: invocation.program.clone(),
                        source,
                    },
                )?;
            }
        }

        Ok(Completed { code: Some(code) })
    }
}

/// Drive that always reports the same disc, or none.
#[derive(Debug, Default)]
pub struct FakeToc {
    pub devices: RefCell<Vec<String>>,
    toc: Option<Toc>,
}

impl FakeToc {
    pub fn new(toc: Toc) -> Self {
        Self {
            devices: RefCell::default(),
            toc: Some(toc),
        }
    }

    pub fn unreadable() -> Self {
        Self::default()
    }
}

impl TocReader for FakeToc {
    fn read_toc(&self, device: &str) -> Result<Toc, DeviceError> {
        self.devices.borrow_mut().push(device.to_string());
        self.toc.clone().ok_or_else(|| DeviceError::Unreadable {
            device: device.to_string(),
            reason: "no disc".to_string(),
        })
    }
}
