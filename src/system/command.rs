//! Narrow capability for running external programs.
//!
//! The tray and ripper commands go through [`CommandRunner`], so tests can substitute a fake.

use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What came back from a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completed {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl Completed {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<Completed, CommandError>;
}

/// Runs programs with `std::process::Command`, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Completed, CommandError> {
        log::debug!("running `{}`", invocation.command_line());

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let spawn_err = |source| CommandError::Spawn {
            program: invocation.program.clone(),
            source,
        };

        let status = cmd.status().map_err(spawn_err)?;
        Ok(Completed {
            code: status.code(),
        })
    }
}
