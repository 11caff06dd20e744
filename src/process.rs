//! Backend process launching.
//!
//! This module spawns the backend executable with the parent's stdout and
//! stderr attached, optionally forwarding stdin, and blocks until it exits.

use std::ffi::OsString;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{Error, Result};

/// How the child's stdin is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// Share the parent's stdin (interactive commands).
    Inherit,
    /// Connect stdin to the null device.
    Null,
}

impl StdinMode {
    fn stdio(self) -> Stdio {
        match self {
            StdinMode::Inherit => Stdio::inherit(),
            StdinMode::Null => Stdio::null(),
        }
    }
}

/// A single backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Backend executable.
    pub program: OsString,
    /// Arguments, starting with the backend subcommand.
    pub argv: Vec<OsString>,
    /// Stdin wiring.
    pub stdin: StdinMode,
}

impl Invocation {
    /// Build the `std::process::Command` for this invocation.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.argv)
            .stdin(self.stdin.stdio())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

/// Something that can run an [`Invocation`] to completion.
pub trait Launcher {
    /// Run the invocation, returning `Ok(())` only on a zero exit status.
    fn launch(&self, invocation: &Invocation) -> Result<()>;
}

/// Launcher that spawns real OS processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<()> {
        run(invocation)
    }
}

/// Spawn the invocation and wait for it to exit.
pub fn run(invocation: &Invocation) -> Result<()> {
    tracing::debug!(
        program = ?invocation.program,
        argv = ?invocation.argv,
        stdin = ?invocation.stdin,
        "spawning backend"
    );

    let status = invocation
        .command()
        .status()
        .map_err(|e| Error::launch(invocation.program.to_string_lossy(), e))?;

    tracing::debug!(status = %status, "backend exited");
    check_status(status)
}

/// Map an exit status onto the crate's error type.
pub fn check_status(status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    if let Some(code) = status.code() {
        return Err(Error::Exit { code });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(Error::Signaled { signal });
        }
    }

    Err(Error::Exit { code: -1 })
}
