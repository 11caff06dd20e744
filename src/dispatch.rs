//! Subcommand dispatch.
//!
//! Turns one validated subcommand into one backend invocation.

use std::ffi::{OsStr, OsString};

use crate::command::CommandSpec;
use crate::error::Error;
use crate::process::{Invocation, Launcher, StdinMode, SystemLauncher};

/// A failed dispatch, carrying the command's error prefix.
#[derive(Debug, thiserror::Error)]
#[error("{prefix}: {source}")]
pub struct DispatchError {
    /// Command-specific context, e.g. "Error launching VM".
    pub prefix: &'static str,
    /// What went wrong.
    #[source]
    pub source: Error,
}

/// Forwards subcommands to the backend executable.
#[derive(Debug, Clone)]
pub struct Dispatcher<L = SystemLauncher> {
    backend: OsString,
    launcher: L,
}

impl Dispatcher<SystemLauncher> {
    /// Dispatcher that spawns real processes.
    pub fn new(backend: impl Into<OsString>) -> Self {
        Self::with_launcher(backend, SystemLauncher)
    }
}

impl<L: Launcher> Dispatcher<L> {
    /// Dispatcher using a custom launcher.
    pub fn with_launcher(backend: impl Into<OsString>, launcher: L) -> Self {
        Self {
            backend: backend.into(),
            launcher,
        }
    }

    /// Launcher in use.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Build the invocation for `spec` with `args`, validating the count.
    pub fn invocation<S: AsRef<OsStr>>(
        &self,
        spec: &CommandSpec,
        args: &[S],
    ) -> Result<Invocation, Error> {
        spec.validate(args)?;
        Ok(Invocation {
            program: self.backend.clone(),
            argv: spec.argv(args),
            stdin: if spec.interactive {
                StdinMode::Inherit
            } else {
                StdinMode::Null
            },
        })
    }

    /// Validate, launch, and wait for `spec` with `args`.
    pub fn dispatch<S: AsRef<OsStr>>(
        &self,
        spec: &CommandSpec,
        args: &[S],
    ) -> Result<(), DispatchError> {
        let wrap = |source: Error| DispatchError {
            prefix: spec.error_prefix,
            source,
        };
        let invocation = self.invocation(spec, args).map_err(wrap)?;
        self.launcher.launch(&invocation).map_err(wrap)
    }
}
