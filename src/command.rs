//! The static table of kapsule subcommands.
//!
//! Each entry maps one kapsule subcommand onto the identically named
//! subcommand of the backend executable, together with the argument-count
//! rule, whether stdin is forwarded, and the prefix used when reporting
//! failures.

use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;

/// Argument-count rule for a subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Any number of arguments, including none.
    Any,
    /// Exactly `n` arguments.
    Exact(usize),
    /// At least `n` arguments.
    AtLeast(usize),
}

impl Arity {
    /// Minimum number of arguments accepted.
    pub fn min(self) -> usize {
        match self {
            Arity::Any => 0,
            Arity::Exact(n) | Arity::AtLeast(n) => n,
        }
    }

    /// Maximum number of arguments accepted, if bounded.
    pub fn max(self) -> Option<usize> {
        match self {
            Arity::Exact(n) => Some(n),
            Arity::Any | Arity::AtLeast(_) => None,
        }
    }

    /// Whether `count` arguments satisfy this rule.
    pub fn accepts(self, count: usize) -> bool {
        count >= self.min() && self.max().map_or(true, |max| count <= max)
    }

    /// Validate `args` for the subcommand `name`.
    pub fn check<S: AsRef<OsStr>>(self, name: &str, args: &[S]) -> Result<()> {
        if self.accepts(args.len()) {
            return Ok(());
        }
        Err(Error::usage(format!(
            "{} requires {}, received {}",
            name,
            self,
            args.len()
        )))
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match *self {
            Arity::Any => write!(f, "any number of arguments"),
            Arity::Exact(0) => write!(f, "no arguments"),
            Arity::Exact(n) => write!(f, "exactly {} arg{}", n, plural(n)),
            Arity::AtLeast(n) => write!(f, "at least {} arg{}", n, plural(n)),
        }
    }
}

/// Descriptor for one subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Subcommand name, shared with the backend.
    pub name: &'static str,
    /// Usage line shown in help.
    pub usage: &'static str,
    /// One-line help text.
    pub about: &'static str,
    /// Argument-count rule.
    pub arity: Arity,
    /// Forward stdin to the backend.
    pub interactive: bool,
    /// Context printed before the underlying error.
    pub error_prefix: &'static str,
}

impl CommandSpec {
    /// Validate the argument count.
    pub fn validate<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<()> {
        self.arity.check(self.name, args)
    }

    /// Build the backend argument vector: the subcommand name followed by
    /// `args`, unmodified.
    pub fn argv<S: AsRef<OsStr>>(&self, args: &[S]) -> Vec<OsString> {
        std::iter::once(OsString::from(self.name))
            .chain(args.iter().map(|a| OsString::from(a.as_ref())))
            .collect()
    }
}

const fn spec(
    name: &'static str,
    usage: &'static str,
    about: &'static str,
    arity: Arity,
    interactive: bool,
    error_prefix: &'static str,
) -> CommandSpec {
    CommandSpec {
        name,
        usage,
        about,
        arity,
        interactive,
        error_prefix,
    }
}

/// Every registered subcommand, in help order.
#[rustfmt::skip]
pub const COMMANDS: &[CommandSpec] = &[
    spec("run", "run <image> [flags]", "Launch a new VM using an OCI image", Arity::AtLeast(1), true, "Error launching VM"),
    spec("ps", "ps", "List all running VMs", Arity::Exact(0), false, "Error listing VMs"),
    spec("images", "images", "List available OCI images for VMs", Arity::Exact(0), false, "Error listing images"),
    spec("kernels", "kernels", "List available kernel images for VMs", Arity::Exact(0), false, "Error listing kernels"),
    spec("logs", "logs <vmName>", "Show the boot logs of a VM", Arity::Exact(1), false, "Error showing VM logs"),
    spec("ssh", "ssh <vmName>", "SSH into a running VM", Arity::Exact(1), true, "Error connecting to VM"),
    spec("attach", "attach <vmName>", "Attach to a running VM", Arity::Exact(1), true, "Error attaching to VM"),
    spec("cp", "cp <source> <destination>", "Copy files/folders between a running VM and the local filesystem", Arity::Exact(2), false, "Error copying files"),
    spec("create", "create <image> [flags]", "Create a new VM without starting it", Arity::AtLeast(1), true, "Error creating VM"),
    spec("exec", "exec <vmName> <command> [args...]", "Execute a command in a running VM", Arity::AtLeast(2), true, "Error executing command in VM"),
    spec("image", "image [args...]", "Manage base images for VMs", Arity::Any, true, "Error managing images"),
    spec("inspect", "inspect <object>...", "Inspect a backend object", Arity::AtLeast(1), false, "Error inspecting object"),
    spec("kernel", "kernel [args...]", "Manage VM kernels", Arity::Any, true, "Error managing kernels"),
    spec("kill", "kill <vmName>...", "Kill running VMs", Arity::AtLeast(1), false, "Error killing VM"),
    spec("rm", "rm <vmName>...", "Remove VMs", Arity::AtLeast(1), false, "Error removing VMs"),
    spec("rmi", "rmi <imageName>...", "Remove VM base images", Arity::AtLeast(1), false, "Error removing images"),
    spec("rmk", "rmk <kernelName>...", "Remove kernels", Arity::AtLeast(1), false, "Error removing kernels"),
    spec("start", "start <vmName>", "Start a VM", Arity::Exact(1), false, "Error starting VM"),
    spec("stop", "stop <vmName>...", "Stop running VMs", Arity::AtLeast(1), false, "Error stopping VMs"),
    spec("version", "version", "Print the version of the backend", Arity::Exact(0), false, "Error printing version"),
    spec("vm", "vm [args...]", "Manage VMs", Arity::Any, true, "Error managing VMs"),
];

/// Look up a subcommand by name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}
