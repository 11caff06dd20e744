//! kapsule - a simplified, opinionated CLI for lightweight VMs.
//!
//! kapsule owns no VM state of its own. Every subcommand is forwarded to a
//! backend VM-management executable (`ignite` by default) with the
//! arguments passed through verbatim, and the backend's exit status decides
//! whether kapsule succeeds.
//!
//! # Example
//!
//! ```no_run
//! use kapsule::{command, Dispatcher};
//!
//! let dispatcher = Dispatcher::new("ignite");
//! let logs = command::find("logs").unwrap();
//! if let Err(e) = dispatcher.dispatch(logs, &["myvm"]) {
//!     eprintln!("{}", e);
//! }
//! ```

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod process;

pub use command::{Arity, CommandSpec, COMMANDS};
pub use config::KapsuleConfig;
pub use dispatch::{DispatchError, Dispatcher};
pub use error::{Error, Result};

/// kapsule version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
