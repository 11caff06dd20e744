//! Command-line parser built from the command table.

use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use kapsule::command::{Arity, CommandSpec, COMMANDS};
use std::ffi::OsString;

/// Id of the positional argument carrying forwarded values.
const ARGS: &str = "args";

/// A parsed invocation: which subcommand and its raw arguments.
#[derive(Debug)]
pub struct Parsed {
    pub spec: &'static CommandSpec,
    pub args: Vec<OsString>,
}

/// Build the clap command tree.
pub fn build_cli() -> Command {
    let root = Command::new("kapsule")
        .about("Kapsule is a VM launching tool")
        .long_about(
            "Kapsule provides a simplified and opinionated CLI for launching and \
             managing lightweight VMs.",
        )
        .version(kapsule::VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true);

    COMMANDS
        .iter()
        .fold(root, |root, spec| root.subcommand(subcommand(spec)))
}

fn subcommand(spec: &CommandSpec) -> Command {
    let cmd = Command::new(spec.name)
        .about(spec.about)
        .override_usage(format!("kapsule {}", spec.usage));

    if spec.arity == Arity::Exact(0) {
        return cmd;
    }

    let mut arg = Arg::new(ARGS)
        .value_name("ARGS")
        .value_parser(value_parser!(OsString))
        .allow_hyphen_values(true)
        .required(spec.arity.min() > 0);

    // a fixed count is a single occurrence, otherwise values accumulate
    arg = match spec.arity {
        Arity::Exact(n) => arg.action(ArgAction::Set).num_args(n),
        Arity::AtLeast(n) => arg.action(ArgAction::Append).num_args(n..),
        Arity::Any => arg.action(ArgAction::Append).num_args(1..),
    };

    // clap only allows a trailing var-arg on a positional taking several values
    if spec.arity.max() != Some(1) {
        arg = arg.trailing_var_arg(true);
    }

    cmd.arg(arg)
}

/// Parse a full argument list (including the program name).
pub fn parse_from<I, T>(itr: I) -> Result<Parsed, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(itr)?;
    from_matches(&matches)
}

fn from_matches(matches: &ArgMatches) -> Result<Parsed, clap::Error> {
    let (name, sub) = matches.subcommand().ok_or_else(|| {
        build_cli().error(ErrorKind::MissingSubcommand, "no subcommand given")
    })?;

    let spec = kapsule::command::find(name).ok_or_else(|| {
        build_cli().error(
            ErrorKind::InvalidSubcommand,
            format!("unknown subcommand '{}'", name),
        )
    })?;

    let args = sub
        .try_get_many::<OsString>(ARGS)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(Parsed { spec, args })
}
