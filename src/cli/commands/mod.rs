pub mod identity;
pub mod logging;
pub mod platform;

use crate::functions::Function;
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        PossibleValuesParser,
    },
    Arg, ArgGroup, ColorChoice, Command,
};
use std::path::PathBuf;

pub const CMD_SERVER: &str = "server";
pub const CMD_INVOKE: &str = "invoke";

pub const ARG_PORT: &str = "port";
pub const ARG_FUNCTION: &str = "function";
pub const ARG_PATH: &str = "path";
pub const ARG_DATA: &str = "data";

fn server() -> Command {
    Command::new(CMD_SERVER)
        .about("Serve the functions over HTTP")
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("PASSWORDLESS_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
}

fn invoke() -> Command {
    Command::new(CMD_INVOKE)
        .about("Invoke a function once with a mock event and print the result")
        .arg(
            Arg::new(ARG_FUNCTION)
                .help("Function to invoke")
                .required(true)
                .value_parser(PossibleValuesParser::new(Function::ALL.map(Function::name))),
        )
        .arg(
            Arg::new(ARG_PATH)
                .short('p')
                .long(ARG_PATH)
                .help("Path to a JSON event file, example: mocks/passwordlessAuthStart/request.json")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_DATA)
                .short('d')
                .long(ARG_DATA)
                .help("Inline JSON event, example: '{\"data\":{\"email\":\"jane@example.com\"}}'"),
        )
        .group(
            ArgGroup::new("event")
                .args([ARG_PATH, ARG_DATA])
                .required(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("passwordless")
        .about("Passwordless one-time code authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(server())
        .subcommand(invoke());

    let command = identity::with_args(command);
    let command = platform::with_args(command);
    logging::with_args(command)
}
