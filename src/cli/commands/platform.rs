use clap::{Arg, Command};

pub const ARG_PLATFORM_URL: &str = "platform-url";
pub const ARG_PLATFORM_TOKEN: &str = "platform-token";
pub const ARG_AUTH_PROFILE_ID: &str = "auth-profile-id";

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PLATFORM_URL)
                .long(ARG_PLATFORM_URL)
                .help("Platform GraphQL endpoint, example: https://api.example.com/workspace")
                .env("PASSWORDLESS_PLATFORM_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PLATFORM_TOKEN)
                .long(ARG_PLATFORM_TOKEN)
                .help("Platform API token used for system queries")
                .env("PASSWORDLESS_PLATFORM_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_AUTH_PROFILE_ID)
                .long(ARG_AUTH_PROFILE_ID)
                .help("Platform authentication profile id new users are signed up with")
                .env("PASSWORDLESS_AUTH_PROFILE_ID")
                .required(true),
        )
}
