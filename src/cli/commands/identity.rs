use clap::{Arg, Command};

pub const ARG_IDP_DOMAIN: &str = "idp-domain";
pub const ARG_IDP_CLIENT_ID: &str = "idp-client-id";
pub const ARG_IDP_CLIENT_SECRET: &str = "idp-client-secret";

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDP_DOMAIN)
                .long(ARG_IDP_DOMAIN)
                .help("Identity provider domain, example: tenant.eu.auth0.com")
                .long_help(
                    "Identity provider domain. A bare host implies https; a full base URL (http://host:port) is used as is.",
                )
                .env("PASSWORDLESS_IDP_DOMAIN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDP_CLIENT_ID)
                .long(ARG_IDP_CLIENT_ID)
                .help("Identity provider application client id")
                .env("PASSWORDLESS_IDP_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDP_CLIENT_SECRET)
                .long(ARG_IDP_CLIENT_SECRET)
                .help("Identity provider application client secret")
                .env("PASSWORDLESS_IDP_CLIENT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
}
