//! Map validated CLI arguments to the action the binary runs.

use crate::cli::{
    actions::{
        invoke::{self, EventSource},
        server, Action,
    },
    commands::{self, identity, platform},
    globals::GlobalArgs,
};
use crate::functions::Function;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// Build the configuration shared by every action.
///
/// # Errors
/// Returns an error if a required configuration argument is missing.
pub fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let mut globals = GlobalArgs::new(
        required(matches, identity::ARG_IDP_DOMAIN)?,
        required(matches, identity::ARG_IDP_CLIENT_ID)?,
        required(matches, platform::ARG_PLATFORM_URL)?,
        required(matches, platform::ARG_AUTH_PROFILE_ID)?,
    );

    globals.set_idp_client_secret(SecretString::from(required(
        matches,
        identity::ARG_IDP_CLIENT_SECRET,
    )?));

    if let Some(token) = matches.get_one::<String>(platform::ARG_PLATFORM_TOKEN) {
        globals.set_platform_token(SecretString::from(token.clone()));
    }

    Ok(globals)
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some((commands::CMD_SERVER, sub_m)) => Ok(Action::Server(server::Args {
            port: sub_m
                .get_one::<u16>(commands::ARG_PORT)
                .copied()
                .unwrap_or(8080),
            globals,
        })),
        Some((commands::CMD_INVOKE, sub_m)) => {
            let function = sub_m
                .get_one::<String>(commands::ARG_FUNCTION)
                .context("missing required argument: <function>")?
                .parse::<Function>()
                .map_err(|e| anyhow!(e))?;

            let event = if let Some(path) = sub_m.get_one::<PathBuf>(commands::ARG_PATH) {
                EventSource::Path(path.clone())
            } else if let Some(data) = sub_m.get_one::<String>(commands::ARG_DATA) {
                EventSource::Inline(data.clone())
            } else {
                return Err(anyhow!(
                    "missing required argument: --{} or --{}",
                    commands::ARG_PATH,
                    commands::ARG_DATA
                ));
            };

            Ok(Action::Invoke(invoke::Args {
                function,
                event,
                globals,
            }))
        }
        _ => Err(anyhow!("missing subcommand")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const CONFIG_ARGS: [&str; 11] = [
        "passwordless",
        "--idp-domain",
        "tenant.auth0.com",
        "--idp-client-id",
        "client-id",
        "--idp-client-secret",
        "client-secret",
        "--platform-url",
        "https://api.example.com/workspace",
        "--auth-profile-id",
        "profile-1",
    ];

    fn matches(extra: &[&str]) -> clap::ArgMatches {
        temp_env::with_vars(
            [
                ("PASSWORDLESS_PLATFORM_TOKEN", None::<&str>),
                ("PASSWORDLESS_PORT", None),
            ],
            || {
                let args: Vec<&str> = CONFIG_ARGS.iter().chain(extra).copied().collect();
                commands::new().get_matches_from(args)
            },
        )
    }

    #[test]
    fn server_action() -> Result<()> {
        let action = handler(&matches(&["server", "--port", "9000"]))?;

        match action {
            Action::Server(args) => {
                assert_eq!(args.port, 9000);
                assert_eq!(args.globals.idp_domain, "tenant.auth0.com");
                assert_eq!(args.globals.idp_client_secret.expose_secret(), "client-secret");
                assert!(args.globals.platform_token.is_none());
            }
            other => panic!("unexpected action: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn server_default_port() -> Result<()> {
        match handler(&matches(&["server"]))? {
            Action::Server(args) => assert_eq!(args.port, 8080),
            other => panic!("unexpected action: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn invoke_action_with_path() -> Result<()> {
        let action = handler(&matches(&[
            "invoke",
            "passwordlessAuthLogin",
            "-p",
            "mocks/passwordlessAuthLogin/request.json",
        ]))?;

        match action {
            Action::Invoke(args) => {
                assert_eq!(args.function, Function::Login);
                assert_eq!(
                    args.event,
                    EventSource::Path(PathBuf::from("mocks/passwordlessAuthLogin/request.json"))
                );
                assert_eq!(args.globals.auth_profile_id, "profile-1");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn invoke_action_with_inline_data() -> Result<()> {
        let data = r#"{"data":{"email":"jane@example.com"}}"#;
        let action = handler(&matches(&["invoke", "passwordlessAuthStart", "--data", data]))?;

        match action {
            Action::Invoke(args) => {
                assert_eq!(args.function, Function::Start);
                assert_eq!(args.event, EventSource::Inline(data.to_string()));
            }
            other => panic!("unexpected action: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn platform_token_is_optional() -> Result<()> {
        let matches = temp_env::with_var("PASSWORDLESS_PLATFORM_TOKEN", Some("workspace-token"), || {
            let args: Vec<&str> = CONFIG_ARGS.iter().chain(&["server"]).copied().collect();
            commands::new().get_matches_from(args)
        });

        let globals = globals(&matches)?;
        assert_eq!(
            globals
                .platform_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            Some("workspace-token".to_string())
        );
        Ok(())
    }
}
