//! # Passwordless (one-time code authentication functions)
//!
//! `passwordless` hosts two functions that together implement an email one-time-code
//! login on top of an external identity provider and a GraphQL backend platform:
//!
//! - **`passwordlessAuthStart`** asks the identity provider to deliver a code (or a magic link)
//!   to an email address.
//! - **`passwordlessAuthLogin`** exchanges the email and code for an identity token, looks up
//!   the user on the platform and, depending on the lookup, provisions the user with that token.
//!
//! ## Response Envelope
//!
//! Both functions always answer with the same envelope, never with a transport-level error:
//!
//! ```json
//! { "data": { "success": false }, "errors": [{ "code": "identity_provider", "message": "..." }] }
//! ```
//!
//! Remote failures (provider rejections, network errors, GraphQL errors) are carried verbatim in
//! `errors[].details`. Nothing is retried; the caller decides what is recoverable.
//!
//! ## Hosting
//!
//! The `passwordless` binary serves both functions over HTTP (`passwordless server`) or runs one
//! of them against a mock event file (`passwordless invoke`).

pub mod api;
pub mod cli;
pub mod error;
pub mod functions;
pub mod identity;
pub mod platform;

pub use error::{Error, ErrorDetail};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
