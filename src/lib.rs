/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

//! # easy-gmail
//!
//! _easy-gmail_ is a thin Rust library to send e-mail messages through the Gmail API. It includes the following features:
//!
//! - One-time OAuth2 setup from a downloaded `credentials.json` and a stored `token.json`.
//! - Plain text messages and **HTML** messages built from on-disk templates with literal tag substitution.
//! - **MIME** composition (_RFC 2045 - 2049_) delegated to [`mail-builder`](https://crates.io/crates/mail-builder).
//! - URL-safe base64 encoding of the compiled message as required by the Gmail `raw` field.
//! - Full async (requires Tokio).
//!
//! ## Usage Example
//!
//! Send a plain text message:
//!
//! ```rust
//!     let gmail = EasyGmail::new("./credentials.json", "./token.json", "me").unwrap();
//!
//!     let sent = gmail
//!         .send_text_email("john@example.com", "jane@example.com", "Hi!", "Hello, world!")
//!         .await
//!         .unwrap();
//!     assert!(sent);
//! ```
//!
//! Send an HTML message from a template, replacing `{name}` with `Jane`:
//!
//! ```rust
//!     let sent = gmail
//!         .send_html_email(
//!             "john@example.com",
//!             "jane@example.com",
//!             "Welcome",
//!             "./welcome.html",
//!             [("{name}", "Jane")],
//!         )
//!         .await
//!         .unwrap();
//! ```
//!
//! Only the first occurrence of each tag is replaced. Send operations report delivery
//! as a `bool`: compilation and transport failures are logged and yield `false`,
//! while setup problems (unreadable files, malformed inputs) are returned as [`Error`].
//!
//! ## License
//!
//! Licensed under either of
//!
//!  * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//!  * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.
//!

pub mod auth;
pub mod client;
pub mod gmail;
pub mod loader;
pub mod message;
pub mod sender;
pub mod template;

use std::{fmt::Display, path::PathBuf};

pub use client::EasyGmail;
pub use gmail::{GmailClient, GmailClientBuilder, MessageTransport, SentMessage};
pub use mail_builder;
pub use message::EmailInputs;

/// Prefix used on every error message and log line emitted by this library.
pub const PACKAGE_NAME: &str = "easy-gmail";

#[derive(Debug)]
pub enum Error {
    /// File missing, unreadable or not valid JSON.
    FileLoad { path: PathBuf, reason: String },

    /// Credentials or token file cannot be loaded, or lacks a required field.
    AuthSetup {
        path: PathBuf,
        field: Option<&'static str>,
        reason: String,
    },

    /// Neither or both of the text and HTML bodies were supplied.
    MalformedInput,

    /// HTML template could not be loaded.
    Template { path: PathBuf, reason: String },

    /// MIME serialization failure.
    Compile(std::io::Error),

    /// Gmail API request failure.
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", PACKAGE_NAME)?;
        match self {
            Error::FileLoad { path, reason } => {
                write!(f, "Cannot load file at path {} ({})", path.display(), reason)
            }
            Error::AuthSetup {
                path,
                field: Some(field),
                ..
            } => write!(
                f,
                "Missing field {:?} in authentication file {}",
                field,
                path.display()
            ),
            Error::AuthSetup {
                path,
                field: None,
                reason,
            } => write!(
                f,
                "Cannot load authentication file at path {} ({})",
                path.display(),
                reason
            ),
            Error::MalformedInput => write!(
                f,
                "Cannot send email because inputs are not configured correctly"
            ),
            Error::Template { path, reason } => write!(
                f,
                "Cannot load html template at path: {} ({})",
                path.display(),
                reason
            ),
            Error::Compile(e) => write!(f, "Error compiling email: {}", e),
            Error::Transport(e) => write!(f, "Could not send email: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compile(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
