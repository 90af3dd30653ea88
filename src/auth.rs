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

use std::path::Path;

use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};

use crate::loader::load_json;

/// OAuth2 client registration, as found in a downloaded `credentials.json`.
#[derive(Debug)]
pub struct Credentials {
    client_id: String,
    client_secret: Secret<String>,
    redirect_uris: Vec<String>,
}

/// Access/refresh token pair, as found in a stored `token.json`.
///
/// The token is never refreshed nor written back to disk.
#[derive(Debug)]
pub struct Token {
    access_token: Secret<String>,
    refresh_token: Option<Secret<String>>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub expiry_date: Option<u64>,
    pub extra: Map<String, Value>,
}

/// Authenticated handle combining the client registration and its token.
#[derive(Debug)]
pub struct OAuth2Client {
    credentials: Credentials,
    token: Token,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSection>,
    web: Option<ClientSection>,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    client_id: Option<String>,
    client_secret: Option<Secret<String>>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    access_token: Option<Secret<String>>,
    refresh_token: Option<Secret<String>>,
    scope: Option<String>,
    token_type: Option<String>,
    expiry_date: Option<u64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Loads an authentication file, reporting any failure as `AuthSetup`.
fn load_auth_file<T: DeserializeOwned>(path: &Path) -> crate::Result<T> {
    load_json(path).map_err(|err| match err {
        crate::Error::FileLoad { path, reason } => crate::Error::AuthSetup {
            path,
            field: None,
            reason,
        },
        err => err,
    })
}

impl Credentials {
    /// Creates a new `Credentials` instance.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Credentials {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            redirect_uris: vec![redirect_uri.into()],
        }
    }

    /// Loads the client registration from the `installed` (or `web`) section of a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let missing = |field| crate::Error::AuthSetup {
            path: path.to_path_buf(),
            field: Some(field),
            reason: "missing field".to_string(),
        };

        let file: CredentialsFile = load_auth_file(path)?;
        let section = file.installed.or(file.web).ok_or_else(|| missing("installed"))?;
        let client_id = section
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| missing("client_id"))?;
        let client_secret = section
            .client_secret
            .ok_or_else(|| missing("client_secret"))?;
        if section.redirect_uris.is_empty() {
            return Err(missing("redirect_uris"));
        }

        Ok(Credentials {
            client_id,
            client_secret,
            redirect_uris: section.redirect_uris,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &Secret<String> {
        &self.client_secret
    }

    /// Only the first registered redirect endpoint is used.
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Token {
    /// Creates a token holding only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Token {
            access_token: Secret::new(access_token.into()),
            refresh_token: None,
            scope: None,
            token_type: None,
            expiry_date: None,
            extra: Map::new(),
        }
    }

    /// Loads a token from a JSON file. Unknown fields are preserved in `extra`.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let file: TokenFile = load_auth_file(path)?;

        Ok(Token {
            access_token: file.access_token.ok_or_else(|| crate::Error::AuthSetup {
                path: path.to_path_buf(),
                field: Some("access_token"),
                reason: "missing field".to_string(),
            })?,
            refresh_token: file.refresh_token,
            scope: file.scope,
            token_type: file.token_type,
            expiry_date: file.expiry_date,
            extra: file.extra,
        })
    }

    pub fn access_token(&self) -> &Secret<String> {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&Secret<String>> {
        self.refresh_token.as_ref()
    }
}

impl OAuth2Client {
    pub fn new(credentials: Credentials, token: Token) -> Self {
        OAuth2Client { credentials, token }
    }

    /// Loads both files and binds the token to the client registration.
    pub fn from_files(
        credentials_path: impl AsRef<Path>,
        token_path: impl AsRef<Path>,
    ) -> crate::Result<Self> {
        let credentials = Credentials::from_file(credentials_path)?;
        let token = Token::from_file(token_path)?;
        Ok(OAuth2Client::new(credentials, token))
    }

    /// Replaces the token used to authorize requests.
    pub fn set_credentials(&mut self, token: Token) {
        self.token = token;
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub(crate) fn authorization(&self) -> String {
        format!(
            "{} {}",
            self.token.token_type.as_deref().unwrap_or("Bearer"),
            self.token.access_token.expose_secret()
        )
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use secrecy::ExposeSecret;
    use serde_json::json;

    use crate::{
        auth::{Credentials, OAuth2Client, Token},
        Error,
    };

    fn write_json(value: serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_installed_credentials() {
        let file = write_json(json!({
            "installed": {
                "client_id": "1234.apps.googleusercontent.com",
                "client_secret": "s3cr3t",
                "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
            }
        }));

        let creds = Credentials::from_file(file.path()).unwrap();
        assert_eq!(creds.client_id(), "1234.apps.googleusercontent.com");
        assert_eq!(creds.client_secret().expose_secret(), "s3cr3t");
        assert_eq!(creds.redirect_uri(), "urn:ietf:wg:oauth:2.0:oob");
    }

    #[test]
    fn parse_web_credentials() {
        let file = write_json(json!({
            "web": {
                "client_id": "web-client",
                "client_secret": "s3cr3t",
                "redirect_uris": ["https://example.com/callback"]
            }
        }));

        let creds = Credentials::from_file(file.path()).unwrap();
        assert_eq!(creds.client_id(), "web-client");
    }

    #[test]
    fn reject_incomplete_credentials() {
        for (value, expected_field) in [
            (json!({}), "installed"),
            (
                json!({"installed": {"client_secret": "x", "redirect_uris": ["a"]}}),
                "client_id",
            ),
            (
                json!({"installed": {"client_id": "x", "redirect_uris": ["a"]}}),
                "client_secret",
            ),
            (
                json!({"installed": {"client_id": "x", "client_secret": "y", "redirect_uris": []}}),
                "redirect_uris",
            ),
        ] {
            let file = write_json(value);
            match Credentials::from_file(file.path()) {
                Err(Error::AuthSetup { path, field, .. }) => {
                    assert_eq!(field, Some(expected_field));
                    assert_eq!(path, file.path());
                }
                other => panic!("expected missing {}, got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn parse_token_preserving_unknown_fields() {
        let file = write_json(json!({
            "access_token": "ya29.token",
            "refresh_token": "1//refresh",
            "scope": "https://www.googleapis.com/auth/gmail.send",
            "token_type": "Bearer",
            "expiry_date": 1589200000000u64,
            "id_token": "opaque"
        }));

        let token = Token::from_file(file.path()).unwrap();
        assert_eq!(token.access_token().expose_secret(), "ya29.token");
        assert_eq!(
            token.refresh_token().map(|t| t.expose_secret().as_str()),
            Some("1//refresh")
        );
        assert_eq!(token.expiry_date, Some(1589200000000));
        assert_eq!(token.extra.get("id_token"), Some(&json!("opaque")));
    }

    #[test]
    fn reject_token_without_access_token() {
        let file = write_json(json!({"refresh_token": "1//refresh"}));
        assert!(matches!(
            Token::from_file(file.path()),
            Err(Error::AuthSetup {
                field: Some("access_token"),
                ..
            })
        ));
    }

    #[test]
    fn unreadable_files_are_setup_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("credentials.json");
        match Credentials::from_file(&missing) {
            Err(Error::AuthSetup {
                path,
                field: None,
                reason,
            }) => {
                assert_eq!(path, missing);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected result {:?}", other),
        }

        let mut malformed = tempfile::NamedTempFile::new().unwrap();
        malformed.write_all(b"{ \"access_token\": ").unwrap();
        match Token::from_file(malformed.path()) {
            Err(Error::AuthSetup {
                path, field: None, ..
            }) => assert_eq!(path, malformed.path()),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn authorization_header() {
        let mut client = OAuth2Client::new(
            Credentials::new("id", "secret", "http://localhost"),
            Token::new("first"),
        );
        assert_eq!(client.authorization(), "Bearer first");

        client.set_credentials(Token::new("second"));
        assert_eq!(client.authorization(), "Bearer second");
    }
}
