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

use std::{borrow::Cow, future::Future};

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::auth::OAuth2Client;

/// Submits encoded messages to the provider on behalf of a user.
pub trait MessageTransport {
    /// Sends a message already encoded for the `raw` field.
    fn send(
        &self,
        user_id: &str,
        raw: &str,
    ) -> impl Future<Output = crate::Result<SentMessage>> + Send;
}

/// Reply of the `users.messages.send` call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub label_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Request<'x> {
    raw: &'x str,
}

/// Gmail API client.
pub struct GmailClient {
    http_client: reqwest::Client,
    oauth: OAuth2Client,
    base_url: String,
}

pub struct GmailClientBuilder {
    oauth: OAuth2Client,
    base_url: Cow<'static, str>,
}

impl GmailClientBuilder {
    pub fn new(oauth: OAuth2Client) -> Self {
        GmailClientBuilder {
            oauth,
            base_url: "https://gmail.googleapis.com".into(),
        }
    }

    /// Sets the API endpoint, mostly useful for testing.
    pub fn base_url(mut self, base_url: impl Into<Cow<'static, str>>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> GmailClient {
        GmailClient {
            http_client: reqwest::Client::new(),
            oauth: self.oauth,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl GmailClient {
    /// Creates a new Gmail client using the default endpoint.
    pub fn new(oauth: OAuth2Client) -> Self {
        GmailClientBuilder::new(oauth).build()
    }

    pub fn builder(oauth: OAuth2Client) -> GmailClientBuilder {
        GmailClientBuilder::new(oauth)
    }

    pub fn oauth(&self) -> &OAuth2Client {
        &self.oauth
    }

    pub fn oauth_mut(&mut self) -> &mut OAuth2Client {
        &mut self.oauth
    }
}

impl MessageTransport for GmailClient {
    async fn send(&self, user_id: &str, raw: &str) -> crate::Result<SentMessage> {
        let response = self
            .http_client
            .post(format!(
                "{}/gmail/v1/users/{}/messages/send",
                self.base_url, user_id
            ))
            .header(AUTHORIZATION, self.oauth.authorization())
            .json(&Request { raw })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(crate::Error::Transport(status.to_string()))
        }
    }
}
