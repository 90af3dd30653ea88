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

use std::{path::Path, sync::Arc};

use crate::{
    auth::OAuth2Client,
    gmail::{GmailClient, MessageTransport},
    message::EmailInputs,
    sender::send_email,
    template::{replace_tags, TemplateCache},
};

/// Sends e-mail on behalf of a single authenticated user.
pub struct EasyGmail<T = GmailClient> {
    transport: T,
    user_id: String,
    templates: TemplateCache,
}

impl EasyGmail<GmailClient> {
    /// Loads `credentials.json` and `token.json` and sets up a Gmail client
    /// acting as `user_id` (usually `"me"`).
    pub fn new(
        credentials_path: impl AsRef<Path>,
        token_path: impl AsRef<Path>,
        user_id: impl Into<String>,
    ) -> crate::Result<Self> {
        let oauth = OAuth2Client::from_files(credentials_path, token_path)?;
        Ok(EasyGmail::with_transport(GmailClient::new(oauth), user_id))
    }
}

impl<T: MessageTransport> EasyGmail<T> {
    /// Uses an already configured transport.
    pub fn with_transport(transport: T, user_id: impl Into<String>) -> Self {
        EasyGmail {
            transport,
            user_id: user_id.into(),
            templates: TemplateCache::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a message with a plain text body.
    pub async fn send_text_email(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body_text: &str,
    ) -> crate::Result<bool> {
        send_email(
            &EmailInputs::new(from, to, subject).text_body(body_text),
            &self.user_id,
            &self.transport,
        )
        .await
    }

    /// Sends a message whose HTML body is the template at `html_path` with
    /// the first occurrence of each tag replaced by its text.
    pub async fn send_html_email<K, V>(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html_path: impl AsRef<Path>,
        tags_to_text: impl IntoIterator<Item = (K, V)>,
    ) -> crate::Result<bool>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let html = replace_tags(&self.template(html_path).await?, tags_to_text);
        send_email(
            &EmailInputs::new(from, to, subject).html_body(html),
            &self.user_id,
            &self.transport,
        )
        .await
    }

    /// Returns the cached template text, loading it on first use.
    pub async fn template(&self, html_path: impl AsRef<Path>) -> crate::Result<Arc<str>> {
        self.templates.get_or_load(html_path).await
    }

    /// Number of distinct templates loaded so far.
    pub async fn cached_templates(&self) -> usize {
        self.templates.len().await
    }
}
