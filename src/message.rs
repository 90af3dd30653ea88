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

use std::borrow::Cow;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use mail_builder::{headers::address::Address, MessageBuilder};

/// Fields of a message before it is compiled.
///
/// Exactly one of `body_text` and `html` must be set.
#[derive(Debug, Default, Clone)]
pub struct EmailInputs<'x> {
    pub from: Cow<'x, str>,
    pub to: Cow<'x, str>,
    pub subject: Cow<'x, str>,
    pub body_text: Option<Cow<'x, str>>,
    pub html: Option<Cow<'x, str>>,
}

/// Validated message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    Text(&'a str),
    Html(&'a str),
}

impl<'x> EmailInputs<'x> {
    /// Create a new message with no body.
    pub fn new(
        from: impl Into<Cow<'x, str>>,
        to: impl Into<Cow<'x, str>>,
        subject: impl Into<Cow<'x, str>>,
    ) -> Self {
        EmailInputs {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body_text: None,
            html: None,
        }
    }

    /// Set the plain text body.
    pub fn text_body(mut self, body: impl Into<Cow<'x, str>>) -> Self {
        self.body_text = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html_body(mut self, html: impl Into<Cow<'x, str>>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Returns the single body of this message, or `MalformedInput` when
    /// neither or both bodies are set.
    pub fn body(&self) -> crate::Result<Body<'_>> {
        match (&self.body_text, &self.html) {
            (Some(text), None) => Ok(Body::Text(text)),
            (None, Some(html)) => Ok(Body::Html(html)),
            _ => Err(crate::Error::MalformedInput),
        }
    }

    /// Builds the MIME message.
    pub fn builder(&self) -> crate::Result<MessageBuilder<'_>> {
        let builder = MessageBuilder::new()
            .from(to_address(&self.from))
            .to(to_address(&self.to))
            .subject(self.subject.as_ref());

        Ok(match self.body()? {
            Body::Text(text) => builder.text_body(text),
            Body::Html(html) => builder.html_body(html),
        })
    }

    /// Serializes the message to RFC 5322 bytes.
    pub fn compile(&self) -> crate::Result<Vec<u8>> {
        self.builder()?
            .write_to_vec()
            .map_err(crate::Error::Compile)
    }
}

/// Splits a comma separated list of `addr` or `Name <addr>` entries.
///
/// Commas inside quotes or angle brackets do not separate entries.
pub fn parse_addresses(list: &str) -> Vec<(Option<&str>, &str)> {
    let mut entries = Vec::new();
    let mut in_quote = false;
    let mut in_angle = false;
    let mut start = 0;

    for (pos, ch) in list.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            '<' if !in_quote => in_angle = true,
            '>' if !in_quote => in_angle = false,
            ',' if !in_quote && !in_angle => {
                entries.push(&list[start..pos]);
                start = pos + 1;
            }
            _ => (),
        }
    }
    entries.push(&list[start..]);

    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rfind('<') {
            Some(open) if entry.ends_with('>') => {
                let name = entry[..open].trim().trim_matches('"').trim();
                let email = entry[open + 1..entry.len() - 1].trim();
                ((!name.is_empty()).then_some(name), email)
            }
            _ => (None, entry),
        })
        .collect()
}

fn to_address(list: &str) -> Address<'_> {
    let mut addresses = parse_addresses(list)
        .into_iter()
        .map(|(name, email)| match name {
            Some(name) => Address::from((name, email)),
            None => Address::from(email),
        })
        .collect::<Vec<_>>();

    if addresses.len() == 1 {
        addresses.remove(0)
    } else {
        Address::from(addresses)
    }
}

/// Encodes a compiled message for the Gmail `raw` field: base64 with the
/// URL-safe alphabet and no padding.
pub fn encode_raw(message: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(message)
}
