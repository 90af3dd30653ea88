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

use crate::{
    gmail::MessageTransport,
    message::{encode_raw, EmailInputs},
    PACKAGE_NAME,
};

/// Compiles `inputs` and submits it through `transport` on behalf of `user_id`.
///
/// Returns `Err(MalformedInput)` before any network activity when the inputs
/// do not carry exactly one body. Compilation and transport failures are
/// logged and reported as `Ok(false)`.
pub async fn send_email<T: MessageTransport>(
    inputs: &EmailInputs<'_>,
    user_id: &str,
    transport: &T,
) -> crate::Result<bool> {
    inputs.body()?;

    let message = match inputs.compile() {
        Ok(message) => message,
        Err(err) => {
            tracing::error!("{}: Error compiling email {}", PACKAGE_NAME, err);
            return Ok(false);
        }
    };

    match transport.send(user_id, &encode_raw(message)).await {
        Ok(sent) => {
            tracing::debug!(
                id = %sent.id,
                thread_id = %sent.thread_id,
                "{}: Sent email to {}",
                PACKAGE_NAME,
                inputs.to
            );
            Ok(true)
        }
        Err(err) => {
            tracing::error!("{}: Could not send email: {}", PACKAGE_NAME, err);
            Ok(false)
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    use crate::{
        gmail::{MessageTransport, SentMessage},
        message::EmailInputs,
        sender::send_email,
        Error,
    };

    /// Records every submission and answers with a fixed outcome.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub fail: bool,
        pub calls: AtomicUsize,
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        pub fn failing() -> Self {
            MockTransport {
                fail: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MessageTransport for MockTransport {
        async fn send(&self, user_id: &str, raw: &str) -> crate::Result<SentMessage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Transport("500 Internal Server Error".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((user_id.to_string(), raw.to_string()));
            Ok(SentMessage {
                id: "id".to_string(),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn send_text() {
        let transport = MockTransport::default();
        let inputs = EmailInputs::new("a@x.com", "b@x.com", "Hi").text_body("body");

        assert!(send_email(&inputs, "me", &transport).await.unwrap());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "me");
        let raw = String::from_utf8(URL_SAFE_NO_PAD.decode(&sent[0].1).unwrap()).unwrap();
        assert!(raw.contains("Subject: Hi"), "{}", raw);
        assert!(raw.contains("body"), "{}", raw);
    }

    #[tokio::test]
    async fn send_failure_is_false() {
        let transport = MockTransport::failing();
        let inputs = EmailInputs::new("a@x.com", "b@x.com", "Hi").html_body("<p>body</p>");

        assert!(!send_email(&inputs, "me", &transport).await.unwrap());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_inputs_never_reach_transport() {
        let transport = MockTransport::default();

        let neither = EmailInputs::new("a@x.com", "b@x.com", "Hi");
        let both = neither.clone().text_body("body").html_body("<p>body</p>");

        for inputs in [neither, both] {
            assert!(matches!(
                send_email(&inputs, "me", &transport).await,
                Err(Error::MalformedInput)
            ));
        }
        assert_eq!(transport.calls(), 0);
    }
}
