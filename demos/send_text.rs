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

use easy_gmail::EasyGmail;

#[tokio::main]
async fn main() {
    env_logger::init();

    // Credentials are downloaded from the Google Cloud console, the token
    // is the result of a previously completed OAuth consent flow.
    let gmail = EasyGmail::new("./credentials.json", "./token.json", "me").unwrap();

    let sent = gmail
        .send_text_email(
            "john@example.com",
            "jane@example.com",
            "Hi!",
            "Hello, world!",
        )
        .await
        .unwrap();
    println!("Sent: {}", sent);
}
