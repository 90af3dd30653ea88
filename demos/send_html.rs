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

    let gmail = EasyGmail::new("./credentials.json", "./token.json", "me").unwrap();

    // welcome.html contains, for example, "<h1>Welcome {name}!</h1>".
    // Only the first "{name}" is replaced.
    for name in ["Jane", "James"] {
        let sent = gmail
            .send_html_email(
                "john@example.com",
                "jane@example.com",
                "Welcome",
                "./welcome.html",
                [("{name}", name)],
            )
            .await
            .unwrap();
        println!("Sent to {}: {}", name, sent);
    }
}
