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

use serde::de::DeserializeOwned;

/// Reads the file at `path` and parses it as JSON.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> crate::Result<T> {
    let path = path.as_ref();
    let contents = std::fs::read(path).map_err(|err| crate::Error::FileLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    serde_json::from_slice(&contents).map_err(|err| crate::Error::FileLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
