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

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

/// HTML templates keyed by path, read from disk on first use and kept
/// for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: Mutex<HashMap<PathBuf, Arc<str>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the template at `path`, reading it only if not cached yet.
    pub async fn get_or_load(&self, path: impl AsRef<Path>) -> crate::Result<Arc<str>> {
        let path = path.as_ref();
        let mut templates = self.templates.lock().await;

        if let Some(html) = templates.get(path) {
            return Ok(html.clone());
        }

        let html: Arc<str> = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| crate::Error::Template {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?
            .into();
        tracing::trace!(path = %path.display(), "Cached html template");
        templates.insert(path.to_path_buf(), html.clone());

        Ok(html)
    }

    pub async fn len(&self) -> usize {
        self.templates.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.templates.lock().await.is_empty()
    }
}

/// Replaces, in order, the first literal occurrence of each tag with its text.
///
/// Tags missing from the template are ignored and later occurrences of a tag
/// are left untouched.
pub fn replace_tags<K, V>(template: &str, tags: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    tags.into_iter()
        .fold(template.to_string(), |html, (tag, text)| {
            html.replacen(tag.as_ref(), text.as_ref(), 1)
        })
}
