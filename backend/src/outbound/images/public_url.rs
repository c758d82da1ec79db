//! Resolves image keys against a public bucket or CDN base URL.

use async_trait::async_trait;
use url::Url;

use crate::domain::image_key_path;
use crate::domain::ports::{ImageUrlResolver, ImageUrlResolverError};

/// Joins each key onto a fixed base URL.
///
/// The base must end with `/` for keys to be appended rather than replace
/// the last path segment; [`PublicUrlImageResolver::new`] normalises this.
#[derive(Debug, Clone)]
pub struct PublicUrlImageResolver {
    base: Url,
}

impl PublicUrlImageResolver {
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    fn resolve_one(&self, key: &str) -> Result<String, ImageUrlResolverError> {
        let path = image_key_path(key).ok_or_else(|| {
            ImageUrlResolverError::invalid_key(key, "key must be a non-empty relative path")
        })?;
        self.base
            .join(path)
            .map(String::from)
            .map_err(|error| ImageUrlResolverError::invalid_key(key, error.to_string()))
    }
}

#[async_trait]
impl ImageUrlResolver for PublicUrlImageResolver {
    async fn resolve(&self, keys: &[String]) -> Result<Vec<String>, ImageUrlResolverError> {
        keys.iter().map(|key| self.resolve_one(key)).collect()
    }
}
