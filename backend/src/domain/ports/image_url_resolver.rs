//! Port for turning stored image keys into display URLs.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving image URLs.
    pub enum ImageUrlResolverError {
        /// The key cannot be expressed as a URL.
        InvalidKey { key: String, message: String } =>
            "image key `{key}` cannot be resolved: {message}",
        /// The resolver backend could not be reached.
        Unavailable { message: String } =>
            "image resolver unavailable: {message}",
    }
}

/// Maps image storage keys to URLs clients can fetch, preserving order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUrlResolver: Send + Sync {
    async fn resolve(&self, keys: &[String]) -> Result<Vec<String>, ImageUrlResolverError>;
}

/// Fixture implementation that returns the keys unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageUrlResolver;

#[async_trait]
impl ImageUrlResolver for FixtureImageUrlResolver {
    async fn resolve(&self, keys: &[String]) -> Result<Vec<String>, ImageUrlResolverError> {
        Ok(keys.to_vec())
    }
}
