//! Image URL resolution adapters.

mod public_url;

pub use public_url::PublicUrlImageResolver;
