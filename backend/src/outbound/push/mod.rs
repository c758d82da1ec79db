//! Push notification gateway adapters.

mod fcm;

pub use fcm::{FcmPushDispatcher, FcmSettings};
