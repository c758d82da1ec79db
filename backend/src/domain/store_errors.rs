//! Conversions from driven port errors into domain errors.
//!
//! Connection failures surface as `service_unavailable`; everything else a
//! store reports is an internal error.

use super::Error;
use super::ports::{
    AlertNotificationRepositoryError, FavouritesRepositoryError, FeedPreferencesRepositoryError,
    NearbyUsersError, ProductRepositoryError, SearchAlertRepositoryError,
    UserProfileRepositoryError,
};

macro_rules! store_error_conversions {
    ($($error:ident => $label:literal),* $(,)?) => {
        $(
            impl From<$error> for Error {
                fn from(error: $error) -> Self {
                    match error {
                        $error::Connection { message } => {
                            Error::service_unavailable(format!("{} unavailable: {message}", $label))
                        }
                        $error::Query { message } => {
                            Error::internal(format!("{} error: {message}", $label))
                        }
                    }
                }
            }
        )*
    };
}

store_error_conversions! {
    NearbyUsersError => "geo index",
    UserProfileRepositoryError => "user profile repository",
    ProductRepositoryError => "product repository",
    SearchAlertRepositoryError => "search alert repository",
    AlertNotificationRepositoryError => "alert notification repository",
    FavouritesRepositoryError => "favourites repository",
    FeedPreferencesRepositoryError => "feed preferences repository",
}
