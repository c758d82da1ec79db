//! Shared builders for marketplace integration suites.
//!
//! Each suite compiles as its own crate and uses a different subset of these
//! helpers.
#![allow(dead_code)]

pub mod in_memory;

use std::sync::Arc;

use chrono::Utc;
use marketplace::domain::ports::MarketplacePorts;
use marketplace::domain::{
    AlertMatchingService, AlertPriceRange, GeoPoint, ListingKind, ProductCatalogueService,
    ProductDiscoveryService, ProductDraft, SearchAlert, UserId,
};
use mockable::{Clock, DefaultClock};

/// Central London; candidate locations are offset from here.
pub fn origin() -> GeoPoint {
    GeoPoint::new(-0.1276, 51.5072).expect("valid origin")
}

/// A point roughly `km` kilometres north of [`origin`].
pub fn north_of_origin(km: f64) -> GeoPoint {
    GeoPoint::new(-0.1276, 51.5072 + km / 111.32).expect("valid offset point")
}

pub fn draft(name: &str, category: &str, price: f64) -> ProductDraft {
    ProductDraft {
        image_keys: vec![format!("images/{}.jpg", name.to_lowercase().replace(' ', "-"))],
        name: name.to_owned(),
        listing_kind: ListingKind::Sale,
        price,
        open_to_offers: false,
        description: format!("{name} in good condition"),
        category: category.to_owned(),
    }
}

pub fn alert(user: &UserId, categories: &[&str], price: (f64, f64), keywords: &[&str]) -> SearchAlert {
    SearchAlert {
        user_id: user.clone(),
        categories: categories.iter().map(|c| (*c).to_owned()).collect(),
        price_range: AlertPriceRange {
            min: price.0,
            max: price.1,
        },
        keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
        updated_at: Utc::now(),
    }
}

pub fn catalogue(ports: MarketplacePorts, concurrency: usize) -> ProductCatalogueService {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let matching = Arc::new(AlertMatchingService::new(
        ports.clone(),
        Arc::clone(&clock),
        concurrency,
    ));
    ProductCatalogueService::new(ports, matching, clock)
}

pub fn discovery(ports: MarketplacePorts) -> ProductDiscoveryService {
    ProductDiscoveryService::new(ports, 4)
}
