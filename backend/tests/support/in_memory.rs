//! In-memory implementations of every driven port.
//!
//! One [`InMemoryMarketplace`] backs all repositories so tests can seed users,
//! run the domain services, and inspect what was stored or pushed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use marketplace::domain::ports::{
    AlertNotificationRepository, AlertNotificationRepositoryError, FavouritesRepository,
    FavouritesRepositoryError, FeedPreferencesRepository, FeedPreferencesRepositoryError,
    FixtureImageUrlResolver, MarketplacePorts, NearbyUsers, NearbyUsersError, NoOpFanOutMetrics,
    ProductRepository, ProductRepositoryError, PushDispatchError, PushMessage,
    PushNotificationDispatcher, SearchAlertRepository, SearchAlertRepositoryError,
    UserProfileRepository, UserProfileRepositoryError,
};
use marketplace::domain::{
    FeedPreferences, GeoPoint, Product, ProductFilter, ProductId, ProductStatus, PushTarget,
    SearchAlert, SearchAlertNotification, UserId,
};

const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// Great-circle distance between two points.
pub fn haversine_metres(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat_a, lat_b) = (a.latitude().to_radians(), b.latitude().to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b.longitude() - a.longitude()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METRES * h.sqrt().asin()
}

#[derive(Default)]
struct Store {
    locations: Vec<(UserId, GeoPoint)>,
    push_targets: HashMap<UserId, PushTarget>,
    products: Vec<Product>,
    alerts: HashMap<UserId, SearchAlert>,
    notifications: Vec<SearchAlertNotification>,
    favourites: Vec<(UserId, ProductId)>,
    feeds: HashMap<UserId, FeedPreferences>,
}

/// A push handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct SentPush {
    pub tokens: Vec<String>,
    pub message: PushMessage,
}

#[derive(Default)]
pub struct InMemoryMarketplace {
    store: Mutex<Store>,
    pushes: Mutex<Vec<SentPush>>,
}

impl InMemoryMarketplace {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("store lock")
    }

    /// Port bundle whose repositories, geo index, and dispatcher are `self`.
    pub fn ports(self: &Arc<Self>) -> MarketplacePorts {
        MarketplacePorts {
            profiles: self.clone(),
            nearby_users: self.clone(),
            products: self.clone(),
            search_alerts: self.clone(),
            alert_notifications: self.clone(),
            favourites: self.clone(),
            feed_preferences: self.clone(),
            images: Arc::new(FixtureImageUrlResolver),
            push: self.clone(),
            fan_out_metrics: Arc::new(NoOpFanOutMetrics),
        }
    }

    /// Register a user at `location` with one device token.
    pub fn seed_user(&self, location: GeoPoint) -> UserId {
        let user = UserId::random();
        let mut store = self.store();
        store.locations.push((user.clone(), location));
        store.push_targets.insert(
            user.clone(),
            PushTarget {
                tokens: vec![format!("device-{user}")],
                notifications_enabled: true,
            },
        );
        user
    }

    pub fn seed_alert(&self, alert: SearchAlert) {
        self.store().alerts.insert(alert.user_id.clone(), alert);
    }

    pub fn notifications(&self) -> Vec<SearchAlertNotification> {
        self.store().notifications.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.store().products.clone()
    }

    pub fn push_target(&self, user: &UserId) -> Option<PushTarget> {
        self.store().push_targets.get(user).cloned()
    }

    pub fn pushes(&self) -> Vec<SentPush> {
        self.pushes.lock().expect("push lock").clone()
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryMarketplace {
    async fn find_location(
        &self,
        user_id: &UserId,
    ) -> Result<Option<GeoPoint>, UserProfileRepositoryError> {
        Ok(self
            .store()
            .locations
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, point)| *point))
    }

    async fn save_location(
        &self,
        user_id: &UserId,
        location: GeoPoint,
    ) -> Result<(), UserProfileRepositoryError> {
        let mut store = self.store();
        match store.locations.iter_mut().find(|(id, _)| id == user_id) {
            Some(entry) => entry.1 = location,
            None => store.locations.push((user_id.clone(), location)),
        }
        Ok(())
    }

    async fn find_push_target(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PushTarget>, UserProfileRepositoryError> {
        Ok(self.store().push_targets.get(user_id).cloned())
    }

    async fn add_push_token(
        &self,
        user_id: &UserId,
        token: &str,
    ) -> Result<bool, UserProfileRepositoryError> {
        let mut store = self.store();
        let target = store
            .push_targets
            .entry(user_id.clone())
            .or_insert_with(|| PushTarget {
                tokens: Vec::new(),
                notifications_enabled: true,
            });
        if target.tokens.iter().any(|known| known == token) {
            return Ok(false);
        }
        target.tokens.push(token.to_owned());
        Ok(true)
    }

    async fn set_notifications_enabled(
        &self,
        user_id: &UserId,
        enabled: bool,
    ) -> Result<(), UserProfileRepositoryError> {
        self.store()
            .push_targets
            .entry(user_id.clone())
            .or_insert_with(|| PushTarget {
                tokens: Vec::new(),
                notifications_enabled: true,
            })
            .notifications_enabled = enabled;
        Ok(())
    }
}

#[async_trait]
impl NearbyUsers for InMemoryMarketplace {
    async fn find_within(
        &self,
        centre: GeoPoint,
        radius_metres: f64,
        exclude: &UserId,
    ) -> Result<Vec<UserId>, NearbyUsersError> {
        let store = self.store();
        let mut nearby: Vec<(f64, UserId)> = store
            .locations
            .iter()
            .filter(|(id, _)| id != exclude)
            .map(|(id, point)| (haversine_metres(centre, *point), id.clone()))
            .filter(|(distance, _)| *distance <= radius_metres)
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(nearby.into_iter().map(|(_, id)| id).collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryMarketplace {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        self.store().products.push(product.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self
            .store()
            .products
            .iter()
            .find(|product| product.id == *product_id)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut owned: Vec<Product> = self
            .store()
            .products
            .iter()
            .filter(|product| product.owner_id == *owner_id)
            .filter(|product| status.is_none_or(|status| product.status == status))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_matching(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut matching: Vec<Product> = self
            .store()
            .products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut store = self.store();
        match store.products.iter_mut().find(|stored| stored.id == product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, product_id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut store = self.store();
        let before = store.products.len();
        store.products.retain(|product| product.id != *product_id);
        Ok(store.products.len() != before)
    }
}

#[async_trait]
impl SearchAlertRepository for InMemoryMarketplace {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SearchAlert>, SearchAlertRepositoryError> {
        Ok(self.store().alerts.get(user_id).cloned())
    }

    async fn upsert(&self, alert: &SearchAlert) -> Result<(), SearchAlertRepositoryError> {
        self.seed_alert(alert.clone());
        Ok(())
    }
}

#[async_trait]
impl AlertNotificationRepository for InMemoryMarketplace {
    async fn record(
        &self,
        notification: &SearchAlertNotification,
    ) -> Result<bool, AlertNotificationRepositoryError> {
        let mut store = self.store();
        let duplicate = store.notifications.iter().any(|existing| {
            existing.receiver_id == notification.receiver_id
                && existing.product_id == notification.product_id
        });
        if duplicate {
            return Ok(false);
        }
        store.notifications.push(notification.clone());
        Ok(true)
    }

    async fn list_for_receiver(
        &self,
        receiver_id: &UserId,
    ) -> Result<Vec<SearchAlertNotification>, AlertNotificationRepositoryError> {
        let mut received: Vec<SearchAlertNotification> = self
            .store()
            .notifications
            .iter()
            .filter(|record| record.receiver_id == *receiver_id)
            .cloned()
            .collect();
        received.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(received)
    }

    async fn delete_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<u64, AlertNotificationRepositoryError> {
        let mut store = self.store();
        let before = store.notifications.len();
        store
            .notifications
            .retain(|record| record.product_id != *product_id);
        Ok((before - store.notifications.len()) as u64)
    }
}

#[async_trait]
impl FavouritesRepository for InMemoryMarketplace {
    async fn exists(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        Ok(self
            .store()
            .favourites
            .iter()
            .any(|(user, product)| user == user_id && product == product_id))
    }

    async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        if self.exists(user_id, product_id).await? {
            return Ok(false);
        }
        self.store()
            .favourites
            .push((user_id.clone(), *product_id));
        Ok(true)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        let mut store = self.store();
        let before = store.favourites.len();
        store
            .favourites
            .retain(|(user, product)| !(user == user_id && product == product_id));
        Ok(store.favourites.len() != before)
    }

    async fn list_product_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProductId>, FavouritesRepositoryError> {
        Ok(self
            .store()
            .favourites
            .iter()
            .rev()
            .filter(|(user, _)| user == user_id)
            .map(|(_, product)| *product)
            .collect())
    }
}

#[async_trait]
impl FeedPreferencesRepository for InMemoryMarketplace {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FeedPreferences>, FeedPreferencesRepositoryError> {
        Ok(self.store().feeds.get(user_id).cloned())
    }

    async fn save(
        &self,
        preferences: &FeedPreferences,
    ) -> Result<(), FeedPreferencesRepositoryError> {
        self.store()
            .feeds
            .insert(preferences.user_id.clone(), preferences.clone());
        Ok(())
    }
}

#[async_trait]
impl PushNotificationDispatcher for InMemoryMarketplace {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<(), PushDispatchError> {
        self.pushes.lock().expect("push lock").push(SentPush {
            tokens: tokens.to_vec(),
            message: message.clone(),
        });
        Ok(())
    }
}
