//! Behaviour tests for search-alert fan-out on product creation.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::executor::block_on;
use marketplace::domain::UserId;
use marketplace::domain::ports::ProductCatalogue;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::in_memory::InMemoryMarketplace;
use support::{alert, catalogue, draft, north_of_origin, origin};

struct FanOutWorld {
    market: Arc<InMemoryMarketplace>,
    seller: Option<UserId>,
    watchers: HashMap<String, UserId>,
}

impl Default for FanOutWorld {
    fn default() -> Self {
        Self {
            market: InMemoryMarketplace::new(),
            seller: None,
            watchers: HashMap::new(),
        }
    }
}

impl FanOutWorld {
    fn add_watcher(&mut self, name: String, km: f64) -> UserId {
        let user = self.market.seed_user(north_of_origin(km));
        self.watchers.insert(name, user.clone());
        user
    }
}

#[fixture]
fn world() -> Mutex<FanOutWorld> {
    Mutex::new(FanOutWorld::default())
}

#[given("a seller at the market square")]
fn seller_at_origin(world: &Mutex<FanOutWorld>) {
    let mut world = world.lock().expect("world lock");
    world.seller = Some(world.market.seed_user(origin()));
}

#[given("a seller with no saved location")]
fn seller_without_location(world: &Mutex<FanOutWorld>) {
    world.lock().expect("world lock").seller = Some(UserId::random());
}

#[given("a watcher named {name} {km} km away watching {category}")]
fn watcher_of_category(world: &Mutex<FanOutWorld>, name: String, km: f64, category: String) {
    let mut world = world.lock().expect("world lock");
    let user = world.add_watcher(name, km);
    world
        .market
        .seed_alert(alert(&user, &[category.as_str()], (0.0, 0.0), &[]));
}

#[given("a watcher named {name} {km} km away searching {keyword} priced {min} to {max}")]
fn watcher_of_keyword(
    world: &Mutex<FanOutWorld>,
    name: String,
    km: f64,
    keyword: String,
    min: f64,
    max: f64,
) {
    let mut world = world.lock().expect("world lock");
    let user = world.add_watcher(name, km);
    world
        .market
        .seed_alert(alert(&user, &["garden"], (min, max), &[keyword.as_str()]));
}

#[when("the seller lists {name} in {category} for {price}")]
fn seller_lists(world: &Mutex<FanOutWorld>, name: String, category: String, price: f64) {
    let world = world.lock().expect("world lock");
    let seller = world.seller.clone().expect("seller given");
    let service = catalogue(world.market.ports(), 2);
    block_on(service.create_product(&seller, draft(&name, &category, price)))
        .expect("product created");
}

#[then("{name} has {count} notifications recorded")]
fn notifications_recorded(world: &Mutex<FanOutWorld>, name: String, count: usize) {
    let world = world.lock().expect("world lock");
    let watcher = world.watchers.get(&name).expect("known watcher");
    let received = world
        .market
        .notifications()
        .iter()
        .filter(|record| record.receiver_id == *watcher)
        .count();
    assert_eq!(received, count, "notifications for {name}");
}

#[then("{count} pushes are sent")]
fn pushes_sent(world: &Mutex<FanOutWorld>, count: usize) {
    let world = world.lock().expect("world lock");
    assert_eq!(world.market.pushes().len(), count);
}

#[scenario(path = "tests/features/search_alert_fan_out.feature")]
fn search_alert_fan_out(world: Mutex<FanOutWorld>) {
    drop(world);
}
