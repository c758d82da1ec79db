//! Saved search alerts and the predicate that decides whether a new product
//! should notify the alert's owner.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::{Product, ProductId, UserId};

/// Price range stored on an alert. Both bounds default to zero
/// independently, so an alert without a range only matches free items on
/// price.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AlertPriceRange {
    pub min: f64,
    pub max: f64,
}

impl AlertPriceRange {
    /// Inclusive containment check against the stored bounds.
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// A user's saved alert criteria. One per user, replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAlert {
    pub user_id: UserId,
    pub categories: Vec<String>,
    pub price_range: AlertPriceRange,
    pub keywords: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl SearchAlert {
    /// Empty category list means no constraint.
    pub fn category_matches(&self, product: &Product) -> bool {
        self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|category| product.categories.contains(category))
    }

    pub fn price_matches(&self, product: &Product) -> bool {
        self.price_range.contains(product.price)
    }

    /// Any keyword contained, case-insensitively, in any word of the name.
    /// Empty keyword list means no constraint.
    pub fn keyword_matches(&self, product: &Product) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let words: Vec<String> = product
            .name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        self.keywords.iter().any(|keyword| {
            let keyword = keyword.to_lowercase();
            words.iter().any(|word| word.contains(&keyword))
        })
    }

    /// Overall match: category alone suffices, otherwise price and keyword
    /// must both hold.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use marketplace::domain::{
    ///     AlertPriceRange, ListingKind, ProductDraft, SearchAlert, UserId,
    /// };
    ///
    /// let product = ProductDraft {
    ///     image_keys: vec!["k".into()],
    ///     name: "Desk lamp".into(),
    ///     listing_kind: ListingKind::Sale,
    ///     price: 30.0,
    ///     open_to_offers: false,
    ///     description: "Warm light".into(),
    ///     category: "lighting".into(),
    /// }
    /// .into_product(UserId::random(), Utc::now())
    /// .expect("valid draft");
    ///
    /// let alert = SearchAlert {
    ///     user_id: UserId::random(),
    ///     categories: vec!["garden".into()],
    ///     price_range: AlertPriceRange { min: 5.0, max: 50.0 },
    ///     keywords: vec!["LAMP".into()],
    ///     updated_at: Utc::now(),
    /// };
    /// assert!(alert.matches(&product));
    /// ```
    pub fn matches(&self, product: &Product) -> bool {
        self.category_matches(product)
            || (self.price_matches(product) && self.keyword_matches(product))
    }
}

/// Validation failures for [`SearchAlertDraft`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchAlertDraftError {
    #[error("min price must be a finite non-negative number, got {value}")]
    InvalidMin { value: f64 },
    #[error("max price must be a finite number greater than min ({min}), got {value}")]
    InvalidMax { value: f64, min: f64 },
}

impl SearchAlertDraftError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidMin { .. } => "minMaxPrice.min",
            Self::InvalidMax { .. } => "minMaxPrice.max",
        }
    }
}

/// Unvalidated alert submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchAlertDraft {
    pub categories: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub keywords: Vec<String>,
}

impl SearchAlertDraft {
    pub fn validate(&self) -> Result<(), SearchAlertDraftError> {
        let min = self.min_price.unwrap_or_default();
        if !min.is_finite() || min < 0.0 {
            return Err(SearchAlertDraftError::InvalidMin { value: min });
        }
        if let Some(max) = self.max_price
            && (!max.is_finite() || max <= min)
        {
            return Err(SearchAlertDraftError::InvalidMax { value: max, min });
        }
        Ok(())
    }

    /// Validate and produce the alert that replaces any previous one.
    pub fn into_alert(
        self,
        user_id: UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<SearchAlert, SearchAlertDraftError> {
        self.validate()?;
        Ok(SearchAlert {
            user_id,
            categories: self.categories,
            price_range: AlertPriceRange {
                min: self.min_price.unwrap_or_default(),
                max: self.max_price.unwrap_or_default(),
            },
            keywords: self.keywords,
            updated_at,
        })
    }
}

/// Append-only record that a product matched a user's alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAlertNotification {
    pub id: Uuid,
    pub receiver_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

impl SearchAlertNotification {
    pub fn new(receiver_id: UserId, product_id: ProductId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            receiver_id,
            product_id,
            created_at,
        }
    }
}

/// Notification joined with the product it points at, for the user's feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotificationView {
    pub id: Uuid,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_description: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingKind, ProductDraft};
    use rstest::{fixture, rstest};

    #[fixture]
    fn product() -> Product {
        ProductDraft {
            image_keys: vec!["images/sofa.jpg".to_owned()],
            name: "Vintage Leather sofa".to_owned(),
            listing_kind: ListingKind::Sale,
            price: 30.0,
            open_to_offers: true,
            description: "Comfy".to_owned(),
            category: "furniture".to_owned(),
        }
        .into_product(UserId::random(), Utc::now())
        .expect("valid draft")
    }

    fn alert(categories: &[&str], min: f64, max: f64, keywords: &[&str]) -> SearchAlert {
        SearchAlert {
            user_id: UserId::random(),
            categories: categories.iter().map(|c| (*c).to_owned()).collect(),
            price_range: AlertPriceRange { min, max },
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn price_band_with_vacuous_filters_matches_any_category(product: Product) {
        assert!(alert(&[], 5.0, 50.0, &[]).matches(&product));
    }

    #[rstest]
    fn foreign_category_and_out_of_range_price_do_not_match(product: Product) {
        assert!(!alert(&["garden"], 100.0, 200.0, &[]).matches(&product));
    }

    #[rstest]
    fn category_alone_matches_despite_price(product: Product) {
        assert!(alert(&["furniture"], 0.0, 0.0, &["bike"]).matches(&product));
    }

    #[rstest]
    fn price_without_keyword_hit_does_not_match(product: Product) {
        assert!(!alert(&["garden"], 5.0, 50.0, &["bike"]).matches(&product));
    }

    #[rstest]
    fn default_range_only_matches_free_items_on_price(mut product: Product) {
        let alert = alert(&["garden"], 0.0, 0.0, &[]);
        assert!(!alert.matches(&product));
        product.price = 0.0;
        assert!(alert.matches(&product));
    }

    #[rstest]
    #[case("LEATH", true)]
    #[case("sofa", true)]
    #[case("leather sofa", false)]
    #[case("table", false)]
    fn keywords_match_within_single_words(
        product: Product,
        #[case] keyword: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            alert(&[], 0.0, 0.0, &[keyword]).keyword_matches(&product),
            expected
        );
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(Some(5.0), None, true)]
    #[case(None, Some(10.0), true)]
    #[case(Some(-1.0), None, false)]
    #[case(Some(10.0), Some(10.0), false)]
    #[case(Some(10.0), Some(5.0), false)]
    #[case(None, Some(0.0), false)]
    fn draft_price_rules(
        #[case] min_price: Option<f64>,
        #[case] max_price: Option<f64>,
        #[case] valid: bool,
    ) {
        let draft = SearchAlertDraft {
            min_price,
            max_price,
            ..SearchAlertDraft::default()
        };
        assert_eq!(draft.validate().is_ok(), valid);
    }

    #[rstest]
    fn missing_bounds_default_to_zero_independently() {
        let draft = SearchAlertDraft {
            max_price: Some(40.0),
            ..SearchAlertDraft::default()
        };
        let alert = draft
            .into_alert(UserId::random(), Utc::now())
            .expect("valid draft");
        assert_eq!(alert.price_range, AlertPriceRange { min: 0.0, max: 40.0 });
    }
}
