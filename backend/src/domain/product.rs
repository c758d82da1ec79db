//! Product listings.
//!
//! A [`Product`] is created from a validated [`ProductDraft`] and never
//! changes owner. The owner may later apply a [`ProductEdit`] or move it
//! through the sale lifecycle. Creation stores exactly one category tag,
//! although the model carries a set so filters can intersect against it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::UserId;

/// Stable product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Error returned when a stored enum label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

/// Whether the product is sold or given away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sale,
    Free,
}

impl ListingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Free => "free",
        }
    }
}

impl FromStr for ListingKind {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Self::Sale),
            "free" => Ok(Self::Free),
            other => Err(UnknownLabel {
                kind: "listing kind",
                value: other.to_owned(),
            }),
        }
    }
}

/// Sale lifecycle of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Reserved,
    Sold,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "reserved" => Ok(Self::Reserved),
            "sold" => Ok(Self::Sold),
            other => Err(UnknownLabel {
                kind: "product status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Persisted product record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub owner_id: UserId,
    /// Storage keys of the product images, in display order.
    pub image_keys: Vec<String>,
    pub name: String,
    pub listing_kind: ListingKind,
    pub status: ProductStatus,
    pub price: f64,
    pub open_to_offers: bool,
    pub description: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Validation failures for [`ProductDraft`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProductDraftError {
    #[error("product name must not be empty")]
    EmptyName,
    #[error("product description must not be empty")]
    EmptyDescription,
    #[error("product category must not be empty")]
    EmptyCategory,
    #[error("at least one product image is required")]
    MissingImages,
    #[error("product image key `{key}` must be a non-empty relative path")]
    InvalidImageKey { key: String },
    #[error("price must be a finite non-negative number, got {value}")]
    InvalidPrice { value: f64 },
}

impl ProductDraftError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "productName",
            Self::EmptyDescription => "description",
            Self::EmptyCategory => "category",
            Self::MissingImages | Self::InvalidImageKey { .. } => "productImages",
            Self::InvalidPrice { .. } => "price",
        }
    }
}

/// Storage path of an image key: leading slashes stripped, never empty, and
/// free of `..` segments. `None` when the key cannot name a stored object.
///
/// # Examples
/// ```
/// use marketplace::domain::image_key_path;
///
/// assert_eq!(image_key_path("/products/a.jpg"), Some("products/a.jpg"));
/// assert_eq!(image_key_path("/"), None);
/// assert_eq!(image_key_path("a/../b"), None);
/// ```
pub fn image_key_path(key: &str) -> Option<&str> {
    let path = key.trim().trim_start_matches('/');
    if path.is_empty() || path.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(path)
}

fn check_listing(
    name: &str,
    description: &str,
    category: &str,
    image_keys: &[String],
    price: f64,
) -> Result<(), ProductDraftError> {
    if name.trim().is_empty() {
        return Err(ProductDraftError::EmptyName);
    }
    if description.trim().is_empty() {
        return Err(ProductDraftError::EmptyDescription);
    }
    if category.trim().is_empty() {
        return Err(ProductDraftError::EmptyCategory);
    }
    if image_keys.is_empty() {
        return Err(ProductDraftError::MissingImages);
    }
    if let Some(key) = image_keys.iter().find(|key| image_key_path(key).is_none()) {
        return Err(ProductDraftError::InvalidImageKey { key: key.clone() });
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ProductDraftError::InvalidPrice { value: price });
    }
    Ok(())
}

/// Unvalidated product submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub image_keys: Vec<String>,
    pub name: String,
    pub listing_kind: ListingKind,
    pub price: f64,
    pub open_to_offers: bool,
    pub description: String,
    pub category: String,
}

impl ProductDraft {
    /// Check the draft without consuming it.
    pub fn validate(&self) -> Result<(), ProductDraftError> {
        check_listing(
            &self.name,
            &self.description,
            &self.category,
            &self.image_keys,
            self.price,
        )
    }

    /// Validate and turn the draft into an active product.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use marketplace::domain::{ListingKind, ProductDraft, ProductStatus, UserId};
    ///
    /// let draft = ProductDraft {
    ///     image_keys: vec!["images/chair.jpg".into()],
    ///     name: "Oak chair".into(),
    ///     listing_kind: ListingKind::Sale,
    ///     price: 25.0,
    ///     open_to_offers: true,
    ///     description: "Sturdy".into(),
    ///     category: "furniture".into(),
    /// };
    /// let product = draft.into_product(UserId::random(), Utc::now()).expect("valid draft");
    /// assert_eq!(product.status, ProductStatus::Active);
    /// assert_eq!(product.categories, vec!["furniture".to_owned()]);
    /// ```
    pub fn into_product(
        self,
        owner_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Product, ProductDraftError> {
        self.validate()?;
        Ok(Product {
            id: ProductId::random(),
            owner_id,
            image_keys: self.image_keys,
            name: self.name,
            listing_kind: self.listing_kind,
            status: ProductStatus::Active,
            price: self.price,
            open_to_offers: self.open_to_offers,
            description: self.description,
            categories: vec![self.category],
            created_at,
        })
    }
}

/// Owner edit of an existing product. `None` keeps the stored value; the
/// description is always resubmitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductEdit {
    pub image_keys: Option<Vec<String>>,
    pub name: Option<String>,
    pub listing_kind: Option<ListingKind>,
    pub price: Option<f64>,
    pub open_to_offers: Option<bool>,
    pub description: String,
    /// Replaces the category set with this single tag.
    pub category: Option<String>,
}

impl ProductEdit {
    /// Apply the edit, re-checking the listing rules on the result. Identity,
    /// owner, status and creation time are untouched.
    pub fn apply(self, mut product: Product) -> Result<Product, ProductDraftError> {
        if let Some(image_keys) = self.image_keys {
            product.image_keys = image_keys;
        }
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(listing_kind) = self.listing_kind {
            product.listing_kind = listing_kind;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(open_to_offers) = self.open_to_offers {
            product.open_to_offers = open_to_offers;
        }
        if let Some(category) = self.category {
            product.categories = vec![category];
        }
        product.description = self.description;

        let category = product.categories.first().map_or("", String::as_str);
        check_listing(
            &product.name,
            &product.description,
            category,
            &product.image_keys,
            product.price,
        )?;
        Ok(product)
    }
}

/// Product annotated for a particular viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub image_urls: Vec<String>,
    pub is_favourite: bool,
}

/// Outcome of toggling a favourite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavouriteToggle {
    Added,
    Removed,
}
