//! Discovery criteria and the per-owner product filter derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DEFAULT_SEARCH_RADIUS_MILES, Product, UserId, miles_to_metres};

/// Result ordering requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DiscoverySort {
    /// Candidate order: nearest owner first.
    #[default]
    Relevance,
    /// Newest products first.
    MostRecent,
}

impl TryFrom<u8> for DiscoverySort {
    type Error = DiscoveryCriteriaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Relevance),
            1 => Ok(Self::MostRecent),
            other => Err(DiscoveryCriteriaError::Sort { value: other }),
        }
    }
}

impl From<DiscoverySort> for u8 {
    fn from(value: DiscoverySort) -> Self {
        match value {
            DiscoverySort::Relevance => 0,
            DiscoverySort::MostRecent => 1,
        }
    }
}

/// Optional price bounds supplied with a discovery request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceBand {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBand {
    fn has_non_zero_bound(&self) -> bool {
        self.min.is_some_and(|min| min != 0.0) || self.max.is_some_and(|max| max != 0.0)
    }

    /// Half-open `[min, max + 1)` band applied to the catalogue, present
    /// only when both bounds are positive.
    pub fn catalogue_bounds(&self) -> Option<(f64, f64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > 0.0 && max > 0.0 => Some((min, max + 1.0)),
            _ => None,
        }
    }
}

/// Validation failures for [`DiscoveryCriteria`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryCriteriaError {
    #[error("search radius must be a finite non-negative number, got {value}")]
    Radius { value: f64 },
    #[error("min price must be a finite non-negative number, got {value}")]
    MinPrice { value: f64 },
    #[error("max price must be a finite non-negative number, got {value}")]
    MaxPrice { value: f64 },
    #[error("max price ({max}) must be greater than min price ({min})")]
    PriceOrder { min: f64, max: f64 },
    #[error("sort must be 0 or 1, got {value}")]
    Sort { value: u8 },
}

impl DiscoveryCriteriaError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Radius { .. } => "searchRadius",
            Self::MinPrice { .. } => "price.min",
            Self::MaxPrice { .. } | Self::PriceOrder { .. } => "price.max",
            Self::Sort { .. } => "sort",
        }
    }
}

/// Client-supplied discovery filters. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscoveryCriteria {
    pub search_term: Option<String>,
    pub search_radius_miles: Option<f64>,
    pub categories: Vec<String>,
    pub sort: Option<DiscoverySort>,
    pub price: Option<PriceBand>,
}

impl DiscoveryCriteria {
    /// Reject malformed criteria before any store is consulted.
    pub fn validate(&self) -> Result<(), DiscoveryCriteriaError> {
        if let Some(radius) = self.search_radius_miles
            && (!radius.is_finite() || radius < 0.0)
        {
            return Err(DiscoveryCriteriaError::Radius { value: radius });
        }
        let Some(price) = self.price else {
            return Ok(());
        };
        if let Some(min) = price.min
            && (!min.is_finite() || min < 0.0)
        {
            return Err(DiscoveryCriteriaError::MinPrice { value: min });
        }
        if let Some(max) = price.max
            && (!max.is_finite() || max < 0.0)
        {
            return Err(DiscoveryCriteriaError::MaxPrice { value: max });
        }
        if let (Some(min), Some(max)) = (price.min, price.max)
            && max <= min
        {
            return Err(DiscoveryCriteriaError::PriceOrder { min, max });
        }
        Ok(())
    }

    /// True when the client supplied no effective filter, which enables the
    /// personalised feed fallback. Default values (blank search term, zero
    /// radius, relevance sort, zero price bounds) do not count as filters.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term
            .as_deref()
            .is_none_or(|term| term.trim().is_empty())
            && self.search_radius_miles.is_none_or(|radius| radius == 0.0)
            && self.categories.is_empty()
            && self.sort_order() == DiscoverySort::Relevance
            && !self.price.is_some_and(|price| price.has_non_zero_bound())
    }

    /// Scan radius in metres; absent or zero falls back to the default.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{DiscoveryCriteria, miles_to_metres};
    ///
    /// let criteria = DiscoveryCriteria { search_radius_miles: Some(0.0), ..Default::default() };
    /// assert_eq!(criteria.radius_metres(), miles_to_metres(10.0));
    /// ```
    pub fn radius_metres(&self) -> f64 {
        let miles = self
            .search_radius_miles
            .filter(|radius| *radius > 0.0)
            .unwrap_or(DEFAULT_SEARCH_RADIUS_MILES);
        miles_to_metres(miles)
    }

    /// Category set to filter by, given the requester's feed categories.
    pub fn effective_categories(&self, feed_categories: Option<Vec<String>>) -> Vec<String> {
        if !self.categories.is_empty() {
            return self.categories.clone();
        }
        if self.is_unfiltered() {
            return feed_categories.unwrap_or_default();
        }
        Vec::new()
    }

    pub fn sort_order(&self) -> DiscoverySort {
        self.sort.unwrap_or_default()
    }
}

/// Catalogue query for a single owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub owner_id: UserId,
    /// Case-insensitive substring of the product name.
    pub name_contains: Option<String>,
    /// Match any of these categories; empty means any category.
    pub categories: Vec<String>,
    /// Price band, lower bound inclusive and upper bound exclusive.
    pub price_between: Option<(f64, f64)>,
}

impl ProductFilter {
    /// Build the filter for one candidate owner.
    pub fn for_owner(owner_id: UserId, criteria: &DiscoveryCriteria, categories: &[String]) -> Self {
        Self {
            owner_id,
            name_contains: criteria.search_term.clone(),
            categories: categories.to_vec(),
            price_between: criteria.price.and_then(|price| price.catalogue_bounds()),
        }
    }

    /// In-process evaluation mirroring the catalogue query.
    pub fn matches(&self, product: &Product) -> bool {
        if product.owner_id != self.owner_id {
            return false;
        }
        if let Some(term) = &self.name_contains
            && !product.name.to_lowercase().contains(&term.to_lowercase())
        {
            return false;
        }
        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|category| product.categories.contains(category))
        {
            return false;
        }
        self.price_between
            .is_none_or(|(min, upper)| min <= product.price && product.price < upper)
    }
}
