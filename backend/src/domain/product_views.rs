//! Viewer-specific annotation of products.

use tracing::warn;

use super::ports::MarketplacePorts;
use super::{Error, Product, ProductView, UserId};

/// Annotate a product for `viewer`: favourite flag plus image URLs.
pub(crate) async fn annotate(
    ports: &MarketplacePorts,
    viewer: &UserId,
    product: Product,
) -> Result<ProductView, Error> {
    let is_favourite = ports.favourites.exists(viewer, &product.id).await?;
    Ok(with_image_urls(ports, product, is_favourite).await)
}

/// Resolve image URLs for a product whose favourite flag is already known.
pub(crate) async fn with_image_urls(
    ports: &MarketplacePorts,
    product: Product,
    is_favourite: bool,
) -> ProductView {
    let image_urls = image_urls(ports, &product).await;
    ProductView {
        product,
        image_urls,
        is_favourite,
    }
}

/// Public URLs for a product's images. A resolver failure is logged and
/// yields no URLs so one unreadable listing never fails a whole response.
pub(crate) async fn image_urls(ports: &MarketplacePorts, product: &Product) -> Vec<String> {
    match ports.images.resolve(&product.image_keys).await {
        Ok(urls) => urls,
        Err(error) => {
            warn!(product_id = %product.id, %error, "image URLs unavailable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        ImageUrlResolverError, MockFavouritesRepository, MockImageUrlResolver,
    };
    use crate::domain::{ListingKind, ProductDraft};

    fn product(owner: UserId) -> Product {
        ProductDraft {
            image_keys: vec!["images/lamp.jpg".to_owned()],
            name: "Desk lamp".to_owned(),
            listing_kind: ListingKind::Sale,
            price: 15.0,
            open_to_offers: true,
            description: "Warm light".to_owned(),
            category: "home".to_owned(),
        }
        .into_product(owner, Utc::now())
        .expect("valid draft")
    }

    fn failing_images() -> MockImageUrlResolver {
        let mut images = MockImageUrlResolver::new();
        images
            .expect_resolve()
            .returning(|_| Err(ImageUrlResolverError::unavailable("bucket offline")));
        images
    }

    #[rstest]
    #[tokio::test]
    async fn resolver_failure_yields_no_urls() {
        let mut ports = MarketplacePorts::fixture();
        ports.images = Arc::new(failing_images());

        let view = with_image_urls(&ports, product(UserId::random()), true).await;

        assert!(view.image_urls.is_empty());
        assert!(view.is_favourite);
    }

    #[rstest]
    #[tokio::test]
    async fn annotate_keeps_favourite_flag_when_images_fail() {
        let viewer = UserId::random();
        let product = product(UserId::random());
        let mut favourites = MockFavouritesRepository::new();
        favourites
            .expect_exists()
            .with(eq(viewer.clone()), eq(product.id))
            .times(1)
            .returning(|_, _| Ok(true));
        let mut ports = MarketplacePorts::fixture();
        ports.favourites = Arc::new(favourites);
        ports.images = Arc::new(failing_images());

        let view = annotate(&ports, &viewer, product).await.expect("annotated");

        assert!(view.is_favourite);
        assert!(view.image_urls.is_empty());
    }
}
