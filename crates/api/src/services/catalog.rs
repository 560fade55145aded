//! Catalog mutation pipeline and query surface.
//!
//! Mutations validate raw form fields in a fixed order, short-circuiting at
//! the first failure, then persist through the abstract store. All read
//! operations project image bytes out and resolve the category reference.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use plaza_core::{CategoryId, Price, ProductId, Slug};

use crate::db::{CategoryStore, ProductStore, StoreError};
use crate::models::{Category, Image, Product, ProductSummary};

/// Maximum accepted image payload in bytes.
pub const MAX_IMAGE_BYTES: usize = 1_000_000;

/// Cap on the default listing.
pub const LIST_CAP: usize = 12;

/// Entries per page for `paginate`.
pub const PAGE_SIZE: usize = 2;

/// Cap on related-product lookups.
pub const RELATED_CAP: usize = 3;

/// Errors from the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A required field is missing or blank. Carries the first offending
    /// field in validation order.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// A field is present but unparseable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// The uploaded image exceeds [`MAX_IMAGE_BYTES`].
    #[error("image must be at most {MAX_IMAGE_BYTES} bytes")]
    OversizedImage,
    /// The ID or slug does not resolve to a product.
    #[error("product not found")]
    NotFound,
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raw mutation input, straight from the multipart form.
///
/// Fields stay optional strings until [`ProductDraft::validate`] runs, so
/// validation can report exactly which field is missing.
#[derive(Debug, Default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub shipping: Option<String>,
}

/// A draft that passed validation.
struct ValidatedDraft {
    name: String,
    description: String,
    price: Price,
    category: CategoryId,
    quantity: u32,
    shipping: bool,
}

impl ProductDraft {
    /// Validate in fixed order: name, description, price, category,
    /// quantity, shipping, then image size. Short-circuits at the first
    /// failure.
    fn validate(&self, image: Option<&Image>) -> Result<ValidatedDraft, CatalogError> {
        let name = require("name", self.name.as_deref())?;
        let description = require("description", self.description.as_deref())?;
        let price = require("price", self.price.as_deref())?;
        let category = require("category", self.category.as_deref())?;
        let quantity = require("quantity", self.quantity.as_deref())?;
        let shipping = require("shipping", self.shipping.as_deref())?;

        if image.is_some_and(|img| img.data.len() > MAX_IMAGE_BYTES) {
            return Err(CatalogError::OversizedImage);
        }

        let price = Price::parse(price).map_err(|e| CatalogError::InvalidField {
            field: "price",
            reason: e.to_string(),
        })?;
        let category = category
            .parse()
            .map_err(|_| CatalogError::InvalidField {
                field: "category",
                reason: "not a category id".into(),
            })?;
        let quantity = quantity.parse().map_err(|_| CatalogError::InvalidField {
            field: "quantity",
            reason: "not a non-negative integer".into(),
        })?;
        let shipping = parse_bool(shipping).ok_or(CatalogError::InvalidField {
            field: "shipping",
            reason: "expected true/false".into(),
        })?;

        Ok(ValidatedDraft {
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            category,
            quantity,
            shipping,
        })
    }
}

fn require<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, CatalogError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CatalogError::MissingField(field)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Catalog operations over the abstract store.
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>, categories: Arc<dyn CategoryStore>) -> Self {
        Self {
            products,
            categories,
        }
    }

    // =========================================================================
    // Mutation pipeline
    // =========================================================================

    /// Create a product from validated fields, attaching the image when
    /// supplied.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field, or a
    /// store error.
    pub async fn create(
        &self,
        draft: &ProductDraft,
        image: Option<Image>,
    ) -> Result<ProductSummary, CatalogError> {
        let valid = draft.validate(image.as_ref())?;
        let product = Product {
            id: ProductId::generate(),
            slug: Slug::from_name(&valid.name),
            name: valid.name,
            description: valid.description,
            price: valid.price,
            category: valid.category,
            quantity: valid.quantity,
            shipping: valid.shipping,
            image,
            created_at: Utc::now(),
        };

        let product = self.products.insert_product(product).await?;
        tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
        self.summarize(&product).await
    }

    /// Update a product. Re-derives the slug from the new name; the stored
    /// image is replaced only when a new one is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown ID, otherwise the
    /// same errors as [`Self::create`].
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        image: Option<Image>,
    ) -> Result<ProductSummary, CatalogError> {
        let existing = self
            .products
            .find_product(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        let valid = draft.validate(image.as_ref())?;

        let product = Product {
            id,
            slug: Slug::from_name(&valid.name),
            name: valid.name,
            description: valid.description,
            price: valid.price,
            category: valid.category,
            quantity: valid.quantity,
            shipping: valid.shipping,
            image: image.or(existing.image),
            created_at: existing.created_at,
        };

        let product = self
            .products
            .update_product(product)
            .await?
            .ok_or(CatalogError::NotFound)?;
        tracing::info!(product_id = %product.id, "product updated");
        self.summarize(&product).await
    }

    /// Delete a product, returning the deleted entry without its image.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown ID.
    pub async fn remove(&self, id: ProductId) -> Result<ProductSummary, CatalogError> {
        let product = self
            .products
            .delete_product(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        tracing::info!(product_id = %product.id, "product deleted");
        self.summarize(&product).await
    }

    /// Fetch a product's image payload.
    ///
    /// `Ok(None)` means the product exists but has no image; an unknown ID
    /// is [`CatalogError::NotFound`]. The two outcomes stay distinct.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown ID.
    pub async fn image(&self, id: ProductId) -> Result<Option<Image>, CatalogError> {
        let product = self
            .products
            .find_product(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        Ok(product.image)
    }

    // =========================================================================
    // Query surface
    // =========================================================================

    /// Newest products, capped at [`LIST_CAP`]. A bounded preview, not
    /// pagination.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn list(&self) -> Result<Vec<ProductSummary>, CatalogError> {
        let products = self.products.products_newest_first(0, Some(LIST_CAP)).await?;
        self.summarize_all(&products).await
    }

    /// Read a single product by slug.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown slug.
    pub async fn read_by_slug(&self, slug: &Slug) -> Result<ProductSummary, CatalogError> {
        let product = self
            .products
            .find_product_by_slug(slug)
            .await?
            .ok_or(CatalogError::NotFound)?;
        self.summarize(&product).await
    }

    /// One page of products, newest-first, [`PAGE_SIZE`] per page. Pages
    /// are 1-based; zero or negative means page 1.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn paginate(&self, page: i64) -> Result<Vec<ProductSummary>, CatalogError> {
        let page = page.max(1) as usize;
        let skip = (page - 1) * PAGE_SIZE;
        let products = self
            .products
            .products_newest_first(skip, Some(PAGE_SIZE))
            .await?;
        self.summarize_all(&products).await
    }

    /// Products restricted by category set and inclusive price range,
    /// AND-composed. With neither restriction this is an uncapped list.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn filter(
        &self,
        categories: &[CategoryId],
        price_range: Option<(Price, Price)>,
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        let products = self
            .products
            .products_filtered(categories, price_range)
            .await?;
        self.summarize_all(&products).await
    }

    /// Total product count (store estimate).
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn count(&self) -> Result<u64, CatalogError> {
        Ok(self.products.estimated_product_count().await?)
    }

    /// Case-insensitive substring search over name or description.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn search(&self, keyword: &str) -> Result<Vec<ProductSummary>, CatalogError> {
        let products = self.products.products_matching(keyword).await?;
        self.summarize_all(&products).await
    }

    /// Products sharing `category`, excluding `product_id`, capped at
    /// [`RELATED_CAP`].
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup fails.
    pub async fn related(
        &self,
        product_id: ProductId,
        category: CategoryId,
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        let products = self
            .products
            .products_related(product_id, category, RELATED_CAP)
            .await?;
        self.summarize_all(&products).await
    }

    // =========================================================================
    // Projection helpers
    // =========================================================================

    async fn resolve_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        let category = self.categories.find_category(id).await?.ok_or_else(|| {
            StoreError::DataCorruption(format!("product references unknown category {id}"))
        })?;
        Ok(category)
    }

    async fn summarize(&self, product: &Product) -> Result<ProductSummary, CatalogError> {
        let category = self.resolve_category(product.category).await?;
        Ok(ProductSummary::project(product, category))
    }

    async fn summarize_all(
        &self,
        products: &[Product],
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        // Resolve each distinct category once per call.
        let mut cache: HashMap<CategoryId, Category> = HashMap::new();
        let mut out = Vec::with_capacity(products.len());
        for product in products {
            let category = match cache.get(&product.category) {
                Some(c) => c.clone(),
                None => {
                    let c = self.resolve_category(product.category).await?;
                    cache.insert(product.category, c.clone());
                    c
                }
            };
            out.push(ProductSummary::project(product, category));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    struct Fixture {
        svc: CatalogService,
        shirts: CategoryId,
        shoes: CategoryId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let shirts = store.seed_category("Shirts").expect("seed");
        let shoes = store.seed_category("Shoes").expect("seed");
        Fixture {
            svc: CatalogService::new(store.clone(), store),
            shirts,
            shoes,
        }
    }

    fn draft(name: &str, category: CategoryId, price: &str) -> ProductDraft {
        ProductDraft {
            name: Some(name.to_owned()),
            description: Some(format!("{name} description")),
            price: Some(price.to_owned()),
            category: Some(category.to_string()),
            quantity: Some("5".into()),
            shipping: Some("true".into()),
        }
    }

    fn png(len: usize) -> Image {
        Image {
            data: vec![0xAB; len],
            content_type: "image/png".into(),
        }
    }

    #[tokio::test]
    async fn create_reports_first_missing_field_in_order() {
        let f = fixture();

        let mut d = draft("Red Shirt", f.shirts, "10");
        d.name = None;
        d.description = None;
        // Both name and description missing: name wins, it comes first.
        assert!(matches!(
            f.svc.create(&d, None).await,
            Err(CatalogError::MissingField("name"))
        ));

        let mut d = draft("Red Shirt", f.shirts, "10");
        d.description = Some("   ".into());
        assert!(matches!(
            f.svc.create(&d, None).await,
            Err(CatalogError::MissingField("description"))
        ));

        let mut d = draft("Red Shirt", f.shirts, "10");
        d.shipping = None;
        assert!(matches!(
            f.svc.create(&d, None).await,
            Err(CatalogError::MissingField("shipping"))
        ));
    }

    #[tokio::test]
    async fn create_enforces_image_cap() {
        let f = fixture();
        let d = draft("Red Shirt", f.shirts, "10");

        let at_cap = f.svc.create(&d, Some(png(MAX_IMAGE_BYTES))).await;
        assert!(at_cap.is_ok());

        let d = draft("Blue Shirt", f.shirts, "10");
        let over = f.svc.create(&d, Some(png(MAX_IMAGE_BYTES + 1))).await;
        assert!(matches!(over, Err(CatalogError::OversizedImage)));
    }

    #[tokio::test]
    async fn missing_shipping_is_reported_before_oversized_image() {
        let f = fixture();
        let mut d = draft("Red Shirt", f.shirts, "10");
        d.shipping = None;
        assert!(matches!(
            f.svc.create(&d, Some(png(MAX_IMAGE_BYTES + 1))).await,
            Err(CatalogError::MissingField("shipping"))
        ));
    }

    #[tokio::test]
    async fn create_trims_name_and_derives_slug() {
        let f = fixture();
        let created = f
            .svc
            .create(&draft("  Red Shirt ", f.shirts, "19.99"), None)
            .await
            .expect("create");
        assert_eq!(created.name, "Red Shirt");
        assert_eq!(created.slug.as_str(), "red-shirt");
        assert_eq!(created.category.name, "Shirts");
        assert!(!created.has_image);
    }

    #[tokio::test]
    async fn update_recomputes_slug_and_keeps_image() {
        let f = fixture();
        let created = f
            .svc
            .create(&draft("Red Shirt", f.shirts, "10"), Some(png(16)))
            .await
            .expect("create");

        let updated = f
            .svc
            .update(created.id, &draft("Blue Shirt", f.shirts, "12"), None)
            .await
            .expect("update");
        assert_eq!(updated.slug.as_str(), "blue-shirt");
        // No image supplied: the stored one is untouched.
        assert!(updated.has_image);
        let stored = f.svc.image(created.id).await.expect("image");
        assert_eq!(stored.expect("present").data.len(), 16);
    }

    #[tokio::test]
    async fn update_replaces_image_when_supplied() {
        let f = fixture();
        let created = f
            .svc
            .create(&draft("Red Shirt", f.shirts, "10"), Some(png(16)))
            .await
            .expect("create");

        f.svc
            .update(created.id, &draft("Red Shirt", f.shirts, "10"), Some(png(32)))
            .await
            .expect("update");
        let stored = f.svc.image(created.id).await.expect("image");
        assert_eq!(stored.expect("present").data.len(), 32);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let f = fixture();
        let result = f
            .svc
            .update(ProductId::generate(), &draft("X", f.shirts, "1"), None)
            .await;
        assert!(matches!(result, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn remove_returns_entry_then_not_found() {
        let f = fixture();
        let created = f
            .svc
            .create(&draft("Red Shirt", f.shirts, "10"), None)
            .await
            .expect("create");

        let removed = f.svc.remove(created.id).await.expect("remove");
        assert_eq!(removed.id, created.id);
        assert!(matches!(
            f.svc.remove(created.id).await,
            Err(CatalogError::NotFound)
        ));
    }

    #[tokio::test]
    async fn image_distinguishes_missing_product_from_missing_image() {
        let f = fixture();
        let plain = f
            .svc
            .create(&draft("Plain", f.shirts, "10"), None)
            .await
            .expect("create");

        // Product without image: Ok(None), not an error.
        assert!(f.svc.image(plain.id).await.expect("image").is_none());
        // Unknown product: NotFound.
        assert!(matches!(
            f.svc.image(ProductId::generate()).await,
            Err(CatalogError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_caps_at_twelve_but_filter_does_not() {
        let f = fixture();
        for i in 0..13 {
            f.svc
                .create(&draft(&format!("P{i}"), f.shirts, "10"), None)
                .await
                .expect("create");
        }

        assert_eq!(f.svc.list().await.expect("list").len(), LIST_CAP);
        // No restrictions: same set as list, without the cap.
        assert_eq!(f.svc.filter(&[], None).await.expect("filter").len(), 13);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let f = fixture();
        for name in ["Oldest", "Middle", "Newest"] {
            f.svc
                .create(&draft(name, f.shirts, "10"), None)
                .await
                .expect("create");
        }
        let names: Vec<_> = f
            .svc
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn paginate_page_two_of_five_returns_third_and_fourth_newest() {
        let f = fixture();
        for i in 1..=5 {
            f.svc
                .create(&draft(&format!("P{i}"), f.shirts, "10"), None)
                .await
                .expect("create");
        }

        let page = f.svc.paginate(2).await.expect("paginate");
        let names: Vec<_> = page.into_iter().map(|p| p.name).collect();
        // Newest-first order is P5..P1; page 2 skips two.
        assert_eq!(names, ["P3", "P2"]);

        // Page zero and negative pages behave as page 1.
        let first: Vec<_> = f
            .svc
            .paginate(0)
            .await
            .expect("paginate")
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(first, ["P5", "P4"]);
    }

    #[tokio::test]
    async fn filter_composes_categories_and_price() {
        let f = fixture();
        f.svc
            .create(&draft("Cheap Shirt", f.shirts, "5"), None)
            .await
            .expect("create");
        f.svc
            .create(&draft("Dear Shirt", f.shirts, "50"), None)
            .await
            .expect("create");
        f.svc
            .create(&draft("Cheap Shoe", f.shoes, "5"), None)
            .await
            .expect("create");

        let range = Some((
            Price::parse("0").expect("valid"),
            Price::parse("10").expect("valid"),
        ));
        let hits = f.svc.filter(&[f.shirts], range).await.expect("filter");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Cheap Shirt");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_name_and_description() {
        let f = fixture();
        f.svc
            .create(&draft("Red Shirt", f.shirts, "10"), None)
            .await
            .expect("create");
        let mut d = draft("Scarf", f.shirts, "10");
        d.description = Some("goes with any red shirt style".into());
        f.svc.create(&d, None).await.expect("create");
        f.svc
            .create(&draft("Sandal", f.shoes, "10"), None)
            .await
            .expect("create");

        let hits = f.svc.search("SHIRT").await.expect("search");
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn related_never_includes_anchor_or_other_categories() {
        let f = fixture();
        let anchor = f
            .svc
            .create(&draft("Anchor", f.shirts, "10"), None)
            .await
            .expect("create");
        for i in 0..4 {
            f.svc
                .create(&draft(&format!("Shirt {i}"), f.shirts, "10"), None)
                .await
                .expect("create");
        }
        f.svc
            .create(&draft("Shoe", f.shoes, "10"), None)
            .await
            .expect("create");

        let related = f.svc.related(anchor.id, f.shirts).await.expect("related");
        assert_eq!(related.len(), RELATED_CAP);
        assert!(related.iter().all(|p| p.id != anchor.id));
        assert!(related.iter().all(|p| p.category.id == f.shirts));
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let f = fixture();
        assert_eq!(f.svc.count().await.expect("count"), 0);
        f.svc
            .create(&draft("One", f.shirts, "10"), None)
            .await
            .expect("create");
        assert_eq!(f.svc.count().await.expect("count"), 1);
    }
}
