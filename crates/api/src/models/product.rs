//! Catalog domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plaza_core::{CategoryId, Price, ProductId, Slug};

/// Binary image payload attached to a product.
///
/// Held transiently during request processing; the store owns the persisted
/// bytes. Never serialized into listing responses.
#[derive(Debug, Clone)]
pub struct Image {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Declared content type, e.g. `image/png`.
    pub content_type: String,
}

/// A sellable catalog entry.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL-safe slug, recomputed whenever the name changes.
    pub slug: Slug,
    /// Human-readable description.
    pub description: String,
    /// Non-negative price.
    pub price: Price,
    /// Owning category. Categories are owned externally.
    pub category: CategoryId,
    /// Quantity on hand.
    pub quantity: u32,
    /// Whether the product ships.
    pub shipping: bool,
    /// Optional image payload.
    pub image: Option<Image>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// A product category (owned externally, resolved into read responses).
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
}

/// Client-facing projection of a [`Product`].
///
/// Image bytes are projected out; `has_image` tells clients whether the
/// image endpoint will return data. The category reference is resolved to
/// its full representation.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub quantity: u32,
    pub shipping: bool,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductSummary {
    /// Project a product for a read response, dropping image bytes.
    #[must_use]
    pub fn project(product: &Product, category: Category) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            category,
            quantity: product.quantity,
            shipping: product.shipping,
            has_image: product.image.is_some(),
            created_at: product.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_category() -> Category {
        Category {
            id: CategoryId::generate(),
            name: "Shirts".into(),
            slug: Slug::from_name("Shirts"),
        }
    }

    #[test]
    fn projection_drops_image_bytes() {
        let product = Product {
            id: ProductId::generate(),
            name: "Red Shirt".into(),
            slug: Slug::from_name("Red Shirt"),
            description: "A red shirt".into(),
            price: Price::parse("19.99").expect("valid price"),
            category: CategoryId::generate(),
            quantity: 3,
            shipping: true,
            image: Some(Image {
                data: vec![0xFF; 64],
                content_type: "image/png".into(),
            }),
            created_at: Utc::now(),
        };

        let summary = ProductSummary::project(&product, sample_category());
        let json = serde_json::to_value(&summary).expect("serialize");
        assert!(json.get("image").is_none());
        assert_eq!(json["has_image"], true);
        assert_eq!(json["category"]["name"], "Shirts");
    }
}
