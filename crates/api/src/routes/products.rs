//! Catalog route handlers.
//!
//! Mutations accept `multipart/form-data` so an image can ride along with
//! the text fields; everything else is JSON.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use plaza_core::{CategoryId, Price, ProductId, Slug};

use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Image, ProductSummary};
use crate::services::{CatalogService, ProductDraft};
use crate::state::AppState;

/// Filter request body: category IDs plus an optional `[min, max]` price
/// range, matching the shape the storefront sends.
#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub checked: Vec<CategoryId>,
    #[serde(default)]
    pub radio: Vec<Decimal>,
}

fn catalog(state: &AppState) -> CatalogService {
    CatalogService::new(state.products(), state.categories())
}

/// Pull the product fields and the optional `photo` part out of a
/// multipart form. Unknown parts are ignored.
async fn read_product_form(mut multipart: Multipart) -> Result<(ProductDraft, Option<Image>)> {
    let malformed = || ApiError::Validation("malformed multipart form".into());

    let mut draft = ProductDraft::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| malformed())? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if name == "photo" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let data = field.bytes().await.map_err(|_| malformed())?.to_vec();
            image = Some(Image { data, content_type });
            continue;
        }

        let value = field.text().await.map_err(|_| malformed())?;
        match name.as_str() {
            "name" => draft.name = Some(value),
            "description" => draft.description = Some(value),
            "price" => draft.price = Some(value),
            "category" => draft.category = Some(value),
            "quantity" => draft.quantity = Some(value),
            "shipping" => draft.shipping = Some(value),
            _ => {}
        }
    }

    Ok((draft, image))
}

/// Create a product.
///
/// POST /api/products (admin)
///
/// # Errors
///
/// Returns a validation error naming the first missing or invalid field.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    multipart: Multipart,
) -> Result<Json<ProductSummary>> {
    let (draft, image) = read_product_form(multipart).await?;
    let product = catalog(&state).create(&draft, image).await?;
    Ok(Json(product))
}

/// Update a product, re-deriving its slug.
///
/// PUT /api/products/{id} (admin)
///
/// # Errors
///
/// Returns `NotFound` for an unknown ID, otherwise the same validation
/// errors as create.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ProductSummary>> {
    let (draft, image) = read_product_form(multipart).await?;
    let product = catalog(&state)
        .update(ProductId::from_uuid(id), &draft, image)
        .await?;
    Ok(Json(product))
}

/// Delete a product, returning the deleted entry without its image.
///
/// DELETE /api/products/{id} (admin)
///
/// # Errors
///
/// Returns `NotFound` for an unknown ID.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductSummary>> {
    let product = catalog(&state).remove(ProductId::from_uuid(id)).await?;
    Ok(Json(product))
}

/// Newest products, capped at twelve.
///
/// GET /api/products
///
/// # Errors
///
/// Returns a generic failure if the store fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductSummary>>> {
    Ok(Json(catalog(&state).list().await?))
}

/// Read a single product by slug.
///
/// GET /api/products/slug/{slug}
///
/// # Errors
///
/// Returns `NotFound` for an unknown slug.
pub async fn read(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductSummary>> {
    let slug = Slug::from_name(&slug);
    Ok(Json(catalog(&state).read_by_slug(&slug).await?))
}

/// Serve a product's image bytes with its stored content type.
///
/// GET /api/products/{id}/image
///
/// A product without an image answers 204 No Content; an unknown ID is
/// 404. The two cases stay distinct.
///
/// # Errors
///
/// Returns `NotFound` for an unknown ID.
pub async fn image(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    match catalog(&state).image(ProductId::from_uuid(id)).await? {
        Some(img) => Ok(([(CONTENT_TYPE, img.content_type)], img.data).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Filter products by category set and inclusive price range.
///
/// POST /api/products/filtered
///
/// # Errors
///
/// Returns a validation error for a negative price bound.
pub async fn filtered(
    State(state): State<AppState>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<Vec<ProductSummary>>> {
    let price_range = match req.radio.as_slice() {
        [min, max] => {
            let min = Price::new(*min).map_err(|e| ApiError::Validation(e.to_string()))?;
            let max = Price::new(*max).map_err(|e| ApiError::Validation(e.to_string()))?;
            Some((min, max))
        }
        _ => None,
    };
    Ok(Json(catalog(&state).filter(&req.checked, price_range).await?))
}

/// Total product count.
///
/// GET /api/products/count
///
/// # Errors
///
/// Returns a generic failure if the store fails.
pub async fn count(State(state): State<AppState>) -> Result<Json<u64>> {
    Ok(Json(catalog(&state).count().await?))
}

/// One page of products (two per page, 1-based).
///
/// GET /api/products/page/{page}
///
/// # Errors
///
/// Returns a generic failure if the store fails.
pub async fn paginate(
    State(state): State<AppState>,
    Path(page): Path<i64>,
) -> Result<Json<Vec<ProductSummary>>> {
    Ok(Json(catalog(&state).paginate(page).await?))
}

/// Keyword search over name and description.
///
/// GET /api/products/search/{keyword}
///
/// # Errors
///
/// Returns a generic failure if the store fails.
pub async fn search(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<ProductSummary>>> {
    Ok(Json(catalog(&state).search(&keyword).await?))
}

/// Products related to one product by shared category.
///
/// GET /api/products/related/{product_id}/{category_id}
///
/// # Errors
///
/// Returns a generic failure if the store fails.
pub async fn related(
    State(state): State<AppState>,
    Path((product_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<ProductSummary>>> {
    let related = catalog(&state)
        .related(
            ProductId::from_uuid(product_id),
            CategoryId::from_uuid(category_id),
        )
        .await?;
    Ok(Json(related))
}
