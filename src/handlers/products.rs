use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::discounts::resolve_discount;
use super::{non_blank, DecimalValue};
use crate::application::CatalogService;
use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductInput, ProductType};
use crate::errors::AppError;
use crate::pricing::DiscountKind;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Product fields. The aliases accept rows decoded from the catalog
/// spreadsheet (`produto`, `tipo`, `porcao`, `valor`, `fabricante`, `foto`).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[serde(alias = "produto")]
    pub description: String,
    #[serde(rename = "type", alias = "tipo")]
    pub product_type: ProductType,
    #[serde(default, alias = "porcao")]
    pub portion: Option<String>,
    /// Base price, e.g. "9.99"
    #[serde(alias = "valor")]
    #[schema(value_type = String)]
    pub value: DecimalValue,
    #[serde(default, alias = "fabricante")]
    pub manufacturer: Option<String>,
    #[serde(default, alias = "foto")]
    pub photo_url: Option<String>,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput, AppError> {
        Ok(ProductInput {
            value: self.value.to_decimal("value")?,
            description: self.description.trim().to_string(),
            product_type: self.product_type,
            portion: non_blank(self.portion),
            manufacturer: non_blank(self.manufacturer),
            photo_url: non_blank(self.photo_url),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportProductsRequest {
    pub products: Vec<ProductRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportProductsResponse {
    pub imported_count: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustPricesRequest {
    pub product_ids: Vec<Uuid>,
    /// Free text such as "-10%" or "+2,50"; takes precedence over the typed fields.
    pub discount: Option<String>,
    pub discount_type: Option<DiscountKind>,
    /// Signed amount, e.g. "-10"
    #[schema(value_type = Option<String>)]
    pub discount_value: Option<DecimalValue>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdjustPricesResponse {
    pub updated_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearProductsResponse {
    pub deleted_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub portion: Option<String>,
    pub value: String,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            company_id: p.company_id,
            description: p.description,
            product_type: p.product_type,
            portion: p.portion,
            value: p.value.to_string(),
            manufacturer: p.manufacturer,
            photo_url: p.photo_url,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
///
/// Returns the caller's products, newest first.
#[utoipa::path(
    get,
    path = "/api/products",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "The caller's products", body = [ProductResponse]),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let products = web::block(move || service.list_products(user.id()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product or no company registered"),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let product = web::block(move || service.create_product(user.id(), input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// POST /api/products/import
///
/// Inserts every row or none of them.
#[utoipa::path(
    post,
    path = "/api/products/import",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    request_body = ImportProductsRequest,
    responses(
        (status = 201, description = "Products imported", body = ImportProductsResponse),
        (status = 400, description = "A row is invalid or no company registered"),
    ),
    tag = "products"
)]
pub async fn import_products(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    body: web::Json<ImportProductsRequest>,
) -> Result<HttpResponse, AppError> {
    let inputs = body
        .into_inner()
        .products
        .into_iter()
        .enumerate()
        .map(|(row, p)| {
            p.into_input()
                .map_err(|e| AppError::BadRequest(format!("row {}: {}", row + 1, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let imported_count = web::block(move || service.import_products(user.id(), inputs))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ImportProductsResponse { imported_count }))
}

/// POST /api/products/adjust-prices
///
/// Overwrites the price of each listed product with the adjusted price.
/// Existing price lists keep the prices they were created with.
#[utoipa::path(
    post,
    path = "/api/products/adjust-prices",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    request_body = AdjustPricesRequest,
    responses(
        (status = 200, description = "Prices adjusted", body = AdjustPricesResponse),
        (status = 400, description = "Missing discount or products not found"),
    ),
    tag = "products"
)]
pub async fn adjust_prices(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    body: web::Json<AdjustPricesRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let discount = resolve_discount(
        body.discount.as_deref(),
        body.discount_type,
        body.discount_value.as_ref(),
    )?
    .ok_or_else(|| AppError::BadRequest("A discount is required".to_string()))?;

    let updated_count =
        web::block(move || service.adjust_prices(user.id(), body.product_ids, discount))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AdjustPricesResponse { updated_count }))
}

/// DELETE /api/products/clear
///
/// Deletes all of the caller's products.
#[utoipa::path(
    delete,
    path = "/api/products/clear",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "Products deleted", body = ClearProductsResponse),
    ),
    tag = "products"
)]
pub async fn clear_products(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let deleted_count = web::block(move || service.clear_products(user.id()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ClearProductsResponse { deleted_count }))
}

/// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let product = web::block(move || service.update_product(user.id(), product_id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    web::block(move || service.delete_product(user.id(), product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
