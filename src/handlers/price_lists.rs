use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::discounts::resolve_discount;
use super::DecimalValue;
use crate::application::CatalogService;
use crate::auth::AuthenticatedUser;
use crate::domain::price_list::{PriceListSummary, PublicPriceList, PublicPriceListItem};
use crate::domain::product::ProductType;
use crate::errors::AppError;
use crate::pricing::{format_price, DiscountKind};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePriceListRequest {
    pub name: String,
    pub product_ids: Vec<Uuid>,
    /// Free text such as "-10%"; takes precedence over the typed fields.
    pub discount: Option<String>,
    pub discount_type: Option<DiscountKind>,
    #[schema(value_type = Option<String>)]
    pub discount_value: Option<DecimalValue>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePriceListResponse {
    pub id: Uuid,
    /// Shareable link to the public page of the list.
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceListResponse {
    pub id: Uuid,
    pub name: String,
    pub discount_type: Option<DiscountKind>,
    pub discount_value: Option<String>,
    pub item_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PriceListSummary> for PriceListResponse {
    fn from(s: PriceListSummary) -> Self {
        let list = s.list;
        PriceListResponse {
            id: list.id,
            name: list.name,
            discount_type: list.discount.as_ref().map(|d| d.kind),
            discount_value: list.discount.as_ref().map(|d| d.magnitude.to_string()),
            item_count: s.item_count,
            created_at: list.created_at.to_rfc3339(),
            updated_at: list.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicCompanyResponse {
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicItemResponse {
    pub product_id: Uuid,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub portion: Option<String>,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
    /// Snapshot price, unrounded.
    pub adjusted_value: String,
    /// Snapshot price rounded to cents for display.
    pub adjusted_display: String,
}

impl From<PublicPriceListItem> for PublicItemResponse {
    fn from(item: PublicPriceListItem) -> Self {
        let p = item.product;
        PublicItemResponse {
            product_id: p.id,
            description: p.description,
            product_type: p.product_type,
            portion: p.portion,
            manufacturer: p.manufacturer,
            photo_url: p.photo_url,
            adjusted_display: format_price(&item.adjusted_value),
            adjusted_value: item.adjusted_value.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicPriceListResponse {
    pub id: Uuid,
    pub name: String,
    pub company: PublicCompanyResponse,
    pub items: Vec<PublicItemResponse>,
    pub generated_at: String,
}

impl From<PublicPriceList> for PublicPriceListResponse {
    fn from(view: PublicPriceList) -> Self {
        PublicPriceListResponse {
            id: view.list.id,
            name: view.list.name,
            company: PublicCompanyResponse {
                name: view.company.name,
                phone: view.company.phone,
                contact_person: view.company.contact_person,
                logo_url: view.company.logo_url,
            },
            items: view.items.into_iter().map(PublicItemResponse::from).collect(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

fn share_url(req: &HttpRequest, id: Uuid) -> String {
    let info = req.connection_info();
    format!("{}://{}/lista/{}", info.scheme(), info.host(), id)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/price-lists
///
/// Freezes the adjusted price of each selected product into a new list.
/// Without a discount the current prices are copied unchanged.
#[utoipa::path(
    post,
    path = "/api/price-lists",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    request_body = CreatePriceListRequest,
    responses(
        (status = 201, description = "Price list created", body = CreatePriceListResponse),
        (status = 400, description = "Invalid name, discount or product selection"),
    ),
    tag = "price-lists"
)]
pub async fn create_price_list(
    req: HttpRequest,
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    body: web::Json<CreatePriceListRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let discount = resolve_discount(
        body.discount.as_deref(),
        body.discount_type,
        body.discount_value.as_ref(),
    )?;

    let list = web::block(move || {
        service.create_price_list(user.id(), &body.name, body.product_ids, discount)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CreatePriceListResponse {
        id: list.id,
        url: share_url(&req, list.id),
    }))
}

/// GET /api/price-lists
#[utoipa::path(
    get,
    path = "/api/price-lists",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "The caller's price lists, newest first", body = [PriceListResponse]),
    ),
    tag = "price-lists"
)]
pub async fn list_price_lists(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let lists = web::block(move || service.list_price_lists(user.id()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<PriceListResponse> = lists.into_iter().map(PriceListResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/price-lists/{id}
#[utoipa::path(
    delete,
    path = "/api/price-lists/{id}",
    params(
        ("id" = Uuid, Path, description = "Price list UUID"),
        ("x-user-id" = String, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 204, description = "Price list deleted"),
        (status = 404, description = "Price list not found"),
    ),
    tag = "price-lists"
)]
pub async fn delete_price_list(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let list_id = path.into_inner();

    web::block(move || service.delete_price_list(user.id(), list_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/price-lists/{id}/public
///
/// Customer-facing view of a list. No identity is required.
#[utoipa::path(
    get,
    path = "/api/price-lists/{id}/public",
    params(("id" = Uuid, Path, description = "Price list UUID")),
    responses(
        (status = 200, description = "The list with its frozen prices", body = PublicPriceListResponse),
        (status = 404, description = "Price list not found"),
    ),
    tag = "price-lists"
)]
pub async fn get_public_price_list(
    service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let list_id = path.into_inner();

    let view = web::block(move || service.public_price_list(list_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PublicPriceListResponse::from(view)))
}
