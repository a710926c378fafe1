use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::non_blank;
use crate::application::CatalogService;
use crate::auth::AuthenticatedUser;
use crate::domain::company::{Company, CompanyInput};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompanyRequest {
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
}

impl From<CompanyRequest> for CompanyInput {
    fn from(req: CompanyRequest) -> Self {
        CompanyInput {
            name: req.name.trim().to_string(),
            phone: non_blank(req.phone),
            contact_person: non_blank(req.contact_person),
            logo_url: non_blank(req.logo_url),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        CompanyResponse {
            id: c.id,
            name: c.name,
            phone: c.phone,
            contact_person: c.contact_person,
            logo_url: c.logo_url,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/companies/me
///
/// Returns the caller's company, or `null` when none is registered yet.
#[utoipa::path(
    get,
    path = "/api/companies/me",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "The caller's company or null", body = CompanyResponse),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "companies"
)]
pub async fn get_my_company(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let company = web::block(move || service.my_company(user.id()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(company.map(CompanyResponse::from)))
}

/// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    request_body = CompanyRequest,
    responses(
        (status = 201, description = "Company registered", body = CompanyResponse),
        (status = 400, description = "Missing company name"),
        (status = 409, description = "The caller already has a company"),
    ),
    tag = "companies"
)]
pub async fn create_company(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    body: web::Json<CompanyRequest>,
) -> Result<HttpResponse, AppError> {
    let input = CompanyInput::from(body.into_inner());

    let company = web::block(move || service.register_company(user.id(), input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CompanyResponse::from(company)))
}

/// PUT /api/companies/me
#[utoipa::path(
    put,
    path = "/api/companies/me",
    params(("x-user-id" = String, Header, description = "Authenticated user id")),
    request_body = CompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 404, description = "No company registered"),
    ),
    tag = "companies"
)]
pub async fn update_my_company(
    service: web::Data<CatalogService>,
    user: AuthenticatedUser,
    body: web::Json<CompanyRequest>,
) -> Result<HttpResponse, AppError> {
    let input = CompanyInput::from(body.into_inner());

    let company = web::block(move || service.update_company(user.id(), input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CompanyResponse::from(company)))
}
