use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DecimalValue;
use crate::errors::AppError;
use crate::pricing::{self, DiscountInput, DiscountKind, DiscountSpec, FORMAT_HINT};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseDiscountRequest {
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    Parsed,
    NoValue,
    StillTyping,
    Unparseable,
    InvalidFormat,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscountResponse {
    /// Signed decimal; negative is a discount, positive a surcharge.
    pub magnitude: String,
    pub kind: DiscountKind,
}

impl From<&DiscountSpec> for DiscountResponse {
    fn from(spec: &DiscountSpec) -> Self {
        DiscountResponse {
            magnitude: spec.magnitude.to_string(),
            kind: spec.kind,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParseDiscountResponse {
    pub status: DiscountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DiscountInput> for ParseDiscountResponse {
    fn from(input: DiscountInput) -> Self {
        let status = match &input {
            DiscountInput::Parsed(_) => DiscountStatus::Parsed,
            DiscountInput::NoValue => DiscountStatus::NoValue,
            DiscountInput::StillTyping => DiscountStatus::StillTyping,
            DiscountInput::Unparseable => DiscountStatus::Unparseable,
            DiscountInput::InvalidFormat => DiscountStatus::InvalidFormat,
        };
        ParseDiscountResponse {
            status,
            error: input.is_error().then(|| FORMAT_HINT.to_string()),
            discount: input.into_spec().as_ref().map(DiscountResponse::from),
        }
    }
}

/// Discount fields shared by bulk re-pricing and price list creation.
///
/// `discount` is free text run through the parser and wins over the
/// structured `discount_type` / `discount_value` pair.
pub(crate) fn resolve_discount(
    discount: Option<&str>,
    discount_type: Option<DiscountKind>,
    discount_value: Option<&DecimalValue>,
) -> Result<Option<DiscountSpec>, AppError> {
    if let Some(text) = discount {
        return match pricing::parse_committed(text) {
            DiscountInput::Parsed(spec) => Ok(Some(spec)),
            DiscountInput::NoValue => Ok(None),
            _ => Err(AppError::BadRequest(FORMAT_HINT.to_string())),
        };
    }

    let Some(kind) = discount_type else {
        return Ok(None);
    };
    let magnitude = match discount_value {
        Some(value) => value.to_decimal("discount_value")?,
        None => BigDecimal::from(0),
    };
    Ok(Some(DiscountSpec::new(magnitude, kind)))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/discounts/parse
///
/// Classifies discount text as the user types it.
#[utoipa::path(
    post,
    path = "/api/discounts/parse",
    request_body = ParseDiscountRequest,
    responses(
        (status = 200, description = "Classification of the input", body = ParseDiscountResponse),
    ),
    tag = "discounts"
)]
pub async fn parse_discount(body: web::Json<ParseDiscountRequest>) -> HttpResponse {
    let parsed = pricing::parse_discount(&body.input);
    HttpResponse::Ok().json(ParseDiscountResponse::from(parsed))
}
