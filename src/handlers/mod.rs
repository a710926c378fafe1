pub mod companies;
pub mod discounts;
pub mod price_lists;
pub mod products;

use std::str::FromStr;

use actix_web::web;
use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::errors::AppError;

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/companies/me", web::get().to(companies::get_my_company))
            .route("/companies/me", web::put().to(companies::update_my_company))
            .route("/companies", web::post().to(companies::create_company))
            .route("/products", web::get().to(products::list_products))
            .route("/products", web::post().to(products::create_product))
            .route("/products/import", web::post().to(products::import_products))
            .route("/products/adjust-prices", web::post().to(products::adjust_prices))
            // Must precede `/products/{id}`.
            .route("/products/clear", web::delete().to(products::clear_products))
            .route("/products/{id}", web::put().to(products::update_product))
            .route("/products/{id}", web::delete().to(products::delete_product))
            .route("/price-lists", web::post().to(price_lists::create_price_list))
            .route("/price-lists", web::get().to(price_lists::list_price_lists))
            .route("/price-lists/{id}", web::delete().to(price_lists::delete_price_list))
            .route(
                "/price-lists/{id}/public",
                web::get().to(price_lists::get_public_price_list),
            )
            .route("/discounts/parse", web::post().to(discounts::parse_discount)),
    );
}

/// Bounds on accepted decimals so every value fits a Postgres `NUMERIC`.
const MAX_DECIMAL_DIGITS: u64 = 38;
const MAX_DECIMAL_SCALE: i64 = 20;

/// A decimal sent either as a string (`"9.99"`) or as a JSON number.
/// Strings are preferred since they survive without floating-point loss.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecimalValue {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalValue {
    pub fn to_decimal(&self, field: &str) -> Result<BigDecimal, AppError> {
        let text = match self {
            DecimalValue::Text(s) => s.trim().to_string(),
            DecimalValue::Number(n) => n.to_string(),
        };
        let invalid = || AppError::BadRequest(format!("Invalid {} '{}'", field, text));
        let value = BigDecimal::from_str(&text).map_err(|_| invalid())?;
        let (_, scale) = value.as_bigint_and_exponent();
        if value.digits() > MAX_DECIMAL_DIGITS || scale.abs() > MAX_DECIMAL_SCALE {
            return Err(invalid());
        }
        Ok(value)
    }
}

/// Treats blank optional text as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
