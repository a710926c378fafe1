use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Packaging the catalog sells products in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProductType {
    Pote,
    Blister,
    Frasco,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Pote => "Pote",
            ProductType::Blister => "Blister",
            ProductType::Frasco => "Frasco",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pote" => Ok(ProductType::Pote),
            "Blister" => Ok(ProductType::Blister),
            "Frasco" => Ok(ProductType::Frasco),
            other => Err(format!("unknown product type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub description: String,
    pub product_type: ProductType,
    pub portion: Option<String>,
    pub value: BigDecimal,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub description: String,
    pub product_type: ProductType,
    pub portion: Option<String>,
    /// Current base price.
    pub value: BigDecimal,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
