use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::company::Company;
use super::product::Product;
use crate::pricing::DiscountSpec;

#[derive(Debug, Clone)]
pub struct PriceList {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    /// `None` when the list was created without an adjustment.
    pub discount: Option<DiscountSpec>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PriceListSummary {
    pub list: PriceList,
    pub item_count: i64,
}

/// A product price frozen at list creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotItem {
    pub product_id: Uuid,
    pub adjusted_value: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PublicPriceListItem {
    pub product: Product,
    pub adjusted_value: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PublicPriceList {
    pub list: PriceList,
    pub company: Company,
    pub items: Vec<PublicPriceListItem>,
}
