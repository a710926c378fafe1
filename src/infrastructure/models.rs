use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::company::Company;
use crate::domain::errors::DomainError;
use crate::domain::price_list::PriceList;
use crate::domain::product::Product;
use crate::pricing::{DiscountKind, DiscountSpec};
use crate::schema::{companies, price_list_items, price_lists, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompanyRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompanyRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = companies)]
#[diesel(treat_none_as_null = true)]
pub struct CompanyChangeset {
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = products)]
#[diesel(belongs_to(CompanyRow, foreign_key = company_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub description: String,
    pub product_type: String,
    pub portion: Option<String>,
    pub value: BigDecimal,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub description: String,
    pub product_type: String,
    pub portion: Option<String>,
    pub value: BigDecimal,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangeset {
    pub description: String,
    pub product_type: String,
    pub portion: Option<String>,
    pub value: BigDecimal,
    pub manufacturer: Option<String>,
    pub photo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = price_lists)]
#[diesel(belongs_to(CompanyRow, foreign_key = company_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PriceListRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub discount_type: Option<String>,
    pub discount_value: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = price_lists)]
pub struct NewPriceListRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub discount_type: Option<String>,
    pub discount_value: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = price_list_items)]
pub struct NewPriceListItemRow {
    pub id: Uuid,
    pub price_list_id: Uuid,
    pub product_id: Uuid,
    pub adjusted_value: BigDecimal,
}

// ── Row → domain conversions ─────────────────────────────────────────────────

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            phone: row.phone,
            contact_person: row.contact_person,
            logo_url: row.logo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            company_id: row.company_id,
            description: row.description,
            product_type: row.product_type.parse().map_err(DomainError::Internal)?,
            portion: row.portion,
            value: row.value,
            manufacturer: row.manufacturer,
            photo_url: row.photo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<PriceListRow> for PriceList {
    type Error = DomainError;

    fn try_from(row: PriceListRow) -> Result<Self, Self::Error> {
        let discount = row
            .discount_type
            .map(|kind| {
                kind.parse::<DiscountKind>()
                    .map(|kind| DiscountSpec::new(row.discount_value, kind))
                    .map_err(DomainError::Internal)
            })
            .transpose()?;
        Ok(PriceList {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            discount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
