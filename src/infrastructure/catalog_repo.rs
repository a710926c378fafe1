use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::company::{Company, CompanyInput, COMPANY_EXISTS};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogRepository, PriceAdjustment};
use crate::domain::price_list::{
    PriceList, PriceListSummary, PublicPriceList, PublicPriceListItem, SnapshotItem,
};
use crate::domain::product::{Product, ProductInput};
use crate::pricing::DiscountSpec;
use crate::schema::{companies, price_list_items, price_lists, products};

use super::models::{
    CompanyChangeset, CompanyRow, NewCompanyRow, NewPriceListItemRow, NewPriceListRow,
    NewProductRow, PriceListRow, ProductChangeset, ProductRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// A concurrent registration for the same user loses on the unique
/// `user_id` index and is reported like the service-level check.
fn company_insert_error(e: diesel::result::Error) -> DomainError {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::Conflict(COMPANY_EXISTS.to_string())
        }
        other => other.into(),
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

fn new_product_row(company_id: Uuid, input: ProductInput) -> NewProductRow {
    NewProductRow {
        id: Uuid::new_v4(),
        company_id,
        description: input.description,
        product_type: input.product_type.to_string(),
        portion: input.portion,
        value: input.value,
        manufacturer: input.manufacturer,
        photo_url: input.photo_url,
    }
}

/// Locks the company's products among `ids` and returns their current prices.
/// Every id must belong to the company.
fn lock_owned_prices(
    conn: &mut PgConnection,
    company_id: Uuid,
    ids: &[Uuid],
) -> Result<Vec<(Uuid, BigDecimal)>, DomainError> {
    let rows: Vec<(Uuid, BigDecimal)> = products::table
        .filter(products::company_id.eq(company_id))
        .filter(products::id.eq_any(ids.to_vec()))
        .select((products::id, products::value))
        .for_update()
        .load(conn)?;

    if rows.len() != ids.len() {
        return Err(DomainError::InvalidInput(
            "Some products were not found".to_string(),
        ));
    }
    Ok(rows)
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn find_company_by_user(&self, user_id: &str) -> Result<Option<Company>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = companies::table
            .filter(companies::user_id.eq(user_id))
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Company::from))
    }

    fn create_company(&self, user_id: &str, input: CompanyInput) -> Result<Company, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(companies::table)
            .values(&NewCompanyRow {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                name: input.name,
                phone: input.phone,
                contact_person: input.contact_person,
                logo_url: input.logo_url,
            })
            .returning(CompanyRow::as_returning())
            .get_result(&mut conn)
            .map_err(company_insert_error)?;

        Ok(row.into())
    }

    fn update_company(
        &self,
        user_id: &str,
        input: CompanyInput,
    ) -> Result<Option<Company>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(companies::table.filter(companies::user_id.eq(user_id)))
            .set(&CompanyChangeset {
                name: input.name,
                phone: input.phone,
                contact_person: input.contact_person,
                logo_url: input.logo_url,
                updated_at: Utc::now(),
            })
            .returning(CompanyRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(Company::from))
    }

    fn list_products(&self, company_id: Uuid) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        products::table
            .filter(products::company_id.eq(company_id))
            .select(ProductRow::as_select())
            .order(products::created_at.desc())
            .load(&mut conn)?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    fn create_products(
        &self,
        company_id: Uuid,
        inputs: Vec<ProductInput>,
    ) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<NewProductRow> = inputs
            .into_iter()
            .map(|input| new_product_row(company_id, input))
            .collect();

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(products::table)
                .values(&rows)
                .returning(ProductRow::as_returning())
                .get_results(conn)?
                .into_iter()
                .map(Product::try_from)
                .collect()
        })
    }

    fn update_product(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::company_id.eq(company_id)),
        )
        .set(&ProductChangeset {
            description: input.description,
            product_type: input.product_type.to_string(),
            portion: input.portion,
            value: input.value,
            manufacturer: input.manufacturer,
            photo_url: input.photo_url,
            updated_at: Utc::now(),
        })
        .returning(ProductRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        row.map(Product::try_from).transpose()
    }

    fn delete_product(&self, company_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            products::table
                .filter(products::id.eq(id))
                .filter(products::company_id.eq(company_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn clear_products(&self, company_id: Uuid) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let owned = products::table
                .filter(products::company_id.eq(company_id))
                .select(products::id);

            diesel::delete(price_list_items::table.filter(price_list_items::product_id.eq_any(owned)))
                .execute(conn)?;

            let deleted = diesel::delete(products::table.filter(products::company_id.eq(company_id)))
                .execute(conn)?;

            Ok(deleted)
        })
    }

    fn reprice_products(
        &self,
        company_id: Uuid,
        ids: &[Uuid],
        adjust: PriceAdjustment<'_>,
    ) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = lock_owned_prices(conn, company_id, ids)?;
            let now = Utc::now();

            for (id, value) in &current {
                diesel::update(products::table.find(*id))
                    .set((
                        products::value.eq(adjust(value)),
                        products::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            Ok(current.len())
        })
    }

    fn create_price_list(
        &self,
        company_id: Uuid,
        name: &str,
        discount: Option<&DiscountSpec>,
        product_ids: &[Uuid],
        adjust: PriceAdjustment<'_>,
    ) -> Result<PriceList, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Read the current prices; the snapshot is taken from these.
            let current = lock_owned_prices(conn, company_id, product_ids)?;

            // 2. Insert the list with the discount it was created with.
            let list_id = Uuid::new_v4();
            let list = diesel::insert_into(price_lists::table)
                .values(&NewPriceListRow {
                    id: list_id,
                    company_id,
                    name: name.to_string(),
                    discount_type: discount.map(|d| d.kind.to_string()),
                    discount_value: discount.map_or_else(BigDecimal::zero, |d| d.magnitude.clone()),
                })
                .returning(PriceListRow::as_returning())
                .get_result(conn)?;

            // 3. Insert one snapshot row per product.
            let snapshot: Vec<SnapshotItem> = current
                .iter()
                .map(|(product_id, value)| SnapshotItem {
                    product_id: *product_id,
                    adjusted_value: adjust(value),
                })
                .collect();
            let rows: Vec<NewPriceListItemRow> = snapshot
                .into_iter()
                .map(|item| NewPriceListItemRow {
                    id: Uuid::new_v4(),
                    price_list_id: list_id,
                    product_id: item.product_id,
                    adjusted_value: item.adjusted_value,
                })
                .collect();
            diesel::insert_into(price_list_items::table)
                .values(&rows)
                .execute(conn)?;

            PriceList::try_from(list)
        })
    }

    fn list_price_lists(&self, company_id: Uuid) -> Result<Vec<PriceListSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let lists = price_lists::table
                .filter(price_lists::company_id.eq(company_id))
                .select(PriceListRow::as_select())
                .order(price_lists::created_at.desc())
                .load(conn)?;

            let counts: Vec<(Uuid, i64)> = price_list_items::table
                .filter(price_list_items::price_list_id.eq_any(lists.iter().map(|l| l.id).collect::<Vec<_>>()))
                .group_by(price_list_items::price_list_id)
                .select((
                    price_list_items::price_list_id,
                    diesel::dsl::count(price_list_items::id),
                ))
                .load(conn)?;

            lists
                .into_iter()
                .map(|row| {
                    let item_count = counts
                        .iter()
                        .find(|(id, _)| *id == row.id)
                        .map_or(0, |(_, count)| *count);
                    Ok(PriceListSummary {
                        list: PriceList::try_from(row)?,
                        item_count,
                    })
                })
                .collect()
        })
    }

    fn delete_price_list(&self, company_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let owned = price_lists::table
                .filter(price_lists::id.eq(id))
                .filter(price_lists::company_id.eq(company_id))
                .select(price_lists::id)
                .first::<Uuid>(conn)
                .optional()?;
            if owned.is_none() {
                return Ok(false);
            }

            diesel::delete(price_list_items::table.filter(price_list_items::price_list_id.eq(id)))
                .execute(conn)?;
            diesel::delete(price_lists::table.find(id)).execute(conn)?;

            Ok(true)
        })
    }

    fn find_public_price_list(&self, id: Uuid) -> Result<Option<PublicPriceList>, DomainError> {
        let mut conn = self.pool.get()?;

        let header = price_lists::table
            .inner_join(companies::table)
            .filter(price_lists::id.eq(id))
            .select((PriceListRow::as_select(), CompanyRow::as_select()))
            .first::<(PriceListRow, CompanyRow)>(&mut conn)
            .optional()?;

        let Some((list, company)) = header else {
            return Ok(None);
        };

        let items = price_list_items::table
            .inner_join(products::table)
            .filter(price_list_items::price_list_id.eq(id))
            .select((price_list_items::adjusted_value, ProductRow::as_select()))
            .order(products::description.asc())
            .load::<(BigDecimal, ProductRow)>(&mut conn)?
            .into_iter()
            .map(|(adjusted_value, product)| {
                Ok(PublicPriceListItem {
                    product: Product::try_from(product)?,
                    adjusted_value,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Some(PublicPriceList {
            list: PriceList::try_from(list)?,
            company: company.into(),
            items,
        }))
    }
}
