use std::collections::HashSet;
use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::domain::company::{Company, CompanyInput, COMPANY_EXISTS};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::price_list::{PriceList, PriceListSummary, PublicPriceList};
use crate::domain::product::{Product, ProductInput};
use crate::pricing::{adjuster, DiscountSpec};

const NO_COMPANY: &str = "Company not found. Register your company first.";

/// Catalog use cases for one authenticated user at a time.
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    // ── Companies ────────────────────────────────────────────────────────────

    pub fn my_company(&self, user_id: &str) -> Result<Option<Company>, DomainError> {
        self.repo.find_company_by_user(user_id)
    }

    pub fn register_company(
        &self,
        user_id: &str,
        input: CompanyInput,
    ) -> Result<Company, DomainError> {
        validate_company(&input)?;
        if self.repo.find_company_by_user(user_id)?.is_some() {
            return Err(DomainError::Conflict(COMPANY_EXISTS.to_string()));
        }
        let company = self.repo.create_company(user_id, input)?;
        log::info!("Registered company {} for user {}", company.id, user_id);
        Ok(company)
    }

    pub fn update_company(&self, user_id: &str, input: CompanyInput) -> Result<Company, DomainError> {
        validate_company(&input)?;
        self.repo
            .update_company(user_id, input)?
            .ok_or_else(|| DomainError::NotFound("Company".to_string()))
    }

    // ── Products ─────────────────────────────────────────────────────────────

    pub fn list_products(&self, user_id: &str) -> Result<Vec<Product>, DomainError> {
        match self.repo.find_company_by_user(user_id)? {
            Some(company) => self.repo.list_products(company.id),
            None => Ok(vec![]),
        }
    }

    pub fn create_product(&self, user_id: &str, input: ProductInput) -> Result<Product, DomainError> {
        validate_product(&input)?;
        let company = self.require_company(user_id)?;
        self.repo
            .create_products(company.id, vec![input])?
            .pop()
            .ok_or_else(|| DomainError::Internal("product insert returned no row".to_string()))
    }

    pub fn import_products(
        &self,
        user_id: &str,
        inputs: Vec<ProductInput>,
    ) -> Result<usize, DomainError> {
        if inputs.is_empty() {
            return Err(DomainError::InvalidInput("No products to import".to_string()));
        }
        for (row, input) in inputs.iter().enumerate() {
            validate_product(input)
                .map_err(|e| DomainError::InvalidInput(format!("row {}: {}", row + 1, e)))?;
        }
        let company = self.require_company(user_id)?;
        let imported = self.repo.create_products(company.id, inputs)?.len();
        log::info!("Imported {} products into company {}", imported, company.id);
        Ok(imported)
    }

    pub fn update_product(
        &self,
        user_id: &str,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Product, DomainError> {
        validate_product(&input)?;
        let Some(company) = self.repo.find_company_by_user(user_id)? else {
            return Err(DomainError::NotFound("Product".to_string()));
        };
        self.repo
            .update_product(company.id, id, input)?
            .ok_or_else(|| DomainError::NotFound("Product".to_string()))
    }

    pub fn delete_product(&self, user_id: &str, id: Uuid) -> Result<(), DomainError> {
        let Some(company) = self.repo.find_company_by_user(user_id)? else {
            return Err(DomainError::NotFound("Product".to_string()));
        };
        if self.repo.delete_product(company.id, id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound("Product".to_string()))
        }
    }

    pub fn clear_products(&self, user_id: &str) -> Result<usize, DomainError> {
        let Some(company) = self.repo.find_company_by_user(user_id)? else {
            return Ok(0);
        };
        let deleted = self.repo.clear_products(company.id)?;
        log::info!("Cleared {} products of company {}", deleted, company.id);
        Ok(deleted)
    }

    // ── Pricing ──────────────────────────────────────────────────────────────

    /// Overwrites the price of every listed product with the adjusted one.
    pub fn adjust_prices(
        &self,
        user_id: &str,
        product_ids: Vec<Uuid>,
        discount: DiscountSpec,
    ) -> Result<usize, DomainError> {
        let ids = distinct_ids(product_ids)?;
        let company = self.require_company(user_id)?;
        let adjust = adjuster(&discount);
        let updated = self.repo.reprice_products(company.id, &ids, &adjust)?;
        log::info!(
            "Repriced {} products of company {} by {}",
            updated,
            company.id,
            discount
        );
        Ok(updated)
    }

    /// Creates a price list holding a snapshot of the adjusted prices. Later
    /// price changes on the products do not reach the snapshot.
    pub fn create_price_list(
        &self,
        user_id: &str,
        name: &str,
        product_ids: Vec<Uuid>,
        discount: Option<DiscountSpec>,
    ) -> Result<PriceList, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Price list name is required".to_string()));
        }
        let ids = distinct_ids(product_ids)?;
        let company = self.require_company(user_id)?;

        let unchanged = DiscountSpec::fixed(BigDecimal::zero());
        let adjust = adjuster(discount.as_ref().unwrap_or(&unchanged));
        let list =
            self.repo
                .create_price_list(company.id, name, discount.as_ref(), &ids, &adjust)?;
        log::info!(
            "Created price list {} with {} items for company {}",
            list.id,
            ids.len(),
            company.id
        );
        Ok(list)
    }

    pub fn list_price_lists(&self, user_id: &str) -> Result<Vec<PriceListSummary>, DomainError> {
        match self.repo.find_company_by_user(user_id)? {
            Some(company) => self.repo.list_price_lists(company.id),
            None => Ok(vec![]),
        }
    }

    pub fn delete_price_list(&self, user_id: &str, id: Uuid) -> Result<(), DomainError> {
        let Some(company) = self.repo.find_company_by_user(user_id)? else {
            return Err(DomainError::NotFound("Price list".to_string()));
        };
        if !self.repo.delete_price_list(company.id, id)? {
            return Err(DomainError::NotFound("Price list".to_string()));
        }
        log::info!("Deleted price list {} of company {}", id, company.id);
        Ok(())
    }

    /// Read-only view for customers; needs no authentication.
    pub fn public_price_list(&self, id: Uuid) -> Result<PublicPriceList, DomainError> {
        self.repo
            .find_public_price_list(id)?
            .ok_or_else(|| DomainError::NotFound("Price list".to_string()))
    }

    fn require_company(&self, user_id: &str) -> Result<Company, DomainError> {
        self.repo
            .find_company_by_user(user_id)?
            .ok_or_else(|| DomainError::InvalidInput(NO_COMPANY.to_string()))
    }
}

fn validate_company(input: &CompanyInput) -> Result<(), DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::InvalidInput("Company name is required".to_string()));
    }
    Ok(())
}

fn validate_product(input: &ProductInput) -> Result<(), DomainError> {
    if input.description.trim().is_empty() {
        return Err(DomainError::InvalidInput("Description is required".to_string()));
    }
    if input.value <= BigDecimal::zero() {
        return Err(DomainError::InvalidInput("Value must be positive".to_string()));
    }
    Ok(())
}

/// Drops repeated ids, keeping first occurrences in order.
fn distinct_ids(ids: Vec<Uuid>) -> Result<Vec<Uuid>, DomainError> {
    if ids.is_empty() {
        return Err(DomainError::InvalidInput("Select at least one product".to_string()));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::product::ProductType;
    use crate::testing::InMemoryCatalog;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn service() -> (CatalogService, Arc<InMemoryCatalog>) {
        let repo = Arc::new(InMemoryCatalog::default());
        (CatalogService::new(repo.clone()), repo)
    }

    fn company(name: &str) -> CompanyInput {
        CompanyInput {
            name: name.to_string(),
            phone: Some("+55 11 5555-0000".to_string()),
            contact_person: None,
            logo_url: None,
        }
    }

    fn product(description: &str, value: &str) -> ProductInput {
        ProductInput {
            description: description.to_string(),
            product_type: ProductType::Pote,
            portion: Some("60 caps".to_string()),
            value: dec(value),
            manufacturer: None,
            photo_url: None,
        }
    }

    fn registered(service: &CatalogService, user: &str) -> Company {
        service
            .register_company(user, company("Acme"))
            .expect("register failed")
    }

    // ── Companies ────────────────────────────────────────────────────────────

    #[test]
    fn register_then_fetch_company() {
        let (service, _) = service();
        let created = registered(&service, "user-1");

        let found = service.my_company("user-1").expect("lookup failed");
        assert_eq!(found.map(|c| c.id), Some(created.id));
        assert!(service.my_company("user-2").expect("lookup failed").is_none());
    }

    #[test]
    fn second_registration_conflicts() {
        let (service, _) = service();
        registered(&service, "user-1");

        let err = service.register_company("user-1", company("Again")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn blank_company_name_is_rejected() {
        let (service, _) = service();
        let err = service.register_company("user-1", company("  ")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn updating_missing_company_is_not_found() {
        let (service, _) = service();
        let err = service.update_company("user-1", company("Acme")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    // ── Products ─────────────────────────────────────────────────────────────

    #[test]
    fn creating_product_requires_company() {
        let (service, _) = service();
        let err = service.create_product("user-1", product("Vitamin C", "10")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn product_value_must_be_positive() {
        let (service, _) = service();
        registered(&service, "user-1");

        let err = service.create_product("user-1", product("Vitamin C", "0")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn products_are_scoped_to_their_company() {
        let (service, _) = service();
        registered(&service, "user-1");
        registered(&service, "user-2");
        service.create_product("user-1", product("Vitamin C", "10")).expect("create failed");

        assert_eq!(service.list_products("user-1").expect("list failed").len(), 1);
        assert!(service.list_products("user-2").expect("list failed").is_empty());
        assert!(service.list_products("nobody").expect("list failed").is_empty());
    }

    #[test]
    fn import_rejects_invalid_row_without_inserting() {
        let (service, repo) = service();
        registered(&service, "user-1");

        let err = service
            .import_products("user-1", vec![product("Zinc", "5"), product("", "3")])
            .unwrap_err();
        assert!(err.to_string().contains("row 2"));
        assert_eq!(repo.product_count(), 0);
    }

    #[test]
    fn deleting_another_users_product_is_not_found() {
        let (service, _) = service();
        registered(&service, "user-1");
        registered(&service, "user-2");
        let p = service.create_product("user-1", product("Zinc", "5")).expect("create failed");

        let err = service.delete_product("user-2", p.id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        service.delete_product("user-1", p.id).expect("owner delete failed");
    }

    // ── Pricing ──────────────────────────────────────────────────────────────

    #[test]
    fn adjust_prices_overwrites_product_values() {
        let (service, _) = service();
        registered(&service, "user-1");
        let a = service.create_product("user-1", product("A", "100.00")).expect("create failed");
        let b = service.create_product("user-1", product("B", "3.00")).expect("create failed");

        let updated = service
            .adjust_prices("user-1", vec![a.id, b.id, a.id], DiscountSpec::fixed(dec("-5")))
            .expect("adjust failed");
        assert_eq!(updated, 2);

        let values: Vec<_> = service
            .list_products("user-1")
            .expect("list failed")
            .into_iter()
            .map(|p| (p.id, p.value))
            .collect();
        assert!(values.contains(&(a.id, dec("95"))));
        assert!(values.contains(&(b.id, BigDecimal::zero())));
    }

    #[test]
    fn adjust_prices_rejects_foreign_products() {
        let (service, _) = service();
        registered(&service, "user-1");
        registered(&service, "user-2");
        let mine = service.create_product("user-1", product("A", "10")).expect("create failed");
        let theirs = service.create_product("user-2", product("B", "10")).expect("create failed");

        let err = service
            .adjust_prices(
                "user-1",
                vec![mine.id, theirs.id],
                DiscountSpec::percentage(dec("10")),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let untouched = service.list_products("user-1").expect("list failed");
        assert_eq!(untouched[0].value, dec("10"));
    }

    #[test]
    fn adjust_prices_requires_products() {
        let (service, _) = service();
        registered(&service, "user-1");
        let err = service
            .adjust_prices("user-1", vec![], DiscountSpec::fixed(dec("1")))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn price_list_without_discount_snapshots_current_prices() {
        let (service, repo) = service();
        registered(&service, "user-1");
        let p = service.create_product("user-1", product("A", "12.34")).expect("create failed");

        let list = service
            .create_price_list("user-1", "Retail", vec![p.id], None)
            .expect("create list failed");
        assert!(list.discount.is_none());
        assert_eq!(repo.snapshot_values(list.id), vec![dec("12.34")]);
    }

    #[test]
    fn snapshot_survives_later_repricing() {
        let (service, _) = service();
        registered(&service, "user-1");
        let p = service
            .create_product("user-1", product("Omega 3", "100.00"))
            .expect("create failed");

        let list = service
            .create_price_list(
                "user-1",
                "Wholesale",
                vec![p.id],
                Some(DiscountSpec::percentage(dec("-10"))),
            )
            .expect("create list failed");

        service
            .adjust_prices("user-1", vec![p.id], DiscountSpec::fixed(dec("5")))
            .expect("adjust failed");

        let products = service.list_products("user-1").expect("list failed");
        assert_eq!(products[0].value, dec("105.00"));

        let public = service.public_price_list(list.id).expect("public view failed");
        assert_eq!(public.items.len(), 1);
        assert_eq!(public.items[0].adjusted_value, dec("90.00"));
        assert_eq!(public.items[0].product.value, dec("105.00"));
    }

    #[test]
    fn price_list_summaries_count_items() {
        let (service, _) = service();
        registered(&service, "user-1");
        let a = service.create_product("user-1", product("A", "1")).expect("create failed");
        let b = service.create_product("user-1", product("B", "2")).expect("create failed");
        service
            .create_price_list("user-1", "Both", vec![a.id, b.id], None)
            .expect("create list failed");

        let lists = service.list_price_lists("user-1").expect("list failed");
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].item_count, 2);
    }

    #[test]
    fn price_list_needs_a_name() {
        let (service, _) = service();
        registered(&service, "user-1");
        let p = service.create_product("user-1", product("A", "1")).expect("create failed");

        let err = service.create_price_list("user-1", " ", vec![p.id], None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn deleting_price_list_removes_public_view() {
        let (service, _) = service();
        registered(&service, "user-1");
        registered(&service, "user-2");
        let p = service.create_product("user-1", product("A", "1")).expect("create failed");
        let list = service
            .create_price_list("user-1", "Temp", vec![p.id], None)
            .expect("create list failed");

        let err = service.delete_price_list("user-2", list.id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        service.delete_price_list("user-1", list.id).expect("delete failed");
        let err = service.public_price_list(list.id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn clearing_products_drops_their_snapshot_rows() {
        let (service, repo) = service();
        registered(&service, "user-1");
        let p = service.create_product("user-1", product("A", "1")).expect("create failed");
        let list = service
            .create_price_list("user-1", "L", vec![p.id], None)
            .expect("create list failed");

        assert_eq!(service.clear_products("user-1").expect("clear failed"), 1);
        assert!(repo.snapshot_values(list.id).is_empty());
        assert_eq!(service.clear_products("nobody").expect("clear failed"), 0);
    }
}
