use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::company::{Company, CompanyInput};
use super::errors::DomainError;
use super::price_list::{PriceList, PriceListSummary, PublicPriceList};
use super::product::{Product, ProductInput};
use crate::pricing::DiscountSpec;

/// Computes a new price from a product's current one.
pub type PriceAdjustment<'a> = &'a (dyn Fn(&BigDecimal) -> BigDecimal + Sync);

/// Storage for the catalog. Every product and price list operation is scoped
/// to a company; resolving the caller's company is the service's job.
pub trait CatalogRepository: Send + Sync + 'static {
    fn find_company_by_user(&self, user_id: &str) -> Result<Option<Company>, DomainError>;
    fn create_company(&self, user_id: &str, input: CompanyInput) -> Result<Company, DomainError>;
    fn update_company(
        &self,
        user_id: &str,
        input: CompanyInput,
    ) -> Result<Option<Company>, DomainError>;

    fn list_products(&self, company_id: Uuid) -> Result<Vec<Product>, DomainError>;
    /// Inserts all products or none of them.
    fn create_products(
        &self,
        company_id: Uuid,
        inputs: Vec<ProductInput>,
    ) -> Result<Vec<Product>, DomainError>;
    fn update_product(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Option<Product>, DomainError>;
    fn delete_product(&self, company_id: Uuid, id: Uuid) -> Result<bool, DomainError>;
    /// Deletes every product of the company and the snapshot rows pointing at them.
    fn clear_products(&self, company_id: Uuid) -> Result<usize, DomainError>;

    /// Overwrites each product's price with `adjust(price)` in one transaction.
    /// Fails with `InvalidInput` unless every id belongs to the company.
    fn reprice_products(
        &self,
        company_id: Uuid,
        ids: &[Uuid],
        adjust: PriceAdjustment<'_>,
    ) -> Result<usize, DomainError>;

    /// Creates a price list whose items hold `adjust(price)` for each product.
    /// Fails with `InvalidInput` unless every id belongs to the company.
    fn create_price_list(
        &self,
        company_id: Uuid,
        name: &str,
        discount: Option<&DiscountSpec>,
        product_ids: &[Uuid],
        adjust: PriceAdjustment<'_>,
    ) -> Result<PriceList, DomainError>;
    fn list_price_lists(&self, company_id: Uuid) -> Result<Vec<PriceListSummary>, DomainError>;
    fn delete_price_list(&self, company_id: Uuid, id: Uuid) -> Result<bool, DomainError>;
    fn find_public_price_list(&self, id: Uuid) -> Result<Option<PublicPriceList>, DomainError>;
}
