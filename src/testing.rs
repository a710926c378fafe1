//! In-memory `CatalogRepository` for service and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::web;

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::application::CatalogService;
use crate::domain::company::{Company, CompanyInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogRepository, PriceAdjustment};
use crate::domain::price_list::{
    PriceList, PriceListSummary, PublicPriceList, PublicPriceListItem, SnapshotItem,
};
use crate::domain::product::{Product, ProductInput};
use crate::pricing::DiscountSpec;

#[derive(Default)]
struct State {
    companies: Vec<Company>,
    products: Vec<Product>,
    price_lists: Vec<PriceList>,
    items: HashMap<Uuid, Vec<SnapshotItem>>,
}

/// A fresh service over an empty in-memory catalog, ready for `App::app_data`.
pub fn catalog_data() -> web::Data<CatalogService> {
    web::Data::new(CatalogService::new(Arc::new(InMemoryCatalog::default())))
}

#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
}

impl InMemoryCatalog {
    pub fn product_count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    pub fn snapshot_values(&self, price_list_id: Uuid) -> Vec<BigDecimal> {
        self.state
            .lock()
            .unwrap()
            .items
            .get(&price_list_id)
            .map(|items| items.iter().map(|i| i.adjusted_value.clone()).collect())
            .unwrap_or_default()
    }
}

fn owned_prices(
    state: &State,
    company_id: Uuid,
    ids: &[Uuid],
) -> Result<Vec<(Uuid, BigDecimal)>, DomainError> {
    let found: Vec<_> = state
        .products
        .iter()
        .filter(|p| p.company_id == company_id && ids.contains(&p.id))
        .map(|p| (p.id, p.value.clone()))
        .collect();
    if found.len() != ids.len() {
        return Err(DomainError::InvalidInput(
            "Some products were not found".to_string(),
        ));
    }
    Ok(found)
}

impl CatalogRepository for InMemoryCatalog {
    fn find_company_by_user(&self, user_id: &str) -> Result<Option<Company>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.companies.iter().find(|c| c.user_id == user_id).cloned())
    }

    fn create_company(&self, user_id: &str, input: CompanyInput) -> Result<Company, DomainError> {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: input.name,
            phone: input.phone,
            contact_person: input.contact_person,
            logo_url: input.logo_url,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().companies.push(company.clone());
        Ok(company)
    }

    fn update_company(
        &self,
        user_id: &str,
        input: CompanyInput,
    ) -> Result<Option<Company>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(company) = state.companies.iter_mut().find(|c| c.user_id == user_id) else {
            return Ok(None);
        };
        company.name = input.name;
        company.phone = input.phone;
        company.contact_person = input.contact_person;
        company.logo_url = input.logo_url;
        company.updated_at = Utc::now();
        Ok(Some(company.clone()))
    }

    fn list_products(&self, company_id: Uuid) -> Result<Vec<Product>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .rev()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect())
    }

    fn create_products(
        &self,
        company_id: Uuid,
        inputs: Vec<ProductInput>,
    ) -> Result<Vec<Product>, DomainError> {
        let now = Utc::now();
        let created: Vec<Product> = inputs
            .into_iter()
            .map(|input| Product {
                id: Uuid::new_v4(),
                company_id,
                description: input.description,
                product_type: input.product_type,
                portion: input.portion,
                value: input.value,
                manufacturer: input.manufacturer,
                photo_url: input.photo_url,
                created_at: now,
                updated_at: now,
            })
            .collect();
        self.state.lock().unwrap().products.extend(created.iter().cloned());
        Ok(created)
    }

    fn update_product(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Option<Product>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(product) = state
            .products
            .iter_mut()
            .find(|p| p.id == id && p.company_id == company_id)
        else {
            return Ok(None);
        };
        product.description = input.description;
        product.product_type = input.product_type;
        product.portion = input.portion;
        product.value = input.value;
        product.manufacturer = input.manufacturer;
        product.photo_url = input.photo_url;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    fn delete_product(&self, company_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state
            .products
            .retain(|p| !(p.id == id && p.company_id == company_id));
        Ok(state.products.len() != before)
    }

    fn clear_products(&self, company_id: Uuid) -> Result<usize, DomainError> {
        let mut state = self.state.lock().unwrap();
        let removed: Vec<Uuid> = state
            .products
            .iter()
            .filter(|p| p.company_id == company_id)
            .map(|p| p.id)
            .collect();
        state.products.retain(|p| p.company_id != company_id);
        for items in state.items.values_mut() {
            items.retain(|i| !removed.contains(&i.product_id));
        }
        Ok(removed.len())
    }

    fn reprice_products(
        &self,
        company_id: Uuid,
        ids: &[Uuid],
        adjust: PriceAdjustment<'_>,
    ) -> Result<usize, DomainError> {
        let mut state = self.state.lock().unwrap();
        let prices = owned_prices(&state, company_id, ids)?;
        for product in state.products.iter_mut().filter(|p| ids.contains(&p.id)) {
            product.value = adjust(&product.value);
        }
        Ok(prices.len())
    }

    fn create_price_list(
        &self,
        company_id: Uuid,
        name: &str,
        discount: Option<&DiscountSpec>,
        product_ids: &[Uuid],
        adjust: PriceAdjustment<'_>,
    ) -> Result<PriceList, DomainError> {
        let mut state = self.state.lock().unwrap();
        let prices = owned_prices(&state, company_id, product_ids)?;
        let now = Utc::now();
        let list = PriceList {
            id: Uuid::new_v4(),
            company_id,
            name: name.to_string(),
            discount: discount.cloned(),
            created_at: now,
            updated_at: now,
        };
        let items = prices
            .iter()
            .map(|(product_id, value)| SnapshotItem {
                product_id: *product_id,
                adjusted_value: adjust(value),
            })
            .collect();
        state.items.insert(list.id, items);
        state.price_lists.push(list.clone());
        Ok(list)
    }

    fn list_price_lists(&self, company_id: Uuid) -> Result<Vec<PriceListSummary>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .price_lists
            .iter()
            .rev()
            .filter(|l| l.company_id == company_id)
            .map(|l| PriceListSummary {
                list: l.clone(),
                item_count: state.items.get(&l.id).map_or(0, |i| i.len() as i64),
            })
            .collect())
    }

    fn delete_price_list(&self, company_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.price_lists.len();
        state
            .price_lists
            .retain(|l| !(l.id == id && l.company_id == company_id));
        let deleted = state.price_lists.len() != before;
        if deleted {
            state.items.remove(&id);
        }
        Ok(deleted)
    }

    fn find_public_price_list(&self, id: Uuid) -> Result<Option<PublicPriceList>, DomainError> {
        let state = self.state.lock().unwrap();
        let Some(list) = state.price_lists.iter().find(|l| l.id == id) else {
            return Ok(None);
        };
        let Some(company) = state.companies.iter().find(|c| c.id == list.company_id) else {
            return Ok(None);
        };
        let mut items: Vec<PublicPriceListItem> = state
            .items
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|item| {
                let product = state.products.iter().find(|p| p.id == item.product_id)?;
                Some(PublicPriceListItem {
                    product: product.clone(),
                    adjusted_value: item.adjusted_value.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| a.product.description.cmp(&b.product.description));
        Ok(Some(PublicPriceList {
            list: list.clone(),
            company: company.clone(),
            items,
        }))
    }
}
