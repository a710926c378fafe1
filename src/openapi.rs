use utoipa::OpenApi;

use crate::handlers::{companies, discounts, price_lists, products};

/// OpenAPI document served under `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        companies::get_my_company,
        companies::create_company,
        companies::update_my_company,
        products::list_products,
        products::create_product,
        products::import_products,
        products::adjust_prices,
        products::clear_products,
        products::update_product,
        products::delete_product,
        price_lists::create_price_list,
        price_lists::list_price_lists,
        price_lists::delete_price_list,
        price_lists::get_public_price_list,
        discounts::parse_discount,
    ),
    tags(
        (name = "companies", description = "The caller's company profile"),
        (name = "products", description = "Catalog products and bulk re-pricing"),
        (name = "price-lists", description = "Price list snapshots and their public view"),
        (name = "discounts", description = "Discount expression parsing"),
    )
)]
pub struct ApiDoc;
