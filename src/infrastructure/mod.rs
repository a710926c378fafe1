pub mod catalog_repo;
pub mod models;

pub use catalog_repo::DieselCatalogRepository;
