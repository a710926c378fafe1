use std::io;
use std::sync::Arc;

use actix_web::web;
use dotenvy::dotenv;
use pricelist_service::config::ServerConfig;
use pricelist_service::infrastructure::DieselCatalogRepository;
use pricelist_service::{build_server, create_pool, run_migrations, CatalogService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url, config.pool_size).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let service = web::Data::new(CatalogService::new(Arc::new(DieselCatalogRepository::new(pool))));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(service, &config.host, config.port)?.await
}
