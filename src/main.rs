pub mod api;
pub mod blob_store;
pub mod entity;
pub mod exif;
pub mod modules;
pub mod shared;
pub mod variants;

mod health;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use sea_orm::{ConnectOptions, Database};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::blob_store::GcsBlobStore;
use crate::exif::KamadakExifExtractor;
use crate::modules::access::AccessGuard;
use crate::shared::context::{AppConfig, ServiceContext};
use crate::shared::kv::RedisKv;
use crate::variants::ImageVariants;

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    dotenvy::dotenv().ok();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let redis_url = env::var("REDIS_URL").expect("REDIS_URL is not set in .env file");
    let bucket = env::var("BLOB_BUCKET").expect("BLOB_BUCKET is not set in .env file");
    let host = env::var("HOST").expect("HOST is not set in .env file");
    let port = env::var("PORT").expect("PORT is not set in .env file");

    let server_url = format!("{host}:{port}");
    info!(%server_url, "binding");

    // 1. establish connection to database
    let mut opt = ConnectOptions::new(db_url);
    opt
        // Core pool sizing
        .max_connections(50)
        .min_connections(10)
        // Timeouts (fail fast instead of piling up)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        // Hygiene
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        // Noise reduction
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    // 2. Redis pool, shared between the KV cache binding and the readiness probe.
    let redis_pool = deadpool_redis::Config::from_url(&redis_url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to build redis pool");

    let config = AppConfig::from_env();

    let ctx = ServiceContext::new(
        db.clone(),
        Arc::new(GcsBlobStore::new(bucket)) as Arc<dyn crate::blob_store::BlobStore>,
        Arc::new(RedisKv::new(redis_pool.clone())) as Arc<dyn crate::shared::kv::Kv>,
        Arc::new(KamadakExifExtractor::new()) as Arc<dyn crate::exif::ExifExtractor>,
        Arc::new(ImageVariants::new()) as Arc<dyn crate::variants::Variants>,
        config.clone(),
    );

    let access_guard = AccessGuard::new(db.clone(), config.access_chunk_size);

    // 3) Start the server
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(ctx.clone()))
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(redis_pool.clone()))
            .app_data(web::Data::new(access_guard.clone()))
            .service(health::health)
            .service(health::readiness)
            .configure(modules::auth::routes::configure)
            .configure(modules::sync::routes::configure)
            .configure(modules::assets::routes::configure)
            .configure(modules::timeline::routes::configure)
            .configure(modules::trash::routes::configure)
            .configure(modules::albums::routes::configure)
            .configure(modules::tags::routes::configure)
            .configure(modules::memories::routes::configure)
            .configure(modules::stacks::routes::configure)
            .configure(modules::partners::routes::configure)
            .configure(modules::shared_links::routes::configure)
            .configure(modules::activity::routes::configure)
    })
    .bind(&server_url)?
    .run()
    .await
}

#[cfg(not(tarpaulin_include))]
fn main() -> std::io::Result<()> {
    start()
}
