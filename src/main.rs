use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use pair_match::config::{LoggingSettings, Settings};
use pair_match::core::Matcher;
use pair_match::models::Product;
use pair_match::routes::{self, AppState};
use pair_match::services::{BundleStore, CatalogStore, InMemoryStore, MatchService, PostgresClient};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn load_seed_catalog(path: &str) -> std::io::Result<Vec<Product>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        error!("Invalid seed catalog {}: {}", path, e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Pair Match service...");

    let (catalog, bundles): (Arc<dyn CatalogStore>, Arc<dyn BundleStore>) = match &settings.database.url {
        Some(url) => {
            let postgres = PostgresClient::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!("PostgreSQL store initialized");
            let postgres = Arc::new(postgres);
            let catalog: Arc<dyn CatalogStore> = postgres.clone();
            let bundles: Arc<dyn BundleStore> = postgres;
            (catalog, bundles)
        }
        None => {
            warn!("No database URL configured, using the in-memory store");
            let products = match &settings.database.seed_path {
                Some(path) => load_seed_catalog(path)?,
                None => Vec::new(),
            };
            info!("In-memory catalog holds {} products", products.len());
            let memory = Arc::new(InMemoryStore::with_products(products));
            let catalog: Arc<dyn CatalogStore> = memory.clone();
            let bundles: Arc<dyn BundleStore> = memory;
            (catalog, bundles)
        }
    };

    // Initialize matcher with configured weights
    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        catalog: catalog.clone(),
        bundles: bundles.clone(),
        matching: MatchService::new(catalog, bundles, matcher),
        saves_enabled: settings.matching.saves_enabled,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
