use spotmap_api::app::create_app;
use spotmap_api::cache::{MemoryCache, NoopCache, ObjectCache};
use spotmap_api::config::{load_config, save_default_config};
use spotmap_api::constants::{CONFIG_PATH, DATA_DIR};
use spotmap_api::database::{create_pool, init_database};
use spotmap_api::logging::{init_logging, install_panic_hook};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--init-config") {
        match save_default_config(&CONFIG_PATH) {
            Ok(_) => {
                println!("Default configuration saved to {:?}", *CONFIG_PATH);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to save default configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging();
    install_panic_hook();

    // Load configuration
    let config = Arc::new(load_config(&CONFIG_PATH));

    std::fs::create_dir_all(&*DATA_DIR).ok();

    // Create database pool
    let pool = create_pool().expect("Failed to create database pool");

    // Initialize database schema
    {
        let conn = pool.get().expect("Failed to get connection");
        init_database(&conn).expect("Failed to initialize database");
    }

    let cache: Arc<dyn ObjectCache> = if config.cache.enabled {
        Arc::new(MemoryCache::new(config.cache.max_capacity))
    } else {
        Arc::new(NoopCache)
    };

    // Create the application
    let app = create_app(Arc::clone(&config), pool, cache);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Starting Spotmap API on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}
