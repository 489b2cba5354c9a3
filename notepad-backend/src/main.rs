use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod attachments;
mod config;
mod controllers;
mod db;
mod models;
mod notes;
mod seed;
mod shopping;

use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
}

/// SPA fallback handler - serves index.html for client-side routing
async fn spa_fallback() -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(config::static_dir().join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Dark Notepad backend v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config::initialize_workspace() {
        log::error!("Failed to initialize workspace: {}", e);
    }

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    if config::seed_demo_notes_enabled() {
        match seed::seed_if_empty(&db) {
            Ok(0) => {}
            Ok(count) => log::info!("Seeded {} demo notes into empty database", count),
            Err(e) => log::warn!("Failed to seed demo notes: {}", e),
        }
    }

    // Set DISABLE_FRONTEND=1 to disable static file serving (for separate dev server)
    let static_root = if std::env::var(config::env_vars::DISABLE_FRONTEND)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
    {
        log::info!("Frontend serving disabled via DISABLE_FRONTEND env var");
        String::new()
    } else {
        let dir = config::static_dir();
        if dir.join("index.html").exists() {
            dir.to_string_lossy().to_string()
        } else {
            log::warn!(
                "Static frontend not found at {:?} - static file serving disabled",
                dir
            );
            String::new()
        }
    };

    log::info!("Starting Dark Notepad server on port {}", port);
    if !static_root.is_empty() {
        log::info!("Serving frontend from: {}", static_root);
    }

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::shopping_list::config)
            // Attachment serving, registered before the SPA catch-all
            .configure(controllers::uploads::config);

        // Serve static files only if the frontend build exists
        if !static_root.is_empty() {
            app = app.service(
                Files::new("/", static_root.clone())
                    .index_file("index.html")
                    .default_handler(actix_web::web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        log::info!("Received Ctrl+C, shutting down...");

        // Stop the HTTP server with timeout
        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
