use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Set to "1" or "true" to skip serving the static web client
    /// (useful when a separate dev server hosts it).
    pub const DISABLE_FRONTEND: &str = "DISABLE_FRONTEND";
    /// Set to "false" or "0" to skip inserting demo notes into an empty database.
    /// Default: true (seeding enabled).
    pub const SEED_DEMO_NOTES: &str = "SEED_DEMO_NOTES";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 5000;
    pub const DATABASE_URL: &str = "./.db/notepad.db";
    pub const UPLOADS_DIR: &str = "uploads";
    pub const STATIC_DIR: &str = "static";
}

/// Returns the absolute path to the notepad-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it always resolves
/// to notepad-backend/ regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Root directory for note attachment files, one subdirectory per note id.
pub fn uploads_dir() -> PathBuf {
    backend_dir().join(defaults::UPLOADS_DIR)
}

/// Directory holding the built web client, served at `/` when present.
pub fn static_dir() -> PathBuf {
    backend_dir().join(defaults::STATIC_DIR)
}

/// Whether demo notes should be inserted into an empty database on startup.
pub fn seed_demo_notes_enabled() -> bool {
    env::var(env_vars::SEED_DEMO_NOTES)
        .map(|v| v != "false" && v != "0")
        .unwrap_or(true)
}

pub struct Config {
    pub port: u16,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
        }
    }
}

/// Initialize the uploads directory
/// This should be called at startup before the server accepts requests
pub fn initialize_workspace() -> std::io::Result<()> {
    let uploads = uploads_dir();
    std::fs::create_dir_all(&uploads)?;
    log::info!("Uploads directory: {:?}", uploads);
    Ok(())
}
