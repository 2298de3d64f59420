pub mod database;
pub mod loader;
pub mod schema;

pub use database::{normalize_connection_scheme, DatabaseSettings, DATABASE_URL_ENV};
pub use loader::{load_settings, load_settings_from_str};
pub use schema::{BrowserSettings, RunSettings};
