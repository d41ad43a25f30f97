pub mod api;
pub mod cache;
pub mod calculations;
pub mod config;
pub mod error;
pub mod models;
pub mod scraper;
pub mod sources;

use std::sync::Arc;
use config::Config;
use scraper::ScraperService;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<ScraperService>,
}

impl AppState {
    /// Wires the default retailer lineup and price cache from `config`.
    pub fn new(config: &Config) -> Self {
        AppState {
            scraper: Arc::new(ScraperService::from_config(config)),
        }
    }
}
