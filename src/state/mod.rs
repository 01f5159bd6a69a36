//! Shared application state
//!
//! One `AppState` is built at startup and cloned into every handler.

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::middleware::RateLimitMiddleware;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub rate_limiter: RateLimitMiddleware,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let services = ServiceFactory::new(&settings, &db)?;
        let rate_limiter = RateLimitMiddleware::new(&settings.rate_limit);

        Ok(Self {
            settings: Arc::new(settings),
            db,
            services,
            rate_limiter,
        })
    }
}
