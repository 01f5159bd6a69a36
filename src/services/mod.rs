//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod availability;
pub mod lifecycle;
pub mod orders;
pub mod storage;

// Re-export commonly used services
pub use auth::{AuthService, AuthContext};
pub use availability::AvailabilityService;
pub use orders::{CakeOrderService, CourseOrderService};
pub use storage::StorageService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub availability_service: AvailabilityService,
    pub cake_order_service: CakeOrderService,
    pub course_order_service: CourseOrderService,
    pub storage_service: StorageService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: &DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(db.users.clone(), db.admin.clone(), settings.auth.clone());
        let availability_service = AvailabilityService::new(db.availability.clone());
        let cake_order_service = CakeOrderService::new(db.cake_orders.clone(), availability_service.clone());
        let course_order_service = CourseOrderService::new(db.courses.clone());
        let storage_service = StorageService::new(settings.storage.clone())?;

        Ok(Self {
            auth_service,
            availability_service,
            cake_order_service,
            course_order_service,
            storage_service,
        })
    }
}
