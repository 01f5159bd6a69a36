//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    DatabasePool, UserRepository, AdminRepository, AvailabilityRepository, CakeOrderRepository,
    CourseRepository, WorkshopRepository, GalleryRepository, MessageRepository,
};
use crate::models::Stats;
use crate::utils::errors::BakeshopError;

#[derive(Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub users: UserRepository,
    pub admin: AdminRepository,
    pub availability: AvailabilityRepository,
    pub cake_orders: CakeOrderRepository,
    pub courses: CourseRepository,
    pub workshops: WorkshopRepository,
    pub gallery: GalleryRepository,
    pub messages: MessageRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            admin: AdminRepository::new(pool.clone()),
            availability: AvailabilityRepository::new(pool.clone()),
            cake_orders: CakeOrderRepository::new(pool.clone()),
            courses: CourseRepository::new(pool.clone()),
            workshops: WorkshopRepository::new(pool.clone()),
            gallery: GalleryRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get dashboard statistics
    pub async fn get_system_stats(&self) -> Result<Stats, BakeshopError> {
        self.admin.get_stats().await
    }

    /// Clean up expired data
    pub async fn cleanup_expired_data(&self) -> Result<serde_json::Value, BakeshopError> {
        let expired_sessions = self.users.clean_expired_sessions().await?;

        let cleanup_result = serde_json::json!({
            "expired_sessions_cleaned": expired_sessions
        });

        Ok(cleanup_result)
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), BakeshopError> {
        crate::database::connection::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_service_creation() {
        // Lazy pools never connect until a query runs
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/bakeshop_test")
            .expect("lazy pool");
        let service = DatabaseService::new(pool);
        assert!(!service.pool.is_closed());
    }
}
