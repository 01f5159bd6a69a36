//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod admin;
pub mod availability;
pub mod cake_order;
pub mod course;
pub mod workshop;
pub mod gallery;
pub mod message;

// Re-export repositories
pub use user::UserRepository;
pub use admin::AdminRepository;
pub use availability::AvailabilityRepository;
pub use cake_order::CakeOrderRepository;
pub use course::CourseRepository;
pub use workshop::WorkshopRepository;
pub use gallery::GalleryRepository;
pub use message::MessageRepository;
