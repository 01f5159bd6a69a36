//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod availability;
pub mod cake_order;
pub mod course;
pub mod workshop;
pub mod gallery;
pub mod message;
pub mod admin;
pub mod storage;

// Re-export commonly used models
pub use user::{User, Session, Admin, CreateUserRequest, SignUpRequest, SignInRequest, AuthResponse, GrantAdminRequest};
pub use availability::{UnavailableDate, ManualUnavailableDate, BookedDate, DateOrigin, DateAvailability, CreateUnavailableDateRequest, DateCheckQuery, BOOKED_REASON};
pub use cake_order::{CakeOrder, CakeOrderStatus, DeliveryMethod, CreateCakeOrderRequest, UpdateCakeOrderStatusRequest, CakeOrderFilter};
pub use course::{Course, CourseSummary, Lesson, CreateCourseRequest, UpdateCourseRequest, CourseOrder, CourseOrderStatus, CreateCourseOrderRequest, CourseOrderFilter, CourseOrderDetail, PaymentReceipt, ReceiptStatus, CreateReceiptRequest, ReviewReceiptRequest, CourseAccess};
pub use workshop::{Workshop, WorkshopWithSeats, CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopReservation, ReservationStatus, CreateReservationRequest, UpdateReservationStatusRequest, ReservationFilter};
pub use gallery::{GalleryItem, CreateGalleryItemRequest, UpdateGalleryItemRequest, GalleryFilter};
pub use message::{ContactMessage, CreateContactMessageRequest};
pub use admin::{AdminSetting, UpsertAdminSettingRequest, Stats, StatusCounts};
pub use storage::{StoredFile, StorageListQuery};
