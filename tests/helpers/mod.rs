//! Test helpers module
//!
//! Database setup, a mock storage service, the in-process app and request
//! builders shared by the integration suites.

#![allow(dead_code)]

pub mod database_helper;
pub mod storage_mock;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use storage_mock::*;
pub use test_context::*;
pub use test_data::*;
