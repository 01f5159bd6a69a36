//! Request extractors whose rejections use the JSON error body

use axum::extract::{FromRequest, FromRequestParts};

use crate::utils::errors::BakeshopError;

/// `axum::Json` with [`BakeshopError`] rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BakeshopError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with [`BakeshopError`] rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BakeshopError))]
pub struct AppQuery<T>(pub T);

/// `axum::extract::Path` with [`BakeshopError`] rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BakeshopError))]
pub struct AppPath<T>(pub T);
