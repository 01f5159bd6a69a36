//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BakeshopError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    validate_rate_limit_config(&settings.rate_limit)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(BakeshopError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(BakeshopError::Config("Server port must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BakeshopError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(BakeshopError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(BakeshopError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(BakeshopError::Config(
            "JWT secret must be at least 32 characters".to_string(),
        ));
    }

    if config.session_ttl_hours <= 0 {
        return Err(BakeshopError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    if let Some(bad) = config.admin_emails.iter().find(|email| !email.contains('@')) {
        return Err(BakeshopError::Config(format!("Invalid admin email: {}", bad)));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(BakeshopError::Config("Storage API URL is required".to_string()));
    }

    url::Url::parse(&config.api_url)
        .map_err(|e| BakeshopError::Config(format!("Invalid storage API URL: {}", e)))?;

    if config.max_upload_bytes == 0 {
        return Err(BakeshopError::Config(
            "Max upload size must be greater than 0".to_string(),
        ));
    }

    if config.allowed_content_types.is_empty() {
        return Err(BakeshopError::Config(
            "At least one allowed content type is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(BakeshopError::Config(
            "Storage timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BakeshopError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BakeshopError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.requests_per_minute == 0 {
        return Err(BakeshopError::Config(
            "Rate limit must allow at least one request per minute".to_string(),
        ));
    }

    Ok(())
}
