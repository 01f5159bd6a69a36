//! Authentication service implementation
//!
//! Sessions are explicit rows: sign-in issues one, sign-out deletes it and
//! expiry makes it invisible. The bearer token is an HS256 JWT whose `jti`
//! names the session and whose `sub` names the user.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::database::{AdminRepository, UserRepository};
use crate::models::{AuthResponse, CreateUserRequest, Session, SignInRequest, SignUpRequest, User};
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::{normalize_email, optional_field, require_field, validate_phone};
use crate::utils::logging::log_auth_event;

const MIN_PASSWORD_LENGTH: usize = 8;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Resolved caller of a request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub session_id: Uuid,
    pub is_admin: bool,
}

impl AuthContext {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    /// Admin gate: the caller is authenticated, now require membership
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            warn!(user_id = self.user.id, "Unauthorized admin access attempt");
            Err(BakeshopError::PermissionDenied("Admin privileges required".to_string()))
        }
    }
}

/// Sign a token for a session
pub fn issue_token(secret: &str, session: &Session) -> Result<String> {
    let claims = Claims {
        sub: session.user_id.to_string(),
        jti: session.id.to_string(),
        iat: session.created_at.timestamp(),
        exp: session.expires_at.timestamp(),
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))?)
}

/// Verify signature and expiry, returning `(user_id, session_id)`
pub fn verify_token(secret: &str, token: &str) -> Result<(i64, Uuid)> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| BakeshopError::Authentication(format!("Invalid token: {}", e)))?;

    let user_id = data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| BakeshopError::Authentication("Invalid token subject".to_string()))?;
    let session_id = Uuid::parse_str(&data.claims.jti)
        .map_err(|_| BakeshopError::Authentication("Invalid token id".to_string()))?;

    Ok((user_id, session_id))
}

/// Authentication service for sessions and the admin gate
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    admins: AdminRepository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: UserRepository, admins: AdminRepository, config: AuthConfig) -> Self {
        Self { users, admins, config }
    }

    fn is_bootstrap_admin(&self, email: &str) -> bool {
        self.config
            .admin_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email))
    }

    /// Grant admin membership to configured emails that already have accounts
    pub async fn bootstrap_admins(&self) -> Result<u64> {
        let emails: Vec<String> = self
            .config
            .admin_emails
            .iter()
            .map(|e| e.trim().to_lowercase())
            .collect();
        let granted = self.admins.grant_by_emails(&emails).await?;
        if granted > 0 {
            info!(granted = granted, "Bootstrap admins granted");
        }
        Ok(granted)
    }

    /// Register a customer account and sign it in
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthResponse> {
        let email = normalize_email(&request.email)?;
        let full_name = require_field("full_name", &request.full_name)?;
        let phone = optional_field(request.phone).map(|p| validate_phone(&p)).transpose()?;

        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(BakeshopError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(BakeshopError::InvalidInput("Email is already registered".to_string()));
        }

        let password_hash = hash_password(request.password).await?;
        let user = self
            .users
            .create(CreateUserRequest { email, password_hash, full_name, phone })
            .await?;

        if self.is_bootstrap_admin(&user.email) {
            self.admins.grant(user.id).await?;
            info!(user_id = user.id, "Configured admin account registered");
        }

        log_auth_event(Some(user.id), "sign_up", true);
        self.open_session(user).await
    }

    /// Check credentials and open a session
    pub async fn sign_in(&self, request: SignInRequest) -> Result<AuthResponse> {
        let invalid = || BakeshopError::Authentication("Invalid email or password".to_string());

        let email = normalize_email(&request.email).map_err(|_| invalid())?;
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                log_auth_event(None, "sign_in", false);
                return Err(invalid());
            }
        };

        if !verify_password(request.password, user.password_hash.clone()).await? {
            log_auth_event(Some(user.id), "sign_in", false);
            return Err(invalid());
        }

        log_auth_event(Some(user.id), "sign_in", true);
        self.open_session(user).await
    }

    async fn open_session(&self, user: User) -> Result<AuthResponse> {
        let expires_at = Utc::now() + Duration::hours(self.config.session_ttl_hours);
        let session = self.users.create_session(user.id, expires_at).await?;
        let token = issue_token(&self.config.jwt_secret, &session)?;
        let is_admin = self.admins.is_admin(user.id).await?;

        Ok(AuthResponse {
            token,
            expires_at: truncate_to_seconds(session.expires_at),
            user,
            is_admin,
        })
    }

    /// End the caller's session
    pub async fn sign_out(&self, context: &AuthContext) -> Result<()> {
        self.users.delete_session(context.session_id).await?;
        log_auth_event(Some(context.user_id()), "sign_out", true);
        Ok(())
    }

    /// Resolve a bearer token to a caller. Every failure is an authentication error.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let (user_id, session_id) = verify_token(&self.config.jwt_secret, token)?;

        let session = self
            .users
            .find_live_session(session_id)
            .await?
            .filter(|session| session.user_id == user_id)
            .ok_or_else(|| BakeshopError::Authentication("Session expired or signed out".to_string()))?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| BakeshopError::Authentication("User no longer exists".to_string()))?;

        let is_admin = self.admins.is_admin(user.id).await?;
        debug!(user_id = user.id, is_admin = is_admin, "Request authenticated");

        Ok(AuthContext { user, session_id, is_admin })
    }

    /// Grant admin membership to an existing account
    pub async fn grant_admin(&self, email: &str) -> Result<User> {
        let email = normalize_email(email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| BakeshopError::not_found("User", &email))?;

        self.admins.grant(user.id).await?;
        Ok(user)
    }
}

fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(at.timestamp(), 0).single().unwrap_or(at)
}

async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| BakeshopError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(BakeshopError::from)
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BakeshopError::Internal(format!("Password check task failed: {}", e)))?
        .map_err(BakeshopError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "unit-test-secret-that-is-long-enough";

    fn session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: 42,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let session = session(Duration::hours(1));
        let token = issue_token(SECRET, &session).unwrap();
        let (user_id, session_id) = verify_token(SECRET, &token).unwrap();
        assert_eq!(user_id, 42);
        assert_eq!(session_id, session.id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(SECRET, &session(Duration::hours(-2))).unwrap();
        assert_matches!(verify_token(SECRET, &token), Err(BakeshopError::Authentication(_)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(SECRET, &session(Duration::hours(1))).unwrap();
        assert_matches!(
            verify_token("another-secret-entirely-for-this-test", &token),
            Err(BakeshopError::Authentication(_))
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert_matches!(verify_token(SECRET, "not.a.jwt"), Err(BakeshopError::Authentication(_)));
    }

    #[test]
    fn test_require_admin() {
        let user = User {
            id: 5,
            email: "customer@example.com".into(),
            password_hash: String::new(),
            full_name: "Customer".into(),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let customer = AuthContext { user: user.clone(), session_id: Uuid::new_v4(), is_admin: false };
        let admin = AuthContext { user, session_id: Uuid::new_v4(), is_admin: true };

        assert_matches!(customer.require_admin(), Err(BakeshopError::PermissionDenied(_)));
        assert!(admin.require_admin().is_ok());
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse".to_string()).await.unwrap();
        assert!(verify_password("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash).await.unwrap());
    }
}
