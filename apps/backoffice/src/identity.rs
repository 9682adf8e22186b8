//! # Identity
//!
//! Sign-in is delegated to an [`IdentityProvider`]. Commands validate the
//! form first and only then call the provider, so a provider never sees
//! malformed input.
//!
//! [`InMemoryIdentity`] keeps accounts in process with argon2 password
//! hashes. It backs tests and local development.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bizdesk_core::{SignInCredentials, SignUpCredentials};

/// The signed-in caller, passed explicitly to every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
}

/// Identity provider failures.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account already exists")]
    AlreadyRegistered,

    /// The provider could not be reached or failed internally.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Authentication backend.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<Session, IdentityError>;

    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Session, IdentityError>;

    async fn sign_out(&self, session: &Session) -> Result<(), IdentityError>;
}

// =============================================================================
// In-memory provider
// =============================================================================

#[derive(Debug)]
struct Account {
    user_id: String,
    username: String,
    password_hash: String,
}

/// Accounts keyed by lowercased email.
#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
    signed_in: RwLock<HashSet<String>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `session` is signed in and not yet signed out.
    pub async fn is_signed_in(&self, session: &Session) -> bool {
        self.signed_in.read().await.contains(&session.user_id)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<Session, IdentityError> {
        let email = credentials.email.to_lowercase();
        let accounts = self.accounts.read().await;

        let account = match accounts.get(&email) {
            Some(account) if verify_password(&credentials.password, &account.password_hash) => {
                account
            }
            _ => {
                warn!(email = %email, "Sign-in rejected");
                return Err(IdentityError::InvalidCredentials);
            }
        };

        self.signed_in.write().await.insert(account.user_id.clone());
        info!(user_id = %account.user_id, "Signed in");

        Ok(Session {
            user_id: account.user_id.clone(),
            email,
            username: Some(account.username.clone()),
        })
    }

    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Session, IdentityError> {
        let email = credentials.email.to_lowercase();
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&email) {
            return Err(IdentityError::AlreadyRegistered);
        }

        let account = Account {
            user_id: Uuid::new_v4().to_string(),
            username: credentials.username.clone(),
            password_hash: hash_password(&credentials.password)?,
        };
        let session = Session {
            user_id: account.user_id.clone(),
            email: email.clone(),
            username: Some(account.username.clone()),
        };
        accounts.insert(email, account);

        self.signed_in.write().await.insert(session.user_id.clone());
        info!(user_id = %session.user_id, "Account created");

        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), IdentityError> {
        let removed = self.signed_in.write().await.remove(&session.user_id);
        debug!(user_id = %session.user_id, was_signed_in = removed, "Signed out");
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IdentityError::Unavailable(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
