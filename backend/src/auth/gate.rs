use super::password::PasswordHash;
use crate::config::{UserConfig, UserSecret};
use bcrypt::BcryptError;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Malformed password hash for user {username}: {source}")]
    MalformedHash {
        username: String,
        source: BcryptError,
    },
    #[error("Failed to hash password for user {username}: {source}")]
    Hashing {
        username: String,
        source: BcryptError,
    },
    #[error("User {0} is configured more than once")]
    DuplicateUser(String),
}

/// Fixed table of bcrypt password hashes, built once at startup.
#[derive(Debug, Default)]
pub struct AccessGate {
    credentials: HashMap<String, PasswordHash>,
}

impl AccessGate {
    /// Plain passwords are hashed here at `cost`; stored hashes keep their own.
    pub fn from_config(users: &[UserConfig], cost: u32) -> Result<Self, AuthError> {
        let mut credentials = HashMap::with_capacity(users.len());
        for user in users {
            let hash = match &user.secret {
                UserSecret::Plain { password } => {
                    PasswordHash::new(password, cost).map_err(|source| AuthError::Hashing {
                        username: user.username.clone(),
                        source,
                    })?
                }
                UserSecret::Hashed { password_hash } => {
                    password_hash
                        .parse()
                        .map_err(|source| AuthError::MalformedHash {
                            username: user.username.clone(),
                            source,
                        })?
                }
            };
            if credentials.insert(user.username.clone(), hash).is_some() {
                return Err(AuthError::DuplicateUser(user.username.clone()));
            }
        }
        Ok(Self { credentials })
    }

    /// Succeeds iff `username` is known and `password` matches its hash.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.credentials.get(username) {
            Some(hash) if hash.verify(password) => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
