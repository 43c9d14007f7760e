use bcrypt::{BcryptError, HashParts};
use std::fmt;
use std::str::FromStr;

/// A bcrypt hash in its standard `$2b$<cost>$<salt+digest>` text form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes `password` under a fresh random salt at the given work factor.
    pub fn new(password: &str, cost: u32) -> Result<Self, BcryptError> {
        bcrypt::hash(password, cost).map(Self)
    }

    /// A malformed stored hash never verifies.
    pub fn verify(&self, password: &str) -> bool {
        match bcrypt::verify(password, &self.0) {
            Ok(matches) => matches,
            Err(e) => {
                log::error!("Stored password hash could not be checked: {}", e);
                false
            }
        }
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

impl FromStr for PasswordHash {
    type Err = BcryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<HashParts>()?;
        Ok(Self(s.to_string()))
    }
}
