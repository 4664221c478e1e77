//! Signing credentials handed to collaborators.
//!
//! The core never reads the secret. It passes `Credentials` by reference to
//! the ledger and swap collaborators, which are the only code that signs.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// A wallet's public key plus the secret material needed to sign for it.
///
/// There is no `Serialize` impl and `Debug` redacts the secret.
pub struct Credentials {
    public_key: String,
    secret: SecretString,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, secret: SecretString) -> Self {
        Self {
            public_key: public_key.into(),
            secret,
        }
    }

    /// The wallet address (safe to share and log).
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Raw secret material. Only signing collaborators should call this.
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
