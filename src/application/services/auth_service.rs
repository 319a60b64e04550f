//! Identity token issuing and verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Opaque identifier of the account behind a request.
///
/// The core never interprets it; it only scopes ownership of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens have the form `<owner-id>.<hex mac>` where the MAC is
/// HMAC-SHA256 of the owner id keyed by `signing_secret`. Nothing is stored
/// server side; anyone holding the secret can mint tokens.
pub struct AuthService {
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; must match the value used when tokens were issued
    pub fn new(signing_secret: String) -> Self {
        Self { signing_secret }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Issues a token for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `owner_id` is blank.
    pub fn issue(&self, owner_id: &str) -> Result<String, AppError> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(AppError::bad_request(
                "Owner id cannot be empty",
                json!({}),
            ));
        }

        let mut mac = self.mac();
        mac.update(owner_id.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{owner_id}.{signature}"))
    }

    /// Verifies a raw token and returns the owner it was issued for.
    ///
    /// The signature comparison is constant time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed or its
    /// signature does not match.
    pub fn authenticate(&self, token: &str) -> Result<Owner, AppError> {
        let invalid = || {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid identity token" }))
        };

        let (owner_id, signature) = token.rsplit_once('.').ok_or_else(invalid)?;
        if owner_id.is_empty() {
            return Err(invalid());
        }

        let signature = hex::decode(signature).map_err(|_| invalid())?;

        let mut mac = self.mac();
        mac.update(owner_id.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        Ok(Owner(owner_id.to_string()))
    }
}
