use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Token type, only "access" tokens are accepted by the API
    #[serde(rename = "type")]
    pub token_type: String,
}

impl Claims {
    pub fn new_access_token(account_id: Uuid, expiry_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: account_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
            token_type: "access".to_string(),
        }
    }

    pub fn account_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| anyhow::anyhow!("Invalid account ID in claims: {}", e))
    }
}

/// Token service. Tokens only identify an account; roles are always
/// resolved server-side from the account record.
pub trait AuthService: Send + Sync {
    fn validate_token(&self, token: &str) -> Result<Claims>;
}
