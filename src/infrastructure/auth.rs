use crate::domain::auth::{AuthService, Claims};
use crate::infrastructure::config::JwtSettings;
use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fs;
use uuid::Uuid;

/// JWT Authentication Service using ES256 algorithm
pub struct JwtAuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtAuthService {
    /// Create a new JWT service by loading keys from the configured files
    pub fn from_settings(settings: &JwtSettings) -> Result<Self> {
        let private_key_pem = fs::read(&settings.private_key_path)
            .map_err(|e| anyhow::anyhow!("Failed to read private key file: {}", e))?;

        let public_key_pem = fs::read(&settings.public_key_path)
            .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?;

        Self::new_from_keys(
            &private_key_pem,
            &public_key_pem,
            settings.access_token_expiry,
        )
    }

    /// Create a new JWT service from key content
    pub fn new_from_keys(
        private_key_pem: &[u8],
        public_key_pem: &[u8],
        access_token_expiry: i64,
    ) -> Result<Self> {
        let encoding_key = EncodingKey::from_ec_pem(private_key_pem)
            .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;

        let decoding_key = DecodingKey::from_ec_pem(public_key_pem)
            .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry,
        })
    }

    /// Signs an access token for `account_id`.
    ///
    /// The portal's login service issues tokens in production; this service
    /// only verifies them. Used by tests and local tooling to mint tokens
    /// with the same keys.
    pub fn generate_access_token(&self, account_id: Uuid) -> Result<String> {
        let claims = Claims::new_access_token(account_id, self.access_token_expiry);
        let header = Header::new(Algorithm::ES256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }
}

impl AuthService for JwtAuthService {
    fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::ES256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }
}
