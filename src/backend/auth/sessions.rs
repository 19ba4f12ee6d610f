/**
 * Session Tokens
 *
 * Issues and verifies the signed, expiring JWTs that identify a user. The
 * subject is the username; there is no server-side session state.
 *
 * The secret and lifetime are injected at construction instead of being read
 * from the environment on every call, so tests can run isolated issuers.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Signs and verifies session tokens with one HMAC secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Create a token for `username`, valid for the configured lifetime
    pub fn create_token(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.encode_claims(&claims)
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn test_create_token() {
        let token = issuer().create_token("jake").unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token() {
        let issuer = issuer();
        let token = issuer.create_token("jake").unwrap();

        let claims = issuer.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "jake");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(issuer().verify_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_verify_token_signed_with_other_secret() {
        let other = TokenIssuer::new("other-secret", Duration::hours(1));
        let token = other.create_token("jake").unwrap();
        assert!(issuer().verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        let issuer = issuer();
        let now = Utc::now();
        let claims = Claims {
            sub: "jake".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = issuer.encode_claims(&claims).unwrap();
        assert!(issuer.verify_token(&token).is_err());
    }
}
