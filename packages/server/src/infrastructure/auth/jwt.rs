//! HS256 JWT authenticator.
//!
//! Tokens carry `{"_id", "Username", "sub": "authentication", "exp"}` and
//! may be presented with or without a `Bearer ` prefix.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthClaims, AuthError, Authenticator};

const SUBJECT: &str = "authentication";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "_id")]
    user_id: String,
    #[serde(rename = "Username")]
    username: String,
    sub: String,
    exp: i64,
}

pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a token for `user_id` / `username` that expires after the configured lifetime.
    pub fn issue(&self, user_id: &str, username: &str) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            sub: SUBJECT.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.sub = Some(SUBJECT.to_string());
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |e| {
                tracing::debug!(?e, "JWT verification failed");
                AuthError::InvalidToken(e.to_string())
            },
        )?;

        Ok(AuthClaims {
            user_id: data.claims.user_id,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new("test-secret", Duration::hours(24))
    }

    #[tokio::test]
    async fn test_issued_token_verifies() {
        // テスト項目: 発行したトークンを検証するとクレームが得られる
        // given (前提条件):
        let auth = authenticator();
        let token = auth.issue("u1", "alice").unwrap();

        // when (操作):
        let claims = auth.verify(&token).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            claims,
            AuthClaims {
                user_id: "u1".to_string(),
                username: "alice".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_bearer_prefix_is_accepted() {
        // テスト項目: Bearer プレフィックス付きのトークンを受け付ける
        // given (前提条件):
        let auth = authenticator();
        let token = format!("Bearer {}", auth.issue("u1", "alice").unwrap());

        // when (操作):
        let result = auth.verify(&token).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        // テスト項目: 別のシークレットで署名されたトークンは拒否される
        // given (前提条件):
        let token = JwtAuthenticator::new("other-secret", Duration::hours(1))
            .issue("u1", "alice")
            .unwrap();

        // when (操作):
        let result = authenticator().verify(&token).await;

        // then (期待する結果):
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        // テスト項目: 有効期限切れのトークンは拒否される
        // given (前提条件): expired well past the default leeway
        let issuer = JwtAuthenticator::new("test-secret", Duration::hours(-1));
        let token = issuer.issue("u1", "alice").unwrap();

        // when (操作):
        let result = authenticator().verify(&token).await;

        // then (期待する結果):
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_garbage_and_empty_tokens_are_rejected() {
        // テスト項目: 不正な文字列や空のトークンは拒否される
        let auth = authenticator();
        assert!(matches!(
            auth.verify("not-a-jwt").await,
            Err(AuthError::InvalidToken(_))
        ));
        assert_eq!(auth.verify("   ").await, Err(AuthError::MissingToken));
    }
}
