use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::JwtConfig, error::ApiError, state::AppState};

use super::repo;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            access_ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.access_ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))
}

/// Extracts and validates the bearer token, resolving the embedded identity
/// back to a user row. Protected handlers take this before doing anything.
#[derive(Debug)]
pub struct AuthUser(pub i64);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts)?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = repo::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User does not exist".into()))?;

        Ok(AuthUser(user.id))
    }
}

/// Gate for read endpoints. Whether reads require a token is a deployment
/// choice (PROTECT_READS); writes always go through [`AuthUser`].
#[derive(Debug)]
pub struct ReadGate;

#[axum::async_trait]
impl FromRequestParts<AppState> for ReadGate {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.protect_reads {
            AuthUser::from_request_parts(parts, state).await?;
        }
        Ok(ReadGate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_config;
    use crate::state::AppState;
    use sqlx::sqlite::SqlitePoolOptions;

    fn make_keys() -> JwtKeys {
        // Lazily connecting pool so these tests never touch a real database.
        let db = SqlitePoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .expect("lazy pool should construct");
        let state = AppState::from_parts(db, test_config());
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[tokio::test]
    async fn verify_rejects_tampered_token() {
        let keys = make_keys();
        let mut token = keys.sign(7).expect("sign");
        token.push('x');
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_wrong_audience() {
        let keys = make_keys();
        let token = keys.sign(7).expect("sign");
        let other = JwtKeys {
            audience: "someone-else".into(),
            ..keys
        };
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        // Well past the default validation leeway.
        let then = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let claims = Claims {
            sub: 7,
            iat: (then - TimeDuration::hours(1)).unix_timestamp() as usize,
            exp: then.unix_timestamp() as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    use crate::config::{AppConfig, JwtConfig};
    use crate::state::test_support::test_db;
    use std::sync::Arc;

    fn request_parts(auth_header: Option<String>) -> Parts {
        let mut builder = axum::http::Request::builder().uri("/courses");
        if let Some(value) = auth_header {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).expect("build request").into_parts();
        parts
    }

    #[tokio::test]
    async fn auth_user_accepts_bearer_header_and_resolves_the_user() {
        let state = AppState::from_parts(test_db().await, test_config());
        let user = repo::create(&state.db, "alice", "hash").await.expect("create");
        let token = JwtKeys::from_ref(&state).sign(user.id).expect("sign");

        let mut parts = request_parts(Some(format!("Bearer {token}")));
        let AuthUser(id) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("authorized");
        assert_eq!(id, user.id);
    }

    #[tokio::test]
    async fn auth_user_rejects_a_missing_header() {
        let state = AppState::from_parts(test_db().await, test_config());
        let mut parts = request_parts(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn auth_user_rejects_a_token_for_a_missing_user() {
        let state = AppState::from_parts(test_db().await, test_config());
        let token = JwtKeys::from_ref(&state).sign(99).expect("sign");
        let mut parts = request_parts(Some(format!("Bearer {token}")));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        match err {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "User does not exist"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_gate_requires_a_token_only_when_configured() {
        let open = AppState::from_parts(test_db().await, test_config());
        let mut parts = request_parts(None);
        assert!(ReadGate::from_request_parts(&mut parts, &open).await.is_ok());

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            protect_reads: true,
        });
        let protected = AppState::from_parts(test_db().await, config);
        let mut parts = request_parts(None);
        let err = ReadGate::from_request_parts(&mut parts, &protected)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
