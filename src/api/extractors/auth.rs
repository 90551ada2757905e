use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::Span;

/// Authenticated pet owner. Tokens come from the external identity service;
/// this extractor only verifies them.
pub struct CustomerUser {
    pub customer_id: String,
}

/// Authenticated staff member.
pub struct StaffUser {
    pub staff_id: String,
}

fn decode_claims(parts: &mut Parts, state: &Arc<AppState>) -> Result<Claims, StatusCode> {
    let cookies = parts.extensions.get::<Cookies>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let access_token = cookies.get("access_token")
        .ok_or(StatusCode::UNAUTHORIZED)?
        .value()
        .to_string();

    let decoding_key = DecodingKey::from_ed_pem(state.config.jwt_public_key.as_bytes())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&["pawhub-clients"]);
    validation.set_issuer(&[state.config.auth_issuer.clone()]);

    let token_data = decode::<Claims>(&access_token, &decoding_key, &validation)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Mutating requests must echo the CSRF token baked into the JWT.
    let method = &parts.method;
    if method != "GET" && method != "HEAD" && method != "OPTIONS" {
        let csrf_header_val = parts.headers.get("X-CSRF-Token")
            .ok_or(StatusCode::FORBIDDEN)?
            .to_str()
            .map_err(|_| StatusCode::FORBIDDEN)?;

        if csrf_header_val != token_data.claims.csrf_token {
            return Err(StatusCode::FORBIDDEN);
        }
    }

    Ok(token_data.claims)
}

impl<S> FromRequestParts<S> for CustomerUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = decode_claims(parts, &app_state)?;

        if claims.role != "customer" {
            return Err(StatusCode::FORBIDDEN);
        }

        Span::current().record("customer_id", &claims.sub);
        Ok(CustomerUser { customer_id: claims.sub })
    }
}

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = decode_claims(parts, &app_state)?;

        if claims.role != "staff" {
            return Err(StatusCode::FORBIDDEN);
        }

        Span::current().record("staff_id", &claims.sub);
        Ok(StaffUser { staff_id: claims.sub })
    }
}
