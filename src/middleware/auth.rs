use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::AppState;

pub const ADMIN_ROLE: &str = "admin";
pub const DEFAULT_ROLE: &str = "user";

/// Token claims issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// The authenticated caller, available to handlers as a request extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }

    /// Name shown in activity logs and "last updated by" fields.
    pub fn display_name(&self) -> Option<String> {
        self.name.clone().or_else(|| self.email.clone())
    }

    pub fn ensure_admin(&self) -> Result<()> {
        if !self.is_admin() {
            return Err(Error::Forbidden("Administrator role required".to_string()));
        }
        Ok(())
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = Error;

    fn try_from(claims: Claims) -> Result<Self> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::Unauthorized("Token subject is not a user id".to_string()))?;
        Ok(Self {
            id,
            email: claims.email,
            name: claims.name,
            role: claims
                .role
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        })
    }
}

pub fn decode_user(token: &str, secret: &str) -> Result<CurrentUser> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;
    CurrentUser::try_from(data.claims)
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    match decode_user(token, &state.config.jwt_secret) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(_) => unauthorized("invalid_token"),
    }
}

/// Must run inside `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin() => next.run(req).await,
        Some(_) => (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response(),
        None => unauthorized("missing_authorization"),
    }
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, role: Option<&str>, exp: usize) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
            role: role.map(str::to_string),
            email: Some("user@example.com".into()),
            name: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn future_exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn decodes_a_valid_token_into_the_caller() {
        let id = Uuid::new_v4();
        let user = decode_user(&token(&id.to_string(), Some("admin"), future_exp()), SECRET).unwrap();
        assert_eq!(user.id, id);
        assert!(user.is_admin());
        assert_eq!(user.display_name().as_deref(), Some("user@example.com"));
    }

    #[test]
    fn missing_role_defaults_to_a_regular_user() {
        let id = Uuid::new_v4();
        let user = decode_user(&token(&id.to_string(), None, future_exp()), SECRET).unwrap();
        assert_eq!(user.role, DEFAULT_ROLE);
        assert!(matches!(user.ensure_admin(), Err(Error::Forbidden(_))));
    }

    #[test]
    fn rejects_wrong_secrets_expired_tokens_and_non_uuid_subjects() {
        let id = Uuid::new_v4().to_string();
        assert!(decode_user(&token(&id, None, future_exp()), "other").is_err());
        assert!(decode_user(&token(&id, None, 1), SECRET).is_err());
        assert!(matches!(
            decode_user(&token("auth0|123", None, future_exp()), SECRET),
            Err(Error::Unauthorized(_))
        ));
    }
}
