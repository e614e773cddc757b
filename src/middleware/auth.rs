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

use crate::AppState;

pub const ROLE_USER: &str = "user";
pub const ROLE_COMPANY: &str = "company";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
}

/// The authenticated job seeker.
#[derive(Debug, Clone, Copy)]
pub struct PersonActor {
    pub user_id: Uuid,
}

/// The company a staff member acts for.
#[derive(Debug, Clone, Copy)]
pub struct CompanyActor {
    pub company_id: Uuid,
    pub staff_id: Uuid,
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

fn decode_bearer(req: &Request, secret: &str) -> std::result::Result<Claims, Response> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(reject(StatusCode::UNAUTHORIZED, "bad_authorization"));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(reject(StatusCode::UNAUTHORIZED, "unsupported_scheme"));
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| reject(StatusCode::UNAUTHORIZED, "invalid_token"))
}

fn has_role(claims: &Claims, role: &str) -> bool {
    claims
        .role
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case(role))
}

pub async fn require_person(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match decode_bearer(&req, &state.jwt_secret) {
        Ok(claims) => claims,
        Err(rejection) => return rejection,
    };
    if !has_role(&claims, ROLE_USER) {
        return reject(StatusCode::FORBIDDEN, "forbidden");
    }
    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        return reject(StatusCode::UNAUTHORIZED, "invalid_subject");
    };

    req.extensions_mut().insert(PersonActor { user_id });
    req.extensions_mut().insert(claims);
    next.run(req).await
}

pub async fn require_company(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match decode_bearer(&req, &state.jwt_secret) {
        Ok(claims) => claims,
        Err(rejection) => return rejection,
    };
    if !has_role(&claims, ROLE_COMPANY) {
        return reject(StatusCode::FORBIDDEN, "forbidden");
    }
    let Some(company_id) = claims.company_id else {
        return reject(StatusCode::FORBIDDEN, "missing_company");
    };
    let Ok(staff_id) = Uuid::parse_str(&claims.sub) else {
        return reject(StatusCode::UNAUTHORIZED, "invalid_subject");
    };

    req.extensions_mut().insert(CompanyActor {
        company_id,
        staff_id,
    });
    req.extensions_mut().insert(claims);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Option<&str>) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            exp: 0,
            role: role.map(str::to_string),
            company_id: None,
        }
    }

    #[test]
    fn role_match_ignores_case() {
        assert!(has_role(&claims(Some("Company")), ROLE_COMPANY));
        assert!(!has_role(&claims(Some("user")), ROLE_COMPANY));
        assert!(!has_role(&claims(None), ROLE_USER));
    }

    #[test]
    fn company_id_is_optional_in_claims() {
        let raw = r#"{"sub":"abc","exp":1,"role":"user"}"#;
        let parsed: Claims = serde_json::from_str(raw).unwrap();
        assert!(parsed.company_id.is_none());
    }
}
