use std::str::FromStr;

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use approvia_core::{AppError, Principal, Role, UserId};

use crate::error::ApiResult;

/// Builds the acting principal from the gateway-provided identity headers.
///
/// The upstream gateway owns authentication; this layer only translates
/// its headers. Missing or malformed headers are a 401, never a guess.
pub async fn require_principal(mut request: Request, next: Next) -> ApiResult<Response> {
    let principal = principal_from_headers(request.headers())?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, AppError> {
    let user_id = required_header(headers, "x-user-id")?;
    let user_id = uuid::Uuid::parse_str(user_id)
        .map(UserId::from_uuid)
        .map_err(|error| AppError::Unauthorized(format!("invalid x-user-id header: {error}")))?;

    let role = required_header(headers, "x-user-role")?;
    let role = Role::from_str(role)
        .map_err(|_| AppError::Unauthorized(format!("invalid x-user-role header '{role}'")))?;

    let department = required_header(headers, "x-user-department")?;

    Ok(Principal::new(user_id, role, department))
}

fn required_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("missing {name} header")))
}
