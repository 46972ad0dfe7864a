pub mod comments;
pub mod feed;
pub mod posts;
pub mod sse;
pub mod users;

use axum::http::{HeaderMap, StatusCode};
use domain::{DomainError, EntityId, User};
use service::ServiceError;
use storage::Db;

/// Bearer token 换当前用户。凭据问题一律 401/403,不细分。
pub async fn current_user(db: &Db, headers: &HeaderMap) -> Result<User, (StatusCode, String)> {
    let token = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?;

    db.get_user_by_token(token)
        .await
        .map_err(|e| {
            tracing::error!("token lookup failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "operation failed".to_string(),
            )
        })?
        .ok_or((StatusCode::FORBIDDEN, "Invalid token".to_string()))
}

pub fn parse_id(kind: &'static str, raw: &str) -> Result<EntityId, (StatusCode, String)> {
    EntityId::new(kind, raw).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

pub fn map_service_error(err: ServiceError) -> (StatusCode, String) {
    match &err {
        ServiceError::Domain(DomainError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        ServiceError::Domain(DomainError::InvalidReference { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        ServiceError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::Storage(e) => {
            tracing::error!("storage failure: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
