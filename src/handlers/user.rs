use axum::extract::State;
use axum::{Extension, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::instrument;

use crate::auth::jwt::sign_token;
use crate::dtos::user::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, UserResponse,
};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use crate::state::AppState;

// POST /users/login
#[instrument(skip_all)]
pub async fn login_user(
    State(AppState {
        db_pool,
        jwt_secret,
    }): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    // Same message for unknown user and wrong password; no user enumeration.
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(&payload.username)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok {
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let token = sign_token(user.id, &user.username, &jwt_secret)?;

    // 8 hours = 28800 seconds
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: 8 * 60 * 60,
    }))
}

// POST /users/change-password
#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.new_password != payload.confirm_password {
        return Err(AppError::validation("New passwords do not match"));
    }
    if payload.new_password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }

    let stored_hash: String =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(auth.user_id)
            .fetch_optional(&state.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

    let ok = verify(&payload.old_password, &stored_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok {
        return Err(AppError::validation("Old password incorrect"));
    }

    let new_hash = hash(&payload.new_password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(new_hash)
        .bind(auth.user_id)
        .execute(&state.db_pool)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

// GET /users/me - Profile of the authenticated caller
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::verify_token;
    use sqlx::PgPool;

    async fn seed_user(pool: &PgPool, username: &str, password: &str) -> i64 {
        let password_hash = hash(password, DEFAULT_COST).unwrap();
        sqlx::query_scalar(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn state(pool: PgPool) -> AppState {
        AppState::new(pool, "test-secret".to_string())
    }

    #[sqlx::test]
    async fn test_login_issues_verifiable_token(pool: PgPool) {
        let user_id = seed_user(&pool, "cashier", "hunter22").await;

        let Json(resp) = login_user(
            State(state(pool)),
            Json(LoginRequest {
                username: "cashier".to_string(),
                password: "hunter22".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(resp.token_type, "Bearer");
        let claims = verify_token(&resp.access_token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "cashier");
    }

    #[sqlx::test]
    async fn test_login_rejects_bad_credentials_uniformly(pool: PgPool) {
        seed_user(&pool, "cashier", "hunter22").await;

        let wrong_password = login_user(
            State(state(pool.clone())),
            Json(LoginRequest {
                username: "cashier".to_string(),
                password: "nope".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));

        let unknown_user = login_user(
            State(state(pool)),
            Json(LoginRequest {
                username: "ghost".to_string(),
                password: "hunter22".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(unknown_user, AppError::Unauthorized(_)));
    }

    #[sqlx::test]
    async fn test_change_password_requires_matching_confirmation(pool: PgPool) {
        let user_id = seed_user(&pool, "cashier", "hunter22").await;
        let auth = AuthContext {
            user_id,
            username: "cashier".to_string(),
        };

        let err = change_password(
            State(state(pool.clone())),
            Extension(auth.clone()),
            Json(ChangePasswordRequest {
                old_password: "hunter22".to_string(),
                new_password: "next-password".to_string(),
                confirm_password: "different".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // And the old password still works
        login_user(
            State(state(pool)),
            Json(LoginRequest {
                username: "cashier".to_string(),
                password: "hunter22".to_string(),
            }),
        )
        .await
        .unwrap();
    }

    #[sqlx::test]
    async fn test_change_password_rotates_hash(pool: PgPool) {
        let user_id = seed_user(&pool, "cashier", "hunter22").await;
        let auth = AuthContext {
            user_id,
            username: "cashier".to_string(),
        };

        change_password(
            State(state(pool.clone())),
            Extension(auth),
            Json(ChangePasswordRequest {
                old_password: "hunter22".to_string(),
                new_password: "next-password".to_string(),
                confirm_password: "next-password".to_string(),
            }),
        )
        .await
        .unwrap();

        let old_login = login_user(
            State(state(pool.clone())),
            Json(LoginRequest {
                username: "cashier".to_string(),
                password: "hunter22".to_string(),
            }),
        )
        .await;
        assert!(old_login.is_err());

        login_user(
            State(state(pool)),
            Json(LoginRequest {
                username: "cashier".to_string(),
                password: "next-password".to_string(),
            }),
        )
        .await
        .unwrap();
    }
}
