//! User management and login.
//!
//! Passwords are hashed with argon2 before they reach the repository;
//! login verifies against the stored hash and issues a signed session
//! token. The credentials failure message never distinguishes unknown
//! user from wrong password.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use almacen_core::{validation, LoginRequest, NewUser, UpdateUser};

/// GET /api/usuarios
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let usuarios = state.db.users().list_all().await?;
    Ok(Json(json!({ "success": true, "usuarios": usuarios })))
}

/// GET /api/usuarios/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let usuario = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Usuario no encontrado: {id}")))?;

    Ok(Json(json!({ "success": true, "usuario": usuario })))
}

/// POST /api/usuarios
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validation::validate_new_user(&payload)?;

    let password_hash = hash_password(&payload.password)?;
    let id = state.db.users().insert(&payload, &password_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}

/// PUT /api/usuarios/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<Json<Value>> {
    validation::validate_update_user(&payload)?;

    let password_hash = match payload.password.as_deref() {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };
    state
        .db
        .users()
        .update(id, &payload, password_hash.as_deref())
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/usuarios/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    state.db.users().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/usuarios/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let invalid = || ApiError::Unauthorized("Credenciales inválidas".to_string());

    let usuario = state
        .db
        .users()
        .get_by_username(&payload.username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &usuario.password_hash) {
        return Err(invalid());
    }

    let token = state.jwt.generate_token(&usuario)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "usuario": usuario,
    })))
}
