// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{
        AuthResponse, LoginPayload, PreferenciasPayload, RegisterPayload, Usuario,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sesión iniciada", body = AuthResponse),
        (status = 401, description = "Credenciales inválidas"),
        (status = 403, description = "Rol incorrecto para este usuario")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let (token, usuario) = app_state
        .auth_service
        .login(&payload.sucursal, &payload.empleado, &payload.password, payload.rol)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(AuthResponse { token, usuario })))
}

// POST /api/auth/register (somente admin)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Usuario creado", body = Usuario),
        (status = 409, description = "El empleado ya existe en la sucursal")
    ),
    security(("api_jwt" = []))
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AuthenticatedUser,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let usuario = app_state
        .auth_service
        .registrar_usuario(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Usuario autenticado", body = Usuario)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(usuario): AuthenticatedUser) -> Json<Usuario> {
    Json(usuario)
}

// PUT /api/auth/preferencias
#[utoipa::path(
    put,
    path = "/api/auth/preferencias",
    tag = "Auth",
    request_body = PreferenciasPayload,
    responses(
        (status = 200, description = "Preferencias actualizadas", body = Usuario),
        (status = 400, description = "Tema desconocido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_preferencias(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Json(payload): Json<PreferenciasPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let actualizado = app_state
        .auth_service
        .actualizar_tema(usuario.id, &payload.tema)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(actualizado)))
}
