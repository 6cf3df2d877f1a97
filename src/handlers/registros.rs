// src/handlers/registros.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::conteo::{
        DiaConteos, FilaProductividad, RegistrarPayload, RegistroConfirmado, ResumenCajero,
    },
};

// POST /api/registros
#[utoipa::path(
    post,
    path = "/api/registros",
    tag = "Registros",
    request_body = RegistrarPayload,
    responses(
        (status = 200, description = "Cliente registrado; contadores autoritativos", body = RegistroConfirmado),
        (status = 400, description = "Caja fuera de rango"),
        (status = 403, description = "Solo los cajeros registran clientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_client(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Json(payload): Json<RegistrarPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let confirmado = app_state
        .registro_service
        .registrar(&usuario, payload.caja)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(confirmado)))
}

// GET /api/registros/dia
#[utoipa::path(
    get,
    path = "/api/registros/dia",
    tag = "Registros",
    responses(
        (status = 200, description = "Conteos del día de la sucursal del usuario", body = DiaConteos)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_day(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let dia = app_state
        .registro_service
        .dia(&usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(dia)))
}

// GET /api/registros/resumen
#[utoipa::path(
    get,
    path = "/api/registros/resumen",
    tag = "Registros",
    responses(
        (status = 200, description = "Los tres contadores del panel del cajero", body = ResumenCajero)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let resumen = app_state
        .registro_service
        .resumen(&usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(resumen)))
}

// GET /api/registros/mi-productividad
#[utoipa::path(
    get,
    path = "/api/registros/mi-productividad",
    tag = "Registros",
    responses(
        (status = 200, description = "Tabla de productividad personal por hora", body = Vec<FilaProductividad>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_productivity(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let filas = app_state
        .registro_service
        .productividad(&usuario)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(filas)))
}
