// src/handlers/dashboard.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    common::{error::ApiError, tiempo::fecha_actual},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        conteo::Area,
        dashboard::{AlertaDesbalance, ResumenGeneral, SucursalDetalle, SucursalResumen, VistaArea},
    },
};

// Filtro opcional de sucursal ("todas las sucursales" quando ausente)
#[derive(Debug, Deserialize)]
pub struct FiltroSucursal {
    pub sucursal: Option<String>,
}

// GET /api/dashboard/resumen
#[utoipa::path(
    get,
    path = "/api/dashboard/resumen",
    tag = "Dashboard",
    params(("sucursal" = Option<String>, Query, description = "Limitar a una sucursal")),
    responses(
        (status = 200, description = "Totales del día, sucursales activas y hora pico", body = ResumenGeneral),
        (status = 403, description = "Solo administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_general_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filtro): Query<FiltroSucursal>,
) -> Result<impl IntoResponse, ApiError> {
    let resumen = app_state
        .dashboard_service
        .resumen_general(filtro.sucursal.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(resumen)))
}

// GET /api/dashboard/areas/{area}
#[utoipa::path(
    get,
    path = "/api/dashboard/areas/{area}",
    tag = "Dashboard",
    params(
        ("area" = Area, Path, description = "medicina o autoservicio"),
        ("sucursal" = Option<String>, Query, description = "Limitar a una sucursal")
    ),
    responses(
        (status = 200, description = "Totales por caja del área y estado de balance", body = VistaArea)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_area_view(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(area): Path<Area>,
    Query(filtro): Query<FiltroSucursal>,
) -> Result<impl IntoResponse, ApiError> {
    let vista = app_state
        .dashboard_service
        .vista_area(area, filtro.sucursal.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(vista)))
}

// GET /api/dashboard/sucursales
#[utoipa::path(
    get,
    path = "/api/dashboard/sucursales",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Un card por sucursal con sus totales y flag de desbalance", body = Vec<SucursalResumen>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branches(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let cards = app_state
        .dashboard_service
        .cuadricula()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(cards)))
}

// GET /api/dashboard/sucursales/{id}
#[utoipa::path(
    get,
    path = "/api/dashboard/sucursales/{id}",
    tag = "Dashboard",
    params(("id" = String, Path, description = "ID de la sucursal")),
    responses(
        (status = 200, description = "Detalle de la sucursal", body = SucursalDetalle),
        (status = 404, description = "Sucursal no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branch_detail(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detalle = app_state
        .dashboard_service
        .detalle(&id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(detalle)))
}

// GET /api/dashboard/alertas
#[utoipa::path(
    get,
    path = "/api/dashboard/alertas",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Alertas de desbalance activas", body = Vec<AlertaDesbalance>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_alerts(State(app_state): State<AppState>) -> Json<Vec<AlertaDesbalance>> {
    Json(app_state.monitor.alertas_activas())
}

// GET /api/dashboard/sucursales/{id}/reporte.pdf
#[utoipa::path(
    get,
    path = "/api/dashboard/sucursales/{id}/reporte.pdf",
    tag = "Dashboard",
    params(("id" = String, Path, description = "ID de la sucursal")),
    responses(
        (status = 200, description = "Reporte diario en PDF", content_type = "application/pdf"),
        (status = 404, description = "Sucursal no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_branch_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let fecha = fecha_actual();
    let pdf_bytes = app_state
        .reporte_service
        .reporte_sucursal(&id, fecha)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"reporte_{id}_{fecha}.pdf\""),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
