// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::get_me,
        handlers::auth::update_preferencias,

        // --- Registros (cajero) ---
        handlers::registros::register_client,
        handlers::registros::get_day,
        handlers::registros::get_summary,
        handlers::registros::get_my_productivity,

        // --- Dashboard (admin) ---
        handlers::dashboard::get_general_summary,
        handlers::dashboard::get_area_view,
        handlers::dashboard::get_branches,
        handlers::dashboard::get_branch_detail,
        handlers::dashboard::get_alerts,
        handlers::dashboard::export_branch_pdf,

        // --- Eventos ---
        handlers::eventos::get_recent_events,
        handlers::eventos::stream_events,
    ),
    components(
        schemas(
            models::auth::Rol,
            models::auth::Usuario,
            models::auth::LoginPayload,
            models::auth::RegisterPayload,
            models::auth::AuthResponse,
            models::auth::PreferenciasPayload,
            models::conteo::Area,
            models::conteo::RegistrarPayload,
            models::conteo::CajaHora,
            models::conteo::HoraConteos,
            models::conteo::DiaConteos,
            models::conteo::FilaProductividad,
            models::conteo::ResumenCajero,
            models::conteo::RegistroConfirmado,
            models::dashboard::Sucursal,
            models::dashboard::EstadoBalance,
            models::dashboard::ResumenGeneral,
            models::dashboard::CajaTotal,
            models::dashboard::VistaArea,
            models::dashboard::SucursalResumen,
            models::dashboard::NivelActividad,
            models::dashboard::CajaDetalle,
            models::dashboard::PuntoHora,
            models::dashboard::DistribucionAreas,
            models::dashboard::SucursalDetalle,
            models::dashboard::AlertaDesbalance,
            models::evento::EventoRegistro,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Autenticación y preferencias"),
        (name = "Registros", description = "Registro de clientes y vistas del cajero"),
        (name = "Dashboard", description = "Agregados y alertas del panel admin"),
        (name = "Eventos", description = "Actividad reciente y flujo en vivo"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
