// src/handlers/eventos.rs

use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::{future, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{auth::Rol, evento::EventoRegistro},
};

// O log ao vivo mostra no máximo 50 linhas
const LIMITE_RECIENTES: i64 = 50;

// GET /api/eventos/recientes
#[utoipa::path(
    get,
    path = "/api/eventos/recientes",
    tag = "Eventos",
    responses(
        (status = 200, description = "Últimos registros, el más nuevo primero", body = Vec<EventoRegistro>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_recent_events(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    // O cajero só enxerga a atividade da própria sucursal
    let filtro = match usuario.rol {
        Rol::Admin => None,
        Rol::Cajero => Some(usuario.sucursal_id.as_str()),
    };

    let eventos = app_state
        .evento_repo
        .recientes(filtro, LIMITE_RECIENTES)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(eventos)))
}

// GET /api/eventos/stream
//
// A conexão SSE com o canal de eventos ao vivo. Assinantes atrasados pulam
// os eventos perdidos e seguem escutando; o próximo `refresco` faz a
// interface se realinhar.
#[utoipa::path(
    get,
    path = "/api/eventos/stream",
    tag = "Eventos",
    responses(
        (status = 200, description = "Flujo SSE de eventos del sistema", content_type = "text/event-stream")
    ),
    security(("api_jwt" = []))
)]
pub async fn stream_events(
    State(app_state): State<AppState>,
    AuthenticatedUser(usuario): AuthenticatedUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app_state.event_bus.suscribir();

    let filtro_sucursal = match usuario.rol {
        Rol::Admin => None,
        Rol::Cajero => Some(usuario.sucursal_id.clone()),
    };

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(evento) => return Some((evento, rx)),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .filter(move |evento| {
        let pasa = match (&filtro_sucursal, evento.sucursal()) {
            (Some(mia), Some(del_evento)) => mia == del_evento,
            _ => true,
        };
        future::ready(pasa)
    })
    .filter_map(|evento| {
        let serializado = Event::default()
            .event(evento.nombre())
            .json_data(&evento)
            .ok()
            .map(Ok::<_, Infallible>);
        future::ready(serializado)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
