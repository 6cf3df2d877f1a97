// src/models/evento.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{conteo::Area, dashboard::AlertaDesbalance};

// Linha do log de atividade recente do painel admin
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventoRegistro {
    pub id: Uuid,
    pub sucursal_id: String,
    pub caja: i16,
    pub area: Area,
    pub empleado: String,
    #[schema(example = "registro")]
    pub tipo: String,
    pub creado_en: DateTime<Utc>,
}

// O que circula pelo canal de eventos ao vivo.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "evento", rename_all = "snake_case")]
pub enum EventoSistema {
    Registro(EventoRegistro),
    Alerta(AlertaDesbalance),
    AlertaResuelta {
        id: String,
        sucursal_id: String,
        area: Area,
        resuelta_en: DateTime<Utc>,
    },
    // Tique periódico de atualização (o auto-refresh de ~30s do painel)
    Refresco {
        marca: DateTime<Utc>,
    },
}

impl EventoSistema {
    // Nome do evento na conexão SSE
    pub fn nombre(&self) -> &'static str {
        match self {
            EventoSistema::Registro(_) => "registro",
            EventoSistema::Alerta(_) => "alerta",
            EventoSistema::AlertaResuelta { .. } => "alerta_resuelta",
            EventoSistema::Refresco { .. } => "refresco",
        }
    }

    // Sucursal à qual o evento pertence; None = interessa a todos
    pub fn sucursal(&self) -> Option<&str> {
        match self {
            EventoSistema::Registro(e) => Some(&e.sucursal_id),
            EventoSistema::Alerta(a) => Some(&a.sucursal_id),
            EventoSistema::AlertaResuelta { sucursal_id, .. } => Some(sucursal_id),
            EventoSistema::Refresco { .. } => None,
        }
    }
}
