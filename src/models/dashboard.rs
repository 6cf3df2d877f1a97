// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::conteo::Area;

// Uma sucursal como está no banco, com o carimbo do último registro
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sucursal {
    pub id: String,
    pub nombre: String,
    pub ultima_actualizacion: Option<DateTime<Utc>>,
    pub ultima_caja: Option<i16>,
    pub ultimo_empleado: Option<String>,
}

// Resultado do heurístico de balance: diferença entre a caja mais e a menos
// movimentada da área maior que 2 clientes = desbalanceado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EstadoBalance {
    Balanceado,
    Desbalanceado,
}

impl std::fmt::Display for EstadoBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstadoBalance::Balanceado => write!(f, "Balanceado"),
            EstadoBalance::Desbalanceado => write!(f, "Desbalanceado"),
        }
    }
}

// 1. Os cards do topo do painel admin
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenGeneral {
    pub total_clientes: i64,
    pub sucursales_activas: i64,
    #[schema(example = "13:00")]
    pub hora_pico: Option<String>,
    pub clientes_hora_pico: i64,
    pub ultima_actualizacion: DateTime<Utc>,
}

// Total do dia de uma caja
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CajaTotal {
    pub caja: i16,
    pub total: i64,
}

// 2. A gráfica de área: totais por caja mais o estado de balance na hora atual
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VistaArea {
    pub area: Area,
    pub cajas: Vec<CajaTotal>,
    pub total: i64,
    // média por caja ativa, com uma casa decimal
    pub promedio_por_caja: Decimal,
    pub estado: EstadoBalance,
    pub diferencia: i64,
}

// 3. Card de uma sucursal na grade do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SucursalResumen {
    pub id: String,
    pub nombre: String,
    pub total_clientes: i64,
    pub total_medicina: i64,
    pub total_autoservicio: i64,
    // contadores da hora atual, caja 1 a caja 6
    pub cajas_hora_actual: Vec<i64>,
    pub desbalanceada: bool,
    pub ultima_actualizacion: Option<DateTime<Utc>>,
}

// Faixa de atividade de uma caja no detalhe da sucursal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NivelActividad {
    Alto,
    Medio,
    Bajo,
    Inactivo,
}

impl NivelActividad {
    pub fn de_total(total: i64) -> NivelActividad {
        if total > 10 {
            NivelActividad::Alto
        } else if total > 5 {
            NivelActividad::Medio
        } else if total > 0 {
            NivelActividad::Bajo
        } else {
            NivelActividad::Inactivo
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CajaDetalle {
    pub caja: i16,
    pub area: Area,
    pub total: i64,
    pub nivel: NivelActividad,
}

// Um ponto da série por hora (24 baldes)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PuntoHora {
    #[schema(example = "09:00")]
    pub hora: String,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistribucionAreas {
    pub medicina: i64,
    pub autoservicio: i64,
}

// 4. Modal de detalhe de uma sucursal
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SucursalDetalle {
    pub id: String,
    pub nombre: String,
    pub total_clientes: i64,
    pub cajeros_activos: i64,
    pub ultima_actualizacion: Option<DateTime<Utc>>,
    pub por_hora: Vec<PuntoHora>,
    pub cajas: Vec<CajaDetalle>,
    pub distribucion: DistribucionAreas,
}

// Alerta de desbalance ativa, deduplicada pela chave sucursal+área
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertaDesbalance {
    #[schema(example = "sucursal_1_medicina")]
    pub id: String,
    pub sucursal_id: String,
    pub area: Area,
    pub diferencia: i64,
    pub mensaje: String,
    pub creada_en: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nivel_de_actividad_por_total() {
        assert_eq!(NivelActividad::de_total(0), NivelActividad::Inactivo);
        assert_eq!(NivelActividad::de_total(3), NivelActividad::Bajo);
        assert_eq!(NivelActividad::de_total(6), NivelActividad::Medio);
        assert_eq!(NivelActividad::de_total(11), NivelActividad::Alto);
    }
}
