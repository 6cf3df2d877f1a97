// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        conteo::Area,
        dashboard::{CajaTotal, PuntoHora, Sucursal},
    },
};

// Consultas de agregação do painel admin. Todas as somas saem do banco já
// agrupadas; os zeros das cajas/horas sem movimento são preenchidos no serviço.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn sucursales(&self) -> Result<Vec<Sucursal>, AppError> {
        let filas = sqlx::query_as::<_, Sucursal>(
            "SELECT id, nombre, ultima_actualizacion, ultima_caja, ultimo_empleado \
             FROM sucursales ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    pub async fn sucursal(&self, id: &str) -> Result<Option<Sucursal>, AppError> {
        let fila = sqlx::query_as::<_, Sucursal>(
            "SELECT id, nombre, ultima_actualizacion, ultima_caja, ultimo_empleado \
             FROM sucursales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fila)
    }

    // Totais do dia por caja; com $2 nulo soma todas as sucursales
    pub async fn totales_por_caja(
        &self,
        fecha: NaiveDate,
        sucursal_id: Option<&str>,
    ) -> Result<Vec<CajaTotal>, AppError> {
        let filas = sqlx::query_as::<_, CajaTotal>(
            "SELECT caja, CAST(SUM(total) AS BIGINT) AS total \
             FROM conteos \
             WHERE fecha = $1 AND ($2::text IS NULL OR sucursal_id = $2) \
             GROUP BY caja ORDER BY caja",
        )
        .bind(fecha)
        .bind(sucursal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    // Totais de uma hora específica por caja (a entrada do heurístico de
    // balance e os mini-contadores dos cards)
    pub async fn totales_por_caja_hora(
        &self,
        fecha: NaiveDate,
        hora: &str,
        sucursal_id: Option<&str>,
    ) -> Result<Vec<CajaTotal>, AppError> {
        let filas = sqlx::query_as::<_, CajaTotal>(
            "SELECT caja, CAST(SUM(total) AS BIGINT) AS total \
             FROM conteos \
             WHERE fecha = $1 AND hora = $2 AND ($3::text IS NULL OR sucursal_id = $3) \
             GROUP BY caja ORDER BY caja",
        )
        .bind(fecha)
        .bind(hora)
        .bind(sucursal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    pub async fn total_del_dia(
        &self,
        fecha: NaiveDate,
        sucursal_id: Option<&str>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT CAST(COALESCE(SUM(total), 0) AS BIGINT) \
             FROM conteos \
             WHERE fecha = $1 AND ($2::text IS NULL OR sucursal_id = $2)",
        )
        .bind(fecha)
        .bind(sucursal_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // A hora mais movimentada do dia e quantos clientes teve
    pub async fn hora_pico(
        &self,
        fecha: NaiveDate,
        sucursal_id: Option<&str>,
    ) -> Result<Option<(String, i64)>, AppError> {
        let fila = sqlx::query_as::<_, (String, i64)>(
            "SELECT hora, CAST(SUM(total) AS BIGINT) AS total \
             FROM conteos \
             WHERE fecha = $1 AND ($2::text IS NULL OR sucursal_id = $2) \
             GROUP BY hora ORDER BY total DESC, hora LIMIT 1",
        )
        .bind(fecha)
        .bind(sucursal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fila)
    }

    pub async fn serie_por_hora(
        &self,
        fecha: NaiveDate,
        sucursal_id: &str,
    ) -> Result<Vec<PuntoHora>, AppError> {
        let filas = sqlx::query_as::<_, (String, i64)>(
            "SELECT hora, CAST(SUM(total) AS BIGINT) \
             FROM conteos WHERE fecha = $1 AND sucursal_id = $2 \
             GROUP BY hora ORDER BY hora",
        )
        .bind(fecha)
        .bind(sucursal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas
            .into_iter()
            .map(|(hora, total)| PuntoHora { hora, total })
            .collect())
    }

    pub async fn cajeros_activos(
        &self,
        fecha: NaiveDate,
        sucursal_id: &str,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT empleado) \
             FROM conteo_empleados WHERE fecha = $1 AND sucursal_id = $2",
        )
        .bind(fecha)
        .bind(sucursal_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn totales_por_area(
        &self,
        fecha: NaiveDate,
        sucursal_id: &str,
    ) -> Result<Vec<(Area, i64)>, AppError> {
        let filas = sqlx::query_as::<_, (Area, i64)>(
            "SELECT area, CAST(SUM(total) AS BIGINT) \
             FROM conteos WHERE fecha = $1 AND sucursal_id = $2 \
             GROUP BY area",
        )
        .bind(fecha)
        .bind(sucursal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }
}
