// src/db/conteo_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::conteo::{Area, ConteoRow, EmpleadoConteoRow},
};

// Repositório dos contadores por sucursal/dia/hora/caja e dos subcontadores
// por empleado
#[derive(Clone)]
pub struct ConteoRepository {
    pool: PgPool,
}

impl ConteoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// O contrato de registro: incrementa o total da caja, o subcontador do
    /// empleado, grava a linha de evento e carimba a sucursal, tudo na mesma
    /// transação. Se qualquer passo falhar nada é persistido, e é isso que
    /// permite ao cliente reverter o incremento otimista.
    #[allow(clippy::too_many_arguments)]
    pub async fn registrar_cliente(
        &self,
        sucursal_id: &str,
        empleado: &str,
        caja: i16,
        area: Area,
        fecha: NaiveDate,
        hora: &str,
        marca: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Carimbo da sucursal (e de quebra valida que ela existe)
        let atualizado = sqlx::query(
            "UPDATE sucursales \
             SET ultima_actualizacion = $2, ultima_caja = $3, ultimo_empleado = $4 \
             WHERE id = $1",
        )
        .bind(sucursal_id)
        .bind(marca)
        .bind(caja)
        .bind(empleado)
        .execute(&mut *tx)
        .await?;

        if atualizado.rows_affected() == 0 {
            // O drop da transação faz o rollback
            return Err(AppError::SucursalNoEncontrada);
        }

        // 2. Total da caja na hora
        sqlx::query(
            "INSERT INTO conteos (sucursal_id, fecha, hora, caja, area, total, ultima_actualizacion) \
             VALUES ($1, $2, $3, $4, $5, 1, $6) \
             ON CONFLICT (sucursal_id, fecha, hora, caja) \
             DO UPDATE SET total = conteos.total + 1, \
                           ultima_actualizacion = EXCLUDED.ultima_actualizacion",
        )
        .bind(sucursal_id)
        .bind(fecha)
        .bind(hora)
        .bind(caja)
        .bind(area)
        .bind(marca)
        .execute(&mut *tx)
        .await?;

        // 3. Subcontador do empleado
        sqlx::query(
            "INSERT INTO conteo_empleados (sucursal_id, fecha, hora, caja, empleado, total) \
             VALUES ($1, $2, $3, $4, $5, 1) \
             ON CONFLICT (sucursal_id, fecha, hora, caja, empleado) \
             DO UPDATE SET total = conteo_empleados.total + 1",
        )
        .bind(sucursal_id)
        .bind(fecha)
        .bind(hora)
        .bind(caja)
        .bind(empleado)
        .execute(&mut *tx)
        .await?;

        // 4. Linha de evento para as consultas de atividade recente
        sqlx::query(
            "INSERT INTO eventos_registro (id, sucursal_id, caja, area, empleado, tipo, creado_en) \
             VALUES ($1, $2, $3, $4, $5, 'registro', $6)",
        )
        .bind(Uuid::new_v4())
        .bind(sucursal_id)
        .bind(caja)
        .bind(area)
        .bind(empleado)
        .bind(marca)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn conteos_del_dia(
        &self,
        sucursal_id: &str,
        fecha: NaiveDate,
    ) -> Result<Vec<ConteoRow>, AppError> {
        let filas = sqlx::query_as::<_, ConteoRow>(
            "SELECT sucursal_id, fecha, hora, caja, area, total, ultima_actualizacion \
             FROM conteos WHERE sucursal_id = $1 AND fecha = $2 \
             ORDER BY hora, caja",
        )
        .bind(sucursal_id)
        .bind(fecha)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    pub async fn empleados_del_dia(
        &self,
        sucursal_id: &str,
        fecha: NaiveDate,
    ) -> Result<Vec<EmpleadoConteoRow>, AppError> {
        let filas = sqlx::query_as::<_, EmpleadoConteoRow>(
            "SELECT hora, caja, empleado, total \
             FROM conteo_empleados WHERE sucursal_id = $1 AND fecha = $2 \
             ORDER BY hora, caja, empleado",
        )
        .bind(sucursal_id)
        .bind(fecha)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }
}
