// src/db/evento_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::evento::EventoRegistro};

#[derive(Clone)]
pub struct EventoRepository {
    pool: PgPool,
}

impl EventoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Os últimos registros, do mais novo para o mais velho. O log ao vivo do
    // painel mostra no máximo 50 linhas.
    pub async fn recientes(
        &self,
        sucursal_id: Option<&str>,
        limite: i64,
    ) -> Result<Vec<EventoRegistro>, AppError> {
        let filas = sqlx::query_as::<_, EventoRegistro>(
            "SELECT id, sucursal_id, caja, area, empleado, tipo, creado_en \
             FROM eventos_registro \
             WHERE ($1::text IS NULL OR sucursal_id = $1) \
             ORDER BY creado_en DESC LIMIT $2",
        )
        .bind(sucursal_id)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }
}
