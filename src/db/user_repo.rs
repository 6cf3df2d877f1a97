// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Rol, Usuario},
};

// O repositório de usuários, responsável por todas as interações com a
// tabela 'usuarios'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca pelo par (sucursal, empleado), a identidade do formulário de login
    pub async fn find_by_login(
        &self,
        sucursal_id: &str,
        empleado: &str,
    ) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE sucursal_id = $1 AND empleado = $2",
        )
        .bind(sucursal_id)
        .bind(empleado)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    // Cria um novo usuário no banco de dados
    pub async fn create_usuario(
        &self,
        sucursal_id: &str,
        empleado: &str,
        nombre: &str,
        rol: Rol,
        password_hash: &str,
    ) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            "INSERT INTO usuarios (sucursal_id, empleado, nombre, rol, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(sucursal_id)
        .bind(empleado)
        .bind(nombre)
        .bind(rol)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UsuarioYaExiste;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn update_tema(&self, id: Uuid, tema: &str) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            "UPDATE usuarios SET tema = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(tema)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UsuarioNoEncontrado)
    }
}
