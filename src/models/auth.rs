// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papel do usuário no sistema. O cajero registra clientes na sua sucursal;
// o admin enxerga todas as sucursales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rol", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Cajero,
    Admin,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    // O admin usa o sentinela 'admin', sem vínculo com uma sucursal real
    pub sucursal_id: String,
    pub empleado: String,
    pub nombre: String,
    pub rol: Rol,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    // Preferência de tema da interface ('oscuro' ou 'claro')
    pub tema: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de login: os quatro campos do formulário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "La sucursal es obligatoria."))]
    #[schema(example = "sucursal_1")]
    pub sucursal: String,

    #[validate(length(min = 1, message = "El empleado es obligatorio."))]
    #[schema(example = "empleado_001")]
    pub empleado: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    pub rol: Rol,
}

// Dados para provisionar um novo usuário (operação de admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "La sucursal es obligatoria."))]
    pub sucursal: String,

    #[validate(length(min = 1, message = "El empleado es obligatorio."))]
    pub empleado: String,

    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    pub rol: Rol,
}

// Resposta de autenticação com o token e os dados do usuário
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

// Atualização da preferência de tema
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PreferenciasPayload {
    #[validate(length(min = 1, message = "El tema es obligatorio."))]
    #[schema(example = "claro")]
    pub tema: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub rol: Rol,   // Papel, para os guards de rota
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
