use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    CredencialesInvalidas,

    #[error("Rol incorreto para este usuário")]
    RolIncorrecto,

    #[error("Acesso negado")]
    AccesoDenegado,

    #[error("Token inválido")]
    TokenInvalido,

    #[error("Usuário não encontrado")]
    UsuarioNoEncontrado,

    #[error("Usuário já existe")]
    UsuarioYaExiste,

    #[error("Sucursal não encontrada")]
    SucursalNoEncontrada,

    #[error("Caja fora da faixa: {0}")]
    CajaFueraDeRango(i16),

    #[error("Tema desconhecido")]
    TemaInvalido,

    #[error("Dados inconsistentes: {detalle}")]
    DatosInconsistentes { detalle: String },

    #[error("Fonte não encontrada: {0}")]
    FuenteNoEncontrada(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::CajaFueraDeRango(_)
            | AppError::TemaInvalido => StatusCode::BAD_REQUEST,
            AppError::CredencialesInvalidas | AppError::TokenInvalido => StatusCode::UNAUTHORIZED,
            AppError::RolIncorrecto | AppError::AccesoDenegado => StatusCode::FORBIDDEN,
            AppError::UsuarioNoEncontrado | AppError::SucursalNoEncontrada => {
                StatusCode::NOT_FOUND
            }
            AppError::UsuarioYaExiste => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Mensagem voltada ao usuário. O espanhol é o idioma do sistema; inglês
    // como alternativa.
    fn mensaje(&self, idioma: &str) -> String {
        let es = idioma.starts_with("es") || !idioma.starts_with("en");
        match self {
            AppError::ValidationError(_) => {
                if es { "Uno o más campos son inválidos." } else { "One or more fields are invalid." }
            }
            AppError::CredencialesInvalidas => {
                if es { "Usuario o contraseña incorrectos." } else { "Wrong user or password." }
            }
            AppError::RolIncorrecto => {
                if es { "Rol incorrecto para este usuario." } else { "Wrong role for this user." }
            }
            AppError::AccesoDenegado => {
                if es { "No tienes permisos para acceder a este recurso." } else { "You do not have access to this resource." }
            }
            AppError::TokenInvalido => {
                if es { "Token de autenticación inválido o ausente." } else { "Invalid or missing authentication token." }
            }
            AppError::UsuarioNoEncontrado => {
                if es { "Usuario no encontrado." } else { "User not found." }
            }
            AppError::UsuarioYaExiste => {
                if es { "Ese empleado ya está registrado en la sucursal." } else { "That employee already exists in the branch." }
            }
            AppError::SucursalNoEncontrada => {
                if es { "Sucursal no encontrada." } else { "Branch not found." }
            }
            AppError::CajaFueraDeRango(_) => {
                if es { "La caja debe estar entre 1 y 6." } else { "The till must be between 1 and 6." }
            }
            AppError::TemaInvalido => {
                if es { "El tema debe ser 'claro' u 'oscuro'." } else { "Theme must be 'claro' or 'oscuro'." }
            }
            _ => {
                if es { "Ocurrió un error inesperado." } else { "An unexpected error occurred." }
            }
        }
        .to_string()
    }

    // Converte para o erro de API já localizado, na borda dos handlers
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            // O `tracing` guarda a causa detalhada; o cliente recebe o genérico.
            tracing::error!("Erro Interno do Servidor: {self}");
        }

        // Para validação devolvemos também o detalhe campo a campo
        let detalles = if let AppError::ValidationError(errors) = self {
            let mut mapa = std::collections::HashMap::new();
            for (campo, erros) in errors.field_errors() {
                let mensagens: Vec<String> = erros
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                mapa.insert(campo.to_string(), mensagens);
            }
            Some(json!(mapa))
        } else {
            None
        };

        ApiError {
            status,
            mensaje: self.mensaje(&locale.0),
            detalles,
        }
    }
}

// O erro que de fato sai pela API: status + mensagem já localizada
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub mensaje: String,
    pub detalles: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detalles {
            Some(detalles) => Json(json!({ "error": self.mensaje, "details": detalles })),
            None => Json(json!({ "error": self.mensaje })),
        };
        (self.status, body).into_response()
    }
}

// Os guards de middleware devolvem AppError direto; aqui cai no idioma padrão
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
