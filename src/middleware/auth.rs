// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Rol, Usuario},
};

// O middleware de autenticação: valida o Bearer token e deixa o usuário nos
// "extensions" da requisição para os extractors dos handlers
pub async fn auth_guard(
    State(app_state): State<AppState>,
    encabezado: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = encabezado.ok_or(AppError::TokenInvalido)?;

    let usuario = app_state.auth_service.validate_token(auth.token()).await?;

    request.extensions_mut().insert(usuario);
    Ok(next.run(request).await)
}

// Igual ao auth_guard, mas só deixa passar administradores
pub async fn admin_guard(
    State(app_state): State<AppState>,
    encabezado: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = encabezado.ok_or(AppError::TokenInvalido)?;

    let usuario = app_state.auth_service.validate_token(auth.token()).await?;
    if usuario.rol != Rol::Admin {
        return Err(AppError::AccesoDenegado);
    }

    request.extensions_mut().insert(usuario);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub Usuario);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::TokenInvalido)
    }
}
