// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, RegisterPayload, Rol, Usuario},
};

// Emite um JWT de 7 dias com o id e o papel do usuário
pub fn emitir_token(jwt_secret: &str, usuario: &Usuario) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(7);

    let claims = Claims {
        sub: usuario.id,
        rol: usuario.rol,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?)
}

pub fn decodificar_token(jwt_secret: &str, token: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::TokenInvalido)?;

    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    /// Login com os quatro campos do formulário: sucursal, empleado,
    /// contraseña e rol. O rol pedido tem que bater com o rol armazenado.
    pub async fn login(
        &self,
        sucursal: &str,
        empleado: &str,
        password: &str,
        rol: Rol,
    ) -> Result<(String, Usuario), AppError> {
        let usuario = self
            .user_repo
            .find_by_login(sucursal, empleado)
            .await?
            .ok_or(AppError::CredencialesInvalidas)?;

        let password_clone = password.to_owned();
        let password_hash_clone = usuario.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::CredencialesInvalidas);
        }

        if usuario.rol != rol {
            return Err(AppError::RolIncorrecto);
        }

        let token = emitir_token(&self.jwt_secret, &usuario)?;
        Ok((token, usuario))
    }

    // Provisiona um usuário (operação de admin)
    pub async fn registrar_usuario(
        &self,
        payload: &RegisterPayload,
    ) -> Result<Usuario, AppError> {
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create_usuario(
                &payload.sucursal,
                &payload.empleado,
                &payload.nombre,
                payload.rol,
                &hashed_password,
            )
            .await
    }

    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let claims = decodificar_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UsuarioNoEncontrado)
    }

    pub async fn actualizar_tema(&self, id: Uuid, tema: &str) -> Result<Usuario, AppError> {
        if tema != "claro" && tema != "oscuro" {
            return Err(AppError::TemaInvalido);
        }
        self.user_repo.update_tema(id, tema).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario_de_prueba(rol: Rol) -> Usuario {
        Usuario {
            id: Uuid::new_v4(),
            sucursal_id: "sucursal_1".into(),
            empleado: "empleado_001".into(),
            nombre: "Cajero Demo".into(),
            rol,
            password_hash: String::new(),
            tema: "oscuro".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_ida_y_vuelta() {
        let usuario = usuario_de_prueba(Rol::Cajero);
        let token = emitir_token("secreto-de-prueba", &usuario).unwrap();

        let claims = decodificar_token("secreto-de-prueba", &token).unwrap();
        assert_eq!(claims.sub, usuario.id);
        assert_eq!(claims.rol, Rol::Cajero);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn secreto_equivocado_es_token_invalido() {
        let usuario = usuario_de_prueba(Rol::Admin);
        let token = emitir_token("secreto-bueno", &usuario).unwrap();

        let resultado = decodificar_token("otro-secreto", &token);
        assert!(matches!(resultado, Err(AppError::TokenInvalido)));
    }
}
