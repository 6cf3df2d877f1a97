// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // O monitor de balance roda em segundo plano: reavalia a cada registro e
    // a cada ~30s publica o tique de refresco
    services::monitor::lanzar(app_state.monitor.clone());

    // Rotas públicas de autenticação
    let auth_routes = Router::new().route("/auth/login", post(handlers::auth::login));

    // Rotas do usuário autenticado (qualquer rol)
    let user_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/auth/preferencias", put(handlers::auth::update_preferencias))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Provisionamento de usuários: somente admin
    let provisioning_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            admin_guard,
        ));

    // As operações do cajero sobre a própria sucursal
    let registros_routes = Router::new()
        .route("/registros", post(handlers::registros::register_client))
        .route("/registros/dia", get(handlers::registros::get_day))
        .route("/registros/resumen", get(handlers::registros::get_summary))
        .route(
            "/registros/mi-productividad",
            get(handlers::registros::get_my_productivity),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O painel admin
    let dashboard_routes = Router::new()
        .route("/dashboard/resumen", get(handlers::dashboard::get_general_summary))
        .route(
            "/dashboard/areas/{area}",
            get(handlers::dashboard::get_area_view),
        )
        .route(
            "/dashboard/sucursales",
            get(handlers::dashboard::get_branches),
        )
        .route(
            "/dashboard/sucursales/{id}",
            get(handlers::dashboard::get_branch_detail),
        )
        .route(
            "/dashboard/sucursales/{id}/reporte.pdf",
            get(handlers::dashboard::export_branch_pdf),
        )
        .route("/dashboard/alertas", get(handlers::dashboard::get_alerts))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            admin_guard,
        ));

    // Atividade recente e o fluxo de eventos ao vivo
    let eventos_routes = Router::new()
        .route(
            "/eventos/recientes",
            get(handlers::eventos::get_recent_events),
        )
        .route("/eventos/stream", get(handlers::eventos::stream_events))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest(
            "/api",
            auth_routes
                .merge(user_routes)
                .merge(provisioning_routes)
                .merge(registros_routes)
                .merge(dashboard_routes)
                .merge(eventos_routes),
        )
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
