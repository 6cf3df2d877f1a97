// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ConteoRepository, DashboardRepository, EventoRepository, UserRepository},
    services::{
        auth::AuthService, conteo::RegistroService, dashboard::DashboardService,
        event_bus::EventBus, export::ReporteService, monitor::BalanceMonitor,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub registro_service: RegistroService,
    pub dashboard_service: DashboardService,
    pub reporte_service: ReporteService,
    pub evento_repo: EventoRepository,
    pub event_bus: EventBus,
    pub monitor: Arc<BalanceMonitor>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        // Intervalo do monitor de balance (o auto-refresh de ~30s do painel)
        let intervalo_monitor = env::var("MONITOR_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let conteo_repo = ConteoRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let evento_repo = EventoRepository::new(db_pool.clone());

        let event_bus = EventBus::default();
        let auth_service = AuthService::new(user_repo, jwt_secret);
        let registro_service = RegistroService::new(conteo_repo.clone(), event_bus.clone());
        let dashboard_service = DashboardService::new(dashboard_repo.clone());
        let reporte_service = ReporteService::new(dashboard_repo.clone(), conteo_repo);
        let monitor = Arc::new(BalanceMonitor::new(
            dashboard_repo,
            event_bus.clone(),
            Duration::from_secs(intervalo_monitor),
        ));

        Ok(Self {
            db_pool,
            auth_service,
            registro_service,
            dashboard_service,
            reporte_service,
            evento_repo,
            event_bus,
            monitor,
        })
    }
}
