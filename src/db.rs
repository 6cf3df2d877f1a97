// src/db.rs

pub mod conteo_repo;
pub mod dashboard_repo;
pub mod evento_repo;
pub mod user_repo;

pub use conteo_repo::ConteoRepository;
pub use dashboard_repo::DashboardRepository;
pub use evento_repo::EventoRepository;
pub use user_repo::UserRepository;
