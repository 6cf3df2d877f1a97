// src/services.rs

pub mod auth;
pub mod balance;
pub mod conteo;
pub mod dashboard;
pub mod event_bus;
pub mod export;
pub mod monitor;
