// src/models.rs

pub mod auth;
pub mod conteo;
pub mod dashboard;
pub mod evento;
