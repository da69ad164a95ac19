use std::sync::Arc;

use habits_core::store::HabitStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Habit persistence, selected at startup by `HABIT_STORE`.
    pub store: Arc<dyn HabitStore>,
    /// Connection pool when the store is PostgreSQL-backed; used by `/health`.
    pub pool: Option<habits_db::DbPool>,
}
