use sea_orm::DatabaseConnection;

/// Shared by every handler; the pool is opened once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}
