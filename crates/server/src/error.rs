use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use sea_orm::DbErr;
use thiserror::Error;

/// Failures a request handler can answer with
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Course {0} not found")]
    CourseNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(e) => {
                error!("Request failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Storage details stay in the log
        let body = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}

/// Failures that stop the server from starting
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to database: {0}")]
    Database(#[from] DbErr),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
