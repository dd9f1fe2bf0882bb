use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

pub mod health;

/// Uniform response envelope: `{success, data | error, ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional top-level keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            error: None,
            extra: Map::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            count: None,
            error: Some(error.into()),
            extra: Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A list with its length as `count`
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self::success(data).with_count(count)
    }
}

impl ApiResponse<()> {
    pub fn success_msg(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
            error: None,
            extra: Map::new(),
        }
    }
}

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Employee routes
        .route("/employee/list", post(handlers::employee::list_employees))
        .route("/employee/create", post(handlers::employee::create_employee))
        .route("/employee/update", post(handlers::employee::update_employee))
        .route("/employee/delete", post(handlers::employee::delete_employee))
        .route("/employee/search", post(handlers::employee::search_employees))
        .route("/employee/activate", post(handlers::employee::activate_employee))
        .route("/employee/deactivate", post(handlers::employee::deactivate_employee))
        .route("/employee/terminate", post(handlers::employee::terminate_employee))
        .route("/employee/:id", post(handlers::employee::get_employee))
        // Department routes
        .route("/department/list", post(handlers::department::list_departments))
        .route("/department/create", post(handlers::department::create_department))
        .route("/department/update", post(handlers::department::update_department))
        .route("/department/delete", post(handlers::department::delete_department))
        .route("/department/copy", post(handlers::department::copy_department))
        .route("/department/:id", post(handlers::department::get_department))
        .route(
            "/department/:id/employees",
            post(handlers::department::department_employees),
        );

    Router::new()
        .nest("/api", api_routes)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Fallback handler for 404
pub async fn fallback() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::failure("Not Found")))
}
