pub mod handlers;

pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/match/closest", post(closest_subset))
        .with_state(state)
}
