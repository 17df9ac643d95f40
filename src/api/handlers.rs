use crate::models::{Amount, MatchResult, ToleranceMode};
use crate::service::{MatchError, Strategy, SubsetMatcher};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 接口共享状态
#[derive(Debug)]
pub struct ApiState {
    pub matcher: SubsetMatcher,
    pub default_tolerance: Amount,
}

/// 请求体: 发票金额 + target, 其余可选 (缺省取服务配置)
#[derive(Debug, Deserialize)]
pub struct ClosestSubsetRequest {
    pub invoices: Vec<Amount>,
    pub target: Amount,
    pub tolerance: Option<Amount>,
    pub tolerance_mode: Option<ToleranceMode>,
    pub strategy: Option<Strategy>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct ClosestSubsetResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<MatchResult>,
    pub matched_at: DateTime<Utc>,
}

impl ClosestSubsetResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            result: None,
            matched_at: Utc::now(),
        }
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 最接近子集匹配接口
pub async fn closest_subset(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<ClosestSubsetRequest>,
) -> Response {
    let config = state.matcher.config();
    let tolerance = req.tolerance.unwrap_or(state.default_tolerance);
    let strategy = req.strategy.unwrap_or(config.strategy);
    let mode = req.tolerance_mode.unwrap_or(config.tolerance_mode);
    let invoice_count = req.invoices.len();

    // 穷举是 CPU 密集计算, 放到阻塞线程池
    let search_state = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || {
        search_state
            .matcher
            .search_with(&req.invoices, req.target, tolerance, strategy, mode)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => {
            let message = if result.is_match() {
                format!("Matched a subset of {} invoices", invoice_count)
            } else {
                result.to_string()
            };
            let response = ClosestSubsetResponse {
                success: true,
                message,
                result: Some(result),
                matched_at: Utc::now(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(e @ MatchError::TooManyInvoices { .. })) => {
            let response = ClosestSubsetResponse::failure(format!("Error: {}", e));
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Subset search task failed: {}", e);
            let response = ClosestSubsetResponse::failure(format!("Error: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
