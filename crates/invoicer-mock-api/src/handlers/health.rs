use axum::Json;
use invoicer_core::models::HealthStatus;

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
