//! Dashboard API endpoints - JSON API

use acctbook_core::DashboardData;
use axum::Json;

pub async fn api_dashboard() -> Json<DashboardData> {
    Json(DashboardData::placeholder())
}
