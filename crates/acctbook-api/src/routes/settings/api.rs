//! Settings API endpoints - JSON API

use crate::AppState;
use axum::Json;

/// Effective configuration with the store key masked
pub async fn api_settings(state: axum::extract::State<AppState>) -> Json<serde_json::Value> {
    let config = &state.config;
    let mut value = serde_json::to_value(config).unwrap_or_default();
    if let Some(store) = value.get_mut("store") {
        store["api_key"] = serde_json::Value::String(config.store.masked_api_key());
    }
    Json(value)
}
