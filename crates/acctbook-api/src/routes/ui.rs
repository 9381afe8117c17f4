//! UI state routes - theme and sidebar
//!
//! Both actions change shared presentation state and ask HTMX to refresh
//! the page so the new state is rendered everywhere.

use crate::{ApiError, AppState};
use acctbook_config::Theme;
use axum::extract::Path;
use axum::response::IntoResponse;

const REFRESH: [(&str, &str); 1] = [("HX-Refresh", "true")];

pub async fn ui_set_theme(
    state: axum::extract::State<AppState>,
    Path(theme): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let theme: Theme = theme
        .parse()
        .map_err(|message| ApiError::BadRequest { message })?;
    state.ui.write().await.set_theme(theme);
    log::debug!("Theme set to {}", theme);
    Ok(REFRESH)
}

pub async fn ui_toggle_sidebar(state: axum::extract::State<AppState>) -> impl IntoResponse {
    let open = state.ui.write().await.toggle_sidebar();
    log::debug!("Sidebar {}", if open { "opened" } else { "closed" });
    REFRESH
}
