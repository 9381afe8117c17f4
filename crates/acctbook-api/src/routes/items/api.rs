//! Items API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_items: Current page of the list view (JSON)
//! - api_item_detail: Single item (JSON)
//! - api_item_create / api_item_update / api_item_delete: Item writes (JSON)
//! - htmx_items_list: List panel, optionally reloading from the store
//! - htmx_items_search / htmx_items_clear: Filter the cached list
//! - htmx_items_page: Jump to a page
//! - htmx_item_delete: Delete from the list's actions column
//! - htmx_item_store / htmx_item_update: Add and edit form submissions

use super::page::{form_page, render_item_form, render_items_panel};
use crate::{is_htmx_request, page_response, ApiError, AppState};
use acctbook_core::{
    CoreError, ErrorContext, Item, ItemForm, ItemListView, ItemPage, LoadState, NewItem,
    StoreError,
};
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use std::collections::HashMap;

/// Load the list on first use; failures are logged and left to the panel
async fn ensure_loaded(state: &AppState, view: &mut ItemListView) {
    if view.state() != LoadState::Loaded {
        reload(state, view).await;
    }
}

async fn reload(state: &AppState, view: &mut ItemListView) {
    if let Err(e) = view.load().await {
        state.errors.log_error(&e, &ErrorContext::new("items.load"));
    }
}

// ==================== JSON API ====================

/// Current page of the list (JSON API)
pub async fn api_items(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Result<Json<ItemPage>, ApiError> {
    let mut view = state.items.write().await;
    if params.contains_key("reload") || view.state() != LoadState::Loaded {
        view.load().await?;
    }
    Ok(Json(view.snapshot()))
}

/// Single item straight from the store (JSON API)
pub async fn api_item_detail(
    state: axum::extract::State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    let item = state.store.fetch(id).await.map_err(|source| match source {
        StoreError::NotFound { id } => CoreError::ItemNotFound { id },
        source => CoreError::FetchFailed { source },
    })?;
    Ok(Json(item))
}

/// Insert an item (JSON API)
pub async fn api_item_create(
    state: axum::extract::State<AppState>,
    Json(new_item): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    new_item.validate()?;
    let item = state
        .store
        .insert(new_item)
        .await
        .map_err(|source| CoreError::SaveFailed { source })?;
    log::info!("Created item {}", item.id);
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an item (JSON API)
pub async fn api_item_update(
    state: axum::extract::State<AppState>,
    Path(id): Path<i64>,
    Json(new_item): Json<NewItem>,
) -> Result<Json<Item>, ApiError> {
    new_item.validate()?;
    let item = state
        .store
        .update(id, new_item)
        .await
        .map_err(|source| match source {
            StoreError::NotFound { id } => CoreError::ItemNotFound { id },
            source => CoreError::SaveFailed { source },
        })?;
    log::info!("Updated item {}", id);
    Ok(Json(item))
}

/// Delete an item through the list view (JSON API)
pub async fn api_item_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut view = state.items.write().await;
    if view.state() != LoadState::Loaded {
        view.load().await?;
    }
    if let Err(e) = view.remove(id).await {
        state
            .errors
            .log_error(&e, &ErrorContext::new("items.remove").with_item(id));
        return Err(e.into());
    }
    log::info!("Deleted item {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// ==================== HTMX Partials ====================

/// List panel; `reload` refetches from the store
pub async fn htmx_items_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let mut view = state.items.write().await;
    if params.contains_key("reload") {
        reload(&state, &mut view).await;
    } else {
        ensure_loaded(&state, &mut view).await;
    }
    Html(render_items_panel(&view, &state.config.currency, None))
}

/// Search box submission
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

/// Filter the list by the submitted `q`
pub async fn htmx_items_search(
    state: axum::extract::State<AppState>,
    Form(search): Form<SearchForm>,
) -> Html<String> {
    let query = search.q.as_str();

    let mut view = state.items.write().await;
    ensure_loaded(&state, &mut view).await;
    match view.search(query) {
        Ok(count) => log::debug!("Search '{}' matched {} items", query, count),
        Err(e) => state.errors.log_error(&e, &ErrorContext::new("items.search")),
    }
    Html(render_items_panel(&view, &state.config.currency, None))
}

/// Drop the filter
pub async fn htmx_items_clear(state: axum::extract::State<AppState>) -> Html<String> {
    let mut view = state.items.write().await;
    ensure_loaded(&state, &mut view).await;
    if let Err(e) = view.clear() {
        state.errors.log_error(&e, &ErrorContext::new("items.clear"));
    }
    Html(render_items_panel(&view, &state.config.currency, None))
}

/// Jump to page `n`; out-of-range pages re-render the current one
pub async fn htmx_items_page(
    state: axum::extract::State<AppState>,
    Path(n): Path<usize>,
) -> Html<String> {
    let mut view = state.items.write().await;
    ensure_loaded(&state, &mut view).await;
    match view.go_to_page(n) {
        Ok(true) => {}
        Ok(false) => log::debug!("Ignoring out-of-range page {}", n),
        Err(e) => state.errors.log_error(&e, &ErrorContext::new("items.page")),
    }
    Html(render_items_panel(&view, &state.config.currency, None))
}

/// Delete from the list and re-render it with a notice
pub async fn htmx_item_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<i64>,
) -> Html<String> {
    let mut view = state.items.write().await;
    ensure_loaded(&state, &mut view).await;
    let notice = match view.remove(id).await {
        Ok(()) => {
            log::info!("Deleted item {}", id);
            (true, "Item deleted successfully".to_string())
        }
        Err(e) => {
            state
                .errors
                .log_error(&e, &ErrorContext::new("items.remove").with_item(id));
            (false, e.user_message())
        }
    };
    Html(render_items_panel(
        &view,
        &state.config.currency,
        Some((notice.0, notice.1.as_str())),
    ))
}

/// Add form submission
pub async fn htmx_item_store(
    state: axum::extract::State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ItemForm>,
) -> Response {
    let result = match form.validate() {
        Ok(new_item) => state
            .store
            .insert(new_item)
            .await
            .map_err(|source| CoreError::SaveFailed { source }),
        Err(e) => Err(e),
    };

    match result {
        Ok(item) => {
            log::info!("Created item {}", item.id);
            redirect_after_save(&headers, "created")
        }
        Err(e) => {
            state.errors.log_error(&e, &ErrorContext::new("items.create"));
            form_error_response(&state, &headers, "/items", "Add New Item", &form, &e.user_message())
                .await
        }
    }
}

/// Edit form submission
pub async fn htmx_item_update(
    state: axum::extract::State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<ItemForm>,
) -> Response {
    let new_item = match form.validate() {
        Ok(new_item) => new_item,
        Err(e) => {
            state
                .errors
                .log_error(&e, &ErrorContext::new("items.update").with_item(id));
            let action = format!("/items/{}", id);
            return form_error_response(&state, &headers, &action, "Edit Item", &form, &e.user_message())
                .await;
        }
    };

    match state.store.update(id, new_item).await {
        Ok(_) => {
            log::info!("Updated item {}", id);
            redirect_after_save(&headers, "updated")
        }
        Err(source) => {
            let error = CoreError::SaveFailed { source };
            state
                .errors
                .log_error(&error, &ErrorContext::new("items.update").with_item(id));
            let action = format!("/items/{}", id);
            form_error_response(&state, &headers, &action, "Edit Item", &form, "Failed to update item.")
                .await
        }
    }
}

/// HTMX follows `HX-Redirect`; plain form posts get a 303
fn redirect_after_save(headers: &HeaderMap, notice: &str) -> Response {
    let target = format!("/items?notice={}", notice);
    if is_htmx_request(headers) {
        ([("HX-Redirect", target)], "").into_response()
    } else {
        Redirect::to(&target).into_response()
    }
}

/// Re-render the form with the error. HTMX only swaps 2xx responses, so the
/// fragment is sent as 200; full pages carry 422.
async fn form_error_response(
    state: &AppState,
    headers: &HeaderMap,
    action: &str,
    title: &str,
    form: &ItemForm,
    message: &str,
) -> Response {
    let form_html = render_item_form(action, form, Some(message));
    if is_htmx_request(headers) {
        return Html(form_html).into_response();
    }
    let ui = *state.ui.read().await;
    let inner_content = form_page(title, &form_html);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(page_response(headers, title, "/items", &inner_content, &ui)),
    )
        .into_response()
}
