//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::items: Item list, search, pagination, add/edit/delete
//! - routes::dashboard: Invoice and expense overview
//! - routes::settings: Configuration display
//! - routes::ui: Theme and sidebar actions

pub mod error;
pub mod routes;

use acctbook_config::{Config, CurrencyConfig};
use acctbook_core::{DefaultErrorLogger, ErrorLogger, ItemListView, StoreRef, UiState};
use acctbook_utils::{escape_html, format_number};
use axum::{
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: StoreRef,
    pub items: Arc<RwLock<ItemListView>>,
    pub ui: Arc<RwLock<UiState>>,
    pub config: Config,
    pub errors: Arc<dyn ErrorLogger>,
}

impl AppState {
    pub fn new(config: Config, store: StoreRef) -> Self {
        let items = ItemListView::new(store.clone(), config.pagination.page_size);
        let ui = UiState::from_config(&config.ui);
        Self {
            store,
            items: Arc::new(RwLock::new(items)),
            ui: Arc::new(RwLock::new(ui)),
            config,
            errors: Arc::new(DefaultErrorLogger),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::dashboard::{api_dashboard, page_dashboard};
    use routes::items::{
        api_item_create, api_item_delete, api_item_detail, api_item_update, api_items,
        htmx_item_delete, htmx_item_store, htmx_item_update, htmx_items_clear, htmx_items_list,
        htmx_items_page, htmx_items_search, page_item_edit, page_item_new, page_items,
    };
    use routes::settings::{api_settings, page_settings};
    use routes::ui::{ui_set_theme, ui_toggle_sidebar};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/items", get(api_items).post(api_item_create))
        .route(
            "/api/items/:id",
            get(api_item_detail).put(api_item_update).delete(api_item_delete),
        )
        .route("/api/settings", get(api_settings))
        .route("/api/dashboard", get(api_dashboard))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/dashboard", get(page_dashboard))
        .route("/items", get(page_items).post(htmx_item_store))
        .route("/items/new", get(page_item_new))
        .route("/items/:id/edit", get(page_item_edit))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/items/list", get(htmx_items_list))
        .route("/items/search", post(htmx_items_search))
        .route("/items/clear", post(htmx_items_clear))
        .route("/items/page/:n", get(htmx_items_page))
        .route("/items/:id", post(htmx_item_update).delete(htmx_item_delete))
        // UI state
        .route("/ui/theme/:theme", post(ui_set_theme))
        .route("/ui/sidebar/toggle", post(ui_toggle_sidebar))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str, ui: &UiState) -> String {
    let html_class = ui
        .html_class()
        .map(|c| format!(" class='{}'", c))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en"{}>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Acctbook</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>tailwind.config = {{ darkMode: 'class' }}</script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900 dark:bg-gray-900 dark:text-gray-100">
    {}
</body>
</html>"#,
        html_class,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/dashboard", "Dashboard", "📊"),
        ("/items", "Items", "📦"),
    ];

    let mut nav = String::from(
        "<div class='bg-white dark:bg-gray-800 border-r dark:border-gray-700 h-screen flex flex-col'>\
         <div class='p-4 border-b dark:border-gray-700'><a href='/' class='text-xl font-bold text-indigo-600'>Acctbook</a></div>\
         <ul class='flex-1 py-2 space-y-1 px-2'>",
    );

    for (path, label, icon) in &links {
        let active_class = if current_path.starts_with(path) {
            "bg-indigo-50 text-indigo-600 dark:bg-gray-700"
        } else {
            "text-gray-600 dark:text-gray-300 hover:bg-gray-50 dark:hover:bg-gray-700"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul><div class='p-2 border-t dark:border-gray-700 space-y-1'>");
    for (theme, label) in [("dark", "Dark Theme"), ("light", "Light Theme")] {
        nav.push_str(&format!(
            r#"<button hx-post='/ui/theme/{}' class='w-full text-left px-3 py-2 rounded-lg text-sm text-gray-600 dark:text-gray-300 hover:bg-gray-50 dark:hover:bg-gray-700'>{}</button>"#,
            theme, label
        ));
    }
    nav.push_str("</div></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(
    headers: &axum::http::HeaderMap,
    title: &str,
    current_path: &str,
    inner_content: &str,
    ui: &UiState,
) -> String {
    if is_htmx_request(headers) {
        return format!(
            "<main class='flex-1 overflow-auto p-6'>{}</main>",
            inner_content
        );
    }

    let aside_class = if ui.sidebar_open { "w-64 flex-shrink-0" } else { "hidden" };
    base_html(
        title,
        &format!(
            r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside id='sidebar' class='{}'>{}</aside>
        <div class='flex-1 flex flex-col overflow-hidden'>
            <header class='flex items-center gap-2 px-6 py-3 border-b bg-white dark:bg-gray-800 dark:border-gray-700'>
                <button hx-post='/ui/sidebar/toggle' title='Toggle sidebar' class='px-2 py-1 rounded hover:bg-gray-100 dark:hover:bg-gray-700'>☰</button>
                <span class='font-medium'>{}</span>
            </header>
            <main class='flex-1 overflow-auto p-6'>{}</main>
        </div>
    </div>
</div>"#,
            aside_class,
            nav_sidebar(current_path),
            escape_html(title),
            inner_content
        ),
        ui,
    )
}

/// Success or error banner
pub fn render_notice(success: bool, message: &str) -> String {
    let (box_class, mark) = if success {
        ("bg-green-50 border-green-200 text-green-800", "✓")
    } else {
        ("bg-red-50 border-red-200 text-red-800", "✗")
    };
    format!(
        r#"<div class='border rounded-lg p-3 mb-4 flex items-center gap-2 {}' role='status'><span>{}</span><span>{}</span></div>"#,
        box_class,
        mark,
        escape_html(message)
    )
}

/// Amount with currency symbol, fixed decimals and thousands separators
pub fn format_money(amount: Decimal, currency: &CurrencyConfig) -> String {
    let places = currency.decimal_places as usize;
    let rounded = amount.round_dp(currency.decimal_places);
    let digits = format_number(format!("{:.*}", places, rounded.abs()));
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", currency.symbol, digits)
    } else {
        format!("{}{}", currency.symbol, digits)
    }
}

/// Landing page
async fn index_page(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let ui = *state.ui.read().await;
    let inner_content = r#"<div class='max-w-2xl mx-auto mt-16 text-center'>
            <h2 class='text-3xl font-bold mb-4'>Welcome to Accounting Application</h2>
            <p class='text-gray-500 dark:text-gray-400 mb-8'>Manage the products and services you bill for.</p>
            <div class='flex justify-center gap-3'>
                <a href='/dashboard' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Dashboard</a>
                <a href='/items' class='px-4 py-2 border rounded-lg hover:bg-gray-100 dark:hover:bg-gray-800'>Items</a>
            </div>
        </div>"#;
    axum::response::Html(page_response(&headers, "Home", "/", inner_content, &ui))
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until the process is stopped
/// or ctrl-c is received.
pub async fn start_server(config: Config, store: StoreRef) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState::new(config, store);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Acctbook server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /dashboard (Invoices and expenses)");
    log::info!("  - /items (Item management)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctbook_core::{AccountCategory, Item, ItemType, MemoryItemStore, NewItem};
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode};
    use tower::ServiceExt;

    fn item(id: i64, description: &str, item_type: ItemType, price: i64) -> Item {
        Item::from_new(
            id,
            NewItem {
                description: description.to_string(),
                account: AccountCategory::Sales,
                price: Decimal::from(price),
                discount: None,
                tax: None,
                item_type,
            },
        )
    }

    fn seven_items() -> Vec<Item> {
        vec![
            item(1, "Consulting Fee", ItemType::Service, 100),
            item(2, "Widget A", ItemType::Good, 50),
            item(3, "Widget B", ItemType::Good, 75),
            item(4, "Support Plan", ItemType::Service, 300),
            item(5, "Cable", ItemType::Good, 12),
            item(6, "Training Day", ItemType::Service, 800),
            item(7, "Installation", ItemType::Service, 150),
        ]
    }

    fn test_state() -> (AppState, Arc<MemoryItemStore>) {
        let store = Arc::new(MemoryItemStore::with_items(seven_items()));
        let mut config = Config::default();
        config.store.api_key = "secret-anon-key-1234".to_string();
        (AppState::new(config, store.clone()), store)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn htmx(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("hx-request", "true")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_format_money() {
        let currency = CurrencyConfig::default();
        assert_eq!(format_money(Decimal::new(175049, 2), &currency), "€1,750.49");
        assert_eq!(format_money(Decimal::from(100), &currency), "€100.00");
        assert_eq!(format_money(Decimal::new(-55, 1), &currency), "-€5.50");
        assert_eq!(format_money(Decimal::ZERO, &currency), "€0.00");
    }

    #[test]
    fn test_page_response_partial_vs_full() {
        let ui = UiState::default();
        let mut headers = HeaderMap::new();
        let full = page_response(&headers, "Items", "/items", "<p>body</p>", &ui);
        assert!(full.starts_with("<!DOCTYPE html>"));
        assert!(full.contains("id='sidebar'"));

        headers.insert("hx-request", "true".parse().unwrap());
        let partial = page_response(&headers, "Items", "/items", "<p>body</p>", &ui);
        assert!(!partial.contains("<!DOCTYPE html>"));
        assert!(partial.contains("<p>body</p>"));
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let (state, _) = test_state();
        let app = create_router(state);
        let (status, _, body) = send(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let (_, _, body) = send(&app, get("/")).await;
        assert!(body.contains("Welcome to Accounting Application"));
    }

    #[tokio::test]
    async fn test_items_page_loads_first_page() {
        let (state, _) = test_state();
        let app = create_router(state);
        let (status, _, body) = send(&app, get("/items")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Showing 1 to 5 of 7 entries"));
        assert!(body.contains("Consulting Fee"));
        assert!(!body.contains("Training Day"));
    }

    #[tokio::test]
    async fn test_search_page_and_clear() {
        let (state, _) = test_state();
        let app = create_router(state);
        send(&app, get("/items")).await;

        let (_, _, body) = send(&app, htmx("POST", "/items/search", "q=widget")).await;
        assert!(body.contains("Widget A"));
        assert!(body.contains("Widget B"));
        assert!(!body.contains("Consulting Fee"));
        assert!(body.contains("Showing 1 to 2 of 2 entries"));

        let (_, _, body) = send(&app, htmx("POST", "/items/clear", "")).await;
        assert!(body.contains("Showing 1 to 5 of 7 entries"));

        let (_, _, body) = send(&app, htmx("GET", "/items/page/2", "")).await;
        assert!(body.contains("Showing 6 to 7 of 7 entries"));
        assert!(body.contains("Training Day"));

        let (_, _, body) = send(&app, htmx("POST", "/items/search", "q=nothing")).await;
        assert!(body.contains("No items found"));
    }

    #[tokio::test]
    async fn test_delete_from_list() {
        let (state, store) = test_state();
        let app = create_router(state);
        send(&app, get("/items")).await;

        let (_, _, body) = send(&app, htmx("DELETE", "/items/2", "")).await;
        assert!(body.contains("Item deleted successfully"));
        assert!(body.contains("Showing 1 to 5 of 6 entries"));
        assert_eq!(store.len(), 6);

        let (_, _, body) = send(&app, htmx("DELETE", "/items/42", "")).await;
        assert!(body.contains("Failed to delete item"));
        assert_eq!(store.len(), 6);
    }

    #[tokio::test]
    async fn test_create_item_via_form() {
        let (state, store) = test_state();
        let app = create_router(state);
        let form = "description=Design+Work&account=sales&price=250&discount=&tax=VAT19&type=service";
        let (status, headers, _) = send(&app, htmx("POST", "/items", form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["hx-redirect"], "/items?notice=created");
        assert_eq!(store.len(), 8);

        let (_, _, body) = send(&app, get("/items?notice=created")).await;
        assert!(body.contains("Successfully created!"));
        assert!(body.contains("of 8 entries"));
    }

    #[tokio::test]
    async fn test_create_item_validation_error() {
        let (state, store) = test_state();
        let app = create_router(state);
        let form = "description=&account=sales&price=10&type=good";
        let (status, headers, body) = send(&app, htmx("POST", "/items", form)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get("hx-redirect").is_none());
        assert!(body.contains("Description is required"));
        assert!(body.contains("id='item-form'"));
        assert_eq!(store.len(), 7);

        let request = Request::builder()
            .method("POST")
            .uri("/items")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("description=Pens&account=sales&price=abc&type=good"))
            .unwrap();
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("&#39;abc&#39; is not a number"));
    }

    #[tokio::test]
    async fn test_edit_item() {
        let (state, store) = test_state();
        let app = create_router(state);
        let (_, _, body) = send(&app, get("/items/3/edit")).await;
        assert!(body.contains("value='Widget B'"));

        let form = "description=Widget+B2&account=other&price=80&type=good";
        let request = Request::builder()
            .method("POST")
            .uri("/items/3")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let (status, headers, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/items?notice=updated");

        let updated = acctbook_core::ItemStore::fetch(store.as_ref(), 3).await.unwrap();
        assert_eq!(updated.description, "Widget B2");

        let (status, _, body) = send(&app, get("/items/99/edit")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Item not found"));
    }

    #[tokio::test]
    async fn test_json_items_api() {
        let (state, _) = test_state();
        let app = create_router(state);
        let (status, _, body) = send(&app, get("/api/items")).await;
        assert_eq!(status, StatusCode::OK);
        let page: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(page["total_count"], 7);
        assert_eq!(page["items"].as_array().unwrap().len(), 5);

        let (status, _, body) = send(&app, get("/api/items/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(err["error"]["code"], "ITEM_NOT_FOUND");

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/items/42")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_theme_and_sidebar() {
        let (state, _) = test_state();
        let ui = state.ui.clone();
        let app = create_router(state);

        let (status, headers, _) = send(&app, htmx("POST", "/ui/theme/dark", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["hx-refresh"], "true");
        assert_eq!(ui.read().await.theme, acctbook_config::Theme::Dark);
        let (_, _, body) = send(&app, get("/")).await;
        assert!(body.contains("<html lang=\"en\" class='dark'>"));

        let (status, _, _) = send(&app, htmx("POST", "/ui/theme/purple", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(&app, htmx("POST", "/ui/sidebar/toggle", "")).await;
        assert!(!ui.read().await.sidebar_open);
        let (_, _, body) = send(&app, get("/dashboard")).await;
        assert!(body.contains("id='sidebar' class='hidden'"));
    }

    #[tokio::test]
    async fn test_settings_masks_api_key() {
        let (state, _) = test_state();
        let app = create_router(state);
        let (_, _, body) = send(&app, get("/api/settings")).await;
        assert!(!body.contains("secret-anon-key-1234"));
        assert!(body.contains("1234"));

        let (_, _, body) = send(&app, get("/settings")).await;
        assert!(!body.contains("secret-anon-key-1234"));
    }
}
