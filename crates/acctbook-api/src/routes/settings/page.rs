//! Settings page rendering - Full page endpoints

use crate::AppState;
use acctbook_utils::escape_html;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;
    let ui = *state.ui.read().await;

    let store_url = if config.store.url.is_empty() { "-" } else { config.store.url.as_str() };
    let api_key = if config.store.api_key.is_empty() {
        "Not set".to_string()
    } else {
        config.store.masked_api_key()
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Item Store</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Backend</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Table</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>URL</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>API Key</p><p class='font-medium font-mono'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Timeout</p><p class='font-medium'>{}s</p></div>
            </div>
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Display</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Items per page</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Theme</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Currency</p><p class='font-medium'>{} ({} decimals)</p></div>
            </div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        config.store.backend,
        escape_html(&config.store.table),
        escape_html(store_url),
        escape_html(&api_key),
        config.store.timeout_secs,
        config.pagination.page_size,
        ui.theme,
        escape_html(&config.currency.symbol),
        config.currency.decimal_places
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content, &ui))
}
