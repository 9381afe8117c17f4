//! Items page rendering - Full page endpoints
//!
//! Endpoints:
//! - page_items: Item list page, loads the list on every visit
//! - page_item_new: Empty add form
//! - page_item_edit: Edit form pre-filled from the store
//!
//! Helper functions:
//! - render_items_panel: List panel swapped by every HTMX list action
//! - render_item_form: Add/edit form with an optional error banner

use crate::{page_response, render_notice, AppState};
use acctbook_config::CurrencyConfig;
use acctbook_core::{
    AccountCategory, CoreError, ErrorContext, ItemForm, ItemListView, ItemType, LoadState,
    StoreError, TaxBracket,
};
use acctbook_utils::escape_html;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::collections::HashMap;

/// Items page - header, search, table and pagination
pub async fn page_items(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let ui = *state.ui.read().await;
    let mut view = state.items.write().await;
    if let Err(e) = view.load().await {
        state.errors.log_error(&e, &ErrorContext::new("items.load"));
    }

    let notice = match params.get("notice").map(String::as_str) {
        Some("created") => Some((true, "Successfully created!")),
        Some("updated") => Some((true, "Successfully updated!")),
        _ => None,
    };

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Items</h2>
            <a href='/items/new' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700 flex items-center gap-2'>
                <svg xmlns='http://www.w3.org/2000/svg' class='h-5 w-5' fill='none' viewBox='0 0 24 24' stroke='currentColor'>
                    <path stroke-linecap='round' stroke-linejoin='round' stroke-width='2' d='M12 4v16m8-8H4'/>
                </svg>
                Add New Item
            </a>
        </div>
        {}"#,
        render_items_panel(&view, &state.config.currency, notice)
    );

    Html(page_response(&headers, "Items", "/items", &inner_content, &ui))
}

/// Add item page
pub async fn page_item_new(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> Html<String> {
    let ui = *state.ui.read().await;
    let inner_content = form_page("Add New Item", &render_item_form("/items", &ItemForm::default(), None));
    Html(page_response(&headers, "Add New Item", "/items", &inner_content, &ui))
}

/// Edit item page - a failed fetch shows a not-found message
pub async fn page_item_edit(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let ui = *state.ui.read().await;
    match state.store.fetch(id).await {
        Ok(item) => {
            let action = format!("/items/{}", id);
            let inner_content =
                form_page("Edit Item", &render_item_form(&action, &ItemForm::from_item(&item), None));
            Html(page_response(&headers, "Edit Item", "/items", &inner_content, &ui)).into_response()
        }
        Err(source) => {
            let error = match source {
                StoreError::NotFound { id } => CoreError::ItemNotFound { id },
                source => CoreError::FetchFailed { source },
            };
            state
                .errors
                .log_error(&error, &ErrorContext::new("items.edit").with_item(id));
            let inner_content = format!(
                r#"<div class='max-w-xl'>
                {}
                <a href='/items' class='text-indigo-600 hover:underline'>Back to items</a>
            </div>"#,
                render_notice(false, &error.user_message())
            );
            (
                StatusCode::NOT_FOUND,
                Html(page_response(&headers, "Edit Item", "/items", &inner_content, &ui)),
            )
                .into_response()
        }
    }
}

pub(crate) fn form_page(title: &str, form_html: &str) -> String {
    format!(
        r#"<div class='max-w-2xl'>
            <h2 class='text-2xl font-bold mb-4'>{}</h2>
            {}
        </div>"#,
        escape_html(title),
        form_html
    )
}

/// List panel: notice, search box, table and footer
pub fn render_items_panel(
    view: &ItemListView,
    currency: &CurrencyConfig,
    notice: Option<(bool, &str)>,
) -> String {
    let notice_html = notice
        .map(|(success, message)| render_notice(success, message))
        .unwrap_or_default();

    let body = match view.state() {
        LoadState::Loading => {
            "<div class='p-6 text-center text-gray-500'>Loading...</div>".to_string()
        }
        LoadState::LoadFailed => r#"<div class='p-6 text-center'>
                <p class='text-red-600 mb-3'>Failed to load items</p>
                <button hx-get='/items/list?reload=1' hx-target='#items-panel' hx-swap='outerHTML'
                    class='px-4 py-2 border rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700'>Retry</button>
            </div>"#
            .to_string(),
        LoadState::Loaded => format!(
            "{}{}{}",
            search_form(view.query()),
            items_table(view, currency),
            pagination_footer(view)
        ),
    };

    format!(
        "<div id='items-panel' class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-4'>{}{}</div>",
        notice_html, body
    )
}

fn search_form(query: &str) -> String {
    format!(
        r#"<form hx-post='/items/search' hx-target='#items-panel' hx-swap='outerHTML' class='flex gap-2 mb-4'>
            <input type='text' name='q' value='{}' placeholder='Search items...'
                class='flex-1 px-4 py-2 border rounded-lg dark:bg-gray-900 dark:border-gray-700'>
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Search</button>
            <button type='button' hx-post='/items/clear' hx-target='#items-panel' hx-swap='outerHTML'
                class='px-4 py-2 border rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700'>Clear</button>
        </form>"#,
        escape_html(query)
    )
}

fn items_table(view: &ItemListView, currency: &CurrencyConfig) -> String {
    let visible = view.visible_slice();
    if visible.is_empty() {
        return "<div class='p-6 text-center text-gray-500'>No items found</div>".to_string();
    }

    let rows: Vec<String> = visible
        .iter()
        .map(|item| {
            format!(
                r#"<tr class='border-b dark:border-gray-700'>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2 text-right font-mono'>{}</td>
                    <td class='px-4 py-2 text-right space-x-2'>
                        <a href='/items/{}/edit' class='text-indigo-600 hover:underline'>Edit</a>
                        <button hx-delete='/items/{}' hx-confirm='Delete this item?' hx-target='#items-panel' hx-swap='outerHTML'
                            class='text-red-600 hover:underline'>Delete</button>
                    </td>
                </tr>"#,
                escape_html(&item.description),
                item.item_type.label(),
                escape_html(&format!("{}{}", currency.symbol, item.price_text())),
                item.id,
                item.id
            )
        })
        .collect();

    format!(
        r#"<table class='w-full text-sm'>
            <thead>
                <tr class='border-b dark:border-gray-700 text-left text-gray-500'>
                    <th class='px-4 py-2'>Description</th>
                    <th class='px-4 py-2'>Type</th>
                    <th class='px-4 py-2 text-right'>Price</th>
                    <th class='px-4 py-2 text-right'>Actions</th>
                </tr>
            </thead>
            <tbody>{}</tbody>
        </table>"#,
        rows.join("")
    )
}

fn pagination_footer(view: &ItemListView) -> String {
    let (first, last, total) = view.showing_range();
    let page = view.page();

    let button = |target: usize, label: String, enabled: bool, current: bool| {
        let class = if current {
            "bg-indigo-600 text-white"
        } else if enabled {
            "border hover:bg-gray-100 dark:hover:bg-gray-700"
        } else {
            "border opacity-50 cursor-not-allowed"
        };
        format!(
            r#"<button hx-get='/items/page/{}' hx-target='#items-panel' hx-swap='outerHTML' class='px-3 py-1 rounded {}'{}>{}</button>"#,
            target,
            class,
            if enabled { "" } else { " disabled" },
            label
        )
    };

    let mut buttons = vec![button(
        page.saturating_sub(1).max(1),
        "Previous".to_string(),
        view.has_previous(),
        false,
    )];
    for n in 1..=view.total_pages() {
        buttons.push(button(n, n.to_string(), true, n == page));
    }
    buttons.push(button(
        (page + 1).min(view.total_pages()),
        "Next".to_string(),
        view.has_next(),
        false,
    ));

    format!(
        r#"<div class='flex items-center justify-between mt-4 text-sm'>
            <span class='text-gray-500'>Showing {} to {} of {} entries</span>
            <div class='flex gap-1'>{}</div>
        </div>"#,
        first,
        last,
        total,
        buttons.join("")
    )
}

/// Add/edit form. `action` is both the plain form action and the HTMX target.
pub fn render_item_form(action: &str, form: &ItemForm, error: Option<&str>) -> String {
    let error_html = error.map(|e| render_notice(false, e)).unwrap_or_default();

    let account_options: String = AccountCategory::ALL
        .iter()
        .map(|a| option(&a.to_string(), a.label(), form.account == a.to_string()))
        .collect();
    let tax_options: String = TaxBracket::ALL
        .iter()
        .map(|t| {
            let label = format!("{} ({}%)", t.label(), t.rate());
            option(&t.to_string(), &label, form.tax == t.to_string())
        })
        .collect();
    let type_radios: String = ItemType::ALL
        .iter()
        .map(|t| {
            format!(
                r#"<label class='flex items-center gap-2'><input type='radio' name='type' value='{}'{}> {}</label>"#,
                t,
                if form.item_type == t.to_string() { " checked" } else { "" },
                t.label()
            )
        })
        .collect();

    let input_class = "w-full px-3 py-2 border rounded-lg dark:bg-gray-900 dark:border-gray-700";
    format!(
        r#"<div id='item-form' class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6'>
            {error}
            <form method='post' action='{action}' hx-post='{action}' hx-target='#item-form' hx-swap='outerHTML' class='space-y-4'>
                <div class='flex gap-6'>{type_radios}</div>
                <div>
                    <label class='block text-sm font-medium mb-1'>Description</label>
                    <input type='text' name='description' value='{description}' required class='{input_class}'>
                </div>
                <div>
                    <label class='block text-sm font-medium mb-1'>Account</label>
                    <select name='account' required class='{input_class}'>
                        <option value=''>Select an account</option>
                        <optgroup label='Revenue'>{account_options}</optgroup>
                    </select>
                </div>
                <div class='grid grid-cols-2 gap-4'>
                    <div>
                        <label class='block text-sm font-medium mb-1'>Price</label>
                        <input type='number' step='0.01' min='0' name='price' value='{price}' required class='{input_class}'>
                    </div>
                    <div>
                        <label class='block text-sm font-medium mb-1'>Discount</label>
                        <input type='number' step='0.01' min='0' name='discount' value='{discount}' class='{input_class}'>
                    </div>
                </div>
                <div>
                    <label class='block text-sm font-medium mb-1'>Tax</label>
                    <select name='tax' class='{input_class}'>
                        <option value=''>No tax</option>
                        {tax_options}
                    </select>
                </div>
                <div class='flex gap-2 justify-end'>
                    <a href='/items' class='px-4 py-2 border rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700'>Cancel</a>
                    <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
                </div>
            </form>
        </div>"#,
        error = error_html,
        action = escape_html(action),
        type_radios = type_radios,
        description = escape_html(&form.description),
        input_class = input_class,
        account_options = account_options,
        price = escape_html(&form.price),
        discount = escape_html(&form.discount),
        tax_options = tax_options,
    )
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        "<option value='{}'{}>{}</option>",
        value,
        if selected { " selected" } else { "" },
        escape_html(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctbook_core::{Item, MemoryItemStore};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_panel_states() {
        let currency = CurrencyConfig::default();
        let mut view = ItemListView::new(Arc::new(MemoryItemStore::new()), 5);
        assert!(render_items_panel(&view, &currency, None).contains("Loading..."));

        view.load().await.unwrap();
        let html = render_items_panel(&view, &currency, Some((true, "Item deleted successfully")));
        assert!(html.contains("No items found"));
        assert!(html.contains("Item deleted successfully"));
        assert!(html.contains("Showing 0 to 0 of 0 entries"));
        // a single page: both neighbours disabled
        assert_eq!(html.matches(" disabled>").count(), 2);
    }

    #[tokio::test]
    async fn test_price_cell_matches_search_text() {
        let currency = CurrencyConfig::default();
        let store = MemoryItemStore::with_items(vec![Item {
            id: 1,
            description: "Annual License".to_string(),
            item_type: ItemType::Service,
            price: Decimal::new(17505, 1),
            account: None,
            discount: None,
            tax: None,
            created_at: None,
        }]);
        let mut view = ItemListView::new(Arc::new(store), 5);
        view.load().await.unwrap();

        let html = render_items_panel(&view, &currency, None);
        assert!(html.contains("€1750.5</td>"));
        assert_eq!(view.search("1750.5").unwrap(), 1);
    }

    #[test]
    fn test_form_prefill_and_escaping() {
        let form = ItemForm {
            description: "Tom's <b>".to_string(),
            account: "gain".to_string(),
            price: "12.5".to_string(),
            discount: String::new(),
            tax: "VAT9".to_string(),
            item_type: "good".to_string(),
        };
        let html = render_item_form("/items/4", &form, Some("Failed to update item."));
        assert!(html.contains("value='Tom&#39;s &lt;b&gt;'"));
        assert!(html.contains("<option value='gain' selected>"));
        assert!(html.contains("<option value='VAT9' selected>VAT 9 (9%)</option>"));
        assert!(html.contains("<option value='VAT19'>VAT 19 (19%)</option>"));
        assert!(html.contains("value='good' checked"));
        assert!(html.contains("Failed to update item."));
        assert!(html.contains("hx-post='/items/4'"));
    }

    #[test]
    fn test_new_form_defaults_to_service() {
        let html = render_item_form("/items", &ItemForm::default(), None);
        assert!(html.contains("value='service' checked"));
        assert!(!html.contains("value='good' checked"));
    }
}
