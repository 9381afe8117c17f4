//! Item routes - Item list, search, pagination, add/edit/delete
//!
//! Features:
//! - Searchable, paginated item list backed by `ItemListView`
//! - Add and edit forms with validation
//! - Delete from the list's actions column
//! - HTMX partial page updates
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_item_create,
    api_item_delete,
    api_item_detail,
    api_item_update,
    api_items,
    htmx_item_delete,
    htmx_item_store,
    htmx_item_update,
    htmx_items_clear,
    htmx_items_list,
    htmx_items_page,
    htmx_items_search,
};

pub use page::{page_item_edit, page_item_new, page_items};
