//! Route modules for the API server
//!
//! - items: Item list, search, pagination, add/edit/delete
//! - dashboard: Invoice and expense overview
//! - settings: Settings page
//! - ui: Theme and sidebar actions
//!
//! Each area module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints and HTMX partials
//! - page.rs: HTMX page rendering

pub mod dashboard;
pub mod items;
pub mod settings;
pub mod ui;
