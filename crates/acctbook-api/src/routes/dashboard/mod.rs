//! Dashboard routes - Invoices, money in/out and top expenses

pub mod api;
pub mod page;

pub use api::api_dashboard;
pub use page::page_dashboard;
