//! Core item handling for acctbook
//!
//! - models / types: item records, form parsing and validation
//! - store: the external item store boundary and an in-memory store
//! - view: the searchable, paginated item list view-model
//! - dashboard: dashboard figures
//! - ui: theme and sidebar state

pub mod dashboard;
pub mod error;
pub mod models;
pub mod store;
pub mod types;
pub mod ui;
pub mod view;

pub use dashboard::DashboardData;
pub use error::{CoreError, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorLogger, ErrorSeverity};
pub use models::{Item, ItemForm, NewItem};
pub use store::{ItemStore, MemoryItemStore, StoreError, StoreRef};
pub use types::{AccountCategory, ItemType, TaxBracket};
pub use ui::UiState;
pub use view::{ItemListView, ItemPage, LoadState, DEFAULT_PAGE_SIZE};
