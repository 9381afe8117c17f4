//! Error types for acctbook-core
//!
//! Every failure a user can trigger from the item pages maps to one
//! `CoreError` variant. None of them is fatal: repeating the action is
//! always a valid recovery.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item list has not been loaded yet
    NotLoaded,
    /// Loading the item collection failed
    FetchFailed,
    /// Deleting an item failed
    DeleteFailed,
    /// Inserting or updating an item failed
    SaveFailed,
    /// Item not found in the store
    ItemNotFound,
    /// Form input rejected
    ValidationError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::DeleteFailed => write!(f, "DELETE_FAILED"),
            ErrorCode::SaveFailed => write!(f, "SAVE_FAILED"),
            ErrorCode::ItemNotFound => write!(f, "ITEM_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Offending form field, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            field: None,
            suggestions: vec![],
        }
    }

    pub fn with_field(mut self, field: String) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref field) = self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Operation rejected, nothing changed
    Warning,
    /// External call failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for acctbook-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Item list not loaded")]
    NotLoaded,

    #[error("Failed to load items: {source}")]
    FetchFailed {
        #[source]
        source: StoreError,
    },

    #[error("Failed to delete item {id}: {source}")]
    DeleteFailed {
        id: i64,
        #[source]
        source: StoreError,
    },

    #[error("Failed to save item: {source}")]
    SaveFailed {
        #[source]
        source: StoreError,
    },

    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("{message}")]
    ValidationError { field: String, message: String },
}

impl CoreError {
    /// Shorthand for a form validation failure
    pub fn validation(field: &str, message: &str) -> Self {
        CoreError::ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::DeleteFailed { .. } => ErrorCode::DeleteFailed,
            CoreError::SaveFailed { .. } => ErrorCode::SaveFailed,
            CoreError::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Info,
            CoreError::ItemNotFound { .. } | CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::FetchFailed { .. }
            | CoreError::DeleteFailed { .. }
            | CoreError::SaveFailed { .. } => ErrorSeverity::Error,
        }
    }

    /// Message suitable for a user-facing notice
    pub fn user_message(&self) -> String {
        match self {
            CoreError::NotLoaded => "Items are still loading".to_string(),
            CoreError::FetchFailed { .. } => "Failed to load items".to_string(),
            CoreError::DeleteFailed { .. } => "Failed to delete item".to_string(),
            CoreError::SaveFailed { .. } => "Failed to save item".to_string(),
            CoreError::ItemNotFound { .. } => "Item not found".to_string(),
            CoreError::ValidationError { message, .. } => message.clone(),
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details.with_suggestion("Open the items page to load the list.".to_string())
            }
            CoreError::FetchFailed { .. } => details
                .with_suggestion("Check the store url and api key.".to_string())
                .with_suggestion("Reload the page to try again.".to_string()),
            CoreError::DeleteFailed { .. } | CoreError::SaveFailed { .. } => {
                details.with_suggestion("Repeat the action to try again.".to_string())
            }
            CoreError::ItemNotFound { id } => {
                details.with_suggestion(format!("Item {} may have been deleted.", id))
            }
            CoreError::ValidationError { field, .. } => details.with_field(field.clone()),
        }
    }
}

// ==================== Error Logging ====================

/// Context attached to logged errors
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Operation name (e.g. "items.remove")
    pub operation: String,
    pub item_id: Option<i64>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            item_id: None,
        }
    }

    pub fn with_item(mut self, id: i64) -> Self {
        self.item_id = Some(id);
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error => log::error!(
                target: "acctbook::error",
                "[{}] {} - operation: {} - item: {:?}",
                error.code(),
                error,
                context.operation,
                context.item_id
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "acctbook::error",
                "[{}] {} - operation: {} - item: {:?}",
                error.code(),
                error,
                context.operation,
                context.item_id
            ),
            ErrorSeverity::Info => log::info!(
                target: "acctbook::error",
                "[{}] {} - operation: {}",
                error.code(),
                error,
                context.operation
            ),
        }
    }
}
