//! External item store boundary
//!
//! The application never owns item data; it reads and writes through an
//! `ItemStore`. `MemoryItemStore` keeps rows in process and backs tests
//! and the offline demo mode.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::models::{Item, NewItem};

/// Errors reported by a store implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("no item with id {id}")]
    NotFound { id: i64 },

    #[error("request failed: {message}")]
    Request { message: String },

    #[error("store returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {message}")]
    Decode { message: String },
}

/// Store reference type
pub type StoreRef = Arc<dyn ItemStore>;

/// Table-style CRUD over items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All rows, in the order the store returns them
    async fn fetch_all(&self) -> Result<Vec<Item>, StoreError>;

    async fn fetch(&self, id: i64) -> Result<Item, StoreError>;

    /// Insert a row and return it with its assigned id
    async fn insert(&self, item: NewItem) -> Result<Item, StoreError>;

    async fn update(&self, id: i64, item: NewItem) -> Result<Item, StoreError>;

    /// Delete a row. A missing id is `StoreError::NotFound`.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryData {
    items: Vec<Item>,
    next_id: i64,
}

/// In-process item store
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    data: RwLock<MemoryData>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing rows; new ids continue after the largest one
    pub fn with_items(items: Vec<Item>) -> Self {
        let next_id = items.iter().map(|i| i.id).max().unwrap_or(0);
        Self {
            data: RwLock::new(MemoryData { items, next_id }),
        }
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read().items.clone())
    }

    async fn fetch(&self, id: i64) -> Result<Item, StoreError> {
        self.read()
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn insert(&self, item: NewItem) -> Result<Item, StoreError> {
        let mut data = self.write();
        data.next_id += 1;
        let mut stored = Item::from_new(data.next_id, item);
        stored.created_at = Some(Utc::now());
        data.items.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, item: NewItem) -> Result<Item, StoreError> {
        let mut data = self.write();
        let existing = data
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound { id })?;
        let created_at = existing.created_at;
        *existing = Item::from_new(id, item);
        existing.created_at = created_at;
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut data = self.write();
        let before = data.items.len();
        data.items.retain(|i| i.id != id);
        if data.items.len() == before {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }
}
