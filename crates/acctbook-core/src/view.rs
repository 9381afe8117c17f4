//! Item list view-model
//!
//! Holds the last fetched item collection, a client-side search filter over
//! it and the current page. The store is queried once per `load()`; search,
//! clear and paging work on the cached copy.

use serde::Serialize;

use crate::error::CoreError;
use crate::models::Item;
use crate::store::StoreRef;

/// Items per page on the list
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Load lifecycle of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Loaded,
    LoadFailed,
}

/// Number of pages needed for `len` items, never less than one
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    ((len + page_size - 1) / page_size).max(1)
}

/// Items of the 1-based `page`, clamped to the bounds of `items`
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Items matching `query` case-insensitively, in their original order
pub fn filter_items(items: &[Item], query: &str) -> Vec<Item> {
    if query.is_empty() {
        return items.to_vec();
    }
    let query_lower = query.to_lowercase();
    items.iter().filter(|i| i.matches(&query_lower)).cloned().collect()
}

/// Searchable, paginated view over the store's items
pub struct ItemListView {
    store: StoreRef,
    full_set: Vec<Item>,
    filtered_set: Vec<Item>,
    query: String,
    page: usize,
    page_size: usize,
    state: LoadState,
}

impl ItemListView {
    pub fn new(store: StoreRef, page_size: usize) -> Self {
        Self {
            store,
            full_set: Vec::new(),
            filtered_set: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            state: LoadState::Loading,
        }
    }

    /// Fetch every item from the store.
    ///
    /// On failure the previous collection is kept and the state becomes
    /// `LoadFailed`. Returns the number of items fetched.
    pub async fn load(&mut self) -> Result<usize, CoreError> {
        match self.store.fetch_all().await {
            Ok(items) => {
                log::debug!("Loaded {} items", items.len());
                self.full_set = items;
                self.filtered_set = self.full_set.clone();
                self.query.clear();
                self.page = 1;
                self.state = LoadState::Loaded;
                Ok(self.full_set.len())
            }
            Err(source) => {
                self.state = LoadState::LoadFailed;
                Err(CoreError::FetchFailed { source })
            }
        }
    }

    /// Filter the cached items by `query` and go back to page 1.
    /// Returns the number of matches.
    pub fn search(&mut self, query: &str) -> Result<usize, CoreError> {
        self.ensure_loaded()?;
        self.query = query.to_string();
        self.filtered_set = filter_items(&self.full_set, &self.query);
        self.page = 1;
        Ok(self.filtered_set.len())
    }

    /// Drop the filter and go back to page 1
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.ensure_loaded()?;
        self.query.clear();
        self.filtered_set = self.full_set.clone();
        self.page = 1;
        Ok(())
    }

    /// Move to page `n`. Out-of-range pages leave the view untouched and
    /// return `false`.
    pub fn go_to_page(&mut self, n: usize) -> Result<bool, CoreError> {
        self.ensure_loaded()?;
        if n < 1 || n > self.total_pages() {
            return Ok(false);
        }
        self.page = n;
        Ok(true)
    }

    /// Delete an item from the store, then drop it from the local sets.
    ///
    /// Local state only changes after the store confirms the delete. The
    /// page is pulled back if it now points past the last page.
    pub async fn remove(&mut self, id: i64) -> Result<(), CoreError> {
        self.ensure_loaded()?;
        self.store
            .delete(id)
            .await
            .map_err(|source| CoreError::DeleteFailed { id, source })?;

        self.full_set.retain(|i| i.id != id);
        self.filtered_set.retain(|i| i.id != id);
        self.page = self.page.min(self.total_pages());
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), CoreError> {
        match self.state {
            LoadState::Loaded => Ok(()),
            _ => Err(CoreError::NotLoaded),
        }
    }

    // ==================== Derived State ====================

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn full_set(&self) -> &[Item] {
        &self.full_set
    }

    pub fn filtered_set(&self) -> &[Item] {
        &self.filtered_set
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_set.len(), self.page_size)
    }

    /// Items shown on the current page
    pub fn visible_slice(&self) -> &[Item] {
        page_slice(&self.filtered_set, self.page, self.page_size)
    }

    /// 1-based positions of the first and last visible item, and the
    /// filtered total. `(0, 0, 0)` when nothing matches.
    pub fn showing_range(&self) -> (usize, usize, usize) {
        let total = self.filtered_set.len();
        let visible = self.visible_slice().len();
        if visible == 0 {
            return (0, 0, total);
        }
        let first = (self.page - 1) * self.page_size + 1;
        (first, first + visible - 1, total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Serializable snapshot of the current page
    pub fn snapshot(&self) -> ItemPage {
        ItemPage {
            state: self.state,
            query: self.query.clone(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages(),
            total_count: self.filtered_set.len(),
            items: self.visible_slice().to_vec(),
        }
    }
}

/// Current page of the list, for the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub state: LoadState,
    pub query: String,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub items: Vec<Item>,
}
