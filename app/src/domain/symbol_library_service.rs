//! Service owning the user-created symbol and category collections.
//!
//! Both collections live in memory, persist as JSON arrays under the
//! `customSymbols` / `customCategories` keys, and flush through the same
//! debounce discipline as display settings. Deletion is immediate and
//! irreversible (no soft delete). Categories are never edited or deleted;
//! a symbol whose `category_id` matches no known category simply renders
//! as uncategorized.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::commands::symbols::{AddSymbolCommand, SymbolSection, UpdateSymbolCommand};
use crate::domain::debounce::{Debouncer, DEFAULT_FLUSH_DELAY};
use crate::domain::models::{
    CategoryItem, CategoryValidationError, SymbolItem, SymbolValidationError,
};
use crate::domain::notice::{Notice, NoticeHub, NoticeKind};
use crate::storage::{keys, SettingsStore};

/// Section label for symbols without a (known) category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

#[derive(Default)]
struct Library {
    symbols: Vec<SymbolItem>,
    categories: Vec<CategoryItem>,
}

/// Service for the custom symbol/category library.
#[derive(Clone)]
pub struct SymbolLibraryService {
    store: Arc<dyn SettingsStore>,
    library: Arc<Mutex<Library>>,
    loaded: Arc<AtomicBool>,
    symbols_debouncer: Arc<Debouncer>,
    categories_debouncer: Arc<Debouncer>,
    notices: Arc<NoticeHub>,
}

impl SymbolLibraryService {
    /// Create a new service with the production flush delay.
    pub fn new(store: Arc<dyn SettingsStore>, notices: Arc<NoticeHub>) -> Self {
        Self::with_flush_delay(store, notices, DEFAULT_FLUSH_DELAY)
    }

    /// Create a new service with a custom flush delay (for testing).
    pub fn with_flush_delay(
        store: Arc<dyn SettingsStore>,
        notices: Arc<NoticeHub>,
        flush_delay: Duration,
    ) -> Self {
        Self {
            store,
            library: Arc::new(Mutex::new(Library::default())),
            loaded: Arc::new(AtomicBool::new(false)),
            symbols_debouncer: Arc::new(Debouncer::new(flush_delay)),
            categories_debouncer: Arc::new(Debouncer::new(flush_delay)),
            notices,
        }
    }

    /// Hydrate both collections from the durable store. A corrupt array
    /// heals to empty (logged, never fatal).
    pub async fn load(&self) {
        let symbols = self
            .load_array::<SymbolItem>(keys::CUSTOM_SYMBOLS)
            .await;
        let categories = self
            .load_array::<CategoryItem>(keys::CUSTOM_CATEGORIES)
            .await;

        {
            let mut library = self.library.lock().unwrap();
            library.symbols = symbols;
            library.categories = categories;
        }
        self.loaded.store(true, Ordering::SeqCst);
        info!("Symbol library loaded");
    }

    async fn load_array<T: serde::de::DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.store.read(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Stored '{}' array is corrupt, starting empty: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored '{}', starting empty: {:#}", key, e);
                Vec::new()
            }
        }
    }

    /// Add a symbol from the add-symbol form. The id is generated here;
    /// uniqueness comes from the generation scheme.
    pub fn add_symbol(&self, command: AddSymbolCommand) -> Result<SymbolItem> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(SymbolValidationError::EmptyName.into());
        }

        let symbol = SymbolItem {
            id: SymbolItem::generate_id(Utc::now().timestamp_millis()),
            name,
            image_uri: command.image_uri,
            category_id: command.category_id,
        };
        self.library.lock().unwrap().symbols.push(symbol.clone());
        self.schedule_symbols_flush();
        Ok(symbol)
    }

    /// Edit an existing symbol. Returns the updated symbol, or an error if
    /// the id is unknown or the new name is empty.
    pub fn update_symbol(&self, symbol_id: &str, command: UpdateSymbolCommand) -> Result<SymbolItem> {
        if let Some(name) = &command.name {
            if name.trim().is_empty() {
                return Err(SymbolValidationError::EmptyName.into());
            }
        }

        let updated = {
            let mut library = self.library.lock().unwrap();
            let Some(symbol) = library.symbols.iter_mut().find(|s| s.id == symbol_id) else {
                anyhow::bail!("No symbol with id '{}'", symbol_id);
            };
            if let Some(name) = command.name {
                symbol.name = name.trim().to_string();
            }
            if let Some(image_uri) = command.image_uri {
                symbol.image_uri = image_uri;
            }
            if let Some(category_id) = command.category_id {
                symbol.category_id = category_id;
            }
            symbol.clone()
        };

        self.schedule_symbols_flush();
        Ok(updated)
    }

    /// Remove a symbol. Immediate and irreversible; returns whether the id
    /// existed.
    pub fn delete_symbol(&self, symbol_id: &str) -> bool {
        let removed = {
            let mut library = self.library.lock().unwrap();
            let before = library.symbols.len();
            library.symbols.retain(|s| s.id != symbol_id);
            library.symbols.len() != before
        };

        if removed {
            self.schedule_symbols_flush();
        }
        removed
    }

    /// Create a category from the inline add-category flow.
    ///
    /// Rejects empty/whitespace-only names and case-insensitive duplicates
    /// before any state changes.
    pub fn add_category(&self, name: &str) -> Result<CategoryItem> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName.into());
        }

        let category = {
            let mut library = self.library.lock().unwrap();
            let lowered = name.to_lowercase();
            if library
                .categories
                .iter()
                .any(|c| c.name.to_lowercase() == lowered)
            {
                return Err(CategoryValidationError::DuplicateName.into());
            }

            let category = CategoryItem {
                id: CategoryItem::generate_id(Utc::now().timestamp_millis()),
                name,
            };
            library.categories.push(category.clone());
            category
        };

        self.schedule_categories_flush();
        Ok(category)
    }

    pub fn symbols(&self) -> Vec<SymbolItem> {
        self.library.lock().unwrap().symbols.clone()
    }

    pub fn categories(&self) -> Vec<CategoryItem> {
        self.library.lock().unwrap().categories.clone()
    }

    /// Derive the display grouping.
    ///
    /// Symbols partition by `category_id`, with unknown or missing ids
    /// falling into "Uncategorized". That group renders first when it has
    /// members, or stands alone as an empty placeholder when no categories
    /// exist yet. Named sections follow in alphabetical category order;
    /// symbols inside every section sort alphabetically by name.
    pub fn grouped_sections(&self) -> Vec<SymbolSection> {
        let library = self.library.lock().unwrap();

        let mut uncategorized: Vec<SymbolItem> = Vec::new();
        let mut by_category: BTreeMap<String, Vec<SymbolItem>> = BTreeMap::new();
        for symbol in &library.symbols {
            let known_category = symbol
                .category_id
                .as_ref()
                .filter(|id| library.categories.iter().any(|c| &c.id == *id));
            match known_category {
                Some(id) => by_category.entry(id.clone()).or_default().push(symbol.clone()),
                None => uncategorized.push(symbol.clone()),
            }
        }

        let mut sections = Vec::new();
        if !uncategorized.is_empty() || library.categories.is_empty() {
            sort_symbols(&mut uncategorized);
            sections.push(SymbolSection {
                category_id: None,
                label: UNCATEGORIZED_LABEL.to_string(),
                symbols: uncategorized,
            });
        }

        let mut ordered_categories: Vec<&CategoryItem> = library.categories.iter().collect();
        ordered_categories.sort_by_key(|c| c.name.to_lowercase());
        for category in ordered_categories {
            let mut symbols = by_category.remove(&category.id).unwrap_or_default();
            sort_symbols(&mut symbols);
            sections.push(SymbolSection {
                category_id: Some(category.id.clone()),
                label: category.name.clone(),
                symbols,
            });
        }

        sections
    }

    /// Cancel pending timers and flush both collections right now.
    pub async fn flush_now(&self) {
        self.symbols_debouncer.cancel();
        self.categories_debouncer.cancel();
        Self::flush_symbols(self.store.clone(), self.library.clone(), self.notices.clone()).await;
        Self::flush_categories(self.store.clone(), self.library.clone(), self.notices.clone())
            .await;
    }

    fn schedule_symbols_flush(&self) {
        if !self.guard_loaded() {
            return;
        }
        self.symbols_debouncer.schedule(Self::flush_symbols(
            self.store.clone(),
            self.library.clone(),
            self.notices.clone(),
        ));
    }

    fn schedule_categories_flush(&self) {
        if !self.guard_loaded() {
            return;
        }
        self.categories_debouncer.schedule(Self::flush_categories(
            self.store.clone(),
            self.library.clone(),
            self.notices.clone(),
        ));
    }

    fn guard_loaded(&self) -> bool {
        let loaded = self.loaded.load(Ordering::SeqCst);
        if !loaded {
            log::debug!("Library mutation before initial load; flush deferred");
        }
        loaded
    }

    async fn flush_symbols(
        store: Arc<dyn SettingsStore>,
        library: Arc<Mutex<Library>>,
        notices: Arc<NoticeHub>,
    ) {
        let json = {
            let library = library.lock().unwrap();
            serde_json::to_string(&library.symbols).unwrap_or_else(|_| "[]".to_string())
        };
        if let Err(e) = store.write(keys::CUSTOM_SYMBOLS, &json).await {
            log::error!("Failed to persist custom symbols: {:#}", e);
            notices.post(Notice::new(
                NoticeKind::SaveFailed,
                "Could not save your symbols",
            ));
        }
    }

    async fn flush_categories(
        store: Arc<dyn SettingsStore>,
        library: Arc<Mutex<Library>>,
        notices: Arc<NoticeHub>,
    ) {
        let json = {
            let library = library.lock().unwrap();
            serde_json::to_string(&library.categories).unwrap_or_else(|_| "[]".to_string())
        };
        if let Err(e) = store.write(keys::CUSTOM_CATEGORIES, &json).await {
            log::error!("Failed to persist custom categories: {:#}", e);
            notices.post(Notice::new(
                NoticeKind::SaveFailed,
                "Could not save your categories",
            ));
        }
    }
}

fn sort_symbols(symbols: &mut [SymbolItem]) {
    symbols.sort_by_key(|s| s.name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const TEST_DELAY: Duration = Duration::from_millis(40);
    const SETTLE: Duration = Duration::from_millis(200);

    async fn setup_test() -> (MemoryStore, SymbolLibraryService) {
        let store = MemoryStore::new();
        let service = SymbolLibraryService::with_flush_delay(
            Arc::new(store.clone()),
            Arc::new(NoticeHub::new()),
            TEST_DELAY,
        );
        service.load().await;
        (store, service)
    }

    fn add(service: &SymbolLibraryService, name: &str, category_id: Option<&str>) -> SymbolItem {
        service
            .add_symbol(AddSymbolCommand {
                name: name.to_string(),
                image_uri: None,
                category_id: category_id.map(str::to_string),
            })
            .expect("Failed to add symbol")
    }

    #[tokio::test]
    async fn test_add_symbol_rejects_empty_name() {
        let (_store, service) = setup_test().await;

        let result = service.add_symbol(AddSymbolCommand {
            name: "   ".to_string(),
            image_uri: None,
            category_id: None,
        });
        assert!(result.is_err());
        assert!(service.symbols().is_empty());
    }

    #[tokio::test]
    async fn test_category_uniqueness_is_case_insensitive() {
        let (_store, service) = setup_test().await;
        service.add_category("food").unwrap();

        let duplicate = service.add_category("Food");
        assert!(duplicate.is_err());
        assert_eq!(service.categories().len(), 1);
    }

    #[tokio::test]
    async fn test_category_rejects_empty_name() {
        let (_store, service) = setup_test().await;
        assert!(service.add_category("  ").is_err());
    }

    #[tokio::test]
    async fn test_grouping_partitions_and_sorts() {
        let (_store, service) = setup_test().await;
        let animals = service.add_category("Animals").unwrap();
        let food = service.add_category("food").unwrap();

        add(&service, "zebra", Some(&animals.id));
        add(&service, "Apple", Some(&food.id));
        add(&service, "water", None);
        add(&service, "ant", Some(&animals.id));
        add(&service, "Ball", None);

        let sections = service.grouped_sections();
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].label, UNCATEGORIZED_LABEL);
        let names: Vec<&str> = sections[0].symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ball", "water"]);

        // Categories alphabetical, case-insensitive: Animals then food
        assert_eq!(sections[1].label, "Animals");
        let names: Vec<&str> = sections[1].symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ant", "zebra"]);
        assert_eq!(sections[2].label, "food");
    }

    #[tokio::test]
    async fn test_grouping_shows_placeholder_when_no_categories() {
        let (_store, service) = setup_test().await;

        let sections = service.grouped_sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, UNCATEGORIZED_LABEL);
        assert!(sections[0].symbols.is_empty());
    }

    #[tokio::test]
    async fn test_grouping_omits_empty_uncategorized_when_categories_exist() {
        let (_store, service) = setup_test().await;
        let animals = service.add_category("Animals").unwrap();
        add(&service, "cat", Some(&animals.id));

        let sections = service.grouped_sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, "Animals");
    }

    #[tokio::test]
    async fn test_orphaned_category_id_renders_as_uncategorized() {
        let (_store, service) = setup_test().await;
        service.add_category("Animals").unwrap();
        add(&service, "ghost", Some("cat_404_deadbeef"));

        let sections = service.grouped_sections();
        assert_eq!(sections[0].label, UNCATEGORIZED_LABEL);
        assert_eq!(sections[0].symbols[0].name, "ghost");
    }

    #[tokio::test]
    async fn test_delete_symbol_is_immediate_and_persisted() {
        let (store, service) = setup_test().await;
        let symbol = add(&service, "water", None);
        tokio::time::sleep(SETTLE).await;

        assert!(service.delete_symbol(&symbol.id));
        assert!(service.symbols().is_empty());
        assert!(!service.delete_symbol(&symbol.id));

        tokio::time::sleep(SETTLE).await;
        let stored = store.read(keys::CUSTOM_SYMBOLS).await.unwrap().unwrap();
        assert_eq!(stored, "[]");
    }

    #[tokio::test]
    async fn test_rapid_adds_debounce_into_one_write() {
        let (store, service) = setup_test().await;
        for name in ["a", "b", "c", "d"] {
            add(&service, name, None);
        }
        tokio::time::sleep(SETTLE).await;

        assert_eq!(store.write_count(keys::CUSTOM_SYMBOLS), 1);
        let stored = store.read(keys::CUSTOM_SYMBOLS).await.unwrap().unwrap();
        let items: Vec<SymbolItem> = serde_json::from_str(&stored).unwrap();
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_update_symbol_moves_category() {
        let (_store, service) = setup_test().await;
        let animals = service.add_category("Animals").unwrap();
        let symbol = add(&service, "cat", Some(&animals.id));

        let updated = service
            .update_symbol(
                &symbol.id,
                UpdateSymbolCommand {
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category_id, None);
    }

    #[tokio::test]
    async fn test_corrupt_stored_arrays_heal_to_empty() {
        let store = MemoryStore::new();
        store.seed(keys::CUSTOM_SYMBOLS, "{not an array");
        store.seed(keys::CUSTOM_CATEGORIES, "42");

        let service = SymbolLibraryService::with_flush_delay(
            Arc::new(store),
            Arc::new(NoticeHub::new()),
            TEST_DELAY,
        );
        service.load().await;

        assert!(service.symbols().is_empty());
        assert!(service.categories().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let (store, service) = setup_test().await;
        let food = service.add_category("Food").unwrap();
        add(&service, "Apple", Some(&food.id));
        service.flush_now().await;

        let reloaded = SymbolLibraryService::with_flush_delay(
            Arc::new(store),
            Arc::new(NoticeHub::new()),
            TEST_DELAY,
        );
        reloaded.load().await;
        assert_eq!(reloaded.symbols(), service.symbols());
        assert_eq!(reloaded.categories(), service.categories());
    }
}
