//! Read-only registry of loaded categories

use std::collections::HashMap;

use super::loader::{CatalogError, parse_bank};
use super::model::{Category, Level};

/// All question content for the process lifetime
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    /// In load order
    categories: Vec<Category>,
    by_id: HashMap<String, usize>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category; a later category with the same id replaces the earlier one
    pub fn insert(&mut self, category: Category) {
        match self.by_id.get(&category.id) {
            Some(&slot) => self.categories[slot] = category,
            None => {
                self.by_id.insert(category.id.clone(), self.categories.len());
                self.categories.push(category);
            }
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.insert(category);
        self
    }

    /// Build from bank documents, skipping (and logging) malformed ones
    pub fn from_json_banks<'a, I>(banks: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut catalog = Self::new();
        for (i, json) in banks.into_iter().enumerate() {
            match parse_bank(json) {
                Ok(category) => catalog.insert(category),
                Err(e) => log::warn!("Skipping question bank #{}: {}", i, e),
            }
        }
        log::info!("Loaded {} categories (levels aware)", catalog.len());
        catalog
    }

    /// Strict variant: the first malformed bank fails the whole load
    pub fn try_from_json_banks<'a, I>(banks: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut catalog = Self::new();
        for json in banks {
            catalog.insert(parse_bank(json)?);
        }
        Ok(catalog)
    }

    /// Load every `*.json` bank in a directory (sorted by file name)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_dir(dir: &std::path::Path) -> std::io::Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in &paths {
            docs.push(std::fs::read_to_string(path)?);
        }
        Ok(Self::from_json_banks(docs.iter().map(String::as_str)))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.by_id.get(id).map(|&i| &self.categories[i])
    }

    pub fn level(&self, category_id: &str, level_index: u32) -> Option<&Level> {
        self.category(category_id)?.level(level_index)
    }

    /// Sum of questions across all levels; 0 for an unknown category
    pub fn total_question_count(&self, category_id: &str) -> usize {
        self.category(category_id)
            .map(Category::total_questions)
            .unwrap_or(0)
    }

    /// Level count; 0 for an unknown category
    pub fn level_count(&self, category_id: &str) -> u32 {
        self.category(category_id)
            .map(Category::level_count)
            .unwrap_or(0)
    }

    pub fn level_has_content(&self, category_id: &str, level_index: u32) -> bool {
        self.category(category_id)
            .is_some_and(|c| c.level_has_content(level_index))
    }
}
