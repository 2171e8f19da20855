use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::filter::{available_topics, filtered_indices, CategoryFilter, FilterState};
use crate::data::loader::{CachedLoader, DataSource};
use crate::data::model::{Verse, VerseDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI session state, independent of rendering.
pub struct AppState {
    /// Source and load-once cache.
    pub loader: CachedLoader,

    /// Loaded dataset (None until a load succeeds). Shared read-only.
    pub dataset: Option<Arc<VerseDataset>>,

    /// Current category/topic selections.
    pub filters: FilterState,

    /// Topics offered for the current category (cached).
    pub topic_choices: Vec<String>,

    /// Indices of verses passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Accent colour per main category.
    pub colors: CategoryColors,

    /// Load error shown instead of the card list.
    pub load_error: Option<String>,

    /// Whether the filter sidebar is shown.
    pub show_sidebar: bool,
}

impl AppState {
    pub fn new(loader: CachedLoader) -> Self {
        Self {
            loader,
            dataset: None,
            filters: FilterState::default(),
            topic_choices: Vec::new(),
            visible_indices: Vec::new(),
            colors: CategoryColors::default(),
            load_error: None,
            show_sidebar: true,
        }
    }

    /// Fetch the dataset through the cache and install it, or record the error.
    pub fn load(&mut self) {
        match self.loader.get() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.set_load_error(e.to_string()),
        }
    }

    /// Explicit user-triggered reload from the same source.
    pub fn reload(&mut self) {
        match self.loader.reload() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.set_load_error(e.to_string()),
        }
    }

    /// Switch to another source and load it.
    pub fn open(&mut self, source: DataSource) {
        self.loader.set_source(source);
        self.load();
    }

    fn set_load_error(&mut self, message: String) {
        log::error!("Failed to load {}: {message}", self.loader.source());
        self.dataset = None;
        self.topic_choices.clear();
        self.visible_indices.clear();
        self.load_error = Some(message);
    }

    /// Ingest a newly loaded dataset and start from unrestricted filters.
    pub fn set_dataset(&mut self, dataset: Arc<VerseDataset>) {
        self.colors = CategoryColors::new(&dataset.main_categories);
        self.dataset = Some(dataset);
        self.load_error = None;
        self.filters.reset();
        self.refilter();
    }

    /// Recompute the topic choices and `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.topic_choices = available_topics(ds, &self.filters.main_category);
            self.visible_indices =
                filtered_indices(ds, &self.filters.main_category, &self.filters.topics);
            log::debug!(
                "filter {} / {:?}: {} of {} verses",
                self.filters.main_category,
                self.filters.topics,
                self.visible_indices.len(),
                ds.len()
            );
        }
    }

    /// Select a main category. Selected topics that the new category does not
    /// offer are dropped so they cannot silently hide every verse.
    pub fn set_main_category(&mut self, category: CategoryFilter) {
        self.filters.set_main_category(category);
        if let Some(ds) = &self.dataset {
            self.topic_choices = available_topics(ds, &self.filters.main_category);
            let removed = self.filters.retain_topics(&self.topic_choices);
            if removed > 0 {
                log::warn!(
                    "{removed} selected topic(s) not offered under {}, deselected",
                    self.filters.main_category
                );
            }
        }
        self.refilter();
    }

    pub fn toggle_topic(&mut self, topic: &str) {
        self.filters.toggle_topic(topic);
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.refilter();
    }

    /// Verses currently shown, in source order.
    pub fn visible_verses(&self) -> impl Iterator<Item = &Verse> + '_ {
        let verses = self.dataset.as_deref().map(|ds| ds.verses.as_slice()).unwrap_or(&[]);
        self.visible_indices.iter().filter_map(move |&i| verses.get(i))
    }
}
