use std::collections::BTreeSet;
use std::fmt;

use super::model::{is_blank, Verse, VerseDataset};

// ---------------------------------------------------------------------------
// Filter predicate: one main category, any number of topics
// ---------------------------------------------------------------------------

/// Single-select main category restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum CategoryFilter {
    /// No restriction.
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, verse: &Verse) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => verse.main_category == *c,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

/// A verse passes the topic filter when nothing is selected or its topic is
/// one of the selected values.
fn topic_matches(topics: &BTreeSet<String>, verse: &Verse) -> bool {
    topics.is_empty() || topics.contains(&verse.topic)
}

/// The user's current selections. Owned by the UI session; the functions in
/// this module only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub main_category: CategoryFilter,
    /// Selected topics. Empty means "no restriction".
    pub topics: BTreeSet<String>,
}

impl FilterState {
    pub fn is_unrestricted(&self) -> bool {
        self.main_category == CategoryFilter::All && self.topics.is_empty()
    }

    /// Change the category. Topic selections are left as they are; callers
    /// that want them narrowed use [`FilterState::retain_topics`].
    pub fn set_main_category(&mut self, category: CategoryFilter) {
        self.main_category = category;
    }

    pub fn toggle_topic(&mut self, topic: &str) {
        if !self.topics.remove(topic) {
            self.topics.insert(topic.to_string());
        }
    }

    /// Drop selected topics not in `offered`. Returns how many were removed.
    pub fn retain_topics(&mut self, offered: &[String]) -> usize {
        let before = self.topics.len();
        self.topics.retain(|t| offered.binary_search(t).is_ok());
        before - self.topics.len()
    }

    /// Back to "All" and no topics.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }
}

// ---------------------------------------------------------------------------
// Choices offered to the user
// ---------------------------------------------------------------------------

/// Distinct non-blank main categories, ascending.
pub fn available_main_categories(dataset: &VerseDataset) -> Vec<String> {
    dataset.main_categories.iter().cloned().collect()
}

/// `All` followed by every main category, in the order the selector shows them.
pub fn category_choices(dataset: &VerseDataset) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(available_main_categories(dataset).into_iter().map(CategoryFilter::Only))
        .collect()
}

/// Distinct non-blank topics among verses passing the category restriction,
/// ascending. Narrowing the category only ever removes topics.
pub fn available_topics(dataset: &VerseDataset, category: &CategoryFilter) -> Vec<String> {
    dataset
        .verses
        .iter()
        .filter(|v| category.matches(v) && !is_blank(&v.topic))
        .map(|v| v.topic.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Applying the filter
// ---------------------------------------------------------------------------

/// Return indices of verses that pass both restrictions, in source order.
pub fn filtered_indices(
    dataset: &VerseDataset,
    category: &CategoryFilter,
    topics: &BTreeSet<String>,
) -> Vec<usize> {
    dataset
        .verses
        .iter()
        .enumerate()
        .filter(|(_, v)| category.matches(v) && topic_matches(topics, v))
        .map(|(i, _)| i)
        .collect()
}

/// The matching verses themselves, in source order.
pub fn apply<'a>(
    dataset: &'a VerseDataset,
    category: &CategoryFilter,
    topics: &BTreeSet<String>,
) -> Vec<&'a Verse> {
    filtered_indices(dataset, category, topics)
        .into_iter()
        .map(|i| &dataset.verses[i])
        .collect()
}
