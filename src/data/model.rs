use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Reference – "Surah:Ayat" in either of its two spellings
// ---------------------------------------------------------------------------

/// A verse reference as it appears in the reference column.
///
/// Datasets use either the numeric form (`"2:153"`) or the surah's written
/// name (`"Al-Baqarah:153"`). Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Numeric { surah: u16, ayat: u16 },
    Named { surah: String, ayat: String },
    Raw(String),
}

impl Reference {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let Some((left, right)) = s.rsplit_once(':') else {
            return Reference::Raw(s.to_string());
        };
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            return Reference::Raw(s.to_string());
        }
        // Digits (optionally signed) never name a surah, even out of range.
        let numeric_left = left
            .strip_prefix('-')
            .unwrap_or(left)
            .chars()
            .all(|c| c.is_ascii_digit());
        match (left.parse::<u16>(), right.parse::<u16>()) {
            (Ok(surah), Ok(ayat)) => Reference::Numeric { surah, ayat },
            (Err(_), _) if numeric_left => Reference::Raw(s.to_string()),
            (Err(_), _) => Reference::Named {
                surah: left.to_string(),
                ayat: right.to_string(),
            },
            // numeric surah with a non-numeric verse part, e.g. "2:153-154"
            (Ok(_), Err(_)) => Reference::Raw(s.to_string()),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Numeric { surah, ayat } => write!(f, "{surah}:{ayat}"),
            Reference::Named { surah, ayat } => write!(f, "{surah}:{ayat}"),
            Reference::Raw(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verse – one row of the sheet
// ---------------------------------------------------------------------------

/// A single annotated verse (one row of the source sheet).
///
/// Missing cells are stored as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Verse {
    pub main_category: String,
    pub topic: String,
    pub reference: Reference,
    /// Arabic text, right-to-left.
    pub arabic: String,
    /// Bangla translation.
    pub translation: String,
    /// Free-text "Sample Verses"/"Notes" column, when the sheet has one.
    pub notes: Option<String>,
}

/// True when a cell carries no usable value.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ---------------------------------------------------------------------------
// VerseDataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed dataset with its pre-computed category index.
///
/// Read-only after construction.
#[derive(Debug, Clone)]
pub struct VerseDataset {
    /// All verses, in source order.
    pub verses: Vec<Verse>,
    /// Sorted distinct non-blank main categories.
    pub main_categories: BTreeSet<String>,
    /// Where the rows came from (path or URL), for display.
    pub source: String,
}

impl VerseDataset {
    /// Build the category index from the loaded verses.
    pub fn from_verses(verses: Vec<Verse>, source: impl Into<String>) -> Self {
        let main_categories = verses
            .iter()
            .filter(|v| !is_blank(&v.main_category))
            .map(|v| v.main_category.clone())
            .collect();
        VerseDataset {
            verses,
            main_categories,
            source: source.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}
