//! catalog.rs — read-only views over one ingest result, as the site pages use them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ingest::types::{Category, QuizRecord};

/// Records shown in the home page's featured row.
pub const FEATURED_COUNT: usize = 2;
/// Max related items under a quiz.
pub const RELATED_LIMIT: usize = 3;

/// An immutable ingest snapshot, newest first.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<QuizRecord>,
    fetched_at_unix: u64,
}

impl Catalog {
    pub fn new(records: Vec<QuizRecord>, fetched_at_unix: u64) -> Self {
        Self {
            records,
            fetched_at_unix,
        }
    }

    pub fn records(&self) -> &[QuizRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 0 until the first successful ingest.
    pub fn fetched_at_unix(&self) -> u64 {
        self.fetched_at_unix
    }

    pub fn by_category(&self, category: Category) -> Vec<&QuizRecord> {
        by_category(&self.records, category)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&QuizRecord> {
        find_by_id(&self.records, id)
    }

    pub fn related(&self, record: &QuizRecord) -> Vec<&QuizRecord> {
        related(&self.records, record, RELATED_LIMIT)
    }

    pub fn featured_split(&self) -> (&[QuizRecord], &[QuizRecord]) {
        featured_split(&self.records)
    }

    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        category_counts(&self.records)
    }
}

pub fn by_category(records: &[QuizRecord], category: Category) -> Vec<&QuizRecord> {
    records.iter().filter(|r| r.category == category).collect()
}

pub fn find_by_id<'a>(records: &'a [QuizRecord], id: &str) -> Option<&'a QuizRecord> {
    records.iter().find(|r| r.id == id)
}

/// Same category, not `record` itself, newest first, at most `limit`.
pub fn related<'a>(records: &'a [QuizRecord], record: &QuizRecord, limit: usize) -> Vec<&'a QuizRecord> {
    let mut out: Vec<&QuizRecord> = records
        .iter()
        .filter(|r| r.category == record.category && r.id != record.id)
        .collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out.truncate(limit);
    out
}

/// Home page layout: the first two records are featured, the rest go in the grid.
pub fn featured_split(records: &[QuizRecord]) -> (&[QuizRecord], &[QuizRecord]) {
    records.split_at(FEATURED_COUNT.min(records.len()))
}

/// Per-category record counts in navigation order (zero counts included).
pub fn category_counts(records: &[QuizRecord]) -> Vec<(Category, usize)> {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.category).or_default() += 1;
    }
    Category::ALL
        .into_iter()
        .map(|c| (c, counts.get(&c).copied().unwrap_or(0)))
        .collect()
}

/// Shared, swappable catalog. Readers clone the `Arc` and never block a refresh
/// for longer than the pointer swap.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    inner: Arc<RwLock<Arc<Catalog>>>,
}

impl Snapshot {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn current(&self) -> Arc<Catalog> {
        match self.inner.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the catalog. An empty result never replaces a non-empty one,
    /// so a total upstream outage keeps serving the last good data.
    /// Returns whether the swap happened.
    pub fn replace(&self, catalog: Catalog) -> bool {
        let mut g = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if catalog.is_empty() && !g.is_empty() {
            return false;
        }
        *g = Arc::new(catalog);
        true
    }
}
