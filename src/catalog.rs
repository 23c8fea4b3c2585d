//! Term catalog capability.
//!
//! Term records live in the host's taxonomy store. The core never talks to
//! that store directly; it asks a [`TermCatalog`] for terms and gets back a
//! [`Lookup`], which distinguishes "not loaded yet" from "loaded and empty".

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::taxonomy::{IdHasher, Taxonomy, TermId, TermRecord};

/// Result of asking the catalog for something that may still be loading.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Lookup<T> {
    Pending,
    Ready(T),
}

impl<T> Lookup<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Lookup::Pending)
    }
    pub fn ready(self) -> Option<T> {
        match self {
            Lookup::Pending => None,
            Lookup::Ready(value) => Some(value),
        }
    }
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Pending => Lookup::Pending,
            Lookup::Ready(value) => Lookup::Ready(f(value)),
        }
    }
}

/// Filter criteria understood by a catalog.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TermQuery {
    All,
    Include(Vec<TermId>),
    ChildrenOf(TermId),
}

pub trait TermCatalog {
    fn fetch(&self, taxonomy: &Taxonomy, query: &TermQuery) -> Lookup<Vec<TermRecord>>;
}

/// Catalog held in memory, keyed by taxonomy. Taxonomies can be flagged as
/// still loading, in which case every fetch against them is pending.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    kept: HashMap<Taxonomy, Vec<TermRecord>, IdHasher>,
    loading: HashSet<Taxonomy, IdHasher>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
    /// Reads `{"<taxonomy>": [TermRecord, ...], ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<TermRecord>> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for (slug, terms) in parsed {
            catalog.keep(Taxonomy::from(slug), terms);
        }
        Ok(catalog)
    }
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        debug!(path=%path.display(), taxonomies=catalog.kept.len(), "catalog loaded");
        Ok(catalog)
    }
    pub fn keep(&mut self, taxonomy: Taxonomy, terms: Vec<TermRecord>) {
        self.loading.remove(&taxonomy);
        self.kept.insert(taxonomy, terms);
    }
    pub fn mark_loading(&mut self, taxonomy: Taxonomy) {
        self.loading.insert(taxonomy);
    }
    pub fn terms(&self, taxonomy: &Taxonomy) -> &[TermRecord] {
        self.kept.get(taxonomy).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl TermCatalog for MemoryCatalog {
    fn fetch(&self, taxonomy: &Taxonomy, query: &TermQuery) -> Lookup<Vec<TermRecord>> {
        if self.loading.contains(taxonomy) {
            return Lookup::Pending;
        }
        let terms = self.terms(taxonomy).iter();
        let found = match query {
            TermQuery::All => terms.cloned().collect(),
            TermQuery::Include(ids) => terms.filter(|t| ids.contains(&t.id)).cloned().collect(),
            TermQuery::ChildrenOf(parent) => terms
                .filter(|t| t.parent_id == Some(*parent))
                .cloned()
                .collect(),
        };
        Lookup::Ready(found)
    }
}
