//! Knowledge base: save, retrieve and browse user-curated entries
//!
//! Entries live in `knowledge_base.json` under the `entries` key. Ids are
//! assigned as `existing_count + 1`; entries are never deleted, so ids stay
//! unique.

use crate::documents::{now_iso, Documents, KnowledgeEntry};
use crate::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default category for new entries
pub const DEFAULT_CATEGORY: &str = "general";

/// Outcome of a knowledge query
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// The knowledge document does not exist yet
    Empty,
    /// No entry matched
    NoMatch,
    /// Matching entries, with `last_accessed` already refreshed
    Found(Vec<KnowledgeEntry>),
}

/// Entries grouped by category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryListing {
    pub total: usize,
    /// Category → topics in insertion order, sorted by category name
    pub categories: BTreeMap<String, Vec<String>>,
}

/// Knowledge base backed by the knowledge document
#[derive(Clone)]
pub struct KnowledgeBase {
    documents: Arc<Documents>,
}

impl KnowledgeBase {
    pub fn new(documents: Arc<Documents>) -> Self {
        Self { documents }
    }

    /// Append a new entry and return it
    pub async fn save(&self, topic: &str, content: &str, category: &str) -> Result<KnowledgeEntry> {
        let now = now_iso();
        let entry = self
            .documents
            .knowledge
            .update(|entries| {
                let entry = KnowledgeEntry {
                    id: entries.len() as u64 + 1,
                    topic: topic.to_string(),
                    content: content.to_string(),
                    category: category.to_string(),
                    timestamp: now.clone(),
                    last_accessed: now,
                };
                entries.push(entry.clone());
                (entry, true)
            })
            .await?;

        tracing::info!(id = entry.id, category = %entry.category, "Saved knowledge entry");
        Ok(entry)
    }

    /// Find entries whose topic, content or category contains `query`
    /// (case-insensitive). Matches get `last_accessed` refreshed; the
    /// document is only rewritten when something matched.
    pub async fn retrieve(&self, query: &str) -> Result<Retrieval> {
        let needle = query.to_lowercase();
        let now = now_iso();

        let found = self
            .documents
            .knowledge
            .update_existing(|entries| {
                let mut matches = Vec::new();
                for entry in entries.iter_mut().filter(|e| e.matches(&needle)) {
                    entry.last_accessed = now.clone();
                    matches.push(entry.clone());
                }
                let dirty = !matches.is_empty();
                (matches, dirty)
            })
            .await?;

        Ok(match found {
            None => Retrieval::Empty,
            Some(matches) if matches.is_empty() => Retrieval::NoMatch,
            Some(matches) => Retrieval::Found(matches),
        })
    }

    /// Group entries by category; `None` when the base is empty or absent
    pub async fn list_categories(&self) -> Result<Option<CategoryListing>> {
        let entries = self.documents.knowledge.load().await?;
        if entries.is_empty() {
            return Ok(None);
        }

        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &entries {
            categories
                .entry(entry.category.clone())
                .or_default()
                .push(entry.topic.clone());
        }

        Ok(Some(CategoryListing {
            total: entries.len(),
            categories,
        }))
    }
}

/// Confirmation line for a saved entry
pub fn format_saved(entry: &KnowledgeEntry) -> String {
    format!(
        "✓ Successfully saved knowledge about '{}' in category '{}'. Entry ID: {}",
        entry.topic, entry.category, entry.id
    )
}

/// Render a query outcome
pub fn format_retrieval(query: &str, retrieval: &Retrieval) -> String {
    match retrieval {
        Retrieval::Empty => "Knowledge base is empty. Start by saving some information!".to_string(),
        Retrieval::NoMatch => format!("No knowledge found for '{}' in the knowledge base.", query),
        Retrieval::Found(matches) => {
            let mut out = format!("Found {} entries:\n\n", matches.len());
            for entry in matches {
                out.push_str(&format!("**{}** (Category: {})\n", entry.topic, entry.category));
                out.push_str(&format!("{}\n", entry.content));
                out.push_str(&format!("Saved: {}\n\n", entry.saved_on()));
            }
            out
        }
    }
}

/// Render the category overview
pub fn format_categories(listing: Option<&CategoryListing>) -> String {
    let Some(listing) = listing else {
        return "Knowledge base is empty.".to_string();
    };

    let mut out = format!("📚 Knowledge Base ({} total entries)\n\n", listing.total);
    for (category, topics) in &listing.categories {
        out.push_str(&format!(
            "**{}** ({} entries)\n",
            category.to_uppercase(),
            topics.len()
        ));
        for topic in topics {
            out.push_str(&format!("  • {}\n", topic));
        }
        out.push('\n');
    }
    out
}
