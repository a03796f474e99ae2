//! Persisted record types

use serde::{Deserialize, Serialize};

/// Local ISO-8601 timestamp with microseconds and no offset
pub fn now_iso() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// One knowledge base entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: u64,
    pub topic: String,
    pub content: String,
    pub category: String,
    pub timestamp: String,
    pub last_accessed: String,
}

impl KnowledgeEntry {
    /// Case-insensitive substring match on topic, content or category.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.topic.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }

    /// Creation date (`YYYY-MM-DD`)
    pub fn saved_on(&self) -> String {
        self.timestamp.chars().take(10).collect()
    }
}

/// A single generated flashcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: usize,
    pub question: String,
    pub answer: String,
}

/// A generated flashcard deck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardDeck {
    pub topic: String,
    pub cards: Vec<Flashcard>,
    pub created: String,
    pub total_cards: usize,
}

/// A rendered mind map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapRecord {
    pub topic: String,
    pub created: String,
    pub structure: String,
}

/// An idea journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub seed: String,
    pub expanded: String,
    pub created: String,
    pub status: String,
}

/// A rendered learning roadmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapRecord {
    pub skill: String,
    pub level: String,
    pub created: String,
    pub roadmap: String,
}

/// A saved vocabulary word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub word: String,
    pub definition: String,
    pub added: String,
}

/// Record counts reported by the stats endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub knowledge_entries: usize,
    pub flashcard_decks: usize,
    pub mindmaps: usize,
    pub ideas: usize,
    pub vocabulary_words: usize,
}
