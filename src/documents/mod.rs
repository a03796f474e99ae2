//! JSON document persistence
//!
//! Every generated artifact and the knowledge base live in their own
//! whole-file JSON document under the configured data directory.

pub mod store;
pub mod types;

pub use store::JsonDocument;
pub use types::*;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// The set of documents kept under one data directory
pub struct Documents {
    data_dir: PathBuf,
    pub knowledge: JsonDocument<KnowledgeEntry>,
    pub flashcards: JsonDocument<FlashcardDeck>,
    pub mindmaps: JsonDocument<MindMapRecord>,
    pub ideas: JsonDocument<IdeaRecord>,
    pub roadmaps: JsonDocument<RoadmapRecord>,
    pub vocabulary: JsonDocument<VocabularyWord>,
}

impl Documents {
    /// Open handles for every document in `data_dir` (files are created lazily)
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            knowledge: JsonDocument::new(&data_dir, "knowledge_base.json", "entries"),
            flashcards: JsonDocument::new(&data_dir, "flashcards.json", "decks"),
            mindmaps: JsonDocument::new(&data_dir, "mindmaps.json", "maps"),
            ideas: JsonDocument::new(&data_dir, "ideas_journal.json", "ideas"),
            roadmaps: JsonDocument::new(&data_dir, "learning_roadmaps.json", "roadmaps"),
            vocabulary: JsonDocument::new(&data_dir, "vocabulary_list.json", "words"),
            data_dir,
        }
    }

    /// Data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Count records across the five reported documents
    pub async fn stats(&self) -> Result<DocumentStats> {
        let (knowledge, flashcards, mindmaps, ideas, vocabulary) = futures::try_join!(
            self.knowledge.count(),
            self.flashcards.count(),
            self.mindmaps.count(),
            self.ideas.count(),
            self.vocabulary.count(),
        )?;

        Ok(DocumentStats {
            knowledge_entries: knowledge,
            flashcard_decks: flashcards,
            mindmaps,
            ideas,
            vocabulary_words: vocabulary,
        })
    }
}
