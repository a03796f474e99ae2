//! Tool set exposed to the agent
//!
//! Every tool takes JSON arguments and returns human-readable text. Tool
//! failures never propagate: they are rendered into the returned string so
//! the agent can relay them.

pub mod calculator;
pub mod generators;
pub mod lookup;
pub mod summarizer;
pub mod templates;
pub mod text;

use crate::config::LookupConfig;
use crate::documents::Documents;
use crate::error::Result;
use crate::knowledge::{self, KnowledgeBase, DEFAULT_CATEGORY};
pub use generators::Generators;
pub use lookup::LookupClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Name, description and JSON-schema parameters of one tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the argument object
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    fn new(name: &str, description: &str, parameters: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

// =============================================================================
// Tool arguments
// =============================================================================

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
fn default_action() -> String {
    "define".to_string()
}
fn default_content_type() -> String {
    "text".to_string()
}
fn default_summary_length() -> String {
    "medium".to_string()
}
fn default_num_cards() -> usize {
    5
}
fn default_level() -> String {
    "beginner".to_string()
}
fn default_num_quotes() -> usize {
    5
}
fn default_problem_type() -> String {
    "general".to_string()
}
fn default_source_type() -> String {
    "website".to_string()
}
fn default_author() -> String {
    "Unknown Author".to_string()
}
fn default_title() -> String {
    "Untitled".to_string()
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SaveKnowledgeArgs {
    topic: String,
    content: String,
    #[serde(default = "default_category")]
    category: String,
}

#[derive(Debug, Deserialize)]
struct CalculateArgs {
    expression: String,
}

#[derive(Debug, Deserialize)]
struct VocabularyArgs {
    word: String,
    #[serde(default = "default_action")]
    action: String,
}

#[derive(Debug, Deserialize)]
struct SummarizeArgs {
    content: String,
    #[serde(default = "default_content_type")]
    content_type: String,
    #[serde(default = "default_summary_length")]
    summary_length: String,
}

#[derive(Debug, Deserialize)]
struct MindMapArgs {
    topic: String,
    notes: String,
}

#[derive(Debug, Deserialize)]
struct TranslateArgs {
    text: String,
    target_language: String,
}

#[derive(Debug, Deserialize)]
struct IdeaArgs {
    seed_idea: String,
}

#[derive(Debug, Deserialize)]
struct FlashcardArgs {
    topic: String,
    content: String,
    #[serde(default = "default_num_cards")]
    num_cards: usize,
}

#[derive(Debug, Deserialize)]
struct RoadmapArgs {
    skill: String,
    #[serde(default = "default_level")]
    current_level: String,
}

#[derive(Debug, Deserialize)]
struct QuoteArgs {
    topic: String,
    #[serde(default = "default_num_quotes")]
    num_quotes: usize,
}

#[derive(Debug, Deserialize)]
struct SolverArgs {
    problem: String,
    #[serde(default = "default_problem_type")]
    problem_type: String,
}

#[derive(Debug, Deserialize)]
struct CitationArgs {
    #[serde(default = "default_source_type")]
    source_type: String,
    #[serde(default = "default_author")]
    author: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    url: String,
}

/// Decode tool arguments. A `null` argument value counts as `{}`.
fn parse_args<T: DeserializeOwned>(
    name: &str,
    args: &serde_json::Value,
) -> std::result::Result<T, String> {
    let value = if args.is_null() { json!({}) } else { args.clone() };
    serde_json::from_value(value).map_err(|e| format!("Invalid arguments for {}: {}", name, e))
}

// =============================================================================
// ToolSet
// =============================================================================

/// The agent's tools, bound to the document stores and lookup client
#[derive(Clone)]
pub struct ToolSet {
    knowledge: KnowledgeBase,
    generators: Generators,
    lookup: LookupClient,
}

impl ToolSet {
    /// Build the tool set over `documents`
    pub fn new(documents: Arc<Documents>, lookup: &LookupConfig) -> Result<Self> {
        Ok(Self {
            knowledge: KnowledgeBase::new(documents.clone()),
            generators: Generators::new(documents.clone()),
            lookup: LookupClient::new(lookup.clone(), documents)?,
        })
    }

    /// Descriptors for every tool, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        definitions()
    }

    /// Run tool `name` with JSON `args`
    pub async fn execute(&self, name: &str, args: &serde_json::Value) -> String {
        tracing::debug!(tool = name, "Executing tool");
        match self.dispatch(name, args).await {
            Ok(output) => output,
            Err(message) => {
                tracing::warn!(tool = name, "Tool call rejected: {}", message);
                message
            }
        }
    }

    async fn dispatch(
        &self,
        name: &str,
        args: &serde_json::Value,
    ) -> std::result::Result<String, String> {
        let output = match name {
            "search_wikipedia" => {
                let a: QueryArgs = parse_args(name, args)?;
                self.lookup.search_wikipedia(&a.query).await
            }
            "save_knowledge" => {
                let a: SaveKnowledgeArgs = parse_args(name, args)?;
                match self.knowledge.save(&a.topic, &a.content, &a.category).await {
                    Ok(entry) => knowledge::format_saved(&entry),
                    Err(e) => format!("Error saving knowledge: {}", e),
                }
            }
            "retrieve_knowledge" => {
                let a: QueryArgs = parse_args(name, args)?;
                match self.knowledge.retrieve(&a.query).await {
                    Ok(found) => knowledge::format_retrieval(&a.query, &found),
                    Err(e) => format!("Error retrieving knowledge: {}", e),
                }
            }
            "list_knowledge_categories" => match self.knowledge.list_categories().await {
                Ok(listing) => knowledge::format_categories(listing.as_ref()),
                Err(e) => format!("Error listing knowledge: {}", e),
            },
            "calculate" => {
                let a: CalculateArgs = parse_args(name, args)?;
                calculator::calculate(&a.expression)
            }
            "get_current_time" => templates::current_time(),
            "vocabulary_builder" => {
                let a: VocabularyArgs = parse_args(name, args)?;
                self.lookup.vocabulary(&a.word, &a.action).await
            }
            "universal_summarizer" => {
                let a: SummarizeArgs = parse_args(name, args)?;
                summarizer::summarize(&a.content, &a.content_type, &a.summary_length)
            }
            "create_mindmap" => {
                let a: MindMapArgs = parse_args(name, args)?;
                self.generators.mindmap(&a.topic, &a.notes).await
            }
            "translate_text" => {
                let a: TranslateArgs = parse_args(name, args)?;
                self.lookup.translate(&a.text, &a.target_language).await
            }
            "idea_expander" => {
                let a: IdeaArgs = parse_args(name, args)?;
                self.generators.expand_idea(&a.seed_idea).await
            }
            "create_flashcards" => {
                let a: FlashcardArgs = parse_args(name, args)?;
                self.generators
                    .flashcards(&a.topic, &a.content, a.num_cards)
                    .await
            }
            "learning_roadmap" => {
                let a: RoadmapArgs = parse_args(name, args)?;
                self.generators.roadmap(&a.skill, &a.current_level).await
            }
            "find_quotes" => {
                let a: QuoteArgs = parse_args(name, args)?;
                templates::find_quotes(&a.topic, a.num_quotes)
            }
            "step_by_step_solver" => {
                let a: SolverArgs = parse_args(name, args)?;
                templates::step_by_step(&a.problem, &a.problem_type)
            }
            "citation_generator" => {
                let a: CitationArgs = parse_args(name, args)?;
                templates::citation(&templates::CitationSource {
                    source_type: &a.source_type,
                    author: &a.author,
                    title: &a.title,
                    year: &a.year,
                    url: &a.url,
                })
            }
            other => return Err(format!("Unknown tool: {}", other)),
        };
        Ok(output)
    }
}

fn string_param(description: &str) -> serde_json::Value {
    json!({"type": "string", "description": description})
}

/// Descriptors for the built-in tools
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "search_wikipedia",
            "Search Wikipedia for information on a topic with citation and source link.",
            json!({
                "type": "object",
                "properties": {"query": string_param("Topic to look up")},
                "required": ["query"]
            }),
        ),
        ToolDefinition::new(
            "save_knowledge",
            "Save information to the knowledge base with timestamp.",
            json!({
                "type": "object",
                "properties": {
                    "topic": string_param("Short topic name"),
                    "content": string_param("Information to remember"),
                    "category": {"type": "string", "description": "Category name", "default": DEFAULT_CATEGORY}
                },
                "required": ["topic", "content"]
            }),
        ),
        ToolDefinition::new(
            "retrieve_knowledge",
            "Search and retrieve information from the knowledge base.",
            json!({
                "type": "object",
                "properties": {"query": string_param("Case-insensitive text matched against topic, content and category")},
                "required": ["query"]
            }),
        ),
        ToolDefinition::new(
            "list_knowledge_categories",
            "List all categories and topics in the knowledge base.",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDefinition::new(
            "calculate",
            "Perform mathematical calculations safely.",
            json!({
                "type": "object",
                "properties": {"expression": string_param("Arithmetic expression, e.g. sqrt(16) + 2**3")},
                "required": ["expression"]
            }),
        ),
        ToolDefinition::new(
            "get_current_time",
            "Get the current date and time.",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDefinition::new(
            "vocabulary_builder",
            "Build vocabulary: define words, find synonyms, get usage examples.",
            json!({
                "type": "object",
                "properties": {
                    "word": string_param("English word"),
                    "action": {"type": "string", "enum": ["define", "save"], "default": "define",
                               "description": "'save' also adds the word to the vocabulary list"}
                },
                "required": ["word"]
            }),
        ),
        ToolDefinition::new(
            "universal_summarizer",
            "Universal summarizer for text, books, videos, articles, and documents.",
            json!({
                "type": "object",
                "properties": {
                    "content": string_param("Text, book title or video URL"),
                    "content_type": {"type": "string", "default": "text",
                                     "description": "text, book, video or youtube"},
                    "summary_length": {"type": "string", "enum": ["short", "medium", "long"], "default": "medium"}
                },
                "required": ["content"]
            }),
        ),
        ToolDefinition::new(
            "create_mindmap",
            "Convert notes into a visual mind map structure (text-based tree).",
            json!({
                "type": "object",
                "properties": {
                    "topic": string_param("Central topic"),
                    "notes": string_param("Notes, one concept per line")
                },
                "required": ["topic", "notes"]
            }),
        ),
        ToolDefinition::new(
            "translate_text",
            "Translate text to another language using LibreTranslate API.",
            json!({
                "type": "object",
                "properties": {
                    "text": string_param("English text"),
                    "target_language": string_param("ISO 639-1 code such as es, fr, de, hi, zh")
                },
                "required": ["text", "target_language"]
            }),
        ),
        ToolDefinition::new(
            "idea_expander",
            "Take a seed idea and expand it with questions, perspectives, and action steps.",
            json!({
                "type": "object",
                "properties": {"seed_idea": string_param("The idea to expand")},
                "required": ["seed_idea"]
            }),
        ),
        ToolDefinition::new(
            "create_flashcards",
            "Generate study flashcards from notes or content.",
            json!({
                "type": "object",
                "properties": {
                    "topic": string_param("Deck topic"),
                    "content": string_param("Notes to turn into cards"),
                    "num_cards": {"type": "integer", "minimum": 0, "default": 5}
                },
                "required": ["topic", "content"]
            }),
        ),
        ToolDefinition::new(
            "learning_roadmap",
            "Create a comprehensive learning path/roadmap for any skill.",
            json!({
                "type": "object",
                "properties": {
                    "skill": string_param("Skill to learn"),
                    "current_level": {"type": "string", "default": "beginner"}
                },
                "required": ["skill"]
            }),
        ),
        ToolDefinition::new(
            "find_quotes",
            "Find inspirational and relevant quotes on any topic.",
            json!({
                "type": "object",
                "properties": {
                    "topic": string_param("Quote topic"),
                    "num_quotes": {"type": "integer", "minimum": 0, "default": 5}
                },
                "required": ["topic"]
            }),
        ),
        ToolDefinition::new(
            "step_by_step_solver",
            "Solve problems step-by-step with detailed explanations.",
            json!({
                "type": "object",
                "properties": {
                    "problem": string_param("Problem statement"),
                    "problem_type": {"type": "string", "default": "general",
                                     "description": "math, coding or general"}
                },
                "required": ["problem"]
            }),
        ),
        ToolDefinition::new(
            "citation_generator",
            "Generate proper citations in APA, MLA, or Chicago format.",
            json!({
                "type": "object",
                "properties": {
                    "source_type": {"type": "string", "default": "website"},
                    "author": {"type": "string", "default": "Unknown Author"},
                    "title": {"type": "string", "default": "Untitled"},
                    "year": {"type": "string", "description": "Defaults to the current year"},
                    "url": {"type": "string"}
                }
            }),
        ),
    ]
}
