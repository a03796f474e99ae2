//! Study artifact generators: flashcards, mind maps, idea expansions and
//! learning roadmaps. Each renders a fixed template and appends a record
//! to its own document.

use super::text::{capitalize, split_sentences, truncate_chars, word_count, RULE};
use crate::documents::{
    now_iso, Documents, Flashcard, FlashcardDeck, IdeaRecord, JsonDocument, MindMapRecord,
    RoadmapRecord,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Renders and persists generated study artifacts
#[derive(Clone)]
pub struct Generators {
    documents: Arc<Documents>,
}

impl Generators {
    pub fn new(documents: Arc<Documents>) -> Self {
        Self { documents }
    }

    /// Build a flashcard deck from `content` and persist it
    pub async fn flashcards(&self, topic: &str, content: &str, num_cards: usize) -> String {
        let Some(cards) = build_flashcards(content, num_cards) else {
            return "Content too short to create flashcards.".to_string();
        };
        let rendered = render_flashcards(topic, &cards);

        let deck = FlashcardDeck {
            topic: topic.to_string(),
            total_cards: cards.len(),
            cards,
            created: now_iso(),
        };
        persist(&self.documents.flashcards, deck).await;
        rendered
    }

    /// Render `notes` as a text mind map and persist it
    pub async fn mindmap(&self, topic: &str, notes: &str) -> String {
        let structure = render_mindmap(topic, notes);
        let record = MindMapRecord {
            topic: topic.to_string(),
            created: now_iso(),
            structure: structure.clone(),
        };
        persist(&self.documents.mindmaps, record).await;
        structure
    }

    /// Expand a seed idea and log it to the idea journal
    pub async fn expand_idea(&self, seed_idea: &str) -> String {
        let expanded = render_idea(seed_idea);
        let record = IdeaRecord {
            seed: seed_idea.to_string(),
            expanded: expanded.clone(),
            created: now_iso(),
            status: "exploring".to_string(),
        };
        persist(&self.documents.ideas, record).await;
        expanded
    }

    /// Render a three-phase learning roadmap and persist it
    pub async fn roadmap(&self, skill: &str, current_level: &str) -> String {
        let roadmap = render_roadmap(skill, current_level);
        let record = RoadmapRecord {
            skill: skill.to_string(),
            level: current_level.to_string(),
            created: now_iso(),
            roadmap: roadmap.clone(),
        };
        persist(&self.documents.roadmaps, record).await;
        roadmap
    }
}

/// Append a record; failures are logged and never reach the caller
async fn persist<R>(document: &JsonDocument<R>, record: R)
where
    R: Serialize + DeserializeOwned,
{
    match document.append(record).await {
        Ok(position) => tracing::debug!(
            document = %document.path().display(),
            position,
            "Persisted generated artifact"
        ),
        Err(e) => tracing::warn!(
            "Failed to persist to {}: {}",
            document.path().display(),
            e
        ),
    }
}

// =============================================================================
// Flashcards
// =============================================================================

/// Derive a question from a sentence.
///
/// The `is` split is literal and case-sensitive, so it can land inside a
/// word ("This" → "Th"); that is the established behavior.
pub fn flashcard_question(sentence: &str) -> String {
    let lower = sentence.to_lowercase();
    if ["is", "are", "was", "were"].iter().any(|w| lower.contains(w)) {
        let before = sentence.split_once("is").map_or(sentence, |(head, _)| head);
        format!("What {} is?", before.trim())
    } else if lower.contains("because") {
        let before = sentence
            .split_once("because")
            .map_or(sentence, |(head, _)| head);
        format!("Why {}?", before.trim())
    } else {
        let words: Vec<&str> = sentence.split_whitespace().take(6).collect();
        format!("Explain: {}...", words.join(" "))
    }
}

/// Cards for the first `num_cards` sentences; only sentences with more
/// than five words produce a card. `None` when no sentence qualifies at all.
pub fn build_flashcards(content: &str, num_cards: usize) -> Option<Vec<Flashcard>> {
    let sentences = split_sentences(content);
    if sentences.is_empty() {
        return None;
    }

    Some(
        sentences
            .into_iter()
            .take(num_cards)
            .enumerate()
            .filter(|(_, s)| word_count(s) > 5)
            .map(|(i, sentence)| Flashcard {
                id: i + 1,
                question: flashcard_question(&sentence),
                answer: sentence,
            })
            .collect(),
    )
}

fn render_flashcards(topic: &str, cards: &[Flashcard]) -> String {
    let mut out = format!(
        "🎴 **FLASHCARD SET: {}**\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n",
        topic.to_uppercase()
    );
    for card in cards {
        out.push_str(&format!(
            "╔═══ CARD #{} ═══╗\n\n❓ **QUESTION:**\n{}\n\n✅ **ANSWER:**\n{}\n\n═══════════════════════════════════\n\n",
            card.id, card.question, card.answer
        ));
    }
    out.push_str(&format!(
        "📚 **STUDY TIPS:**
• Cover the answer and try to recall
• Review cards daily for best retention
• Shuffle the order when practicing

💾 **Total Cards Generated:** {}
",
        cards.len()
    ));
    out
}

// =============================================================================
// Mind map
// =============================================================================

/// Lines of `notes` longer than 10 characters, truncated to 80
pub fn mindmap_concepts(notes: &str) -> Vec<String> {
    notes
        .lines()
        .map(str::trim)
        .filter(|l| l.chars().count() > 10)
        .map(|l| truncate_chars(l, 80))
        .collect()
}

fn render_mindmap(topic: &str, notes: &str) -> String {
    let concepts = mindmap_concepts(notes);
    let label = truncate_chars(topic, 15);

    let mut out = format!(
        "🧠 **MIND MAP: {}**

                    ┌─────────────────┐
                    │   {:^15}   │
                    └─────────────────┘
                            │
            ┌───────────────┼───────────────┐
",
        topic.to_uppercase(),
        label
    );

    for (i, concept) in concepts.iter().take(6).enumerate() {
        out.push_str(&format!("    [{}] {}\n", i + 1, concept));

        let words: Vec<&str> = concept.split_whitespace().collect();
        if words.len() > 5 {
            for chunk in words.chunks(3).take(2) {
                out.push_str(&format!("         └─► {}\n", chunk.join(" ")));
            }
        }
    }

    out.push_str(&format!(
        "
---
💡 **Pro Tip:** Use this structure to visualize relationships!
📊 Total branches: {}
",
        concepts.len()
    ));
    out
}

// =============================================================================
// Idea expansion
// =============================================================================

fn render_idea(seed_idea: &str) -> String {
    format!(
        "🌱 **SEED IDEA:** {seed_idea}

🚀 **IDEA EXPANSION FRAMEWORK:**

**1. WHAT IF...? (Possibilities)**
   • What if this idea was 10x bigger?
   • What if it was applied to a different field?
   • What if technology/AI enhanced it?

**2. WHO, WHAT, WHERE, WHEN, WHY? (5W Framework)**
   • WHO would benefit most from this?
   • WHAT problem does it solve?
   • WHERE can this be implemented?
   • WHEN is the best time to start?
   • WHY is this important now?

**3. POTENTIAL APPLICATIONS:**
   • Business/Commercial use
   • Educational application
   • Social impact potential
   • Personal development angle

**4. CHALLENGES TO CONSIDER:**
   • What obstacles might you face?
   • What resources are needed?
   • What skills must be developed?

**5. NEXT STEPS:**
   • Research similar ideas
   • Create a simple prototype/MVP
   • Talk to 5 people about it
   • Write a one-page plan

💡 **Action Item:** Pick ONE next step and do it today!
"
    )
}

// =============================================================================
// Learning roadmap
// =============================================================================

fn render_roadmap(skill: &str, current_level: &str) -> String {
    format!(
        "🎯 **LEARNING ROADMAP: {skill_upper}**
{RULE}

👤 **Current Level:** {level}
⏰ **Estimated Timeline:** 3-6 months (with consistent practice)

{RULE}

## 📚 PHASE 1: FOUNDATIONS (Weeks 1-4)

**Goals:**
├─ Understand basic concepts and terminology
├─ Build foundational knowledge
└─ Complete first small project

**Learning Path:**
1️⃣ **Week 1-2:** Core Concepts
   • Learn fundamental principles
   • Watch intro tutorials (YouTube/Coursera)
   • Practice 30 min daily

2️⃣ **Week 3-4:** Hands-On Practice
   • Complete 3-5 small exercises
   • Join online communities
   • Build first mini-project

{RULE}

## 🚀 PHASE 2: SKILL BUILDING (Weeks 5-12)

**Goals:**
├─ Master intermediate techniques
├─ Build portfolio projects
└─ Learn best practices

**Learning Path:**
3️⃣ **Week 5-8:** Intermediate Skills
   • Deep dive into advanced topics
   • Take online course
   • Practice daily (1 hour minimum)

4️⃣ **Week 9-12:** Project Development
   • Build 2-3 portfolio projects
   • Get feedback from community
   • Refine your skills

{RULE}

## 🎓 PHASE 3: MASTERY (Weeks 13-24)

**Goals:**
├─ Achieve professional proficiency
├─ Specialize in specific area
└─ Teach/mentor others

💡 **PRO TIPS:**
✅ Consistency over intensity - Daily practice beats weekend cramming
✅ Build projects - Learning by doing is most effective
✅ Join communities - Learn from others, ask questions

🎉 **Remember:** Everyone starts as a beginner!

💾 **Next Step:** Choose ONE resource from Phase 1 and start TODAY!
",
        skill_upper = skill.to_uppercase(),
        level = capitalize(current_level),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_generators() -> (Generators, Arc<Documents>, TempDir) {
        let dir = TempDir::new().unwrap();
        let docs = Arc::new(Documents::new(dir.path()));
        (Generators::new(docs.clone()), docs, dir)
    }

    #[test]
    fn test_question_splits_on_literal_is() {
        assert_eq!(
            flashcard_question("Water is made of hydrogen and oxygen"),
            "What Water is?"
        );
        // "This" contains "is", so the split lands inside the word
        assert_eq!(
            flashcard_question("This process converts sunlight into sugar"),
            "What Th is?"
        );
        // "are" qualifies, but there is no literal "is" to split on
        assert_eq!(
            flashcard_question("Cells are the basic unit of life"),
            "What Cells are the basic unit of life is?"
        );
    }

    #[test]
    fn test_question_because_and_explain() {
        assert_eq!(
            flashcard_question("Leaves fall in autumn because days get shorter"),
            "Why Leaves fall in autumn?"
        );
        assert_eq!(
            flashcard_question("Plants convert light into chemical energy daily"),
            "Explain: Plants convert light into chemical energy..."
        );
    }

    #[test]
    fn test_build_flashcards_skips_short_sentences_keeping_ids() {
        let content = "Water boils at one hundred degrees Celsius. \
                       Short words only here. \
                       Gravity pulls objects toward the earth center.";
        let cards = build_flashcards(content, 5).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, 1);
        assert_eq!(cards[1].id, 3);
        assert_eq!(cards[1].answer, "Gravity pulls objects toward the earth center");
    }

    #[test]
    fn test_build_flashcards_respects_num_cards() {
        let content = "First sentence has plenty of words in it. \
                       Second sentence has plenty of words in it. \
                       Third sentence has plenty of words in it.";
        assert_eq!(build_flashcards(content, 2).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_flashcards_too_short_writes_nothing() {
        let (gen, docs, _dir) = make_generators();
        let out = gen.flashcards("Bio", "Too short. Tiny!", 5).await;
        assert_eq!(out, "Content too short to create flashcards.");
        assert!(!docs.flashcards.path().exists());
    }

    #[tokio::test]
    async fn test_flashcards_with_no_long_sentences_saves_empty_deck() {
        let (gen, docs, _dir) = make_generators();
        let out = gen
            .flashcards("words", "Antidisestablishmentarianism prevails.", 5)
            .await;
        assert!(out.starts_with("🎴 **FLASHCARD SET: WORDS**"));
        assert!(!out.contains("CARD #"));
        assert!(out.contains("💾 **Total Cards Generated:** 0\n"));

        let decks = docs.flashcards.load().await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].total_cards, 0);
        assert!(decks[0].cards.is_empty());
    }

    #[tokio::test]
    async fn test_flashcards_persist_deck() {
        let (gen, docs, _dir) = make_generators();
        let out = gen
            .flashcards("biology", "The cell is the basic unit of all known life.", 5)
            .await;
        assert!(out.starts_with("🎴 **FLASHCARD SET: BIOLOGY**"));
        assert!(out.contains("╔═══ CARD #1 ═══╗"));
        assert!(out.contains("❓ **QUESTION:**\nWhat The cell is?\n"));
        assert!(out.contains("💾 **Total Cards Generated:** 1\n"));

        let decks = docs.flashcards.load().await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].topic, "biology");
        assert_eq!(decks[0].total_cards, 1);
    }

    #[test]
    fn test_mindmap_concepts() {
        let notes = "  short\n\nThis line is definitely long enough\n   \n";
        assert_eq!(mindmap_concepts(notes), vec!["This line is definitely long enough"]);
        let long = "x".repeat(100);
        assert_eq!(mindmap_concepts(&long)[0].len(), 80);
    }

    #[tokio::test]
    async fn test_mindmap_render_and_persist() {
        let (gen, docs, _dir) = make_generators();
        let notes = "Photosynthesis happens in chloroplasts of plant cells\n\
                     Light reactions\n\
                     Calvin cycle fixes carbon";
        let out = gen.mindmap("Photosynthesis", notes).await;

        assert!(out.starts_with("🧠 **MIND MAP: PHOTOSYNTHESIS**"));
        assert!(out.contains("│   Photosynthesis    │"));
        assert!(out.contains("    [1] Photosynthesis happens in chloroplasts of plant cells\n"));
        assert!(out.contains("         └─► Photosynthesis happens in\n"));
        assert!(out.contains("         └─► chloroplasts of plant\n"));
        assert!(out.contains("    [2] Light reactions\n"));
        assert!(out.contains("    [3] Calvin cycle fixes carbon\n"));
        assert!(out.contains("📊 Total branches: 3\n"));

        let maps = docs.mindmaps.load().await.unwrap();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].structure, out);
    }

    #[tokio::test]
    async fn test_mindmap_caps_branches_at_six() {
        let (gen, _docs, _dir) = make_generators();
        let notes: Vec<String> = (1..=8).map(|i| format!("concept number {}", i)).collect();
        let out = gen.mindmap("t", &notes.join("\n")).await;
        assert!(out.contains("[6] concept number 6"));
        assert!(!out.contains("[7]"));
        assert!(out.contains("📊 Total branches: 8\n"));
    }

    #[tokio::test]
    async fn test_idea_expander_persists() {
        let (gen, docs, _dir) = make_generators();
        let out = gen.expand_idea("Solar-powered backpacks").await;
        assert!(out.starts_with("🌱 **SEED IDEA:** Solar-powered backpacks\n"));
        assert!(out.contains(
            "**1. WHAT IF...? (Possibilities)**\n\
             \u{20}  • What if this idea was 10x bigger?\n\
             \u{20}  • What if it was applied to a different field?\n\
             \u{20}  • What if technology/AI enhanced it?\n\n\
             **2. WHO, WHAT, WHERE, WHEN, WHY? (5W Framework)**\n"
        ));
        let ideas = docs.ideas.load().await.unwrap();
        assert_eq!(ideas[0].status, "exploring");
        assert_eq!(ideas[0].expanded, out);
    }

    #[tokio::test]
    async fn test_roadmap_persists() {
        let (gen, docs, _dir) = make_generators();
        let out = gen.roadmap("Rust", "INTERMEDIATE").await;
        assert!(out.starts_with("🎯 **LEARNING ROADMAP: RUST**\n"));
        assert!(out.contains("👤 **Current Level:** Intermediate\n"));
        let roadmaps = docs.roadmaps.load().await.unwrap();
        assert_eq!(roadmaps[0].level, "INTERMEDIATE");
        assert_eq!(roadmaps[0].skill, "Rust");
    }
}
