//! Outbound lookups: Wikipedia summaries, dictionary definitions and
//! translation. Every failure is rendered as text for the agent.

use crate::config::LookupConfig;
use crate::documents::{now_iso, Documents, VocabularyWord};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the external reference APIs
#[derive(Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    config: LookupConfig,
    documents: Arc<Documents>,
}

#[derive(Debug, Deserialize)]
struct WikiSummary {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<WikiContentUrls>,
}

#[derive(Debug, Deserialize)]
struct WikiContentUrls {
    desktop: Option<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    phonetic: Option<String>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meaning {
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: String,
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: Option<String>,
}

/// Display name for a target language code
pub fn language_name(code: &str) -> String {
    match code {
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "hi" => "Hindi",
        "zh" => "Chinese",
        "ja" => "Japanese",
        "ar" => "Arabic",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "it" => "Italian",
        "ko" => "Korean",
        other => return other.to_uppercase(),
    }
    .to_string()
}

impl LookupClient {
    /// Create a client with the configured request timeout
    pub fn new(config: LookupConfig, documents: Arc<Documents>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            documents,
        })
    }

    /// `base` with `segment` appended as one percent-encoded path segment
    fn endpoint(base: &str, segment: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(base)
            .map_err(|e| Error::Config(format!("Invalid lookup URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Lookup URL cannot take a path: {}", base)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    // =========================================================================
    // Wikipedia
    // =========================================================================

    /// Page summary with a citation block
    pub async fn search_wikipedia(&self, query: &str) -> String {
        match self.fetch_wikipedia(query).await {
            Ok(Some(text)) => text,
            Ok(None) => format!("Could not find information about '{}' on Wikipedia.", query),
            Err(e) => {
                tracing::warn!(query, "Wikipedia lookup failed: {}", e);
                format!("Error searching Wikipedia: {}", e)
            }
        }
    }

    async fn fetch_wikipedia(&self, query: &str) -> Result<Option<String>> {
        let url = Self::endpoint(&self.config.wikipedia_url, &query.replace(' ', "_"))?;
        tracing::debug!(%url, "Wikipedia request");

        let response = self.http.get(url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let data: WikiSummary = response.json().await?;

        let title = data.title.unwrap_or_else(|| query.to_string());
        let extract = data
            .extract
            .unwrap_or_else(|| "No information found.".to_string());
        let page_url = data
            .content_urls
            .and_then(|u| u.desktop)
            .and_then(|d| d.page)
            .unwrap_or_else(|| "Wikipedia".to_string());

        Ok(Some(format!(
            "**{title}**

{extract}

📚 **Citation:**
Source: Wikipedia
Title: {title}
URL: {page_url}
Accessed: {accessed}

[Read Full Article]({page_url})
",
            accessed = chrono::Local::now().format("%Y-%m-%d"),
        )))
    }

    // =========================================================================
    // Dictionary
    // =========================================================================

    /// Definitions, pronunciation, examples and synonyms for `word`.
    /// With `action == "save"` the first definition is added to the
    /// vocabulary list.
    pub async fn vocabulary(&self, word: &str, action: &str) -> String {
        match self.fetch_definition(word, action == "save").await {
            Ok(Some(text)) => text,
            Ok(None) => format!("Could not find definition for '{}'.", word),
            Err(e) => {
                tracing::warn!(word, "Dictionary lookup failed: {}", e);
                format!("Error looking up word: {}", e)
            }
        }
    }

    async fn fetch_definition(&self, word: &str, save: bool) -> Result<Option<String>> {
        let url = Self::endpoint(&self.config.dictionary_url, word)?;
        tracing::debug!(%url, "Dictionary request");

        let response = self.http.get(url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let entries: Vec<DictionaryEntry> = response.json().await?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| Error::Tool("dictionary returned no entries".to_string()))?;

        let mut out = format!("📖 **{}**\n\n", word.to_uppercase());
        if let Some(phonetic) = &entry.phonetic {
            out.push_str(&format!("🔊 Pronunciation: {}\n\n", phonetic));
        }

        for meaning in &entry.meanings {
            let pos = meaning.part_of_speech.as_deref().unwrap_or("unknown");
            out.push_str(&format!("**{}:**\n", super::text::capitalize(pos)));

            for (i, def) in meaning.definitions.iter().take(3).enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, def.definition));
                if let Some(example) = &def.example {
                    out.push_str(&format!("   💡 Example: {}\n", example));
                }
                if !def.synonyms.is_empty() {
                    let synonyms: Vec<&str> =
                        def.synonyms.iter().take(5).map(String::as_str).collect();
                    out.push_str(&format!("   🔄 Synonyms: {}\n", synonyms.join(", ")));
                }
            }
            out.push('\n');
        }

        if save {
            let definition = entry
                .meanings
                .first()
                .and_then(|m| m.definitions.first())
                .map(|d| d.definition.clone())
                .ok_or_else(|| Error::Tool(format!("no definition to save for '{}'", word)))?;

            self.documents
                .vocabulary
                .append(VocabularyWord {
                    word: word.to_string(),
                    definition,
                    added: now_iso(),
                })
                .await?;
            out.push_str("\n✅ Added to your vocabulary list!");
        }

        Ok(Some(out))
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Translate English `text` into `target_language` (ISO 639-1 code)
    pub async fn translate(&self, text: &str, target_language: &str) -> String {
        match self.fetch_translation(text, target_language).await {
            Ok(Some(out)) => out,
            Ok(None) => "Translation failed. Try: es (Spanish), fr (French), de (German), hi (Hindi), zh (Chinese)".to_string(),
            Err(e) => {
                tracing::warn!(target_language, "Translation failed: {}", e);
                format!("Error translating: {}", e)
            }
        }
    }

    async fn fetch_translation(&self, text: &str, target_language: &str) -> Result<Option<String>> {
        let body = serde_json::json!({
            "q": text,
            "source": "en",
            "target": target_language,
            "format": "text",
        });

        let response = self
            .http
            .post(&self.config.translate_url)
            .json(&body)
            .send()
            .await?;
        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let data: TranslateResponse = response.json().await?;
        let translated = data
            .translated_text
            .unwrap_or_else(|| "Translation failed".to_string());
        let lang_name = language_name(target_language);

        Ok(Some(format!(
            "🌍 **Translation to {lang_name}:**

{translated}

---
**Original (English):** {text}
**Target Language:** {lang_name} ({target_language})
"
        )))
    }
}
