//! Tool-calling agent loop

use super::client::LlmClient;
use super::types::ChatMessage;
use crate::error::{Error, Result};
use crate::tools::{ToolDefinition, ToolSet};
use std::sync::Arc;

/// System prompt given to the model on every turn
pub const SYSTEM_PROMPT: &str = "You are Knowledge Engine, an advanced AI knowledge assistant with comprehensive learning capabilities:

🔍 **CORE FEATURES:**
- Wikipedia search with citations
- Knowledge base management
- Mathematical calculations
- Vocabulary builder

📚 **ADVANCED FEATURES:**
- Universal Summarizer (text/books/videos)
- Flashcard Generator
- Learning Roadmap Creator
- Step-by-Step Problem Solver
- Mind Map Generator
- Language Translation (10+ languages)
- Idea Expander
- Quote Finder
- Citation Generator

Be conversational, helpful, and always cite your sources!";

/// Runs one chat turn: model calls interleaved with tool executions
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolSet,
    definitions: Vec<ToolDefinition>,
    max_steps: usize,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolSet, max_steps: usize) -> Self {
        let definitions = tools.definitions();
        Self {
            llm,
            tools,
            definitions,
            max_steps,
        }
    }

    /// Answer `user_message` given the prior `history`.
    ///
    /// Each model call counts as one step. Tool calls within a step run in
    /// order. Returns the content of the first reply without tool calls.
    pub async fn run(&self, history: &[ChatMessage], user_message: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user_message));

        for step in 1..=self.max_steps {
            let response = self.llm.complete(&messages, &self.definitions).await?;

            if response.tool_calls.is_empty() {
                tracing::debug!(steps = step, "Agent turn complete");
                return Ok(response.content);
            }

            tracing::debug!(
                step,
                tools = ?response.tool_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "Model requested tools"
            );

            let calls = response.tool_calls.clone();
            messages.push(ChatMessage::assistant_with_tools(
                response.content,
                response.tool_calls,
            ));
            for call in calls {
                let output = self.tools.execute(&call.name, &call.arguments).await;
                messages.push(ChatMessage::tool_result(call.id, output));
            }
        }

        tracing::warn!(max_steps = self.max_steps, "Agent exceeded step limit");
        Err(Error::Agent(format!(
            "Step limit of {} reached without a final answer",
            self.max_steps
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::{LlmResponse, Role, ToolCall};
    use crate::config::LookupConfig;
    use crate::documents::Documents;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// Replays canned responses and records every request
    struct ScriptedLlm {
        replies: Mutex<VecDeque<LlmResponse>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<LlmResponse>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _tools: &[ToolDefinition],
        ) -> Result<LlmResponse> {
            self.seen.lock().await.push(messages.to_vec());
            self.replies
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| Error::Llm("script exhausted".to_string()))
        }
    }

    /// Always asks for the current time
    struct LoopingLlm;

    #[async_trait]
    impl LlmClient for LoopingLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDefinition],
        ) -> Result<LlmResponse> {
            Ok(LlmResponse {
                content: String::new(),
                tool_calls: vec![ToolCall {
                    id: "t".into(),
                    name: "get_current_time".into(),
                    arguments: json!({}),
                }],
            })
        }
    }

    fn make_tools() -> (ToolSet, Arc<Documents>, TempDir) {
        let dir = TempDir::new().unwrap();
        let docs = Arc::new(Documents::new(dir.path()));
        let tools = ToolSet::new(docs.clone(), &LookupConfig::default()).unwrap();
        (tools, docs, dir)
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let (tools, _docs, _dir) = make_tools();
        let llm = ScriptedLlm::new(vec![LlmResponse::text("Hello!")]);
        let agent = Agent::new(llm.clone(), tools, 50);

        let history = vec![ChatMessage::user("earlier"), ChatMessage::assistant("reply")];
        let answer = agent.run(&history, "hi").await.unwrap();
        assert_eq!(answer, "Hello!");

        let seen = llm.seen.lock().await;
        assert_eq!(seen.len(), 1);
        let sent = &seen[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(sent[1].content, "earlier");
        assert_eq!(sent[3], ChatMessage::user("hi"));
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let (tools, docs, _dir) = make_tools();
        let llm = ScriptedLlm::new(vec![
            LlmResponse {
                content: String::new(),
                tool_calls: vec![
                    ToolCall {
                        id: "c1".into(),
                        name: "save_knowledge".into(),
                        arguments: json!({"topic": "Tides", "content": "Caused by the moon", "category": "science"}),
                    },
                    ToolCall {
                        id: "c2".into(),
                        name: "calculate".into(),
                        arguments: json!({"expression": "6 * 7"}),
                    },
                ],
            },
            LlmResponse::text("Saved, and the answer is 42."),
        ]);
        let agent = Agent::new(llm.clone(), tools, 50);

        let answer = agent.run(&[], "remember tides and compute 6*7").await.unwrap();
        assert_eq!(answer, "Saved, and the answer is 42.");
        assert_eq!(docs.knowledge.count().await.unwrap(), 1);

        let seen = llm.seen.lock().await;
        let second = &seen[1];
        assert_eq!(second.len(), 5);
        assert_eq!(second[2].role, Role::Assistant);
        assert_eq!(second[2].tool_calls.len(), 2);
        assert_eq!(second[3].tool_call_id.as_deref(), Some("c1"));
        assert!(second[3].content.contains("Entry ID: 1"));
        assert_eq!(second[4].tool_call_id.as_deref(), Some("c2"));
        assert_eq!(second[4].content, "Result: 42\n\nCalculation: 6 * 7 = 42");
    }

    #[tokio::test]
    async fn test_step_limit() {
        let (tools, _docs, _dir) = make_tools();
        let agent = Agent::new(Arc::new(LoopingLlm), tools, 3);
        let err = agent.run(&[], "loop").await.unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let (tools, _docs, _dir) = make_tools();
        let agent = Agent::new(ScriptedLlm::new(vec![]), tools, 50);
        let err = agent.run(&[], "hi").await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: script exhausted");
    }
}
