//! LLM client trait and the OpenAI-compatible chat-completions client

use super::types::{ChatMessage, LlmResponse, Role, ToolCall};
use crate::config::{resolve_api_keys_from_env, ModelProviderConfig, ModelsConfig};
use crate::error::{Error, Result};
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// A chat model that may answer with tool calls
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolDefinition])
        -> Result<LlmResponse>;
}

/// Client for `/chat/completions` on an OpenAI-compatible API
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(provider: &ModelProviderConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            base_url: provider.base_url().trim_end_matches('/').to_string(),
            model: provider.default_model.clone(),
            temperature: provider.temperature,
            api_key,
        })
    }

    /// Client for the default provider, with its key read from the environment
    pub fn from_config(models: &ModelsConfig) -> Result<Self> {
        let provider = models.default_provider_config()?;
        let api_key = resolve_api_keys_from_env(models).remove(&models.default_provider);
        if api_key.is_none() {
            tracing::warn!(
                provider = %models.default_provider,
                "No API key found in ${}; chat requests will fail",
                provider.api_key_ref.to_uppercase()
            );
        }
        Self::new(provider, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Value {
        let messages: Vec<Value> = messages.iter().map(wire_message).collect();
        let mut body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
        }
        body
    }
}

fn wire_message(msg: &ChatMessage) -> Value {
    match msg.role {
        Role::Assistant if !msg.tool_calls.is_empty() => {
            let calls: Vec<Value> = msg
                .tool_calls
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id,
                        "type": "function",
                        "function": {"name": c.name, "arguments": c.arguments.to_string()},
                    })
                })
                .collect();
            let content = if msg.content.is_empty() {
                Value::Null
            } else {
                Value::String(msg.content.clone())
            };
            json!({"role": "assistant", "content": content, "tool_calls": calls})
        }
        Role::Tool => json!({
            "role": "tool",
            "tool_call_id": msg.tool_call_id.as_deref().unwrap_or_default(),
            "content": msg.content,
        }),
        role => json!({"role": role, "content": msg.content}),
    }
}

/// Extract content and tool calls from a chat-completions response
fn parse_response(json: Value) -> Result<LlmResponse> {
    let message = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| Error::Llm("response has no choices".to_string()))?;

    let content = message["content"].as_str().unwrap_or_default().to_string();
    let tool_calls = message["tool_calls"]
        .as_array()
        .map(|calls| {
            calls
                .iter()
                .map(|call| {
                    let raw = call["function"]["arguments"].as_str().unwrap_or("{}");
                    // Undecodable arguments are passed through so the tool can reject them
                    let arguments = serde_json::from_str(raw)
                        .unwrap_or_else(|_| Value::String(raw.to_string()));
                    ToolCall {
                        id: call["id"].as_str().unwrap_or_default().to_string(),
                        name: call["function"]["name"]
                            .as_str()
                            .unwrap_or_default()
                            .to_string(),
                        arguments,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(LlmResponse {
        content,
        tool_calls,
    })
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("No API key configured for the model provider".to_string()))?;
        let body = self.build_request_body(messages, tools);

        tracing::debug!(model = %self.model, messages = messages.len(), "Chat completion request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::Llm("rate limited".to_string()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(Error::Llm(format!("HTTP {status}: {text}")));
        }

        let json: Value = response.json().await?;
        parse_response(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    fn provider(base_url: String) -> ModelProviderConfig {
        ModelProviderConfig {
            api_key_ref: "test_key".to_string(),
            base_url: Some(base_url),
            default_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    #[test]
    fn test_request_body_wire_format() {
        let client = OpenAiClient::new(&provider("http://localhost/v1/".into()), None).unwrap();
        let messages = vec![
            ChatMessage::system("sys"),
            ChatMessage::user("what is 2+2"),
            ChatMessage::assistant_with_tools(
                "",
                vec![ToolCall {
                    id: "call_1".into(),
                    name: "calculate".into(),
                    arguments: json!({"expression": "2+2"}),
                }],
            ),
            ChatMessage::tool_result("call_1", "Result: 4"),
        ];
        let tools = crate::tools::definitions();
        let body = client.build_request_body(&messages, &tools);

        assert_eq!(client.base_url, "http://localhost/v1");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["messages"][2]["content"], Value::Null);
        assert_eq!(body["messages"][2]["tool_calls"][0]["type"], "function");
        assert_eq!(
            body["messages"][2]["tool_calls"][0]["function"]["arguments"],
            "{\"expression\":\"2+2\"}"
        );
        assert_eq!(
            body["messages"][3],
            json!({"role": "tool", "tool_call_id": "call_1", "content": "Result: 4"})
        );
        assert_eq!(body["tools"].as_array().unwrap().len(), tools.len());
        assert_eq!(body["tools"][0]["function"]["name"], "search_wikipedia");
    }

    #[test]
    fn test_request_body_without_tools() {
        let client = OpenAiClient::new(&provider("http://localhost/v1".into()), None).unwrap();
        let body = client.build_request_body(&[ChatMessage::user("hi")], &[]);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let resp = parse_response(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {"id": "a", "type": "function", "function": {"name": "calculate", "arguments": "{\"expression\":\"1+1\"}"}},
                    {"id": "b", "type": "function", "function": {"name": "calculate", "arguments": "not json"}}
                ]
            }}]
        }))
        .unwrap();
        assert_eq!(resp.content, "");
        assert_eq!(resp.tool_calls.len(), 2);
        assert_eq!(resp.tool_calls[0].arguments, json!({"expression": "1+1"}));
        assert_eq!(resp.tool_calls[1].arguments, json!("not json"));
    }

    #[test]
    fn test_parse_response_without_choices() {
        assert!(matches!(parse_response(json!({"choices": []})), Err(Error::Llm(_))));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["messages"][0]["content"], "hello");
                Json(json!({"choices": [{"message": {"role": "assistant", "content": "Hi there"}}]}))
            }),
        );
        let base = spawn(app).await;
        let client = OpenAiClient::new(&provider(base), Some("sk-test".into())).unwrap();
        let resp = client.complete(&[ChatMessage::user("hello")], &[]).await.unwrap();
        assert_eq!(resp, LlmResponse::text("Hi there"));
    }

    #[tokio::test]
    async fn test_complete_rate_limited_and_errors() {
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
            );
        let client = OpenAiClient::new(&provider(spawn(app).await), Some("k".into())).unwrap();
        let err = client.complete(&[ChatMessage::user("x")], &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: rate limited");

        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "x".repeat(500)) }),
        );
        let client = OpenAiClient::new(&provider(spawn(app).await), Some("k".into())).unwrap();
        let err = client.complete(&[ChatMessage::user("x")], &[]).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("LLM error: HTTP 401 Unauthorized: "));
        assert!(msg.ends_with(&"x".repeat(200)));
        assert!(!msg.ends_with(&"x".repeat(201)));
    }

    #[tokio::test]
    async fn test_complete_requires_api_key() {
        let client = OpenAiClient::new(&provider("http://127.0.0.1:9/v1".into()), None).unwrap();
        let err = client.complete(&[ChatMessage::user("x")], &[]).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
