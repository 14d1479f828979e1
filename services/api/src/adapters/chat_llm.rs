//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the portfolio chatbot's LLM.
//! It implements the `ChatCompletionService` port from the `core` crate against
//! any OpenAI-compatible chat-completions API (Groq by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use portfolio_core::ports::{ChatCompletionService, PortError, PortResult};
use std::time::Duration;

const SYSTEM_PROMPT: &str = r#"You are a friendly and professional AI assistant for Gaurav Gupta's portfolio website. You help visitors learn about his experience, skills, projects, and certifications.

Be conversational and natural - if someone asks "How are you?" respond warmly and personally. Keep responses concise (2-3 sentences), friendly, and informative.

About Gaurav Gupta:
- Senior Software Engineer with 5+ years experience at ARCAD Software
- Expertise: Salesforce (Apex, Lightning), Java, TypeScript, React, DevOps, AI/LLM
- Salesforce Trailhead All Star Ranger: 213 badges, 83,875 points
- Previous roles: Kloudrac, C&S Electric, Delhivery, Kcloud Technologies
- Location: Lucknow, Uttar Pradesh 226016, India
- Contact: ggupta865@gmail.com | +918869999358
- LinkedIn: linkedin.com/in/gauravgupta865 | GitHub: github.com/gauravgupta0612 | Trailblazer: salesforce.com/trailblazer/ggupta56

Tone: Professional yet approachable. Answer questions naturally and encourage visitors to explore the portfolio sections for more details."#;

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.7;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatCompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds a client for `api_base` (e.g. `https://api.groq.com/openai/v1`).
    ///
    /// The client makes exactly one attempt per request. Rate-limit and server
    /// errors come straight back so the caller can fall back at once.
    pub fn client(api_key: &str, api_base: &str) -> Client<OpenAIConfig> {
        let single_attempt = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Client::with_config(
            OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(api_base),
        )
        .with_backoff(single_attempt)
    }
}

//=========================================================================================
// `ChatCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatCompletionService for OpenAiChatAdapter {
    /// Answers a visitor's message in the portfolio assistant's voice.
    async fn complete(&self, message: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::ExternalService(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()
                .map_err(|e| PortError::ExternalService(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
            .build()
            .map_err(|e| PortError::ExternalService(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::ExternalService(e.to_string()))?;

        // The first choice's text, verbatim. An empty reply counts as no reply.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                PortError::ExternalService(
                    "Chat LLM response contained no text content.".to_string(),
                )
            })
    }
}
