//! services/api/src/adapters/notes_llm.rs
//!
//! This module contains the adapter for the Note-Generating LLM.
//! It implements the `NoteGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use study_notes_core::ports::{NoteGenerationService, PortError, PortResult};

const SYSTEM_INSTRUCTIONS: &str = "You write structured study notes. Reply with a single JSON object and nothing else.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `NoteGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiNotesAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiNotesAdapter {
    /// Creates a new `OpenAiNotesAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `NoteGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteGenerationService for OpenAiNotesAdapter {
    /// Sends the prompt in JSON mode and returns the raw reply text.
    async fn generate_json(&self, prompt: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unexpected(
                    "Note generation LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Note generation LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}
