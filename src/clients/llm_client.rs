//! LLM client
//!
//! [`GenerationClient`] is the seam between the pipeline and the model
//! provider. [`OpenAiClient`] talks to any OpenAI compatible endpoint through
//! `async-openai`; tests plug in scripted fakes.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;

/// Shape the model response must follow
#[derive(Debug, Clone)]
pub struct ResponseShape {
    pub name: String,
    pub description: String,
    /// JSON schema of the expected object
    pub schema: serde_json::Value,
}

/// Generation capability shared by every in-flight task
///
/// Implementations return the raw message content. Decoding it into a typed
/// value is the caller's job, so a decode failure and a transport failure
/// can be retried the same way.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        shape: &ResponseShape,
    ) -> Result<String, GenerationError>;

    /// Model identifier, for logs and errors
    fn model_name(&self) -> &str;
}

/// OpenAI compatible chat completion client
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        // an empty key leaves async-openai to read OPENAI_API_KEY itself
        let mut openai_config = OpenAIConfig::new().with_api_base(&config.llm_api_base_url);
        if !config.llm_api_key.is_empty() {
            openai_config = openai_config.with_api_key(&config.llm_api_key);
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn build_request_messages(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Vec<ChatCompletionRequestMessage>, GenerationError> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| GenerationError::request_failed(&self.model_name, e))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_prompt)
            .build()
            .map_err(|e| GenerationError::request_failed(&self.model_name, e))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        shape: &ResponseShape,
    ) -> Result<String, GenerationError> {
        debug!("Calling LLM API, model: {}", self.model_name);
        debug!("User message length: {} chars", user_prompt.len());

        let messages = self.build_request_messages(system_prompt, user_prompt)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some(shape.description.clone()),
                    name: shape.name.clone(),
                    schema: Some(shape.schema.clone()),
                    strict: Some(true),
                },
            })
            .build()
            .map_err(|e| GenerationError::request_failed(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API call failed: {}", e);
            GenerationError::request_failed(&self.model_name, e)
        })?;

        debug!("LLM API call succeeded");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::EmptyContent {
                model: self.model_name.clone(),
            })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
