//! Question generator - service layer
//!
//! Only knows how to turn one chunk into one question/answer pair in a
//! single attempt. Retrying and batching live in the layers above.

use std::sync::Arc;

use tracing::debug;

use crate::clients::{GenerationClient, ResponseShape};
use crate::error::GenerationError;
use crate::models::{QuestionAnswerPair, TextChunk};

pub const SYSTEM_PROMPT: &str = "You are a world class algorithm that excels at generating great \
questions that can be only answered by a specific text that will soon be passed to you.";

/// Question generator
///
/// Holds the shared client.
pub struct QuestionGenerator {
    client: Arc<dyn GenerationClient>,
    shape: ResponseShape,
}

impl QuestionGenerator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            shape: ResponseShape {
                name: "question_answer_pair".to_string(),
                description: "A question answerable only from the given chunk, with its answer \
                              and the reasoning used to write it"
                    .to_string(),
                schema: QuestionAnswerPair::json_schema(),
            },
        }
    }

    /// One generation attempt: call the model, then decode its output
    pub async fn generate_once(
        &self,
        chunk: &TextChunk,
    ) -> Result<QuestionAnswerPair, GenerationError> {
        let user_prompt = build_user_prompt(chunk);

        let raw = self
            .client
            .complete(SYSTEM_PROMPT, &user_prompt, &self.shape)
            .await?;

        debug!(
            "chunk {} raw response from {}: {} chars",
            chunk.chunk_id,
            self.client.model_name(),
            raw.len()
        );

        QuestionAnswerPair::from_model_output(&raw)
    }
}

/// User message embedding the full chunk text
pub fn build_user_prompt(chunk: &TextChunk) -> String {
    format!(
        "Generate a question and answer pair that uses information and content that is \
         specific to the following text chunk, including a chain of thought. The question \
         must be answerable only from this chunk.\n\n{}",
        chunk.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed body and remembers the prompts it saw
    struct EchoClient {
        reply: String,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl GenerationClient for EchoClient {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            shape: &ResponseShape,
        ) -> Result<String, GenerationError> {
            assert_eq!(shape.name, "question_answer_pair");
            self.seen
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn generator_with(reply: &str) -> (QuestionGenerator, Arc<EchoClient>) {
        let client = Arc::new(EchoClient {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        (QuestionGenerator::new(client.clone()), client)
    }

    #[test]
    fn test_user_prompt_embeds_full_chunk() {
        let chunk = TextChunk::new("c1", "The launch happened on 4 October 1957.");
        let prompt = build_user_prompt(&chunk);
        assert!(prompt.ends_with("The launch happened on 4 October 1957."));
        assert!(prompt.contains("chain of thought"));
    }

    #[tokio::test]
    async fn test_generate_once_decodes_response() {
        let (generator, client) =
            generator_with(r#"{"chain_of_thought":"dates","question":"When?","answer":"1957"}"#);
        let chunk = TextChunk::new("c1", "Sputnik launched in 1957.");

        let pair = generator.generate_once(&chunk).await.unwrap();
        assert_eq!(pair.question, "When?");
        assert_eq!(pair.answer, "1957");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, SYSTEM_PROMPT);
        assert!(seen[0].1.contains("Sputnik launched in 1957."));
    }

    #[tokio::test]
    async fn test_generate_once_reports_malformed_output() {
        let (generator, _) = generator_with("I cannot help with that.");
        let chunk = TextChunk::new("c1", "text");

        let err = generator.generate_once(&chunk).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
    }
}
