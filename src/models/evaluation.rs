//! Question/answer pairs and the persisted evaluation record

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::GenerationError;
use crate::models::chunk::TextChunk;

/// Structured output of one successful generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerPair {
    /// Reasoning trace requested from the model; never persisted
    #[serde(default)]
    pub chain_of_thought: String,
    pub question: String,
    pub answer: String,
}

impl QuestionAnswerPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            chain_of_thought: String::new(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// JSON schema the model response is constrained to
    pub fn json_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "chain_of_thought": {
                    "type": "string",
                    "description": "Step by step reasoning about which facts in the chunk the question should target"
                },
                "question": {
                    "type": "string",
                    "description": "A question that can only be answered using the chunk"
                },
                "answer": {
                    "type": "string",
                    "description": "The answer to the question, taken from the chunk"
                }
            },
            "required": ["chain_of_thought", "question", "answer"],
            "additionalProperties": false
        })
    }

    /// Decode raw model content into a pair
    ///
    /// Tolerates a surrounding markdown code fence. Anything else that does
    /// not deserialize, or leaves the question or answer blank, is a
    /// [`GenerationError::MalformedResponse`].
    pub fn from_model_output(raw: &str) -> Result<Self, GenerationError> {
        let body = strip_code_fence(raw);

        let pair: QuestionAnswerPair = serde_json::from_str(body)
            .map_err(|e| GenerationError::malformed(format!("invalid JSON: {}", e)))?;

        if pair.question.trim().is_empty() {
            return Err(GenerationError::malformed("question is empty"));
        }
        if pair.answer.trim().is_empty() {
            return Err(GenerationError::malformed("answer is empty"));
        }

        Ok(pair)
    }
}

fn strip_code_fence(raw: &str) -> &str {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    let fence =
        FENCE.get_or_init(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").ok());

    match fence
        .as_ref()
        .and_then(|re| re.captures(raw))
        .and_then(|c| c.get(1))
    {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

/// One line of the evaluation dataset
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationDataItem {
    pub question: String,
    pub answer: String,
    pub chunk: String,
    pub chunk_id: String,
}

impl EvaluationDataItem {
    /// Bind a generated pair to the chunk it was generated from
    pub fn new(pair: QuestionAnswerPair, chunk: &TextChunk) -> Self {
        Self {
            question: pair.question,
            answer: pair.answer,
            chunk: chunk.text.clone(),
            chunk_id: chunk.chunk_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_json() {
        let raw = r#"{"chain_of_thought":"the chunk names a date","question":"When?","answer":"In 2021."}"#;
        let pair = QuestionAnswerPair::from_model_output(raw).unwrap();
        assert_eq!(pair.question, "When?");
        assert_eq!(pair.answer, "In 2021.");
        assert_eq!(pair.chain_of_thought, "the chunk names a date");
    }

    #[test]
    fn test_decode_fenced_json_without_reasoning() {
        let raw = "```json\n{\"question\": \"Who wrote it?\", \"answer\": \"Jason.\"}\n```";
        let pair = QuestionAnswerPair::from_model_output(raw).unwrap();
        assert_eq!(pair, QuestionAnswerPair::new("Who wrote it?", "Jason."));
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let err = QuestionAnswerPair::from_model_output(r#"{"question": "Why?"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_decode_rejects_prose_and_blank_answers() {
        assert!(QuestionAnswerPair::from_model_output("Sure! Here is a question...").is_err());
        assert!(
            QuestionAnswerPair::from_model_output(r#"{"question": "Why?", "answer": "   "}"#)
                .is_err()
        );
    }

    #[test]
    fn test_item_copies_chunk_text_verbatim() {
        let chunk = TextChunk::new("a", "  X with trailing space \n");
        let item = EvaluationDataItem::new(QuestionAnswerPair::new("q", "a1"), &chunk);
        assert_eq!(item.chunk, chunk.text);
        assert_eq!(item.chunk_id, "a");
    }

    #[test]
    fn test_item_serializes_exactly_four_fields_in_order() {
        let item = EvaluationDataItem {
            question: "q".to_string(),
            answer: "a".to_string(),
            chunk: "X".to_string(),
            chunk_id: "c".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"question":"q","answer":"a","chunk":"X","chunk_id":"c"}"#
        );
    }
}
