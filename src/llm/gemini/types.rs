//! Gemini-specific request and response types
//!
//! These types map directly to the Generative Language REST API schema
//! (`models/{model}:generateContent`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to generate content from Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Array of content items; we always send exactly one user turn
    pub contents: Vec<Content>,
    /// Generation configuration parameters
    pub generation_config: GeminiGenerationConfig,
}

/// A single content item in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parts of the content (may be empty when hitting limits like MAX_TOKENS)
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A part of content. Non-text parts (function calls, inline data) carry no
/// `text` field and contribute nothing to the extracted reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Generation configuration for Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

/// Every response body shape we know how to read
///
/// Anything that does not carry a `candidates` array lands in `Unrecognized`
/// and is treated as an empty response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponseShape {
    Candidates(CandidatesResponse),
    Unrecognized(Value),
}

/// The regular `generateContent` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesResponse {
    pub candidates: Vec<Candidate>,
    /// Metering under its documented name
    #[serde(default)]
    pub usage_metadata: Option<Value>,
    /// Metering under the legacy name some gateways use
    #[serde(default)]
    pub usage: Option<Value>,
}

/// A candidate response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response of `GET /models`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// Fully qualified name, e.g. `models/gemini-2.0-flash`
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text("Hello")],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.75,
                top_p: 0.9,
                max_output_tokens: 220,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"contents\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":220"));
        assert!(json.contains("\"topP\":0.9"));
    }

    #[test]
    fn test_candidates_response_deserialization() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hello!"}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 10,
                "candidatesTokenCount": 5,
                "totalTokenCount": 15
            }
        }"#;
        let shape: ResponseShape = serde_json::from_str(json).unwrap();
        match shape {
            ResponseShape::Candidates(response) => {
                assert_eq!(response.candidates.len(), 1);
                assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
                assert_eq!(response.usage_metadata.unwrap()["totalTokenCount"], 15);
            }
            ResponseShape::Unrecognized(_) => panic!("Expected candidates shape"),
        }
    }

    #[test]
    fn test_non_text_parts_are_accepted() {
        let json = r#"{"candidates":[{"content":{"parts":[{"functionCall":{"name":"f","args":{}}}]}}]}"#;
        let shape: ResponseShape = serde_json::from_str(json).unwrap();
        match shape {
            ResponseShape::Candidates(response) => {
                let content = response.candidates[0].content.as_ref().unwrap();
                assert!(content.parts[0].text.is_none());
            }
            ResponseShape::Unrecognized(_) => panic!("Expected candidates shape"),
        }
    }

    #[test]
    fn test_unrecognized_shape() {
        let shape: ResponseShape =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(shape, ResponseShape::Unrecognized(_)));
    }

    #[test]
    fn test_list_models_deserialization() {
        let json = r#"{"models":[{"name":"models/gemini-2.0-flash","displayName":"Gemini"}]}"#;
        let list: ListModelsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.models[0].name, "models/gemini-2.0-flash");
    }
}
