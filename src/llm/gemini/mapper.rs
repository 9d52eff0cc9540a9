//! Mapping between abstraction types and Gemini types

use crate::llm::core::{config::GenerationConfig, error::LlmError, types::GenerationResult};

use super::types::{
    CandidatesResponse, Content, GeminiGenerationConfig, GenerateContentRequest, Part,
    ResponseShape,
};

/// Wrap a composed prompt into Gemini's request format
pub fn to_gemini_request(prompt: &str, config: &GenerationConfig) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(prompt)],
        }],
        generation_config: to_gemini_generation_config(config),
    }
}

fn to_gemini_generation_config(config: &GenerationConfig) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        temperature: config.temperature,
        top_p: config.top_p,
        max_output_tokens: config.max_tokens,
    }
}

/// Turn a decoded response body into reply text plus usage
///
/// # Errors
/// `LlmError::EmptyResponse` when the shape is unrecognized or the first
/// candidate yields no text after trimming.
pub fn from_gemini_response(shape: ResponseShape) -> Result<GenerationResult, LlmError> {
    match shape {
        ResponseShape::Candidates(response) => {
            let text = extract_text(&response);
            if text.is_empty() {
                return Err(LlmError::EmptyResponse);
            }
            let usage = response.usage_metadata.or(response.usage);
            Ok(GenerationResult { text, usage })
        }
        ResponseShape::Unrecognized(_) => Err(LlmError::EmptyResponse),
    }
}

/// Concatenate the text parts of the first candidate, in order, with no separator
fn extract_text(response: &CandidatesResponse) -> String {
    let Some(content) = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
    else {
        return String::new();
    };

    content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape(value: serde_json::Value) -> ResponseShape {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_carries_prompt_and_config() {
        let request = to_gemini_request("Hello there", &GenerationConfig::default());
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("Hello there"));
        assert_eq!(request.generation_config.max_output_tokens, 220);
        assert_eq!(request.generation_config.temperature, 0.75);
    }

    #[test]
    fn test_parts_are_concatenated_without_separator() {
        let result = from_gemini_response(shape(json!({
            "candidates": [{"content": {"parts": [
                {"text": "  I'm Prem"},
                {"text": ", from Vapi."},
                {"functionCall": {"name": "noop", "args": {}}},
                {"text": " Nice to meet you.  "}
            ]}}]
        })))
        .unwrap();
        assert_eq!(result.text, "I'm Prem, from Vapi. Nice to meet you.");
        assert!(result.usage.is_none());
    }

    #[test]
    fn test_only_first_candidate_is_used() {
        let result = from_gemini_response(shape(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        })))
        .unwrap();
        assert_eq!(result.text, "first");
    }

    #[test]
    fn test_usage_metadata_preferred_over_usage() {
        let result = from_gemini_response(shape(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
            "usageMetadata": {"totalTokenCount": 7},
            "usage": {"total": 99}
        })))
        .unwrap();
        assert_eq!(result.usage, Some(json!({"totalTokenCount": 7})));
    }

    #[test]
    fn test_usage_field_used_when_metadata_absent() {
        let result = from_gemini_response(shape(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
            "usageMetadata": null,
            "usage": {"total": 99}
        })))
        .unwrap();
        assert_eq!(result.usage, Some(json!({"total": 99})));
    }

    #[test]
    fn test_whitespace_only_text_is_empty_response() {
        let err = from_gemini_response(shape(json!({
            "candidates": [{"content": {"parts": [{"text": "   \n"}]}}]
        })))
        .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_missing_content_is_empty_response() {
        let err = from_gemini_response(shape(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));

        let err = from_gemini_response(shape(json!({"candidates": []}))).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_unrecognized_shape_is_empty_response() {
        let err = from_gemini_response(shape(json!({"output": "text"}))).unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
