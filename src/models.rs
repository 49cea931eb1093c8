use serde::{Serialize, Deserialize};
use serde_json::Value;

/// Body accepted by `POST /api/generate`. `prompt` is kept loosely typed so any falsy value
/// is a validation failure rather than a decode failure.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: Some(Value::String(prompt.into())) }
    }

    /// The prompt as text, or `None` when it is missing, `null`, `false`, `0` or `""`.
    /// Other non-string values are passed on in their JSON rendering.
    pub fn prompt_text(&self) -> Option<String> {
        match self.prompt.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Error object returned by the proxy. `details` is only present for upstream failures.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// --- Outbound payload ---

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UpstreamPayload {
    pub contents: UpstreamContent,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UpstreamContent {
    pub role: &'static str,
    pub parts: UpstreamPart,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UpstreamPart {
    pub text: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GenerationConfig {
    pub response_modalities: [&'static str; 2],
}

impl UpstreamPayload {
    pub fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: UpstreamContent { role: "user", parts: UpstreamPart { text: prompt.to_string() } },
            generation_config: GenerationConfig { response_modalities: ["TEXT", "IMAGE"] },
        }
    }
}

// --- Permissive view of the upstream response ---
//
// Only the fields the image extraction looks at are modelled; everything else is ignored.
// The provider answers in either snake_case or camelCase, so the aliases fold both onto one field.

#[derive(Debug, Deserialize, Default)]
pub struct GenerationResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Part {
    #[serde(default, alias = "inlineData")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize, Default)]
pub struct InlineData {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, alias = "mimeType")]
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn payload_has_fixed_shape() {
        let payload = serde_json::to_value(UpstreamPayload::for_prompt("a red cube")).unwrap();
        assert_eq!(
            payload,
            json!({
                "contents": { "role": "user", "parts": { "text": "a red cube" } },
                "generation_config": { "response_modalities": ["TEXT", "IMAGE"] }
            })
        );
    }

    #[test]
    fn both_casings_land_on_the_same_fields() {
        let snake: Part = serde_json::from_value(json!({"inline_data": {"data": "AAAA", "mime_type": "image/png"}})).unwrap();
        let camel: Part = serde_json::from_value(json!({"inlineData": {"data": "AAAA", "mimeType": "image/png"}})).unwrap();
        for part in [snake, camel] {
            let inline = part.inline_data.unwrap();
            assert_eq!(inline.data.as_deref(), Some("AAAA"));
            assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let resp: GenerationResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "hi", "thought": true }] }, "finishReason": "STOP" }],
            "usageMetadata": { "totalTokenCount": 12 }
        }))
        .unwrap();
        let parts = resp.candidates.unwrap().remove(0).content.unwrap().parts.unwrap();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].inline_data.is_none());
    }

    #[test]
    fn non_string_text_does_not_break_parsing() {
        let resp: GenerationResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "text": { "segments": ["a", "b"] } },
                { "inlineData": { "data": "AAAA" } }
            ] } }]
        }))
        .unwrap();
        let parts = resp.candidates.unwrap().remove(0).content.unwrap().parts.unwrap();
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data.as_deref(), Some("AAAA"));
    }

    #[test]
    fn falsy_prompts_have_no_text() {
        for body in [json!({}), json!({"prompt": null}), json!({"prompt": false}), json!({"prompt": 0}), json!({"prompt": ""})] {
            let req: GenerateRequest = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(req.prompt_text(), None, "{body}");
        }
    }

    #[test]
    fn truthy_prompts_become_text() {
        let req: GenerateRequest = serde_json::from_value(json!({"prompt": "a red cube"})).unwrap();
        assert_eq!(req.prompt_text().as_deref(), Some("a red cube"));
        let req: GenerateRequest = serde_json::from_value(json!({"prompt": 42})).unwrap();
        assert_eq!(req.prompt_text().as_deref(), Some("42"));
        assert_eq!(GenerateRequest::new("x").prompt_text().as_deref(), Some("x"));
    }

    #[test]
    fn error_body_omits_missing_details() {
        let body = ErrorBody { error: Some("Prompt is required".into()), details: None };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"error": "Prompt is required"}));
    }
}
