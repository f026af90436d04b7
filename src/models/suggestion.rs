use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// One turn of the prompt, in the shape the Gemini REST API expects.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/*
    Body of POST /api/gemini and POST /api/enhance
*/
/// `contents` stays untyped until the handler checks it, so a wrong shape
/// gets the same message as a missing one.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub contents: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub response: String,
}

/// A suggested stop, as constrained by [`ResponseSchema::plan_suggestions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSuggestion {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub lat: f64,
    pub longi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Number,
    Object,
    Array,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    pub nullable: Option<bool>,
    pub items: Option<Box<ResponseSchema>>,
    pub properties: Option<BTreeMap<String, ResponseSchema>>,
    pub required: Option<Vec<String>>,
}

impl ResponseSchema {
    fn leaf(kind: SchemaType) -> Self {
        Self {
            kind,
            nullable: Some(false),
            items: None,
            properties: None,
            required: None,
        }
    }

    /// Array of `{name, price, description, lat, longi}`, all required.
    pub fn plan_suggestions() -> Self {
        let fields = [
            ("name", SchemaType::String),
            ("price", SchemaType::Number),
            ("description", SchemaType::String),
            ("lat", SchemaType::Number),
            ("longi", SchemaType::Number),
        ];

        let item = Self {
            kind: SchemaType::Object,
            nullable: None,
            items: None,
            properties: Some(
                fields
                    .iter()
                    .map(|(name, kind)| (name.to_string(), Self::leaf(*kind)))
                    .collect(),
            ),
            required: Some(fields.iter().map(|(name, _)| name.to_string()).collect()),
        };

        Self {
            kind: SchemaType::Array,
            nullable: None,
            items: Some(Box::new(item)),
            properties: None,
            required: None,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: Option<String>,
    pub response_schema: Option<ResponseSchema>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: &'a [Content],
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it produced any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_schema_matches_gemini_wire_format() {
        let schema = serde_json::to_value(ResponseSchema::plan_suggestions()).unwrap();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
        assert_eq!(
            schema["items"]["properties"]["price"],
            json!({ "type": "NUMBER", "nullable": false })
        );
        assert_eq!(
            schema["items"]["required"],
            json!(["name", "price", "description", "lat", "longi"])
        );
        assert!(schema.get("nullable").is_none());
    }

    #[test]
    fn request_omits_absent_generation_config() {
        let contents = vec![Content {
            role: None,
            parts: vec![Part {
                text: "Three days in Porto".to_string(),
            }],
        }];
        let body = serde_json::to_value(GenerateContentRequest {
            contents: &contents,
            generation_config: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "contents": [{ "parts": [{ "text": "Three days in Porto" }] }] })
        );
    }

    #[test]
    fn joins_candidate_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "[{\"a\"" }, { "text": ":1}]" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn empty_candidates_have_no_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.text(), None);

        let resp: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
                .unwrap();
        assert_eq!(resp.text(), None);
    }
}
