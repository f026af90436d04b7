use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;

use crate::config::GeminiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::suggestion::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ResponseSchema,
};

/// Something that turns prompt contents into model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// With a `schema`, the model is asked for JSON matching it; the text is
    /// returned unparsed either way.
    async fn generate(
        &self,
        contents: &[Content],
        schema: Option<&ResponseSchema>,
    ) -> ApiResult<String>;
}

#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiService {
    pub fn new(config: &GeminiConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: generate_content_url(&config.api_base, &config.model),
        })
    }
}

pub fn generate_content_url(api_base: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    )
}

pub fn build_request<'a>(
    contents: &'a [Content],
    schema: Option<&ResponseSchema>,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents,
        generation_config: schema.map(|schema| GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema.clone()),
        }),
    }
}

#[async_trait]
impl TextGenerator for GeminiService {
    async fn generate(
        &self,
        contents: &[Content],
        schema: Option<&ResponseSchema>,
    ) -> ApiResult<String> {
        let request = build_request(contents, schema);
        debug!("Sending {} content turn(s) to {}", contents.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini request failed with status {}: {}", status, body);
            return Err(ApiError::Internal(format!(
                "Gemini request failed with status {}",
                status
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|err| {
            error!("Failed to parse Gemini response: {:?}", err);
            ApiError::UpstreamFormat("Gemini returned an unreadable response".to_string())
        })?;

        body.text()
            .ok_or_else(|| ApiError::UpstreamFormat("Gemini returned no text".to_string()))
    }
}
