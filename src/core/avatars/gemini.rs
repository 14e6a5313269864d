use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ImageGenError, ImageGenerator};
use crate::core::config::AvatarConfig;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResContent>,
}

#[derive(Deserialize)]
struct GeminiResContent {
    #[serde(default)]
    parts: Vec<GeminiResPart>,
}

#[derive(Deserialize)]
struct GeminiResPart {
    #[serde(rename = "inlineData", default)]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// Image editing through the Gemini `generateContent` endpoint.
pub struct GeminiImageClient {
    api_key: String,
    endpoint: String,
    model: String,
    client: Client,
}

impl GeminiImageClient {
    pub fn new(api_key: String, endpoint: String, model: String, client: Client) -> Self {
        Self {
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            client,
        }
    }

    pub fn from_config(config: &AvatarConfig) -> Result<Self, ImageGenError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ImageGenError::Config("GEMINI_API_KEY is not set".to_string()))?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(
            api_key,
            config.endpoint.clone(),
            config.model.clone(),
            client,
        ))
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate(
        &self,
        source: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<Vec<u8>, ImageGenError> {
        if source.is_empty() {
            return Err(ImageGenError::MissingSource);
        }

        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text {
                        text: prompt.to_string(),
                    },
                    GeminiPart::Inline {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: STANDARD.encode(source),
                        },
                    },
                ],
            }],
        };

        let res = self
            .client
            .post(self.url())
            .query(&[("key", &self.api_key)])
            .json(&req)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("Gemini API error (status={})", status.as_u16()));
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = res.json().await?;
        let data = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
            .map(|inline| inline.data)
            .ok_or(ImageGenError::NoImage)?;
        Ok(STANDARD.decode(data)?)
    }
}
