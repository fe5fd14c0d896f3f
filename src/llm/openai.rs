use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde_json::Value;
use std::time::Duration;

use super::{ ChatClient, CompletionRequest, ProviderError };
use crate::config::RelayConfig;

pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    url: String,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: Option<&str>,
        model: String,
        url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| ProviderError::Config(format!("Invalid API key format: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, model, url })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.api_key.as_deref(),
            config.model.clone(),
            config.base_url.clone(),
            config.request_timeout,
        )
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, ProviderError> {
        debug!("Sending {} messages to {} ({})", request.messages.len(), self.url, request.model);

        let resp = self.http.post(&self.url).json(request).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
