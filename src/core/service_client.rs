// src/core/service_client.rs
//! HTTP client for the document text-extraction service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{error, info};

use crate::profile::document::{DocumentKind, ExtractionError, TextExtractor, UploadedDocument};

const EXTRACT_ENDPOINT: &str = "/extract";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    text: String,
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextExtractor for ServiceClient {
    async fn extract(
        &self,
        kind: DocumentKind,
        document: &UploadedDocument,
    ) -> Result<String, ExtractionError> {
        let url = format!("{}{}", self.base_url, EXTRACT_ENDPOINT);

        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(kind.mime_type())
            .map_err(|e| ExtractionError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        info!("Calling text extraction service: {} ({})", url, document.file_name);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Text extraction service error {}: {}", status, body);
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ExtractResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Request(format!("invalid extraction payload: {}", e)))?;

        info!("Extracted {} characters from {}", parsed.text.len(), document.file_name);
        Ok(parsed.text)
    }
}
