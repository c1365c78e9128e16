//! HTTP Image Renderer
//!
//! Hands laid-out glyph lines to an external rendering service and returns
//! the PNG it answers with.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use runic::{Attachment, GlyphImageRenderer, ImageRequest, RelayError};

/// File name of every rendered image
pub const IMAGE_FILENAME: &str = "mdj.png";

/// HTTP implementation of GlyphImageRenderer
pub struct HttpImageRenderer {
    client: Client,
    url: String,
}

impl HttpImageRenderer {
    pub fn new(url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("runicbabble/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl GlyphImageRenderer for HttpImageRenderer {
    async fn render(&self, request: &ImageRequest) -> Result<Attachment, RelayError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::Render(format!("Image backend unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Render(format!(
                "Image backend answered {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Render(format!("Failed to read image: {e}")))?;

        if bytes.is_empty() {
            return Err(RelayError::Render("Image backend returned no data".to_string()));
        }

        Ok(Attachment::new(IMAGE_FILENAME, bytes.to_vec()))
    }
}
