//! Image Renderer Port
//!
//! Abstract interface for the backend that draws Madouji text as an image.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Attachment;
use crate::domain::errors::RelayError;
use crate::domain::value_objects::WrapMode;

/// What the backend is asked to draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Text already laid out into lines, diacritics composed
    pub lines: Vec<String>,
    /// Edge length of one glyph in pixels
    pub glyph_size: u32,
    pub wrap: WrapMode,
    pub line_width: u32,
}

/// Image rendering backend
#[async_trait]
pub trait GlyphImageRenderer: Send + Sync {
    /// Render the request into an image attachment
    async fn render(&self, request: &ImageRequest) -> Result<Attachment, RelayError>;
}
