//! Render Pipeline
//!
//! Turns raw message text into a renderable payload, either inline as
//! emoji tokens or as an image through the rendering backend.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{
    compose_diacritics, find_trigger_spans, layout_lines, replace_trigger_spans, GlyphTable,
    RelayError, RenderedPayload, WrapMode,
};
use crate::ports::{GlyphImageRenderer, ImageRequest};

/// Glyph edge length handed to the image backend
pub const DEFAULT_GLYPH_SIZE: u32 = 32;

pub struct RenderPipeline {
    table: RwLock<Option<Arc<GlyphTable>>>,
    renderer: Option<Arc<dyn GlyphImageRenderer>>,
    glyph_size: u32,
}

impl RenderPipeline {
    /// Create a pipeline without an image backend; command mode will fail
    pub fn new() -> Self {
        Self {
            table: RwLock::new(None),
            renderer: None,
            glyph_size: DEFAULT_GLYPH_SIZE,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn GlyphImageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_glyph_size(mut self, glyph_size: u32) -> Self {
        self.glyph_size = glyph_size;
        self
    }

    /// Swap in a freshly built table; in-flight renders keep the old one
    pub async fn install_table(&self, table: GlyphTable) {
        let glyphs = table.len();
        *self.table.write().await = Some(Arc::new(table));
        info!(glyphs = %glyphs, "Glyph table installed");
    }

    /// Whether inline rendering can serve traffic
    pub async fn is_ready(&self) -> bool {
        self.table.read().await.is_some()
    }

    async fn table(&self) -> Result<Arc<GlyphTable>, RelayError> {
        self.table
            .read()
            .await
            .clone()
            .ok_or(RelayError::GlyphTableNotLoaded)
    }

    /// Render every trigger span of `text` in place
    ///
    /// Returns `Ok(None)` when the text holds no trigger.
    pub async fn render_inline(&self, text: &str) -> Result<Option<RenderedPayload>, RelayError> {
        if find_trigger_spans(text).is_empty() {
            return Ok(None);
        }

        let table = self.table().await?;
        let rendered = replace_trigger_spans(text, |body| {
            table.substitute(&compose_diacritics(body))
        });

        Ok(rendered.map(RenderedPayload::text))
    }

    /// Render the whole text as an image
    pub async fn render_command(
        &self,
        text: &str,
        wrap: WrapMode,
        line_width: u32,
    ) -> Result<RenderedPayload, RelayError> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(|| RelayError::Render("no image backend configured".to_string()))?;

        let composed = compose_diacritics(text);
        let request = ImageRequest {
            lines: layout_lines(&composed, wrap, line_width as usize),
            glyph_size: self.glyph_size,
            wrap,
            line_width,
        };
        debug!(
            lines = %request.lines.len(),
            wrap = %wrap,
            line_width = %line_width,
            "Rendering image"
        );

        let attachment = renderer.render(&request).await?;
        Ok(RenderedPayload::attachment(attachment))
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{full_table, MockRenderer};

    #[tokio::test]
    async fn test_no_trigger_is_no_match() {
        let pipeline = RenderPipeline::new();
        pipeline.install_table(full_table()).await;

        let rendered = pipeline.render_inline("nothing to see here").await.unwrap();
        assert!(rendered.is_none());
    }

    #[tokio::test]
    async fn test_no_trigger_needs_no_table() {
        let pipeline = RenderPipeline::new();
        assert!(pipeline.render_inline("hello").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_only_the_span_is_substituted() {
        let table = full_table();
        let pipeline = RenderPipeline::new();
        pipeline.install_table(table.clone()).await;

        let rendered = pipeline
            .render_inline("look: `mdj hello` ok")
            .await
            .unwrap()
            .unwrap();

        let expected = format!("look: {} ok", table.substitute("hello"));
        assert_eq!(rendered, RenderedPayload::text(expected));
        assert_ne!(table.substitute("hello"), "hello");
    }

    #[tokio::test]
    async fn test_diacritics_compose_before_substitution() {
        let table = full_table();
        let pipeline = RenderPipeline::new();
        pipeline.install_table(table.clone()).await;

        let rendered = pipeline.render_inline("`mdj A'w'`").await.unwrap().unwrap();
        let expected = format!("{}{}", table.lookup('á'), table.lookup('\u{b5}'));
        assert_eq!(rendered.content(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_trigger_without_table_refuses() {
        let pipeline = RenderPipeline::new();
        let err = pipeline.render_inline("`mdj hello`").await.unwrap_err();
        assert!(matches!(err, RelayError::GlyphTableNotLoaded));
        assert!(!pipeline.is_ready().await);
    }

    #[tokio::test]
    async fn test_command_mode_delegates_laid_out_lines() {
        let renderer = Arc::new(MockRenderer::default());
        let pipeline = RenderPipeline::new()
            .with_renderer(renderer.clone())
            .with_glyph_size(48);

        let rendered = pipeline
            .render_command("ka'ra to", WrapMode::Flow, 4)
            .await
            .unwrap();

        assert!(matches!(rendered, RenderedPayload::Attachment { .. }));
        let requests = renderer.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].lines, vec!["kára", "to"]);
        assert_eq!(requests[0].glyph_size, 48);
    }

    #[tokio::test]
    async fn test_command_mode_without_backend() {
        let pipeline = RenderPipeline::new();
        let err = pipeline
            .render_command("hello", WrapMode::None, 8)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Render(_)));
    }
}
