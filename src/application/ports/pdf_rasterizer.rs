use std::path::Path;

/// Renders every page of a PDF to an encoded (PNG) image, in page order.
pub trait PdfRasterizer: Send + Sync {
    fn rasterize(&self, pdf: &Path) -> Result<Vec<Vec<u8>>, RasterizeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RasterizeError {
    #[error("pdf renderer unavailable: {0}")]
    RendererUnavailable(String),
    #[error("failed to open pdf: {0}")]
    OpenFailed(String),
    #[error("failed to render page {page}: {reason}")]
    RenderFailed { page: usize, reason: String },
}
