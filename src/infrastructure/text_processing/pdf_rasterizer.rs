use std::path::Path;

use image::{ImageFormat, RgbaImage};
use pdfium_render::prelude::*;

use crate::application::ports::{PdfRasterizer, RasterizeError};

pub const DEFAULT_RENDER_DPI: f32 = 200.0;

/// Renders PDF pages to PNG through the system pdfium library.
#[derive(Debug, Clone, Copy)]
pub struct PdfiumRasterizer {
    dpi: f32,
}

impl PdfiumRasterizer {
    pub fn new(dpi: f32) -> Self {
        Self { dpi }
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_DPI)
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf: &Path) -> Result<Vec<Vec<u8>>, RasterizeError> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| RasterizeError::RendererUnavailable(e.to_string()))?;
        let pdfium = Pdfium::new(bindings);

        let doc = pdfium
            .load_pdf_from_file(pdf, None)
            .map_err(|e| RasterizeError::OpenFailed(e.to_string()))?;

        let page_count = doc.pages().len() as usize;
        tracing::debug!(page_count, dpi = self.dpi, "Rasterizing PDF");

        let mut png_buffers: Vec<Vec<u8>> = Vec::with_capacity(page_count);

        for index in 0..page_count {
            let page = doc
                .pages()
                .get(index as u16)
                .map_err(|e| RasterizeError::RenderFailed {
                    page: index + 1,
                    reason: e.to_string(),
                })?;

            let width = (page.width().value * self.dpi / 72.0) as i32;
            let height = (page.height().value * self.dpi / 72.0) as i32;

            let bitmap = page
                .render_with_config(
                    &PdfRenderConfig::new()
                        .set_target_width(width)
                        .set_target_height(height),
                )
                .map_err(|e| RasterizeError::RenderFailed {
                    page: index + 1,
                    reason: e.to_string(),
                })?;

            let rgba = RgbaImage::from_raw(
                bitmap.width() as u32,
                bitmap.height() as u32,
                bitmap.as_rgba_bytes(),
            )
            .ok_or_else(|| RasterizeError::RenderFailed {
                page: index + 1,
                reason: "bitmap size does not match render target".to_string(),
            })?;

            let mut png_bytes: Vec<u8> = Vec::new();
            rgba.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
                .map_err(|e| RasterizeError::RenderFailed {
                    page: index + 1,
                    reason: format!("PNG encode failed: {e}"),
                })?;

            png_buffers.push(png_bytes);
        }

        Ok(png_buffers)
    }
}
