use std::io::Write;
use std::process::{Command, Stdio};

use crate::application::ports::{OcrEngine, OcrError};

pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Shells out to the `tesseract` CLI, feeding the image on stdin.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_BINARY, DEFAULT_OCR_LANGUAGE)
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::EngineUnavailable(format!("{}: {e}", self.binary)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::EngineUnavailable("stdin not captured".to_string()))?;

        // Feed stdin from a separate thread so a full stdout pipe cannot deadlock us.
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(image));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });

        let output = match output {
            (Ok(output), _) if !output.status.success() => {
                return Err(OcrError::RecognitionFailed(format!(
                    "{} exited with {}: {}",
                    self.binary,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }
            (Ok(output), Ok(())) => output,
            (Ok(_), Err(e)) => return Err(OcrError::RecognitionFailed(e.to_string())),
            (Err(e), _) => return Err(OcrError::RecognitionFailed(e.to_string())),
        };

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
