use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, DocumentId, ExtractionUnit};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Paragraph, line, sentence, word, then bare character boundary.
pub const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// Splits text into windows of at most `chunk_size` characters.
///
/// Each window ends on the highest-priority separator found inside it; when a
/// separator level has no usable occurrence the search falls through to the
/// next level, ending with a hard cut at `chunk_size`. The next window always
/// starts exactly `chunk_overlap` characters before the previous one ended.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<Vec<char>>,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TextSplitterError> {
        Self::with_separators(chunk_size, chunk_overlap, &DEFAULT_SEPARATORS)
    }

    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: &[&str],
    ) -> Result<Self, TextSplitterError> {
        if chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: separators.iter().map(|s| s.chars().collect()).collect(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Returns `(start, end)` character ranges covering `chars`.
    fn spans(&self, chars: &[char]) -> Vec<(usize, usize)> {
        let total = chars.len();
        let mut spans = Vec::new();
        let mut start = 0;

        loop {
            if total - start <= self.chunk_size {
                spans.push((start, total));
                break;
            }

            let window_end = start + self.chunk_size;
            // Cutting at or before start + overlap would stall the next window.
            let min_cut = start + self.chunk_overlap + 1;
            let cut = self.find_cut(chars, min_cut, window_end);

            spans.push((start, cut));
            start = cut - self.chunk_overlap;
        }

        spans
    }

    fn find_cut(&self, chars: &[char], min_cut: usize, window_end: usize) -> usize {
        for separator in &self.separators {
            if separator.is_empty() {
                return window_end;
            }
            if let Some(cut) = last_separator_end(chars, separator, min_cut, window_end) {
                return cut;
            }
        }
        window_end
    }
}

fn last_separator_end(
    chars: &[char],
    separator: &[char],
    min_cut: usize,
    window_end: usize,
) -> Option<usize> {
    let len = separator.len();
    (min_cut.max(len)..=window_end)
        .rev()
        .find(|&end| chars[end - len..end] == *separator)
}

/// 1-based paragraph number of each span start, counting runs of blank lines.
fn paragraph_numbers(chars: &[char], spans: &[(usize, usize)]) -> Vec<u32> {
    let mut numbers = Vec::with_capacity(spans.len());
    let mut breaks: u32 = 0;
    let mut scanned = 0;

    for &(start, _) in spans {
        while scanned + 1 < start {
            let opens_break = chars[scanned] == '\n'
                && chars[scanned + 1] == '\n'
                && (scanned == 0 || chars[scanned - 1] != '\n');
            if opens_break {
                breaks += 1;
            }
            scanned += 1;
        }
        numbers.push(breaks + 1);
    }

    numbers
}

#[async_trait]
impl TextSplitter for RecursiveCharacterSplitter {
    async fn split(
        &self,
        unit: &ExtractionUnit,
        document_id: DocumentId,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        if unit.is_blank() {
            return Ok(Vec::new());
        }

        let chars: Vec<char> = unit.text.chars().collect();
        let spans = self.spans(&chars);
        let paragraphs = paragraph_numbers(&chars, &spans);

        let chunks = spans
            .into_iter()
            .zip(paragraphs)
            .map(|((start, end), paragraph)| {
                let text: String = chars[start..end].iter().collect();
                Chunk::new(text, document_id, unit.source.clone(), unit.page, start)
                    .with_paragraph(paragraph)
            })
            .collect();

        Ok(chunks)
    }
}
