/// Text pulled out of a document together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionUnit {
    pub text: String,
    pub source: String,
    pub page: Option<u32>,
}

impl ExtractionUnit {
    pub fn new(text: String, source: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            text,
            source: source.into(),
            page,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
