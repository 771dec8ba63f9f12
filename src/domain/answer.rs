pub const EXCERPT_MAX_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<SourceDescriptor>,
    pub themes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    pub document: String,
    pub page: Option<u32>,
    pub content: String,
    pub paragraph: Option<u32>,
    pub rank: usize,
}

impl SourceDescriptor {
    pub fn excerpt(text: &str) -> String {
        text.chars().take(EXCERPT_MAX_CHARS).collect()
    }
}
