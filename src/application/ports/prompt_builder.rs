/// Turns retrieved chunk texts (in rank order) and the question into one prompt.
pub trait PromptBuilder: Send + Sync {
    fn build(&self, question: &str, chunk_texts: &[&str]) -> String;
}
