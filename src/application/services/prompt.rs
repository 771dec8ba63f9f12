use crate::application::ports::PromptBuilder;

const INSTRUCTIONS: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Concatenates every retrieved chunk verbatim into a single prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct StuffPromptBuilder;

impl PromptBuilder for StuffPromptBuilder {
    fn build(&self, question: &str, chunk_texts: &[&str]) -> String {
        let context = chunk_texts.join("\n\n");
        format!("{INSTRUCTIONS}\n\n{context}\n\nQuestion: {question}\nHelpful Answer:")
    }
}
