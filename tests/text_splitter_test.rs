use parchment::application::ports::{TextSplitter, TextSplitterError};
use parchment::domain::{Chunk, DocumentId, ExtractionUnit};
use parchment::infrastructure::text_processing::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, RecursiveCharacterSplitter,
};

fn unit(text: &str) -> ExtractionUnit {
    ExtractionUnit::new(text.to_string(), "notes.txt", Some(3))
}

fn long_prose() -> String {
    let sentence = "Rust guarantees memory safety without a garbage collector. ";
    let paragraph = sentence.repeat(6);
    (0..12)
        .map(|i| format!("Section {i}. {paragraph}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

async fn split_default(text: &str) -> Vec<Chunk> {
    let splitter = RecursiveCharacterSplitter::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();
    splitter.split(&unit(text), DocumentId::new()).await.unwrap()
}

fn prefix(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn suffix(text: &str, n: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len - n).collect()
}

#[tokio::test]
async fn given_long_text_when_splitting_then_no_chunk_exceeds_maximum() {
    let chunks = split_default(&long_prose()).await;

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.char_len() <= DEFAULT_CHUNK_SIZE);
    }
}

#[tokio::test]
async fn given_long_text_when_splitting_then_adjacent_chunks_overlap_exactly() {
    let chunks = split_default(&long_prose()).await;

    for pair in chunks.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        assert_eq!(
            next.offset + DEFAULT_CHUNK_OVERLAP,
            previous.offset + previous.char_len()
        );
        assert_eq!(
            suffix(&previous.text, DEFAULT_CHUNK_OVERLAP),
            prefix(&next.text, DEFAULT_CHUNK_OVERLAP)
        );
    }
}

#[tokio::test]
async fn given_long_text_when_splitting_then_chunks_cover_whole_text() {
    let text = long_prose();
    let chunks = split_default(&text).await;

    assert_eq!(chunks.first().unwrap().offset, 0);
    let last = chunks.last().unwrap();
    assert_eq!(last.offset + last.char_len(), text.chars().count());
}

#[tokio::test]
async fn given_words_separated_by_spaces_when_splitting_then_cuts_after_space() {
    let splitter = RecursiveCharacterSplitter::new(10, 3).unwrap();

    let chunks = splitter
        .split(&unit("aaaa bbbb cccc dddd"), DocumentId::new())
        .await
        .unwrap();

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["aaaa bbbb ", "bb cccc ", "cc dddd"]);
}

#[tokio::test]
async fn given_text_without_separators_when_splitting_then_hard_cuts_at_maximum() {
    let text = "x".repeat(2500);

    let chunks = split_default(&text).await;

    let lengths: Vec<usize> = chunks.iter().map(Chunk::char_len).collect();
    assert_eq!(lengths, vec![1000, 1000, 800]);
    let offsets: Vec<usize> = chunks.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 850, 1700]);
}

#[tokio::test]
async fn given_paragraph_break_inside_window_when_splitting_then_prefers_paragraph_boundary() {
    let splitter = RecursiveCharacterSplitter::new(20, 5).unwrap();
    let text = "aaaa aaaa aaaa\n\nbbbb bbbb bbbb\n\ncccc cccc";

    let chunks = splitter.split(&unit(text), DocumentId::new()).await.unwrap();

    assert_eq!(chunks[0].text, "aaaa aaaa aaaa\n\n");
    let paragraphs: Vec<Option<u32>> = chunks.iter().map(|c| c.paragraph).collect();
    assert_eq!(paragraphs, vec![Some(1), Some(1), Some(2)]);
}

#[tokio::test]
async fn given_runs_of_blank_lines_when_splitting_then_each_run_starts_one_paragraph() {
    let splitter = RecursiveCharacterSplitter::new(24, 0).unwrap();
    let text = "Alpha tides rise.\n\n\nBeta waves break.\n\n\n\nGamma sand drifts.";

    let chunks = splitter.split(&unit(text), DocumentId::new()).await.unwrap();

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Alpha tides rise.\n\n\n",
            "Beta waves break.\n\n\n\n",
            "Gamma sand drifts."
        ]
    );
    let paragraphs: Vec<Option<u32>> = chunks.iter().map(|c| c.paragraph).collect();
    assert_eq!(paragraphs, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn given_short_text_when_splitting_then_returns_single_chunk() {
    let chunks = split_default("Alpha beta gamma.").await;

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Alpha beta gamma.");
    assert_eq!(chunks[0].paragraph, Some(1));
}

#[tokio::test]
async fn given_empty_text_when_splitting_then_returns_no_chunks() {
    assert!(split_default("").await.is_empty());
    assert!(split_default("  \n\n\t ").await.is_empty());
}

#[tokio::test]
async fn given_unit_with_page_when_splitting_then_chunks_carry_provenance() {
    let splitter = RecursiveCharacterSplitter::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();
    let document_id = DocumentId::new();

    let chunks = splitter.split(&unit(&long_prose()), document_id).await.unwrap();

    for chunk in &chunks {
        assert_eq!(chunk.document_id, document_id);
        assert_eq!(chunk.source, "notes.txt");
        assert_eq!(chunk.page, Some(3));
    }
}

#[test]
fn given_overlap_not_smaller_than_size_when_creating_then_rejects_configuration() {
    let result = RecursiveCharacterSplitter::new(100, 100);

    assert!(matches!(
        result,
        Err(TextSplitterError::InvalidConfiguration(_))
    ));
}

#[test]
fn given_zero_chunk_size_when_creating_then_rejects_configuration() {
    assert!(RecursiveCharacterSplitter::new(0, 0).is_err());
}

#[test]
fn given_defaults_when_creating_then_uses_thousand_and_hundred_fifty() {
    let splitter = RecursiveCharacterSplitter::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();

    assert_eq!(splitter.chunk_size(), 1000);
    assert_eq!(splitter.chunk_overlap(), 150);
}
