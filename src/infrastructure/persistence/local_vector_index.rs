use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::application::ports::{CollectionConfig, SearchResult, VectorStore, VectorStoreError};
use crate::domain::{Chunk, ChunkId, DocumentId, Embedding};

const JOURNAL_FILE: &str = "chunks.jsonl";
const MANIFEST_FILE: &str = "manifest.json";

/// Directory-backed vector index.
///
/// Every upserted chunk is appended to a JSON-lines journal and mirrored in
/// memory; `open` replays the journal so entries survive restarts. Search is
/// a brute-force cosine scan.
pub struct LocalVectorIndex {
    dir: PathBuf,
    dimension: usize,
    entries: RwLock<Vec<IndexedChunk>>,
}

struct IndexedChunk {
    chunk: Chunk,
    embedding: Embedding,
}

#[derive(Serialize, Deserialize)]
struct Manifest {
    dimension: usize,
}

#[derive(Serialize, Deserialize)]
struct JournalRecord {
    id: Uuid,
    document_id: Uuid,
    source: String,
    text: String,
    page: Option<u32>,
    paragraph: Option<u32>,
    offset: usize,
    vector: Vec<f32>,
}

impl JournalRecord {
    fn from_parts(chunk: &Chunk, embedding: &Embedding) -> Self {
        Self {
            id: chunk.id.as_uuid(),
            document_id: chunk.document_id.as_uuid(),
            source: chunk.source.clone(),
            text: chunk.text.clone(),
            page: chunk.page,
            paragraph: chunk.paragraph,
            offset: chunk.offset,
            vector: embedding.values.clone(),
        }
    }

    fn into_entry(self) -> IndexedChunk {
        IndexedChunk {
            chunk: Chunk {
                id: ChunkId::from_uuid(self.id),
                text: self.text,
                document_id: DocumentId::from_uuid(self.document_id),
                source: self.source,
                page: self.page,
                paragraph: self.paragraph,
                offset: self.offset,
            },
            embedding: Embedding::new(self.vector),
        }
    }
}

impl LocalVectorIndex {
    /// Opens the index stored in `dir`, replaying any existing journal.
    #[instrument(skip(dir), fields(path = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>, dimension: usize) -> Result<Self, VectorStoreError> {
        let dir = dir.as_ref().to_path_buf();
        let entries = load_journal(&dir.join(JOURNAL_FILE), dimension).await?;

        info!(entries = entries.len(), dimension, "local index opened");

        Ok(Self {
            dir,
            dimension,
            entries: RwLock::new(entries),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn journal_path(&self) -> PathBuf {
        self.dir.join(JOURNAL_FILE)
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn check_dimension(&self, actual: usize) -> Result<(), VectorStoreError> {
        if actual != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }
}

async fn load_journal(
    path: &Path,
    dimension: usize,
) -> Result<Vec<IndexedChunk>, VectorStoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    let mut torn_at = None;
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n').enumerate().peekable();

    while let Some((index, raw)) = lines.next() {
        let line_start = offset;
        offset += raw.len();

        let line = raw.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let record: JournalRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) if lines.peek().is_none() => {
                warn!(line = index + 1, error = %e, "discarding incomplete journal tail");
                torn_at = Some(line_start);
                continue;
            }
            Err(e) => {
                return Err(VectorStoreError::CorruptJournal {
                    line: index + 1,
                    reason: e.to_string(),
                });
            }
        };
        if record.vector.len() != dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: dimension,
                actual: record.vector.len(),
            });
        }
        entries.push(record.into_entry());
    }

    // Appends must start on a fresh line.
    if let Some(len) = torn_at {
        let journal = tokio::fs::OpenOptions::new().write(true).open(path).await?;
        journal.set_len(len as u64).await?;
        journal.sync_data().await?;
    } else if !contents.is_empty() && !contents.ends_with('\n') {
        let mut journal = tokio::fs::OpenOptions::new().append(true).open(path).await?;
        journal.write_all(b"\n").await?;
        journal.sync_data().await?;
    }

    Ok(entries)
}

#[async_trait]
impl VectorStore for LocalVectorIndex {
    #[instrument(skip(self, config), fields(dir = %self.dir.display()))]
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        let requested = config.vector_dimensions as usize;
        self.check_dimension(requested)?;

        if self.collection_exists().await? {
            let raw = tokio::fs::read_to_string(self.manifest_path()).await?;
            let manifest: Manifest = serde_json::from_str(&raw)
                .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;
            self.check_dimension(manifest.dimension)?;
            info!("local index already exists");
            return Ok(false);
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let manifest = serde_json::to_string(&Manifest {
            dimension: requested,
        })
        .map_err(|e| VectorStoreError::CollectionCreationFailed(e.to_string()))?;
        tokio::fs::write(self.manifest_path(), manifest).await?;

        info!(dimension = requested, "local index created");
        Ok(true)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Ok(tokio::fs::try_exists(self.manifest_path()).await?)
    }

    #[instrument(skip(self, chunks, embeddings), fields(dir = %self.dir.display(), count = chunks.len()))]
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::UpsertFailed(
                "chunks and embeddings count mismatch".to_string(),
            ));
        }
        for embedding in embeddings {
            self.check_dimension(embedding.dimensions())?;
        }

        let mut buffer = String::new();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            let line = serde_json::to_string(&JournalRecord::from_parts(chunk, embedding))
                .map_err(|e| VectorStoreError::UpsertFailed(e.to_string()))?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        // Writers hold the lock across the append so journal order matches memory order.
        let mut entries = self.entries.write().await;

        tokio::fs::create_dir_all(&self.dir).await?;
        let mut journal = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.journal_path())
            .await?;
        journal.write_all(buffer.as_bytes()).await?;
        journal.sync_data().await?;

        entries.extend(
            chunks
                .iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| IndexedChunk {
                    chunk: chunk.clone(),
                    embedding: embedding.clone(),
                }),
        );

        info!(count = chunks.len(), total = entries.len(), "chunks appended");
        Ok(())
    }

    #[instrument(skip(self, embedding), fields(dir = %self.dir.display(), top_k = top_k))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        self.check_dimension(embedding.dimensions())?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, embedding.cosine_similarity(&entry.embedding)))
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(position, score)| SearchResult::new(entries[position].chunk.clone(), score))
            .collect())
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        Ok(self.entries.read().await.len() as u64)
    }
}
