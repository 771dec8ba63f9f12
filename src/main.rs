use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use parchment::application::ports::{CollectionConfig, Extractor, OcrEngine, UploadStore};
use parchment::application::services::{IngestionService, RetrievalService, StuffPromptBuilder};
use parchment::domain::FileType;
use parchment::infrastructure::llm::{ChatCompletionsClient, EmbedderFactory};
use parchment::infrastructure::observability::{TracingConfig, init_tracing};
use parchment::infrastructure::persistence::VectorStoreFactory;
use parchment::infrastructure::storage::LocalUploadStore;
use parchment::infrastructure::text_processing::{
    CompositeExtractor, ImageOcrAdapter, PdfAdapter, PdfOxideTextLayer, PdfiumRasterizer,
    PlainTextAdapter, RecursiveCharacterSplitter, TesseractOcr,
};
use parchment::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_env(environment))?;

    let embedder = EmbedderFactory::create(&settings.embeddings)?;
    let dimension = embedder.dimensions();

    let vector_store = VectorStoreFactory::create(&settings.index, dimension).await?;
    let created = vector_store
        .create_collection(&CollectionConfig::new(dimension as u64))
        .await
        .context("Failed to prepare vector index")?;
    tracing::info!(created, entries = vector_store.count().await?, "Vector index ready");

    let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::new(
        settings.ocr.binary.clone(),
        settings.ocr.language.clone(),
    ));
    let pdf_adapter: Arc<dyn Extractor> = Arc::new(PdfAdapter::new(
        Arc::new(PdfOxideTextLayer),
        Arc::new(PdfiumRasterizer::new(settings.ocr.dpi)),
        Arc::clone(&ocr),
    ));
    let image_adapter: Arc<dyn Extractor> = Arc::new(ImageOcrAdapter::new(ocr));
    let text_adapter: Arc<dyn Extractor> = Arc::new(PlainTextAdapter);
    let extractor = Arc::new(CompositeExtractor::new(vec![
        (FileType::Pdf, pdf_adapter),
        (FileType::Image, image_adapter),
        (FileType::Text, text_adapter),
    ]));

    let text_splitter = Arc::new(RecursiveCharacterSplitter::new(
        settings.chunking.chunk_size,
        settings.chunking.chunk_overlap,
    )?);

    let llm_client = Arc::new(ChatCompletionsClient::from_settings(&settings.llm)?);
    tracing::info!(
        provider = ?settings.llm.provider,
        model = %settings.llm.model,
        base_url = %llm_client.base_url(),
        "Chat model configured"
    );

    let ingestion_service = Arc::new(IngestionService::new(
        extractor,
        text_splitter,
        Arc::clone(&embedder),
        Arc::clone(&vector_store),
    ));

    let retrieval_service = Arc::new(RetrievalService::new(
        embedder,
        llm_client,
        vector_store,
        Arc::new(StuffPromptBuilder),
        settings.retrieval.top_k,
    ));

    let upload_store: Arc<dyn UploadStore> =
        Arc::new(LocalUploadStore::new(settings.storage.upload_dir.clone())?);

    let state = AppState {
        ingestion_service,
        retrieval_service,
        upload_store,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
