use config::{Config, File, FileFormat};

use parchment::application::ports::{Embedder, LlmClientError};
use parchment::infrastructure::llm::{
    ChatCompletionsClient, EmbedderFactory, EmbedderFactoryError, GROQ_BASE_URL, OPENAI_BASE_URL,
};
use parchment::presentation::config::{
    EmbeddingProvider, EmbeddingsSettings, IndexProvider, LlmProvider, LlmSettings, Settings,
};
use parchment::presentation::Environment;

fn settings_from_toml(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_no_configuration_when_defaulting_then_matches_pipeline_constants() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.chunking.chunk_size, 1000);
    assert_eq!(settings.chunking.chunk_overlap, 150);
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.index.provider, IndexProvider::Local);
    assert_eq!(settings.embeddings.dimension, 384);
    assert_eq!(settings.llm.provider, LlmProvider::Groq);
    assert_eq!(settings.llm.model, "llama3-8b-8192");
    assert_eq!(settings.llm.temperature, 0.0);
}

#[test]
fn given_partial_toml_when_loading_then_missing_sections_use_defaults() {
    let settings = settings_from_toml(
        r#"
        [llm]
        provider = "lmstudio"
        base_url = "http://localhost:1234/v1"

        [embeddings]
        provider = "openai"
        model = "text-embedding-3-small"
        dimension = 1536
        "#,
    );

    assert_eq!(settings.llm.provider, LlmProvider::LmStudio);
    assert_eq!(settings.llm.max_tokens, 1024);
    assert_eq!(settings.embeddings.provider, EmbeddingProvider::OpenAi);
    assert_eq!(settings.embeddings.dimension, 1536);
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.ocr.language, "eng");
}

#[test]
fn given_qdrant_index_when_loading_then_parses_provider() {
    let settings = settings_from_toml(
        r#"
        [index]
        provider = "qdrant"
        collection = "papers"
        "#,
    );

    assert_eq!(settings.index.provider, IndexProvider::Qdrant);
    assert_eq!(settings.index.collection, "papers");
    assert_eq!(settings.index.url, "http://localhost:6334");
}

#[test]
fn given_environment_names_when_parsing_then_accepts_known_values() {
    assert_eq!(Environment::try_from("local".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from("TEST".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Prod));
    assert!(Environment::try_from("staging".to_string()).is_err());
    assert_eq!(Environment::Prod.file_suffix(), "prod");
}

#[test]
fn given_groq_provider_without_base_url_when_building_client_then_uses_groq_endpoint() {
    let client = ChatCompletionsClient::from_settings(&LlmSettings::default()).unwrap();

    assert_eq!(client.base_url(), GROQ_BASE_URL);
}

#[test]
fn given_openai_provider_when_building_client_then_uses_openai_endpoint() {
    let settings = LlmSettings {
        provider: LlmProvider::OpenAi,
        api_key: "sk-test".to_string(),
        ..LlmSettings::default()
    };

    let client = ChatCompletionsClient::from_settings(&settings).unwrap();

    assert_eq!(client.base_url(), OPENAI_BASE_URL);
}

#[test]
fn given_explicit_base_url_when_building_client_then_overrides_provider_default() {
    let settings = LlmSettings {
        base_url: Some("http://localhost:1234/v1/".to_string()),
        ..LlmSettings::default()
    };

    let client = ChatCompletionsClient::from_settings(&settings).unwrap();

    assert_eq!(client.base_url(), "http://localhost:1234/v1");
}

#[test]
fn given_lmstudio_without_base_url_when_building_client_then_rejects_configuration() {
    let settings = LlmSettings {
        provider: LlmProvider::LmStudio,
        ..LlmSettings::default()
    };

    let result = ChatCompletionsClient::from_settings(&settings);

    assert!(matches!(
        result,
        Err(LlmClientError::InvalidConfiguration(_))
    ));
}

#[test]
fn given_openai_embeddings_with_key_when_creating_then_reports_configured_dimension() {
    let settings = EmbeddingsSettings {
        provider: EmbeddingProvider::OpenAi,
        model: "text-embedding-3-small".to_string(),
        dimension: 1536,
        api_key: Some("sk-test-key".to_string()),
        base_url: None,
    };

    let embedder = EmbedderFactory::create(&settings).unwrap();

    assert_eq!(embedder.dimensions(), 1536);
}

#[test]
fn given_openai_embeddings_without_key_when_creating_then_returns_missing_key() {
    for api_key in [None, Some(String::new())] {
        let settings = EmbeddingsSettings {
            provider: EmbeddingProvider::OpenAi,
            api_key,
            ..EmbeddingsSettings::default()
        };

        let result = EmbedderFactory::create(&settings);

        assert!(matches!(result, Err(EmbedderFactoryError::MissingApiKey)));
    }
}
