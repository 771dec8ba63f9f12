mod local_vector_index;
mod qdrant_adapter;
mod vector_store_factory;

pub use local_vector_index::LocalVectorIndex;
pub use qdrant_adapter::QdrantAdapter;
pub use vector_store_factory::VectorStoreFactory;
