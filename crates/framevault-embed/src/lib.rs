//! # framevault-embed
//!
//! `EmbeddingBackend` implementations.
//!
//! The Ollama backend talks to a local inference server over HTTP; the
//! mock backend produces deterministic embeddings and is the workhorse of
//! the workspace's tests.

pub mod mock;
pub mod ollama;

pub use mock::{MockEmbedder, MockEmbeddingGenerator};
pub use ollama::OllamaEmbedder;
