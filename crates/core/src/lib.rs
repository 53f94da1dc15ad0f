//! # Concierge Core
//!
//! Domain types, traits, and error definitions for Concierge, the assistant
//! selector. This crate has **no framework dependencies**: it defines the
//! domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping the LLM backend via configuration
//! - Easy testing with scripted mock collaborators
//! - Clean dependency graph (all crates depend inward on core)

pub mod data_source;
pub mod error;
pub mod llm;
pub mod message;
pub mod provider;
pub mod status;

// Re-export key types at crate root for ergonomics
pub use data_source::{DataSource, ModelId};
pub use error::{AssistantError, Error, ProviderError, RegistryError, Result};
pub use llm::{ChoiceRequest, Llm};
pub use message::{Message, RequestBody, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use status::{StatusChannel, StatusEvent, status_channel};
