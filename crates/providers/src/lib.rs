//! LLM provider implementations for Concierge.
//!
//! All providers implement the `concierge_core::Provider` trait.
//! The router selects the correct provider based on configuration, and
//! [`ChatLlm`] turns a provider into the `Llm` collaborator the rest of
//! the system talks to.

pub mod chat;
pub mod openai_compat;
pub mod router;

pub use chat::ChatLlm;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
